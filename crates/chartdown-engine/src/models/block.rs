use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Closed set of content block tags recognized by the extraction engine.
///
/// Adding a variant here is deliberately a compile-time event: every dispatch
/// site (classifiers, manifest codec, naming) matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Table,
    ChordProgression,
    DegreeProgression,
    Score,
}

impl BlockType {
    pub const ALL: [BlockType; 4] = [
        BlockType::Table,
        BlockType::ChordProgression,
        BlockType::DegreeProgression,
        BlockType::Score,
    ];

    /// Stable tag string used in fence info strings, manifests and file names.
    pub fn as_tag(&self) -> &'static str {
        match self {
            BlockType::Table => "table",
            BlockType::ChordProgression => "chord-progression",
            BlockType::DegreeProgression => "degree-progression",
            BlockType::Score => "score",
        }
    }

    /// Parse a fence tag, returning `None` for anything outside the closed set.
    pub fn from_tag(tag: &str) -> Option<BlockType> {
        match tag {
            "table" => Some(BlockType::Table),
            "chord-progression" => Some(BlockType::ChordProgression),
            "degree-progression" => Some(BlockType::DegreeProgression),
            "score" => Some(BlockType::Score),
            _ => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type: {0}")]
pub struct UnknownBlockType(pub String);

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::from_tag(s).ok_or_else(|| UnknownBlockType(s.to_string()))
    }
}

/// Provenance of a block within its source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file: PathBuf,
    /// 1-based first line of the originating region.
    pub start_line: usize,
    /// 1-based last line of the originating region.
    pub end_line: usize,
}

/// One typed, self-contained content unit extracted from a document.
///
/// Blocks are value objects: created by one extraction or decode pass and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// 1-based occurrence index, assigned in traversal-and-detection order.
    pub index: usize,
    pub title: Option<String>,
    /// Absent for blocks whose position is not meaningful (e.g. reconstituted
    /// from a manifest without recorded provenance).
    pub source: Option<SourceLocation>,
    pub kind: BlockKind,
}

/// Variant payload, one shape per [`BlockType`].
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Table {
        /// Defaults to the text of the heading immediately preceding the table.
        caption: Option<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    ChordProgression {
        key: Option<String>,
        chords: Vec<String>,
        note: Option<String>,
    },
    DegreeProgression {
        key: Option<String>,
        degrees: Vec<String>,
        note: Option<String>,
    },
    Score {
        key: Option<String>,
        chords: Option<Vec<String>>,
        bass: Option<Vec<String>>,
        note: Option<String>,
    },
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        match self.kind {
            BlockKind::Table { .. } => BlockType::Table,
            BlockKind::ChordProgression { .. } => BlockType::ChordProgression,
            BlockKind::DegreeProgression { .. } => BlockType::DegreeProgression,
            BlockKind::Score { .. } => BlockType::Score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for block_type in BlockType::ALL {
            assert_eq!(BlockType::from_tag(block_type.as_tag()), Some(block_type));
        }
    }

    #[test]
    fn test_unrecognized_tag() {
        assert_eq!(BlockType::from_tag("mermaid"), None);
        assert_eq!(BlockType::from_tag(""), None);
        assert_eq!(BlockType::from_tag("Table"), None);
    }

    #[test]
    fn test_from_str_reports_the_offending_tag() {
        let err = "tab".parse::<BlockType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown block type: tab");
    }

    #[test]
    fn test_serde_uses_kebab_case_tags() {
        let json = serde_json::to_string(&BlockType::DegreeProgression).unwrap();
        assert_eq!(json, "\"degree-progression\"");
        let parsed: BlockType = serde_json::from_str("\"chord-progression\"").unwrap();
        assert_eq!(parsed, BlockType::ChordProgression);
    }

    #[test]
    fn test_serde_rejects_unknown_tags() {
        let result = serde_json::from_str::<BlockType>("\"unknown\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_source_location_serializes_camel_case() {
        let location = SourceLocation {
            file: PathBuf::from("notes/theory.md"),
            start_line: 3,
            end_line: 7,
        };
        let json = serde_json::to_string(&location).unwrap();
        assert!(json.contains("\"startLine\":3"));
        assert!(json.contains("\"endLine\":7"));
    }
}
