//! The persisted description of one extraction pass.
//!
//! A manifest is sufficient to reconstruct every block without the original
//! document, so outputs can be regenerated long after the source moved on.
//! Decoding is all-or-nothing: an unrecognized block type fails the whole
//! parse instead of silently dropping an item.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::{Block, BlockKind, BlockType, SourceLocation};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("expected one output name per block: {blocks} blocks, {outputs} names")]
    OutputCountMismatch { blocks: usize, outputs: usize },
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Order-preserving description of one extraction pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub input: String,
    /// ISO-8601 timestamp captured at encode time.
    pub generated_at: String,
    pub items: Vec<ManifestItem>,
}

/// Flattened, type-tagged superset of every block variant plus the rendered
/// output name. Which optional arrays are meaningful follows from `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestItem {
    pub index: usize,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degrees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bass: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<String>>>,
}

impl Manifest {
    /// Encode one extraction pass. `outputs` must hold one rendered file name
    /// per block, in the same order.
    pub fn encode(
        input: impl Into<String>,
        blocks: &[Block],
        outputs: &[String],
    ) -> Result<Manifest, ManifestError> {
        if blocks.len() != outputs.len() {
            return Err(ManifestError::OutputCountMismatch {
                blocks: blocks.len(),
                outputs: outputs.len(),
            });
        }
        let items = blocks
            .iter()
            .zip(outputs)
            .map(|(block, output)| ManifestItem::from_block(block, output.clone()))
            .collect();
        Ok(Manifest {
            input: input.into(),
            generated_at: Utc::now().to_rfc3339(),
            items,
        })
    }

    /// Reconstruct the blocks described by this manifest, independent of the
    /// original document.
    pub fn to_blocks(&self) -> Vec<Block> {
        self.items.iter().map(ManifestItem::to_block).collect()
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a persisted manifest, failing fast on any unrecognized block
    /// type.
    pub fn from_json(json: &str) -> Result<Manifest, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ManifestItem {
    /// Flatten a block and its rendered output name into one item.
    pub fn from_block(block: &Block, output: String) -> ManifestItem {
        let mut item = ManifestItem {
            index: block.index,
            block_type: block.block_type(),
            title: block.title.clone(),
            key: None,
            note: None,
            output,
            source: block.source.clone(),
            chords: None,
            degrees: None,
            bass: None,
            headers: None,
            rows: None,
        };
        match &block.kind {
            BlockKind::Table {
                caption,
                headers,
                rows,
            } => {
                if item.title.is_none() {
                    item.title = caption.clone();
                }
                item.headers = Some(headers.clone());
                item.rows = Some(rows.clone());
            }
            BlockKind::ChordProgression { key, chords, note } => {
                item.key = key.clone();
                item.note = note.clone();
                item.chords = Some(chords.clone());
            }
            BlockKind::DegreeProgression { key, degrees, note } => {
                item.key = key.clone();
                item.note = note.clone();
                item.degrees = Some(degrees.clone());
            }
            BlockKind::Score {
                key,
                chords,
                bass,
                note,
            } => {
                item.key = key.clone();
                item.note = note.clone();
                item.chords = chords.clone();
                item.bass = bass.clone();
            }
        }
        item
    }

    /// Reverse the flattening for this item's type. Absent arrays default to
    /// empty where the block shape requires a sequence; a score's chords and
    /// bass stay optional.
    pub fn to_block(&self) -> Block {
        let kind = match self.block_type {
            BlockType::Table => BlockKind::Table {
                caption: self.title.clone(),
                headers: self.headers.clone().unwrap_or_default(),
                rows: self.rows.clone().unwrap_or_default(),
            },
            BlockType::ChordProgression => BlockKind::ChordProgression {
                key: self.key.clone(),
                chords: self.chords.clone().unwrap_or_default(),
                note: self.note.clone(),
            },
            BlockType::DegreeProgression => BlockKind::DegreeProgression {
                key: self.key.clone(),
                degrees: self.degrees.clone().unwrap_or_default(),
                note: self.note.clone(),
            },
            BlockType::Score => BlockKind::Score {
                key: self.key.clone(),
                chords: self.chords.clone(),
                bass: self.bass.clone(),
                note: self.note.clone(),
            },
        };
        Block {
            index: self.index,
            title: self.title.clone(),
            source: self.source.clone(),
            kind,
        }
    }
}
