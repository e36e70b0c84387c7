//! The document-to-block extraction pass.
//!
//! One call walks one parsed tree twice: an explicit pass collects tagged
//! fences and generic tables in document order, then a heuristic pass scans
//! the remaining prose, continuing the same occurrence counter. The counter
//! is passed and returned between passes rather than held in shared state,
//! so concurrent extraction calls never interact.

pub mod frontmatter;
mod heuristic;
mod table;
mod tagged;
pub mod tokenize;

pub use frontmatter::{FrontMatter, split_front_matter};
pub use tokenize::{ScoreContent, split_chord_sequence, split_degree_sequence, split_score_content};

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::ast::{Node, NodeKind, parse_markdown};
use crate::models::{Block, BlockType, SourceLocation};

/// Options for one extraction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Block types the caller is interested in.
    pub types: BTreeSet<BlockType>,
    /// Whether untagged prose is scanned for progression-shaped lines.
    pub auto_detect: bool,
    /// Source file recorded in block provenance; without it blocks carry no
    /// location.
    pub source_file: Option<PathBuf>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            types: BlockType::ALL.into_iter().collect(),
            auto_detect: true,
            source_file: None,
        }
    }
}

impl ExtractOptions {
    /// Restrict extraction to the given block types.
    pub fn with_types(types: impl IntoIterator<Item = BlockType>) -> Self {
        Self {
            types: types.into_iter().collect(),
            ..Self::default()
        }
    }

    fn wants(&self, block_type: BlockType) -> bool {
        self.types.contains(&block_type)
    }

    fn location(&self, node: &Node) -> Option<SourceLocation> {
        let file = self.source_file.as_ref()?;
        let position = node.position?;
        Some(SourceLocation {
            file: file.clone(),
            start_line: position.start.line,
            end_line: position.end.line,
        })
    }
}

/// Extract every requested block from a parsed document tree.
///
/// Occurrence indices run `1..=N` in emission order: explicit blocks in
/// document order first, heuristic detections after.
pub fn extract_blocks(tree: &Node, opts: &ExtractOptions) -> Vec<Block> {
    let mut blocks = Vec::new();
    let next = collect_explicit(&tree.children, opts, &mut blocks, 1);
    let wants_progressions =
        opts.wants(BlockType::ChordProgression) || opts.wants(BlockType::DegreeProgression);
    if opts.auto_detect && wants_progressions {
        heuristic::detect(&tree.children, opts, &mut blocks, next);
    }
    blocks
}

/// Parse markdown text and extract in one call.
pub fn extract_from_str(text: &str, opts: &ExtractOptions) -> Vec<Block> {
    extract_blocks(&parse_markdown(text), opts)
}

fn collect_explicit(
    children: &[Node],
    opts: &ExtractOptions,
    out: &mut Vec<Block>,
    mut next: usize,
) -> usize {
    for (i, node) in children.iter().enumerate() {
        match &node.kind {
            NodeKind::Code { lang: Some(lang) } => {
                let Some(tag) = BlockType::from_tag(lang) else {
                    // Only the four recognized tags react; anything else is
                    // an ordinary code fence.
                    log::debug!("skipping fence with unrecognized tag {lang:?}");
                    continue;
                };
                if !opts.wants(tag) {
                    continue;
                }
                out.push(tagged::classify(tag, node, opts, next));
                next += 1;
            }
            NodeKind::Table => {
                if !opts.wants(BlockType::Table) {
                    continue;
                }
                let caption = preceding_heading(children, i);
                out.push(table::classify(node, caption, opts, next));
                next += 1;
            }
            _ => next = collect_explicit(&node.children, opts, out, next),
        }
    }
    next
}

/// The caption comes from the immediately preceding sibling, and only when
/// that sibling is a heading.
fn preceding_heading(children: &[Node], index: usize) -> Option<String> {
    let previous = children.get(index.checked_sub(1)?)?;
    matches!(previous.kind, NodeKind::Heading { .. }).then(|| previous.text_content())
}
