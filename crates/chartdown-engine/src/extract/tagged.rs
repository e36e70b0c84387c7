//! Classification of regions explicitly marked with a recognized type tag.

use crate::ast::Node;
use crate::extract::{ExtractOptions, frontmatter, tokenize};
use crate::extract::frontmatter::FrontMatter;
use crate::models::{Block, BlockKind, BlockType, SourceLocation};

/// Map a tagged fence to its typed block. The front matter is split off
/// first; the body then goes through the tokenizer matching the tag.
pub(super) fn classify(
    tag: BlockType,
    node: &Node,
    opts: &ExtractOptions,
    index: usize,
) -> Block {
    let text = node.value.as_deref().unwrap_or_default();
    let fm = frontmatter::split_front_matter(text);
    let source = opts.location(node);

    let kind = match tag {
        BlockType::ChordProgression => BlockKind::ChordProgression {
            key: fm.key.clone(),
            chords: tokenize::split_chord_sequence(&fm.body),
            note: fm.note.clone(),
        },
        BlockType::DegreeProgression => BlockKind::DegreeProgression {
            key: fm.key.clone(),
            degrees: tokenize::split_degree_sequence(&fm.body),
            note: fm.note.clone(),
        },
        BlockType::Score => {
            let content = tokenize::split_score_content(&fm.body);
            BlockKind::Score {
                key: fm.key.clone(),
                chords: content.chords,
                bass: content.bass,
                note: fm.note.clone(),
            }
        }
        BlockType::Table => return table_in_fence(&fm, source, index),
    };

    Block {
        index,
        title: fm.title,
        source,
        kind,
    }
}

/// A `table` fence wraps markdown table syntax. Recover it by re-running the
/// extraction pipeline on the body restricted to tables and keeping the first
/// result; the explicit front-matter title wins over any caption the inner
/// pass inferred. No inner table yields an empty table block.
fn table_in_fence(fm: &FrontMatter, source: Option<SourceLocation>, index: usize) -> Block {
    let inner_opts = ExtractOptions {
        auto_detect: false,
        ..ExtractOptions::with_types([BlockType::Table])
    };
    match crate::extract::extract_from_str(&fm.body, &inner_opts)
        .into_iter()
        .next()
    {
        Some(mut block) => {
            block.index = index;
            block.source = source;
            if fm.title.is_some() {
                block.title = fm.title.clone();
                if let BlockKind::Table { caption, .. } = &mut block.kind {
                    *caption = fm.title.clone();
                }
            }
            block
        }
        None => Block {
            index,
            title: fm.title.clone(),
            source,
            kind: BlockKind::Table {
                caption: fm.title.clone(),
                headers: Vec::new(),
                rows: Vec::new(),
            },
        },
    }
}
