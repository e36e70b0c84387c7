//! Classification of generic (untagged) table regions.

use crate::ast::{Node, NodeKind};
use crate::extract::ExtractOptions;
use crate::models::{Block, BlockKind};

/// Map a tabular region to a table block. The first row supplies the headers
/// and the remaining rows the data; a region with no rows at all is still a
/// valid, empty table. The caption mirrors into the block title.
pub(super) fn classify(
    node: &Node,
    caption: Option<String>,
    opts: &ExtractOptions,
    index: usize,
) -> Block {
    let mut rows = node
        .children
        .iter()
        .filter(|child| matches!(child.kind, NodeKind::TableRow));
    let headers = rows.next().map(row_cells).unwrap_or_default();
    let data: Vec<Vec<String>> = rows.map(row_cells).collect();

    Block {
        index,
        title: caption.clone(),
        source: opts.location(node),
        kind: BlockKind::Table {
            caption,
            headers,
            rows: data,
        },
    }
}

fn row_cells(row: &Node) -> Vec<String> {
    row.children
        .iter()
        .filter(|child| matches!(child.kind, NodeKind::TableCell))
        .map(Node::text_content)
        .collect()
}
