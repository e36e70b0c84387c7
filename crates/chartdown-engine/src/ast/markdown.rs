//! Adapter from raw markdown text to the generic [`Node`] tree.
//!
//! Parsing proper is delegated to `pulldown-cmark` (tables enabled); this
//! module only reshapes its event stream into nested nodes and converts byte
//! offsets into 1-based line/column positions.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use std::ops::Range;

use super::{Node, NodeKind, Point, Position};

/// Parse markdown text into a generic document tree with positions.
pub fn parse_markdown(text: &str) -> Node {
    let lines = LineIndex::new(text);
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES);

    let mut root = Node::new(NodeKind::Root);
    if !text.is_empty() {
        root.position = Some(lines.position(0..text.len()));
    }

    let mut stack: Vec<Node> = vec![root];
    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(tag) => {
                let mut node = Node::new(node_kind(&tag));
                node.position = Some(lines.position(range));
                stack.push(node);
            }
            Event::End(_) => {
                // pulldown-cmark guarantees balanced start/end events, so the
                // stack always holds the matching container plus the root.
                if stack.len() > 1
                    && let Some(node) = stack.pop()
                    && let Some(parent) = stack.last_mut()
                {
                    parent.children.push(finish(node));
                }
            }
            Event::Text(text) => push_leaf(&mut stack, leaf(NodeKind::Text, &text, &lines, range)),
            Event::Code(text) => {
                push_leaf(&mut stack, leaf(NodeKind::InlineCode, &text, &lines, range))
            }
            Event::SoftBreak | Event::HardBreak => {
                let mut node = Node::new(NodeKind::Break);
                node.position = Some(lines.position(range));
                push_leaf(&mut stack, node);
            }
            Event::Rule => {
                let mut node = Node::new(NodeKind::ThematicBreak);
                node.position = Some(lines.position(range));
                push_leaf(&mut stack, node);
            }
            _ => {}
        }
    }

    // Close anything left open (possible on malformed input).
    while stack.len() > 1 {
        if let Some(node) = stack.pop()
            && let Some(parent) = stack.last_mut()
        {
            parent.children.push(finish(node));
        }
    }
    stack.pop().unwrap_or_else(|| Node::new(NodeKind::Root))
}

fn node_kind(tag: &Tag<'_>) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading {
            depth: heading_depth(*level),
        },
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => NodeKind::Code {
            lang: fence_lang(kind),
        },
        Tag::List(_) => NodeKind::List,
        Tag::Item => NodeKind::ListItem,
        Tag::Table(_) => NodeKind::Table,
        // Header and body rows are modelled uniformly; the table classifier
        // treats the first row as the header row.
        Tag::TableHead | Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        _ => NodeKind::Other,
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn fence_lang(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        // Only the first word of the info string acts as the tag.
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

fn leaf(kind: NodeKind, text: &str, lines: &LineIndex, range: Range<usize>) -> Node {
    let mut node = Node::new(kind);
    node.value = Some(text.to_string());
    node.position = Some(lines.position(range));
    node
}

fn push_leaf(stack: &mut Vec<Node>, node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

/// Code fences carry their content as text children; collapse it into the
/// node's literal value so the fence reads as one region.
fn finish(mut node: Node) -> Node {
    if matches!(node.kind, NodeKind::Code { .. }) && node.value.is_none() {
        let content: String = node
            .children
            .drain(..)
            .filter_map(|child| child.value)
            .collect();
        node.value = Some(content);
    }
    node
}

struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    fn point(&self, offset: usize) -> Point {
        let line = self.starts.partition_point(|&start| start <= offset);
        Point {
            line,
            column: offset - self.starts[line - 1] + 1,
            offset,
        }
    }

    fn position(&self, range: Range<usize>) -> Position {
        let last = range.end.saturating_sub(1).max(range.start);
        Position {
            start: self.point(range.start),
            end: self.point(last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_heading_and_paragraph() {
        let tree = parse_markdown("# Title\n\nSome prose.\n");

        assert_eq!(tree.kind, NodeKind::Root);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].kind, NodeKind::Heading { depth: 1 });
        assert_eq!(tree.children[0].text_content(), "Title");
        assert_eq!(tree.children[1].kind, NodeKind::Paragraph);
        assert_eq!(tree.children[1].text_content(), "Some prose.");
    }

    #[test]
    fn test_positions_are_one_based_lines() {
        let tree = parse_markdown("# Title\n\nSome prose.\n");

        let heading = tree.children[0].position.unwrap();
        assert_eq!(heading.start.line, 1);
        assert_eq!(heading.end.line, 1);

        let paragraph = tree.children[1].position.unwrap();
        assert_eq!(paragraph.start.line, 3);
        assert_eq!(paragraph.end.line, 3);
    }

    #[test]
    fn test_fence_content_collapses_into_value() {
        let tree = parse_markdown("```chord-progression\nDm7 → G7\n```\n");

        assert_eq!(tree.children.len(), 1);
        let fence = &tree.children[0];
        assert_eq!(
            fence.kind,
            NodeKind::Code {
                lang: Some("chord-progression".to_string())
            }
        );
        assert!(fence.children.is_empty());
        assert_eq!(fence.value.as_deref(), Some("Dm7 → G7\n"));
    }

    #[test]
    fn test_fence_without_info_string_has_no_lang() {
        let tree = parse_markdown("```\nplain\n```\n");
        assert_eq!(tree.children[0].kind, NodeKind::Code { lang: None });
    }

    #[test]
    fn test_fence_position_spans_all_lines() {
        let tree = parse_markdown("intro\n\n```score\nchords: Dm7 G7\nbass: D G\n```\n");
        let fence = &tree.children[1];
        let position = fence.position.unwrap();
        assert_eq!(position.start.line, 3);
        assert_eq!(position.end.line, 6);
    }

    #[test]
    fn test_table_rows_and_cells() {
        let md = "| Name | Level |\n| --- | --- |\n| Foo | 3 |\n| Bar | 5 |\n";
        let tree = parse_markdown(md);

        assert_eq!(tree.children.len(), 1);
        let table = &tree.children[0];
        assert_eq!(table.kind, NodeKind::Table);
        assert_eq!(table.children.len(), 3);
        for row in &table.children {
            assert_eq!(row.kind, NodeKind::TableRow);
            assert_eq!(row.children.len(), 2);
        }
        assert_eq!(table.children[0].children[0].text_content(), "Name");
        assert_eq!(table.children[2].children[1].text_content(), "5");
    }

    #[test]
    fn test_soft_breaks_become_break_nodes() {
        let tree = parse_markdown("first line\nsecond line\n");
        let paragraph = &tree.children[0];
        assert!(
            paragraph
                .children
                .iter()
                .any(|child| child.kind == NodeKind::Break)
        );
        assert_eq!(paragraph.text_content(), "first line\nsecond line");
    }

    #[test]
    fn test_link_text_still_contributes_to_flattening() {
        let tree = parse_markdown("see [the chart](https://example.com) here\n");
        assert_eq!(tree.children[0].text_content(), "see the chart here");
    }

    #[test]
    fn test_empty_input_yields_bare_root() {
        let tree = parse_markdown("");
        assert_eq!(tree.kind, NodeKind::Root);
        assert!(tree.children.is_empty());
        assert!(tree.position.is_none());
    }
}
