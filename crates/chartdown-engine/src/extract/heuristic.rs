//! Best-effort detection of progressions written as plain prose.
//!
//! Untagged paragraphs are scanned line by line for arrow-separated runs of
//! chord-shaped or solfège-shaped tokens. Matching is approximate on purpose;
//! a candidate that fails any rule is simply not emitted.

use regex::Regex;
use std::sync::OnceLock;

use crate::ast::{Node, NodeKind};
use crate::extract::ExtractOptions;
use crate::models::{Block, BlockKind, BlockType};

/// Candidates shorter than this are never progressions.
const MIN_CANDIDATE_LEN: usize = 5;
/// Share of pieces (percent) that must match a grammar.
const MATCH_RATIO_PERCENT: usize = 80;
/// Absolute number of pieces that must match, regardless of ratio.
const MIN_MATCHES: usize = 2;
/// How far back to look for a title.
const TITLE_LOOKBACK: usize = 3;

fn label_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"^[-*]?\s*[^:：]+[：:]\s*(.+)$").expect("invalid label prefix regex")
    })
}

fn arrow_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\s*(?:→|->)\s*").expect("invalid arrow separator"))
}

/// Chord names: root letter, optional accidental, optional quality and
/// extension digits, optional alterations, optional parenthetical tension,
/// optional slash bass. Matches `Dm7`, `F#m7b5`, `C7(b9)`, `Dm7/G`.
fn chord_grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        Regex::new(
            r"^[A-G][#♯b♭]?(?:m|maj|min|dim|aug|sus|add|M|\+|-|°|ø)?\d{0,2}(?:(?:[#♯b♭]|add|sus|maj|dim|aug)\d{1,2})*(?:\([^()]*\))?(?:/[A-G][#♯b♭]?)?$",
        )
        .expect("invalid chord grammar regex")
    })
}

/// Solfège syllables, latin or katakana, with an optional accidental.
fn solfege_grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        Regex::new(r"^(?:(?i:do|re|mi|fa|sol?|la|si|ti)|ド|レ|ミ|ファ|ソ|ラ|シ)[#♯b♭]?$")
            .expect("invalid solfege grammar regex")
    })
}

/// Scan prose paragraphs for implicit progressions, appending detections to
/// `out` and continuing the occurrence counter started by the explicit pass.
pub(super) fn detect(
    children: &[Node],
    opts: &ExtractOptions,
    out: &mut Vec<Block>,
    mut next: usize,
) -> usize {
    for (i, node) in children.iter().enumerate() {
        if matches!(node.kind, NodeKind::Paragraph) {
            next = scan_paragraph(children, i, opts, out, next);
        } else {
            next = detect(&node.children, opts, out, next);
        }
    }
    next
}

fn scan_paragraph(
    siblings: &[Node],
    index: usize,
    opts: &ExtractOptions,
    out: &mut Vec<Block>,
    mut next: usize,
) -> usize {
    let paragraph = &siblings[index];
    for child in &paragraph.children {
        let Some(value) = &child.value else { continue };
        for line in value.lines() {
            next = scan_line(line, siblings, index, opts, out, next);
        }
    }
    next
}

fn scan_line(
    line: &str,
    siblings: &[Node],
    index: usize,
    opts: &ExtractOptions,
    out: &mut Vec<Block>,
    mut next: usize,
) -> usize {
    let paragraph = &siblings[index];
    let candidate = strip_label(line);
    if candidate.chars().count() < MIN_CANDIDATE_LEN {
        return next;
    }
    let pieces: Vec<String> = arrow_separator()
        .split(candidate)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect();
    if pieces.len() < 2 {
        return next;
    }

    if opts.wants(BlockType::ChordProgression) && accepts(&pieces, chord_grammar()) {
        log::debug!("detected chord progression in prose: {pieces:?}");
        out.push(Block {
            index: next,
            title: infer_title(siblings, index),
            source: opts.location(paragraph),
            kind: BlockKind::ChordProgression {
                key: None,
                chords: pieces.clone(),
                note: None,
            },
        });
        next += 1;
    }
    if opts.wants(BlockType::DegreeProgression) && accepts(&pieces, solfege_grammar()) {
        log::debug!("detected note progression in prose: {pieces:?}");
        out.push(Block {
            index: next,
            title: infer_title(siblings, index),
            source: opts.location(paragraph),
            kind: BlockKind::DegreeProgression {
                key: None,
                degrees: pieces,
                note: None,
            },
        });
        next += 1;
    }
    next
}

/// Drop a leading `label:` prefix (latin or fullwidth colon, optional list
/// marker) so `Verse: Dm7 → G7` tests only the progression part.
fn strip_label(line: &str) -> &str {
    let line = line.trim();
    match label_prefix().captures(line) {
        Some(caps) => caps.get(1).map_or(line, |m| m.as_str()),
        None => line,
    }
}

/// At least two pieces must match, and matches must make up at least 80% of
/// all pieces.
fn accepts(pieces: &[String], grammar: &Regex) -> bool {
    let matching = pieces.iter().filter(|piece| grammar.is_match(piece)).count();
    matching >= MIN_MATCHES && matching * 100 >= pieces.len() * MATCH_RATIO_PERCENT
}

/// Title comes from the nearest of up to three preceding siblings: the first
/// heading wins, otherwise the first bold run inside a preceding paragraph.
fn infer_title(siblings: &[Node], index: usize) -> Option<String> {
    let mut bold = None;
    for node in siblings[..index].iter().rev().take(TITLE_LOOKBACK) {
        if matches!(node.kind, NodeKind::Heading { .. }) {
            let text = node.text_content();
            if !text.is_empty() {
                return Some(text);
            }
        }
        if bold.is_none() && matches!(node.kind, NodeKind::Paragraph) {
            bold = first_strong_text(node);
        }
    }
    bold
}

fn first_strong_text(node: &Node) -> Option<String> {
    if matches!(node.kind, NodeKind::Strong) {
        let text = node.text_content();
        return (!text.is_empty()).then_some(text);
    }
    node.children.iter().find_map(first_strong_text)
}
