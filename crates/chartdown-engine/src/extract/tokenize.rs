//! Splitting rules for the sequence-bearing block bodies.

use regex::Regex;
use std::sync::OnceLock;

/// Labelled sequences pulled out of a score body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreContent {
    pub chords: Option<Vec<String>>,
    pub bass: Option<Vec<String>>,
}

fn chord_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR
        .get_or_init(|| Regex::new(r"\s*(?:→|->|–|—|\|)\s*").expect("invalid chord separator"))
}

fn degree_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\s*[-–—]\s*").expect("invalid degree separator"))
}

fn score_chords_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| Regex::new(r"(?i)^chords:\s*(.+)$").expect("invalid chords line regex"))
}

fn score_bass_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| Regex::new(r"(?i)^bass:\s*(.+)$").expect("invalid bass line regex"))
}

/// Split a chord progression body on arrows, en/em dashes and pipes.
pub fn split_chord_sequence(body: &str) -> Vec<String> {
    split_sequence(chord_separator(), body)
}

/// Split a degree progression body on plain, en and em dashes.
pub fn split_degree_sequence(body: &str) -> Vec<String> {
    split_sequence(degree_separator(), body)
}

fn split_sequence(separator: &Regex, body: &str) -> Vec<String> {
    separator
        .split(body)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pull labelled `chords:` / `bass:` lines out of a score body.
///
/// Both labels are optional and independent; each label's last matching line
/// wins. The remainder of a labelled line is whitespace-split.
pub fn split_score_content(body: &str) -> ScoreContent {
    let mut content = ScoreContent::default();
    for line in body.lines() {
        let line = line.trim_end();
        if let Some(caps) = score_chords_line().captures(line) {
            content.chords = Some(split_whitespace(&caps[1]));
        }
        if let Some(caps) = score_bass_line().captures(line) {
            content.bass = Some(split_whitespace(&caps[1]));
        }
    }
    content
}

fn split_whitespace(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
