//! Deterministic output-name suggestions.

use crate::models::Block;

/// Characters never allowed into a suggested file name.
const FORBIDDEN: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Longest sanitized title carried into a name.
const MAX_TITLE_LEN: usize = 50;

/// Suggested output name (without extension) for a block: the type tag, the
/// zero-padded two-digit occurrence index, then the sanitized title when one
/// survives sanitization.
pub fn output_stem(block: &Block) -> String {
    let mut stem = format!("{}-{:02}", block.block_type(), block.index);
    if let Some(title) = &block.title {
        let title = sanitize_title(title);
        if !title.is_empty() {
            stem.push('-');
            stem.push_str(&title);
        }
    }
    stem
}

/// Strip path-hostile characters, collapse whitespace runs to single hyphens
/// and truncate to 50 characters.
pub fn sanitize_title(title: &str) -> String {
    let stripped: String = title.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(MAX_TITLE_LEN)
        .collect()
}
