//! Front-matter style metadata header embedded at the top of a tagged region.

use regex::Regex;
use std::sync::OnceLock;

/// Parsed header of a tagged region plus the remaining body text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub key: Option<String>,
    pub note: Option<String>,
    pub body: String,
}

fn header_line_regex() -> &'static Regex {
    static HEADER_LINE: OnceLock<Regex> = OnceLock::new();
    HEADER_LINE.get_or_init(|| {
        Regex::new(r"(?i)^(title|key|note):\s*(.*)$").expect("invalid header line regex")
    })
}

/// Split an optional `key: value` metadata header off the top of a region.
///
/// Recognized keys are `title`, `key` and `note` (case-insensitive). The
/// first occurrence of a key wins; a repeated key is consumed but ignored.
/// Blank lines between header lines are skipped. A line equal to `---` ends
/// the header and is consumed; the first line that is neither blank nor a
/// recognized key/value pair also ends the header but belongs to the body.
/// With no header present the body is simply the input, trimmed.
pub fn split_front_matter(text: &str) -> FrontMatter {
    let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();

    let mut fm = FrontMatter::default();
    let mut body_start = lines.len();
    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if *line == "---" {
            body_start = i + 1;
            break;
        }
        let Some(caps) = header_line_regex().captures(line) else {
            body_start = i;
            break;
        };
        let value = caps[2].trim().to_string();
        let slot = match caps[1].to_ascii_lowercase().as_str() {
            "title" => &mut fm.title,
            "key" => &mut fm.key,
            _ => &mut fm.note,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fm.body = lines
        .get(body_start..)
        .unwrap_or_default()
        .join("\n")
        .trim()
        .to_string();
    fm
}
