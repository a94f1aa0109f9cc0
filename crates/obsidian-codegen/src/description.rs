//! Human-readable descriptions taken from documentation comments.
//!
//! Header authors tend to copy one comment down a run of enumerators. Only
//! the enumerator where the text changes carries it into generated code; the
//! ones that merely repeat their predecessor get an empty description.

use crate::ast::EnumItem;

const LINE_MARKERS: [&str; 3] = ["///", "//!", "//"];

/// Strip comment markers and collapse a raw comment into one line.
///
/// Only block comment continuation lines lose a leading gutter `*`, and only
/// when whitespace follows it, so emphasis such as `*Deprecated*` survives.
///
/// Returns `None` when nothing but markers and whitespace remain.
pub fn normalize_comment(raw: &str) -> Option<String> {
    let mut lines = Vec::new();
    let mut in_block = false;
    for line in raw.lines() {
        let mut line = line.trim();
        if in_block {
            line = strip_gutter(line);
        } else if let Some(rest) = line.strip_prefix("/*") {
            in_block = true;
            line = match rest.strip_prefix(['*', '!']) {
                Some(doc) if !rest.starts_with("*/") => doc,
                _ => rest,
            };
        } else if let Some(marker) = LINE_MARKERS.iter().find(|m| line.starts_with(**m)) {
            line = &line[marker.len()..];
        }
        if in_block {
            if let Some(body) = line.trim_end().strip_suffix("*/") {
                in_block = false;
                line = body;
            }
        }
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

fn strip_gutter(line: &str) -> &str {
    match line.strip_prefix('*') {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => line,
    }
}

/// Description for `current` given the comment of the declaration before it.
///
/// - no comment on `current`: empty
/// - no predecessor, or predecessor without comment: `current` verbatim
/// - same text as the predecessor: empty
/// - otherwise: `current`
pub fn describe(previous: Option<&str>, current: Option<&str>) -> String {
    let Some(current) = current.and_then(normalize_comment) else {
        return String::new();
    };
    match previous.and_then(normalize_comment) {
        Some(previous) if previous == current => String::new(),
        _ => current,
    }
}

/// Descriptions of every enumerator, each compared against the one before it.
pub fn item_descriptions(items: &[EnumItem]) -> Vec<String> {
    let mut previous: Option<&str> = None;
    items
        .iter()
        .map(|item| {
            let description = describe(previous, item.comment.as_deref());
            previous = item.comment.as_deref();
            description
        })
        .collect()
}
