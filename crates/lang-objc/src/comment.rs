//! Delimiter stripping for documentation comments.

use docscope_api::models::{CommentPlacement, CommentStyle};

/// `/**`, `/*!`, `///` and `//!` open documentation; `/**/`, `/***` and
/// `////` are plain comments.
pub fn is_doc_comment(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    match (bytes.get(1), bytes.get(2), bytes.get(3)) {
        (Some(b'*'), Some(b'*'), next) => !matches!(next, Some(b'/') | Some(b'*')),
        (Some(b'*'), Some(b'!'), next) => next != Some(&b'/'),
        (Some(b'/'), Some(b'/'), next) => next != Some(&b'/'),
        (Some(b'/'), Some(b'!'), _) => true,
        _ => false,
    }
}

/// Classify a documentation comment token by style and written placement.
///
/// `first_on_line` is false when code precedes the comment on its line.
pub fn classify(raw: &str, first_on_line: bool) -> (CommentStyle, CommentPlacement) {
    let style = if raw.starts_with("/*") {
        CommentStyle::Block
    } else {
        CommentStyle::Line
    };
    let explicit = raw.get(3..4) == Some("<");
    let placement = if explicit {
        CommentPlacement::ExplicitTrailing
    } else if first_on_line {
        CommentPlacement::Leading
    } else {
        CommentPlacement::SameLine
    };
    (style, placement)
}

/// Body of a single `///`, `//!`, `///<` line, without the prefix or one leading space.
pub fn strip_line(raw: &str) -> &str {
    let body = raw.get(3..).unwrap_or("");
    let body = body.strip_prefix('<').unwrap_or(body);
    let body = body.strip_prefix(' ').unwrap_or(body);
    body.trim_end()
}

/// Text of a `/** */` or `/*! */` comment with delimiters, the leading-star
/// convention and common indentation removed.
pub fn strip_block(raw: &str) -> String {
    let body = raw.get(3..).unwrap_or("");
    let body = body.strip_prefix('<').unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);
    let body = body.trim_end_matches('*');

    let mut lines: Vec<&str> = body.lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    lines[0] = lines[0].trim_start();

    let starred = lines[1..]
        .iter()
        .filter(|l| !l.trim().is_empty())
        .all(|l| l.trim_start().starts_with('*'));
    if starred {
        for line in lines.iter_mut().skip(1) {
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix('*') {
                *line = rest.strip_prefix(' ').unwrap_or(rest);
            }
        }
    }

    let mut out: Vec<&str> = vec![lines[0]];
    out.extend(lines[1..].iter().copied());
    dedent(&out)
}

/// Remove indentation shared by every non-blank line after the first, then
/// trim blank lines at both ends.
///
/// Indentation is counted in characters; any Unicode whitespace counts.
pub fn dedent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let mut result: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let line = if i == 0 || line.trim().is_empty() {
            line.trim_start()
        } else {
            let cut = line
                .char_indices()
                .nth(indent)
                .map_or(line.len(), |(offset, _)| offset);
            line.get(cut..).unwrap_or_else(|| line.trim_start())
        };
        result.push(line.trim_end());
    }

    while result.first().is_some_and(|l| l.is_empty()) {
        result.remove(0);
    }
    while result.last().is_some_and(|l| l.is_empty()) {
        result.pop();
    }
    result.join("\n")
}
