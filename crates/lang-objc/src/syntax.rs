//! Leaf tokens of a parse tree, positioned the way diagnostics report them.
//!
//! Lines and columns are 1-based; columns count characters. End positions
//! point at the last character of a leaf.

use crate::comment;
use std::collections::HashSet;
use tree_sitter::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Ident,
    /// `@interface`, `@end`, `@optional`.
    AtKeyword,
    Punct,
    /// Numbers, strings, directives and anything else.
    Literal,
    DocComment,
    PlainComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf<'a> {
    pub kind: LeafKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
    pub end_line: usize,
    pub end_col: usize,
    /// Blank lines between the previous leaf and this one.
    pub blank_lines_before: usize,
    /// No code precedes this leaf on its line.
    pub first_on_line: bool,
}

impl<'a> Leaf<'a> {
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == LeafKind::Punct && self.text.len() == c.len_utf8() && self.text.starts_with(c)
    }

    pub fn is_ident(&self) -> bool {
        self.kind == LeafKind::Ident
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == LeafKind::AtKeyword && self.text == keyword
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, LeafKind::DocComment | LeafKind::PlainComment)
    }
}

/// A zero-width token the parser inserted while recovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingToken {
    pub kind: &'static str,
    pub offset: usize,
}

#[derive(Debug, Default)]
pub struct Leaves<'a> {
    pub leaves: Vec<Leaf<'a>>,
    pub missing: Vec<MissingToken>,
}

fn is_ident_text(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn classify(text: &str, is_comment: bool) -> LeafKind {
    if is_comment {
        return if comment::is_doc_comment(text) {
            LeafKind::DocComment
        } else {
            LeafKind::PlainComment
        };
    }
    if text.strip_prefix('@').is_some_and(is_ident_text) {
        LeafKind::AtKeyword
    } else if is_ident_text(text) {
        LeafKind::Ident
    } else if text.chars().all(|c| c.is_ascii_punctuation()) {
        LeafKind::Punct
    } else {
        LeafKind::Literal
    }
}

/// Byte offset to line and column conversion.
pub struct LineIndex<'a> {
    src: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(src: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { src, starts }
    }

    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|&s| s <= offset).max(1);
        let line_start = self.starts.get(line - 1).copied().unwrap_or(0);
        let col = self
            .src
            .get(line_start..offset)
            .map_or(0, |s| s.chars().count());
        (line, col + 1)
    }

    /// Position of the last character of `start..end`, line breaks excluded.
    pub fn last_position(&self, start: usize, end: usize) -> (usize, usize) {
        let text = self.src.get(start..end).unwrap_or("");
        let trimmed = text.trim_end_matches(['\r', '\n']);
        let last = trimmed
            .char_indices()
            .last()
            .map_or(start, |(i, _)| start + i);
        self.position(last)
    }
}

/// Every leaf of `tree` in source order. Nodes starting at an offset in
/// `comments` are comments; `@` directly followed by a word becomes one keyword.
pub fn collect<'a>(tree: &Tree, src: &'a str, comments: &HashSet<usize>) -> Leaves<'a> {
    let mut spans: Vec<(usize, usize, bool)> = Vec::new();
    let mut missing = Vec::new();

    let mut cursor = tree.walk();
    'walk: loop {
        let node = cursor.node();
        if node.child_count() > 0 && cursor.goto_first_child() {
            continue;
        }
        if node.is_missing() {
            missing.push(MissingToken {
                kind: node.kind(),
                offset: node.start_byte(),
            });
        } else if node.end_byte() > node.start_byte() {
            let start = node.start_byte();
            spans.push((start, node.end_byte(), comments.contains(&start)));
        }
        loop {
            if cursor.goto_next_sibling() {
                continue 'walk;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    let text_of = |(start, end): (usize, usize)| src.get(start..end).unwrap_or("");
    let mut merged: Vec<(usize, usize, bool)> = Vec::with_capacity(spans.len());
    for span in spans {
        if let Some(last) = merged.last_mut() {
            let joins = !last.2
                && !span.2
                && last.1 == span.0
                && text_of((last.0, last.1)) == "@"
                && is_ident_text(text_of((span.0, span.1)));
            if joins {
                last.1 = span.1;
                continue;
            }
        }
        merged.push(span);
    }

    let index = LineIndex::new(src);
    let mut leaves = Vec::with_capacity(merged.len());
    let mut prev_end: Option<usize> = None;
    let mut code_line: Option<usize> = None;
    for (start, end, is_comment) in merged {
        let text = text_of((start, end));
        let kind = classify(text, is_comment);
        let (line, col) = index.position(start);
        let (end_line, end_col) = index.last_position(start, end);

        let newlines = src
            .get(prev_end.unwrap_or(0)..start)
            .map_or(0, |gap| gap.matches('\n').count());
        let blank_lines_before = match prev_end {
            Some(_) => newlines.saturating_sub(1),
            None => newlines,
        };
        let first_on_line = code_line != Some(line);
        if !matches!(kind, LeafKind::DocComment | LeafKind::PlainComment) {
            code_line = Some(end_line);
        }
        prev_end = Some(end);

        leaves.push(Leaf {
            kind,
            text,
            start,
            end,
            line,
            col,
            end_line,
            end_col,
            blank_lines_before,
            first_on_line,
        });
    }

    Leaves { leaves, missing }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_count_characters() {
        let src = "ab\n\u{e9}t\u{e9} x\n";
        let index = LineIndex::new(src);
        assert_eq!(index.position(0), (1, 1));
        assert_eq!(index.position(3), (2, 1));
        let x = src.find('x').unwrap();
        assert_eq!(index.position(x), (2, 5));
        assert_eq!(index.last_position(3, x), (2, 4));
    }

    #[test]
    fn test_leaf_classification() {
        assert_eq!(classify("@interface", false), LeafKind::AtKeyword);
        assert_eq!(classify("NSObject", false), LeafKind::Ident);
        assert_eq!(classify("...", false), LeafKind::Punct);
        assert_eq!(classify("#import", false), LeafKind::Literal);
        assert_eq!(classify("42", false), LeafKind::Literal);
        assert_eq!(classify("/** Doc. */", true), LeafKind::DocComment);
        assert_eq!(classify("// note", true), LeafKind::PlainComment);
    }
}
