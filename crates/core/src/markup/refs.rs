//! Cross-reference candidates inside documentation prose.

use crate::config::ResolverConfig;
use docscope_api::models::naming::{RefShape, parse_ref_token};
use docscope_api::models::{CrossRef, DocSection, RefStyle};
use once_cell::sync::Lazy;
use regex::Regex;

/// `[Foo]`, `[Foo bar:]`, `-[Foo bar]`; a trailing `(` marks a markdown link.
static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([+-]?)\[([^\[\]\n]+)\](\()?").expect("valid regex"));

static BACKTICK: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("valid regex"));

/// `Foo(Bar)` written straight into prose.
static INLINE_CATEGORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][A-Za-z0-9_]*)\(([A-Z][A-Za-z0-9_]*)\)").expect("valid regex")
});

/// Byte ranges of fenced code blocks, fences included.
pub fn fenced_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut open: Option<usize> = None;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_start().starts_with("```") {
            match open.take() {
                Some(start) => ranges.push((start, offset + line.len())),
                None => open = Some(offset),
            }
        }
        offset += line.len();
    }
    if let Some(start) = open {
        ranges.push((start, text.len()));
    }
    ranges
}

/// Whether a parsed token is worth resolving. Lone identifiers must be
/// capitalized, which keeps prose such as `[optional]` out.
fn is_candidate(shape: &RefShape) -> bool {
    match shape {
        RefShape::Symbol(name) => name.starts_with(|c: char| c.is_ascii_uppercase()),
        _ => true,
    }
}

/// Whether the token names one of the ignored literals, either on its own or
/// as the receiver of a message such as `[self setNeedsDisplay]`.
fn names_ignored(token: &str, shape: &RefShape, config: &ResolverConfig) -> bool {
    if config.is_ignored(token) {
        return true;
    }
    match shape {
        RefShape::Symbol(name) => config.is_ignored(name),
        RefShape::Category { class, .. } => config.is_ignored(class),
        RefShape::Member { owner, .. } => config.is_ignored(owner),
        RefShape::Selector(_) => false,
    }
}

/// Shape of `token` when it is worth resolving.
fn candidate(token: &str, config: &ResolverConfig) -> Option<RefShape> {
    parse_ref_token(token).filter(|shape| is_candidate(shape) && !names_ignored(token, shape, config))
}

/// Normalized lookup text for a bracketed match.
fn bracketed_token(prefix: &str, body: &str) -> String {
    let body = body.trim();
    if prefix.is_empty() {
        body.to_string()
    } else {
        format!("{prefix}[{body}]")
    }
}

/// Every reference candidate in `text`, in order of appearance. Repeated
/// mentions are kept; nothing inside fenced code blocks is considered.
pub fn extract_refs(text: &str, section: &DocSection, config: &ResolverConfig) -> Vec<CrossRef> {
    let fences = fenced_ranges(text);
    let in_fence = |pos: usize| fences.iter().any(|&(s, e)| pos >= s && pos < e);

    let mut found: Vec<(usize, usize, CrossRef)> = Vec::new();

    for caps in BRACKETED.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if caps.get(3).is_some() || in_fence(whole.start()) {
            continue;
        }
        let prefix = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());
        let token = bracketed_token(prefix, body);
        if candidate(&token, config).is_none() {
            continue;
        }
        found.push((
            whole.start(),
            whole.end(),
            CrossRef {
                literal: whole.as_str().to_string(),
                token,
                section: section.clone(),
                style: RefStyle::Bracketed,
                target: None,
            },
        ));
    }

    for caps in BACKTICK.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if in_fence(whole.start()) {
            continue;
        }
        let token = caps.get(1).map_or("", |m| m.as_str()).trim();
        if candidate(token, config).is_none() {
            continue;
        }
        found.push((
            whole.start(),
            whole.end(),
            CrossRef {
                literal: whole.as_str().to_string(),
                token: token.to_string(),
                section: section.clone(),
                style: RefStyle::Backtick,
                target: None,
            },
        ));
    }

    for m in INLINE_CATEGORY.find_iter(text) {
        if in_fence(m.start()) {
            continue;
        }
        found.push((
            m.start(),
            m.end(),
            CrossRef {
                literal: m.as_str().to_string(),
                token: m.as_str().to_string(),
                section: section.clone(),
                style: RefStyle::Inline,
                target: None,
            },
        ));
    }

    // Earliest match wins where candidates overlap, e.g. `Foo(Bar)` inside `[Foo(Bar) baz]`.
    found.sort_by_key(|(start, end, _)| (*start, std::cmp::Reverse(*end)));
    let mut refs = Vec::with_capacity(found.len());
    let mut covered = 0;
    for (start, end, cross_ref) in found {
        if start < covered {
            continue;
        }
        covered = end;
        refs.push(cross_ref);
    }
    refs
}

/// Split a see-also line at commas outside brackets and backticks.
fn split_operands(line: &str) -> Vec<&str> {
    let mut operands = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in line.char_indices() {
        match c {
            '`' => quoted = !quoted,
            '[' | '(' if !quoted => depth += 1,
            ']' | ')' if !quoted => depth = depth.saturating_sub(1),
            ',' if !quoted && depth == 0 => {
                operands.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    operands.push(&line[start..]);
    operands
}

/// Every operand of a see-also marker line, e.g. `Foo, -[Foo bar:]`.
pub fn see_also_refs(line: &str) -> Vec<CrossRef> {
    split_operands(line)
        .into_iter()
        .filter_map(see_also_ref)
        .collect()
}

/// The operand of a see-also marker as a reference.
pub fn see_also_ref(operand: &str) -> Option<CrossRef> {
    let literal = operand.trim();
    if literal.is_empty() {
        return None;
    }
    let token = literal
        .strip_prefix('`')
        .and_then(|t| t.strip_suffix('`'))
        .unwrap_or(literal);
    let token = match token.strip_prefix(['+', '-']) {
        Some(_) => token.to_string(),
        None => token
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .unwrap_or(token)
            .trim()
            .to_string(),
    };
    Some(CrossRef {
        literal: literal.to_string(),
        token,
        section: DocSection::SeeAlso,
        style: RefStyle::SeeAlso,
        target: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_nil() -> ResolverConfig {
        ResolverConfig {
            ignored_tokens: vec!["nil".to_string()],
            ..Default::default()
        }
    }

    fn tokens(text: &str) -> Vec<(String, RefStyle)> {
        extract_refs(text, &DocSection::Discussion, &only_nil())
            .into_iter()
            .map(|r| (r.token, r.style))
            .collect()
    }

    #[test]
    fn test_bracketed_forms() {
        assert_eq!(
            tokens("Use [Foo], [Foo bar:] or -[Foo baz] here."),
            vec![
                ("Foo".to_string(), RefStyle::Bracketed),
                ("Foo bar:".to_string(), RefStyle::Bracketed),
                ("-[Foo baz]".to_string(), RefStyle::Bracketed),
            ]
        );
    }

    #[test]
    fn test_markdown_links_and_prose_are_skipped() {
        assert!(tokens("See [the guide](https://example.com) and [optional].").is_empty());
    }

    #[test]
    fn test_backticks_and_ignored_literals() {
        assert_eq!(
            tokens("Returns `nil` or a `Widget`; calls `reload:`."),
            vec![
                ("Widget".to_string(), RefStyle::Backtick),
                ("reload:".to_string(), RefStyle::Backtick),
            ]
        );
    }

    #[test]
    fn test_messages_to_ignored_receivers_are_skipped() {
        let text = "Call [self setNeedsDisplay] or [super layout] afterwards, then [Foo reload].";
        let refs = extract_refs(text, &DocSection::Discussion, &ResolverConfig::default());
        let found: Vec<_> = refs.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(found, vec!["Foo reload"]);

        // Receivers outside the ignore list still count.
        assert_eq!(
            tokens("Call [super layout]."),
            vec![("super layout".to_string(), RefStyle::Bracketed)]
        );
    }

    #[test]
    fn test_every_occurrence_is_kept() {
        let refs = extract_refs("[Foo] and [Foo]", &DocSection::Abstract, &only_nil());
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].literal, "[Foo]");
        assert_eq!(refs[1].section, DocSection::Abstract);
    }

    #[test]
    fn test_inline_category_and_overlap() {
        assert_eq!(
            tokens("Extends Foo(Bar) and [Foo(Bar) baz]."),
            vec![
                ("Foo(Bar)".to_string(), RefStyle::Inline),
                ("Foo(Bar) baz".to_string(), RefStyle::Bracketed),
            ]
        );
    }

    #[test]
    fn test_fenced_code_is_opaque() {
        let text = "Before [Foo].\n```\n[self doThing:[Bar new]];\n```\nAfter `Baz`.";
        assert_eq!(
            tokens(text),
            vec![
                ("Foo".to_string(), RefStyle::Bracketed),
                ("Baz".to_string(), RefStyle::Backtick),
            ]
        );
    }

    #[test]
    fn test_see_also_operand() {
        let r = see_also_ref(" [Foo bar:] ").unwrap();
        assert_eq!(r.literal, "[Foo bar:]");
        assert_eq!(r.token, "Foo bar:");
        assert_eq!(see_also_ref("-[Foo bar]").unwrap().token, "-[Foo bar]");
        assert_eq!(see_also_ref("`Foo`").unwrap().token, "Foo");
        assert!(see_also_ref("  ").is_none());
    }

    #[test]
    fn test_see_also_line_with_several_operands() {
        let found: Vec<_> = see_also_refs("Foo, Bar")
            .into_iter()
            .map(|r| r.token)
            .collect();
        assert_eq!(found, vec!["Foo", "Bar"]);

        let found: Vec<_> = see_also_refs("`Foo`, -[Foo bar:], [Foo(Cat) baz:]")
            .into_iter()
            .map(|r| r.token)
            .collect();
        assert_eq!(found, vec!["Foo", "-[Foo bar:]", "Foo(Cat) baz:"]);
        assert!(see_also_refs(" , ").is_empty());
    }
}
