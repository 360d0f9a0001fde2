//! Declaration scanner.
//!
//! The source is parsed with tree-sitter and the definition query locates
//! containers, members and comments. Names, selectors and types are then read
//! from the leaf tokens of each located node, so attribute macros the grammar
//! does not know stay attached to their declaration. Declarations, comments
//! and code markers are emitted in source order; syntax errors outside of a
//! readable declaration become diagnostics.

mod container;
mod member;

use crate::comment;
use crate::parser::ObjcParser;
use crate::queries::objc_definitions::DefinitionIndices;
use crate::syntax::{self, Leaf, LeafKind, Leaves, MissingToken};
use docscope_api::models::util::collapse_whitespace;
use docscope_api::models::{
    CommentBlock, CommentPlacement, CommentStyle, Declaration, Diagnostic, DiagnosticKind, Range,
    ScanOutput, SourceItem, SourceLocation, SourceUnit,
};
use smol_str::SmolStr;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use tree_sitter::{Query, QueryCursor, StreamingIterator, Tree};

/// Scan one source unit.
pub fn scan(parser: &ObjcParser, file: Arc<str>, src: &str) -> ScanOutput {
    let tree = match parser.parse(src) {
        Ok(tree) => tree,
        Err(err) => {
            let location = SourceLocation::new(file.clone(), Range::new(1, 1, 1, 1));
            return ScanOutput {
                unit: SourceUnit::new(file),
                diagnostics: vec![
                    Diagnostic::warning(
                        DiagnosticKind::MalformedDeclaration,
                        format!("source could not be parsed: {err}"),
                    )
                    .at(location),
                ],
            };
        }
    };
    let located = locate(&tree, src, &parser.definition_query, &parser.indices);
    let leaves = syntax::collect(&tree, src, &located.comments);
    Scanner::new(file, src, leaves).run(&located)
}

/// Which kind of block a member list lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyKind {
    Interface,
    Protocol,
    Implementation,
}

/// `NS_DESIGNATED_INITIALIZER`, `API_AVAILABLE(ios(13))`, `__attribute__((deprecated))`.
///
/// Region markers such as `NS_ASSUME_NONNULL_BEGIN` stand alone and count as code.
pub(crate) fn is_attribute_macro(text: &str) -> bool {
    if text.starts_with("__") {
        return text.len() > 2;
    }
    if text.ends_with("_BEGIN") || text.ends_with("_END") {
        return false;
    }
    is_macro_name(text)
}

/// Upper-case identifiers with an underscore, region markers included.
fn is_macro_name(text: &str) -> bool {
    text.len() >= 2
        && text.starts_with(|c: char| c.is_ascii_uppercase())
        && text.contains('_')
        && text
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Container,
    Member,
}

/// A declaration node matched by the definition query.
#[derive(Debug, Clone, Copy)]
struct Capture {
    role: Role,
    start: usize,
    end: usize,
}

/// Byte positions of everything the definition query matched.
#[derive(Debug, Default)]
struct Located {
    comments: HashSet<usize>,
    declarations: Vec<Capture>,
    errors: Vec<(usize, usize)>,
}

fn locate(tree: &Tree, src: &str, query: &Query, indices: &DefinitionIndices) -> Located {
    let mut located = Located::default();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), src.as_bytes());
    while let Some(mat) = matches.next() {
        for cap in mat.captures.iter() {
            let (start, end) = (cap.node.start_byte(), cap.node.end_byte());
            if cap.index == indices.comment {
                located.comments.insert(start);
            } else if cap.index == indices.error {
                located.errors.push((start, end));
            } else if indices.is_container(cap.index) {
                located.declarations.push(Capture {
                    role: Role::Container,
                    start,
                    end,
                });
            } else if indices.is_member(cap.index) {
                located.declarations.push(Capture {
                    role: Role::Member,
                    start,
                    end,
                });
            }
        }
    }

    // A definition wrapping a declaration of the same method counts once.
    located
        .declarations
        .sort_by_key(|c| (c.start, Reverse(c.end)));
    located.declarations.dedup_by_key(|c| c.start);
    located.errors.sort_by_key(|&(start, end)| (start, Reverse(end)));
    located
}

/// A declaration read from the leaves, waiting for its place among the items.
#[derive(Debug)]
pub(crate) struct Planned {
    /// First leaf, leading attribute macros included.
    start: usize,
    /// Last leaf belonging to the declaration, terminator included.
    end: usize,
    /// Leaves dropped entirely: instance variables or a method body.
    skip: Option<(usize, usize)>,
    declarations: Vec<Declaration>,
}

impl Planned {
    fn last_leaf(&self) -> usize {
        self.skip.map_or(self.end, |(_, close)| close.max(self.end))
    }
}

/// The container a member is read in.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Enclosing {
    /// Declaration index of the container.
    index: usize,
    body: BodyKind,
    /// Byte range of the container node.
    start: usize,
    end: usize,
    /// Last leaf of the header.
    header_end: usize,
    /// Leaf index of `@end`, or one past the container's last leaf.
    close: usize,
}

pub(crate) struct Scanner<'a> {
    file: Arc<str>,
    src: &'a str,
    leaves: Vec<Leaf<'a>>,
    missing: Vec<MissingToken>,
    pos: usize,
    limit: usize,
    unit: SourceUnit,
    diagnostics: Vec<Diagnostic>,
    /// Byte ranges already accounted for by a diagnostic.
    reported: Vec<(usize, usize)>,
}

impl<'a> Scanner<'a> {
    fn new(file: Arc<str>, src: &'a str, leaves: Leaves<'a>) -> Self {
        let limit = leaves.leaves.len();
        Self {
            unit: SourceUnit::new(file.clone()),
            file,
            src,
            leaves: leaves.leaves,
            missing: leaves.missing,
            pos: 0,
            limit,
            diagnostics: Vec::new(),
            reported: Vec::new(),
        }
    }

    fn run(mut self, located: &Located) -> ScanOutput {
        let plans = self.plan(located);
        self.report_syntax_errors(located, &plans);
        self.place(plans);

        debug!(
            file = %self.file,
            declarations = self.unit.declarations.len(),
            comments = self.unit.comments.len(),
            diagnostics = self.diagnostics.len(),
            "Scanned source unit"
        );
        ScanOutput {
            unit: self.unit,
            diagnostics: self.diagnostics,
        }
    }

    /// Read every located declaration, in source order.
    fn plan(&mut self, located: &Located) -> Vec<Planned> {
        let captures = &located.declarations;
        let mut plans: Vec<Planned> = Vec::new();
        let mut containers: Vec<Enclosing> = Vec::new();
        let mut unreadable: Vec<(usize, usize)> = Vec::new();
        let mut floor = 0;
        let mut next_index = 0;

        for (n, capture) in captures.iter().enumerate() {
            let first = self.leaf_at(capture.start);
            if first < floor || first >= self.leaves.len() {
                continue;
            }
            let next = captures[n + 1..]
                .iter()
                .map(|c| self.leaf_at(c.start))
                .find(|&i| i > first)
                .unwrap_or(self.leaves.len());

            match capture.role {
                Role::Container => {
                    let last = self.last_leaf_before(capture.end);
                    match self.plan_container(capture, first, last, floor, next_index) {
                        Some((plan, enclosing)) => {
                            floor = plan.last_leaf() + 1;
                            next_index += plan.declarations.len();
                            containers.push(enclosing);
                            plans.push(plan);
                        }
                        None => {
                            unreadable.push((capture.start, capture.end));
                            self.reported.push((capture.start, capture.end));
                        }
                    }
                }
                Role::Member => {
                    let within = |&(s, e): &(usize, usize)| s <= capture.start && capture.end <= e;
                    if unreadable.iter().any(within) {
                        continue;
                    }
                    let Some(enclosing) = containers
                        .iter()
                        .rev()
                        .find(|c| within(&(c.start, c.end)))
                        .copied()
                    else {
                        self.malformed_at(first, "declaration outside of a container");
                        self.reported.push((capture.start, capture.end));
                        continue;
                    };
                    let limit = next.min(enclosing.close);
                    match self.plan_member(&enclosing, first, floor, limit) {
                        Some(plan) => {
                            floor = plan.last_leaf() + 1;
                            next_index += plan.declarations.len();
                            plans.push(plan);
                        }
                        None => self.reported.push((capture.start, capture.end)),
                    }
                }
            }
        }
        plans
    }

    /// Emit declarations, comments and code markers in source order.
    fn place(&mut self, plans: Vec<Planned>) {
        let mut plans = plans.into_iter().peekable();
        let mut claimed: Option<(usize, usize)> = None;
        let mut skip: Option<(usize, usize)> = None;
        for i in 0..self.leaves.len() {
            while let Some(plan) = plans.next_if(|p| p.start <= i) {
                for declaration in plan.declarations {
                    self.push_declaration(declaration);
                }
                claimed = Some((plan.start, plan.end));
                skip = plan.skip;
            }
            let inside = |range: Option<(usize, usize)>| range.is_some_and(|(s, e)| s <= i && i <= e);
            if inside(skip) {
                continue;
            }
            let leaf = self.leaves[i];
            match leaf.kind {
                LeafKind::DocComment => self.push_comment(leaf),
                LeafKind::PlainComment => {}
                _ if inside(claimed) => {}
                _ => self.push_code(leaf.end_line),
            }
        }
    }

    /// Parse errors and inserted tokens that no declaration accounts for.
    fn report_syntax_errors(&mut self, located: &Located, plans: &[Planned]) {
        let mut covered = std::mem::take(&mut self.reported);
        covered.extend(plans.iter().map(|p| {
            let first = self.leaves[p.start].start;
            let last = self.leaves[p.last_leaf().min(self.leaves.len() - 1)].end;
            (first, last)
        }));
        let inside = |offset: usize| covered.iter().any(|&(s, e)| s <= offset && offset < e);

        let mut handled_until = 0;
        for &(start, end) in &located.errors {
            if start < handled_until || end <= start || inside(start) {
                continue;
            }
            handled_until = end;
            let first = self.leaf_at(start);
            let text = self.src.get(start..end).unwrap_or("");
            if text.starts_with("/*") && !text.contains("*/") {
                let location = self.span(first, first);
                self.diagnostics.push(
                    Diagnostic::warning(DiagnosticKind::UnterminatedConstruct, "unterminated comment")
                        .at(location),
                );
            } else if !self.is_macro_run(start, end) {
                let snippet = text.lines().next().unwrap_or("").trim();
                self.malformed_at(first, format!("cannot make sense of `{snippet}`"));
            }
        }

        for missing in std::mem::take(&mut self.missing) {
            if missing.kind == "@end" || inside(missing.offset) {
                continue;
            }
            let at = self.leaf_at(missing.offset);
            self.malformed_at(at, format!("expected `{}`", missing.kind));
        }
    }

    /// Whether the code in `start..end` is only macro invocations such as
    /// `NS_ASSUME_NONNULL_BEGIN` or `FOUNDATION_EXPORT`.
    fn is_macro_run(&self, start: usize, end: usize) -> bool {
        let mut code = self
            .leaves
            .iter()
            .filter(|l| l.start >= start && l.end <= end && !l.is_comment());
        let Some(head) = code.next() else {
            return true;
        };
        head.is_ident()
            && is_macro_name(head.text)
            && code.all(|l| {
                l.kind != LeafKind::AtKeyword
                    && !(l.is_punct(';') || l.is_punct('{') || l.is_punct('}'))
            })
    }

    // ---- positions ----

    /// First leaf starting at or after `offset`.
    fn leaf_at(&self, offset: usize) -> usize {
        self.leaves.partition_point(|l| l.start < offset)
    }

    /// Last leaf starting before `offset`.
    fn last_leaf_before(&self, offset: usize) -> usize {
        self.leaves
            .partition_point(|l| l.start < offset)
            .saturating_sub(1)
    }

    /// Start of the attribute macros written directly in front of `first`,
    /// not reaching below `floor`.
    fn prefix_start(&self, first: usize, floor: usize) -> usize {
        let mut start = first;
        while let Some(prev) = start.checked_sub(1).filter(|&p| p >= floor) {
            let leaf = self.leaves[prev];
            if leaf.is_ident() && is_attribute_macro(leaf.text) {
                start = prev;
                continue;
            }
            if leaf.is_punct(')') {
                let head = self
                    .matching_open_before(prev, floor)
                    .and_then(|open| open.checked_sub(1))
                    .filter(|&h| h >= floor);
                if let Some(head) = head {
                    let name = self.leaves[head];
                    if name.is_ident() && is_attribute_macro(name.text) {
                        start = head;
                        continue;
                    }
                }
            }
            break;
        }
        start
    }

    /// Index of the `(` matching the `)` at `close`.
    fn matching_open_before(&self, close: usize, floor: usize) -> Option<usize> {
        let mut depth = 0usize;
        for i in (floor..=close).rev() {
            let leaf = &self.leaves[i];
            if leaf.is_punct(')') {
                depth += 1;
            } else if leaf.is_punct('(') {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Whether the nearest `@optional`/`@required` in `from..to` is `@optional`.
    fn optional_at(&self, from: usize, to: usize) -> bool {
        self.leaves
            .get(from..to)
            .unwrap_or(&[])
            .iter()
            .rev()
            .find_map(|l| match l.kind {
                LeafKind::AtKeyword if l.text == "@optional" => Some(true),
                LeafKind::AtKeyword if l.text == "@required" => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    // ---- cursor over code leaves below `limit` ----

    fn code_index(&self, from: usize) -> Option<usize> {
        (from..self.limit).find(|&i| !self.leaves[i].is_comment())
    }

    /// Index of the next code leaf, or `limit` when none is left.
    fn here(&self) -> usize {
        self.code_index(self.pos).unwrap_or(self.limit)
    }

    fn peek(&self) -> Option<Leaf<'a>> {
        self.code_index(self.pos).map(|i| self.leaves[i])
    }

    fn peek_at(&self, offset: usize) -> Option<Leaf<'a>> {
        let mut i = self.code_index(self.pos)?;
        for _ in 0..offset {
            i = self.code_index(i + 1)?;
        }
        Some(self.leaves[i])
    }

    /// Consume the next code leaf and return its index.
    fn bump(&mut self) -> Option<usize> {
        let i = self.code_index(self.pos)?;
        self.pos = i + 1;
        Some(i)
    }

    fn peek_punct(&self, c: char) -> bool {
        self.peek().is_some_and(|l| l.is_punct(c))
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek_punct(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self) -> Option<Leaf<'a>> {
        let leaf = self.peek().filter(Leaf::is_ident)?;
        self.bump();
        Some(leaf)
    }

    /// Consume a bracketed group starting at the cursor and return the index
    /// of its closing leaf. `None` when the limit comes first.
    fn skip_balanced(&mut self) -> Option<usize> {
        let mut depth = 0usize;
        while let Some(i) = self.bump() {
            let leaf = self.leaves[i];
            if leaf.kind != LeafKind::Punct {
                continue;
            }
            match leaf.text {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Opening and closing leaf indices of a parenthesized group at the cursor.
    fn paren_group(&mut self) -> Option<(usize, usize)> {
        let open = self.here();
        let close = self.skip_balanced()?;
        Some((open, close))
    }

    /// Consume a run of attribute macros, each with its optional argument list.
    fn collect_attributes(&mut self) -> Vec<SmolStr> {
        let mut attributes = Vec::new();
        while let Some(leaf) = self.peek() {
            if !(leaf.is_ident() && is_attribute_macro(leaf.text)) {
                break;
            }
            let Some(start) = self.bump() else { break };
            let end = if self.peek_punct('(') {
                self.skip_balanced().unwrap_or_else(|| self.last_code_index())
            } else {
                start
            };
            attributes.push(SmolStr::new(self.render(start, end)));
        }
        attributes
    }

    /// Index of the last code leaf before the cursor.
    fn last_code_index(&self) -> usize {
        (0..self.pos.min(self.leaves.len()))
            .rev()
            .find(|&i| !self.leaves[i].is_comment())
            .unwrap_or(0)
    }

    // ---- text ----

    /// Source text of leaves `from..=to`, comments dropped and whitespace collapsed.
    fn render(&self, from: usize, to: usize) -> String {
        if from > to || to >= self.leaves.len() {
            return String::new();
        }
        self.render_indices((from..=to).filter(|&i| !self.leaves[i].is_comment()))
    }

    fn render_indices(&self, indices: impl IntoIterator<Item = usize>) -> String {
        let mut out = String::new();
        let mut prev_end: Option<usize> = None;
        for i in indices {
            let leaf = self.leaves[i];
            if let Some(end) = prev_end {
                let spaced = self
                    .src
                    .get(..leaf.start)
                    .is_some_and(|s| s.ends_with(char::is_whitespace));
                if leaf.start > end && spaced {
                    out.push(' ');
                }
            }
            out.push_str(leaf.text);
            prev_end = Some(leaf.end);
        }
        collapse_whitespace(&out)
    }

    /// Inner text of the parenthesized group `open..=close`, if any.
    fn inner_text(&self, open: usize, close: usize) -> Option<String> {
        let text = self.render(open + 1, close.saturating_sub(1));
        (!text.is_empty()).then_some(text)
    }

    fn span(&self, from: usize, to: usize) -> SourceLocation {
        let clamp = |i: usize| i.min(self.leaves.len().saturating_sub(1));
        let range = match (self.leaves.get(clamp(from)), self.leaves.get(clamp(to.max(from)))) {
            (Some(first), Some(last)) => {
                Range::new(first.line, first.col, last.end_line, last.end_col)
            }
            _ => Range::new(1, 1, 1, 1),
        };
        SourceLocation::new(self.file.clone(), range)
    }

    // ---- output ----

    fn malformed_at(&mut self, index: usize, message: impl Into<String>) {
        let location = self.span(index, index);
        self.diagnostics.push(
            Diagnostic::warning(DiagnosticKind::MalformedDeclaration, message).at(location),
        );
    }

    fn push_declaration(&mut self, declaration: Declaration) {
        let index = self.unit.declarations.len();
        self.unit.declarations.push(declaration);
        self.unit.items.push(SourceItem::Declaration { index });
    }

    fn push_code(&mut self, line: usize) {
        if !matches!(self.unit.items.last(), Some(SourceItem::Code { .. })) {
            self.unit.items.push(SourceItem::Code { line });
        }
    }

    fn push_comment(&mut self, leaf: Leaf<'a>) {
        let (style, placement) = comment::classify(leaf.text, leaf.first_on_line);
        let location = self.span_of(&leaf);

        // Consecutive `///` lines form one block.
        if style == CommentStyle::Line && placement == CommentPlacement::Leading {
            if let Some(SourceItem::Comment { index }) = self.unit.items.last().copied() {
                let prev = &mut self.unit.comments[index];
                if prev.style == CommentStyle::Line
                    && prev.placement == CommentPlacement::Leading
                    && prev.location.range.end_line + 1 == leaf.line
                {
                    prev.text.push('\n');
                    prev.text.push_str(comment::strip_line(leaf.text));
                    prev.location.range.extend_to(&location.range);
                    return;
                }
            }
        }

        let text = match style {
            CommentStyle::Block => comment::strip_block(leaf.text),
            CommentStyle::Line => comment::strip_line(leaf.text).to_string(),
        };
        let index = self.unit.comments.len();
        self.unit.comments.push(CommentBlock {
            text,
            location,
            blank_lines_before: leaf.blank_lines_before,
            style,
            placement,
        });
        self.unit.items.push(SourceItem::Comment { index });
    }

    fn span_of(&self, leaf: &Leaf<'a>) -> SourceLocation {
        SourceLocation::new(
            self.file.clone(),
            Range::new(leaf.line, leaf.col, leaf.end_line, leaf.end_col),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscope_api::models::{DeclarationDetail, EntityKind};

    fn scan_str(src: &str) -> ScanOutput {
        let parser = ObjcParser::new().expect("objc grammar loads");
        scan(&parser, Arc::from("Test.h"), src)
    }

    #[test]
    fn test_attribute_macro_detection() {
        assert!(is_attribute_macro("NS_DESIGNATED_INITIALIZER"));
        assert!(is_attribute_macro("API_AVAILABLE"));
        assert!(is_attribute_macro("__attribute__"));
        assert!(!is_attribute_macro("BOOL"));
        assert!(!is_attribute_macro("NSObject"));
        assert!(!is_attribute_macro("_"));
        assert!(!is_attribute_macro("NS_ASSUME_NONNULL_BEGIN"));
        assert!(is_macro_name("NS_ASSUME_NONNULL_BEGIN"));
    }

    #[test]
    fn test_top_level_code_is_marked() {
        let out = scan_str("#import <Foundation/Foundation.h>\nextern NSString *const Key;\n");
        assert!(out.unit.declarations.is_empty());
        assert_eq!(out.unit.items.len(), 1);
        assert!(matches!(out.unit.items[0], SourceItem::Code { .. }));
    }

    #[test]
    fn test_interface_with_members_in_order() {
        let src = "/** A foo. */\n@interface Foo : NSObject <NSCopying>\n- (void)bar;\n@property int count;\n@end\n";
        let out = scan_str(src);
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
        let kinds: Vec<_> = out.unit.declarations.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Class, EntityKind::Method, EntityKind::Property]
        );
        let DeclarationDetail::Class(class) = &out.unit.declarations[0].detail else {
            panic!("expected class detail");
        };
        assert_eq!(class.superclass.as_deref(), Some("NSObject"));
        assert_eq!(class.protocols, vec![SmolStr::new("NSCopying")]);
        assert_eq!(out.unit.declarations[1].parent, Some(0));
        assert_eq!(out.unit.declarations[0].location.range.end_line, 5);
        assert!(matches!(out.unit.items[0], SourceItem::Comment { index: 0 }));
        assert!(matches!(
            out.unit.items[1],
            SourceItem::Declaration { index: 0 }
        ));
    }

    #[test]
    fn test_render_drops_comments_and_collapses_whitespace() {
        let out = scan_str("@interface Foo\n- (NSString *)  name:(int)a /**< x */\n      other:(id)b;\n@end");
        let method = &out.unit.declarations[1];
        assert_eq!(method.signature, "- (NSString *) name:(int)a other:(id)b");
    }

    #[test]
    fn test_comment_with_unicode_indentation_is_kept() {
        let out = scan_str("/*! Abstract.\n\u{a0}second\n third */\n@interface Foo : NSObject\n@end\n");
        assert_eq!(out.unit.comments.len(), 1);
        assert_eq!(out.unit.comments[0].text, "Abstract.\nsecond\nthird");
        assert_eq!(out.unit.declarations[0].name, "Foo");
    }

    #[test]
    fn test_columns_count_characters() {
        let out = scan_str("/** \u{e9}t\u{e9} */ @interface Foo\n@end\n");
        let foo = &out.unit.declarations[0];
        assert_eq!((foo.location.range.start_line, foo.location.range.start_col), (1, 12));
        assert_eq!(out.unit.comments[0].location.range.end_col, 10);
    }

    #[test]
    fn test_unparsable_code_outside_declarations_is_reported() {
        let out = scan_str("@interface Foo\n@end\n}\n");
        assert_eq!(out.unit.declarations[0].name, "Foo");
        assert!(!out.diagnostics.is_empty());
        let stray = &out.diagnostics[0];
        assert_eq!(stray.kind, DiagnosticKind::MalformedDeclaration);
        assert_eq!(stray.location.as_ref().map(|l| l.line()), Some(3));
    }

    #[test]
    fn test_plain_comments_are_dropped() {
        let out = scan_str("// plain\n/* plain */\n/** Doc. */\n@interface Foo\n@end\n");
        assert_eq!(out.unit.comments.len(), 1);
        assert_eq!(out.unit.comments[0].text, "Doc.");
    }
}
