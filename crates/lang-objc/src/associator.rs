//! Comment association.
//!
//! Trailing comments are matched first, by position: a comment inside a
//! method signature documents the argument before it, and a same-line comment
//! documents the argument or member it follows. Every other comment joins a
//! run that leads the next declaration, provided no code and no more than
//! `max_blank_lines` empty lines separate them.

use docscope_api::models::{
    AssociatedDeclaration, AssociationOutput, AttachedComment, CommentBlock, CommentPlacement,
    Declaration, Diagnostic, DiagnosticKind, EntityKind, SourceItem, SourceLocation, SourceUnit,
};
use docscope_api::AssociationConfig;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Declaration(usize),
    Argument(usize, usize),
}

pub fn associate(unit: SourceUnit, config: &AssociationConfig) -> AssociationOutput {
    let SourceUnit {
        file,
        declarations,
        comments,
        items,
    } = unit;

    let mut leading: Vec<Vec<usize>> = vec![Vec::new(); declarations.len()];
    let mut trailing: Vec<Vec<usize>> = vec![Vec::new(); declarations.len()];
    let mut arguments: Vec<Vec<(usize, usize)>> = vec![Vec::new(); declarations.len()];
    let mut consumed = vec![false; comments.len()];
    let mut orphans: Vec<usize> = Vec::new();
    let mut diagnostics = Vec::new();

    for (index, comment) in comments.iter().enumerate() {
        match trailing_target(&declarations, comment) {
            Some(Target::Argument(decl, arg)) => arguments[decl].push((arg, index)),
            Some(Target::Declaration(decl)) => trailing[decl].push(index),
            None => continue,
        }
        consumed[index] = true;
    }

    let window = config.max_blank_lines;
    let mut pending: Vec<usize> = Vec::new();
    let mut after_same_line: Option<usize> = None;

    for item in &items {
        match *item {
            SourceItem::Comment { index } => {
                if consumed[index] {
                    if comments[index].placement == CommentPlacement::SameLine {
                        after_same_line = Some(index);
                    }
                    continue;
                }
                let comment = &comments[index];
                if comment.placement == CommentPlacement::ExplicitTrailing {
                    orphans.push(index);
                    continue;
                }
                if !pending.is_empty() && comment.blank_lines_before > window {
                    orphans.append(&mut pending);
                }
                pending.push(index);
                after_same_line = None;
            }
            SourceItem::Code { .. } => {
                orphans.append(&mut pending);
                after_same_line = None;
            }
            SourceItem::Declaration { index } => {
                let declaration = &declarations[index];
                let adjacent = declaration.blank_lines_before <= window;
                if !pending.is_empty() && adjacent {
                    leading[index] = std::mem::take(&mut pending);
                } else {
                    orphans.append(&mut pending);
                    if let Some(comment) = after_same_line.filter(|_| adjacent) {
                        if config.report_ambiguities {
                            diagnostics.push(
                                Diagnostic::warning(
                                    DiagnosticKind::AmbiguousAssociation,
                                    format!(
                                        "comment could document either the code before it or `{}`",
                                        declaration.name
                                    ),
                                )
                                .at(comments[comment].location.clone())
                                .about(declaration.name.to_string()),
                            );
                        }
                    }
                }
                after_same_line = None;
            }
        }
    }
    orphans.append(&mut pending);

    if config.report_orphans {
        for index in orphans {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::OrphanComment,
                    "documentation comment is not attached to any declaration",
                )
                .at(comments[index].location.clone()),
            );
        }
    }

    let declarations: Vec<AssociatedDeclaration> = declarations
        .into_iter()
        .enumerate()
        .map(|(i, declaration)| {
            let mut argument_comments: Vec<(usize, AttachedComment)> = Vec::new();
            let mut by_argument = std::mem::take(&mut arguments[i]);
            by_argument.sort();
            let mut start = 0;
            while start < by_argument.len() {
                let arg = by_argument[start].0;
                let end = by_argument[start..]
                    .iter()
                    .position(|&(a, _)| a != arg)
                    .map_or(by_argument.len(), |n| start + n);
                let run: Vec<usize> = by_argument[start..end].iter().map(|&(_, c)| c).collect();
                if let Some(attached) = attach(&comments, &run) {
                    argument_comments.push((arg, attached));
                }
                start = end;
            }
            AssociatedDeclaration {
                comment: attach(&comments, &leading[i]),
                trailing: attach(&comments, &trailing[i]),
                argument_comments,
                declaration,
            }
        })
        .collect();

    debug!(
        file = %file,
        declarations = declarations.len(),
        documented = declarations.iter().filter(|d| d.comment.is_some() || d.trailing.is_some()).count(),
        "Associated comments"
    );

    AssociationOutput {
        file,
        declarations,
        diagnostics,
    }
}

/// Concatenate comment blocks in source order.
fn attach(comments: &[CommentBlock], indices: &[usize]) -> Option<AttachedComment> {
    let (&first, rest) = indices.split_first()?;
    let mut text = comments[first].text.clone();
    let mut location: SourceLocation = comments[first].location.clone();
    for &index in rest {
        text.push('\n');
        text.push_str(&comments[index].text);
        location.range.extend_to(&comments[index].location.range);
    }
    Some(AttachedComment { text, location })
}

fn trailing_target(declarations: &[Declaration], comment: &CommentBlock) -> Option<Target> {
    let range = comment.location.range;
    let start = (range.start_line, range.start_col);

    // Inside a multi-line method signature.
    for (d, decl) in declarations.iter().enumerate() {
        if decl.kind != EntityKind::Method {
            continue;
        }
        let r = decl.location.range;
        if (r.start_line, r.start_col) < start && start < (r.end_line, r.end_col) {
            let argument = decl
                .arguments()
                .iter()
                .enumerate()
                .rev()
                .find(|(_, a)| (a.line, a.col) < start)
                .map(|(a, _)| Target::Argument(d, a));
            return argument.or(Some(Target::Declaration(d)));
        }
    }

    if !comment.is_trailing() {
        return None;
    }

    let mut nearest_argument: Option<(usize, Target)> = None;
    for (d, decl) in declarations.iter().enumerate() {
        for (a, arg) in decl.arguments().iter().enumerate() {
            if arg.line == start.0
                && arg.col < start.1
                && nearest_argument.is_none_or(|(col, _)| arg.col > col)
            {
                nearest_argument = Some((arg.col, Target::Argument(d, a)));
            }
        }
    }
    if let Some((_, target)) = nearest_argument {
        return Some(target);
    }

    declarations
        .iter()
        .enumerate()
        .filter(|(_, decl)| {
            let r = decl.location.range;
            decl.kind.is_member() && r.end_line == start.0 && r.end_col < start.1
        })
        .max_by_key(|(i, decl)| (decl.location.range.end_col, *i))
        .map(|(d, _)| Target::Declaration(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ObjcParser;
    use crate::scanner::scan;
    use std::sync::Arc;

    fn run(src: &str, config: &AssociationConfig) -> AssociationOutput {
        let parser = ObjcParser::new().expect("objc grammar loads");
        let out = scan(&parser, Arc::from("A.h"), src);
        associate(out.unit, config)
    }

    fn comment_of<'a>(out: &'a AssociationOutput, name: &str) -> Option<&'a str> {
        out.declarations
            .iter()
            .find(|d| d.declaration.name == name)
            .and_then(|d| d.comment.as_ref())
            .map(|c| c.text.as_str())
    }

    #[test]
    fn test_leading_comment_within_window() {
        let out = run(
            "/** Class doc. */\n\n@interface Foo\n/** Method doc. */\n- (void)bar;\n@end",
            &AssociationConfig::default(),
        );
        assert_eq!(comment_of(&out, "Foo"), Some("Class doc."));
        assert_eq!(comment_of(&out, "bar"), Some("Method doc."));
    }

    #[test]
    fn test_too_many_blank_lines_detach() {
        let src = "/** Lost. */\n\n\n@interface Foo\n@end";
        let strict = run(src, &AssociationConfig::default());
        assert_eq!(comment_of(&strict, "Foo"), None);

        let loose = run(
            src,
            &AssociationConfig {
                max_blank_lines: 2,
                ..Default::default()
            },
        );
        assert_eq!(comment_of(&loose, "Foo"), Some("Lost."));
    }

    #[test]
    fn test_code_breaks_adjacency() {
        let out = run(
            "/** Not for Foo. */\nextern int x;\n@interface Foo\n@end",
            &AssociationConfig {
                report_orphans: true,
                ..Default::default()
            },
        );
        assert_eq!(comment_of(&out, "Foo"), None);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::OrphanComment);
    }

    #[test]
    fn test_consecutive_comments_are_concatenated() {
        let out = run(
            "/** First. */\n/** Second. */\n@interface Foo\n@end",
            &AssociationConfig::default(),
        );
        assert_eq!(comment_of(&out, "Foo"), Some("First.\nSecond."));
    }

    #[test]
    fn test_trailing_comments_on_properties_and_arguments() {
        let src = "@interface Foo\n@property int count; ///< How many.\n- (void)setA:(int)a /**< The a. */\n        b:(int)b; ///< The b.\n@end";
        let out = run(src, &AssociationConfig::default());
        let count = out
            .declarations
            .iter()
            .find(|d| d.declaration.name == "count")
            .unwrap();
        assert_eq!(count.trailing.as_ref().unwrap().text, "How many.");
        let method = out
            .declarations
            .iter()
            .find(|d| d.declaration.name == "setA:b:")
            .unwrap();
        let texts: Vec<_> = method
            .argument_comments
            .iter()
            .map(|(i, c)| (*i, c.text.as_str()))
            .collect();
        assert_eq!(texts, vec![(0, "The a."), (1, "The b.")]);
        assert!(method.comment.is_none());
    }

    #[test]
    fn test_same_line_comment_reports_ambiguity_when_enabled() {
        let src = "@interface Foo\n@property int a; /** A or b? */\n@property int b;\n@end";
        let out = run(
            src,
            &AssociationConfig {
                report_ambiguities: true,
                ..Default::default()
            },
        );
        let a = out.declarations.iter().find(|d| d.declaration.name == "a").unwrap();
        assert_eq!(a.trailing.as_ref().unwrap().text, "A or b?");
        assert_eq!(comment_of(&out, "b"), None);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::AmbiguousAssociation);
    }

    #[test]
    fn test_optional_marker_does_not_break_adjacency() {
        let out = run(
            "@protocol P\n/** Maybe. */\n@optional\n- (void)maybe;\n@end",
            &AssociationConfig::default(),
        );
        assert_eq!(comment_of(&out, "maybe"), Some("Maybe."));
    }

    #[test]
    fn test_plain_comments_are_ignored() {
        let out = run(
            "/** Doc. */\n// just a note\n@interface Foo\n@end",
            &AssociationConfig::default(),
        );
        assert_eq!(comment_of(&out, "Foo"), Some("Doc."));
    }
}
