use super::{BodyKind, Capture, Enclosing, Planned, Scanner, is_attribute_macro};
use crate::syntax::{Leaf, LeafKind};
use docscope_api::models::naming;
use docscope_api::models::{
    CategoryDecl, ClassDecl, Declaration, DeclarationDetail, Diagnostic, DiagnosticKind,
    EntityKind, ProtocolDecl,
};
use smol_str::SmolStr;

impl<'a> Scanner<'a> {
    /// Read the header of a container node spanning leaves `first..=last`.
    ///
    /// `@interface Name [<Generics>] [: Super] [<Protocols>]`,
    /// `@interface Name (Category)`, `@implementation Name [: Super]` or
    /// `@protocol Name [<Protocols>]`, each with optional attribute macros.
    pub(super) fn plan_container(
        &mut self,
        capture: &Capture,
        first: usize,
        last: usize,
        floor: usize,
        index: usize,
    ) -> Option<(Planned, Enclosing)> {
        let start = self.prefix_start(first, floor);
        self.pos = start;
        self.limit = (last + 1).min(self.leaves.len());
        let mut attributes = self.collect_attributes();

        let at = self.here();
        let body = match self.peek() {
            Some(keyword) if keyword.is_keyword("@interface") => BodyKind::Interface,
            Some(keyword) if keyword.is_keyword("@implementation") => BodyKind::Implementation,
            Some(keyword) if keyword.is_keyword("@protocol") => BodyKind::Protocol,
            _ => {
                self.malformed_at(at, "expected `@interface`, `@implementation` or `@protocol`");
                return None;
            }
        };
        let keyword = self.leaves[at].text;
        self.bump();

        let Some(name) = self.eat_ident() else {
            self.malformed_at(at, format!("expected a name after `{keyword}`"));
            return None;
        };

        let detail = match body {
            BodyKind::Interface => {
                self.skip_generic_parameters();
                if self.peek_punct('(') {
                    let Some(detail) = self.category_clause(name, false) else {
                        self.malformed_at(at, format!("unterminated category of `{}`", name.text));
                        return None;
                    };
                    detail
                } else {
                    let superclass = if self.eat_punct(':') {
                        let Some(superclass) = self.eat_ident() else {
                            self.malformed_at(
                                at,
                                format!("expected a superclass name for `{}`", name.text),
                            );
                            return None;
                        };
                        Some(SmolStr::new(superclass.text))
                    } else {
                        None
                    };
                    DeclarationDetail::Class(ClassDecl {
                        superclass,
                        protocols: self.protocol_list(),
                        implementation: false,
                    })
                }
            }
            BodyKind::Protocol => {
                // forward declaration
                if self.peek_punct(';') || self.peek_punct(',') {
                    return None;
                }
                DeclarationDetail::Protocol(ProtocolDecl {
                    protocols: self.protocol_list(),
                })
            }
            BodyKind::Implementation => {
                if self.peek_punct('(') {
                    let Some(detail) = self.category_clause(name, true) else {
                        self.malformed_at(at, format!("unterminated category of `{}`", name.text));
                        return None;
                    };
                    detail
                } else {
                    let superclass = if self.eat_punct(':') {
                        self.eat_ident().map(|l| SmolStr::new(l.text))
                    } else {
                        None
                    };
                    DeclarationDetail::Class(ClassDecl {
                        superclass,
                        protocols: Vec::new(),
                        implementation: true,
                    })
                }
            }
        };

        if self
            .peek()
            .is_some_and(|l| l.is_ident() && is_attribute_macro(l.text))
        {
            attributes.extend(self.collect_attributes());
        }
        let header_end = self.last_code_index();

        // instance variables
        let ivars = if body != BodyKind::Protocol && self.peek_punct('{') {
            let open = self.here();
            self.skip_balanced().map(|close| (open, close))
        } else {
            None
        };
        let claimed = ivars.map_or(header_end, |(_, close)| close);
        let end_keyword = (claimed + 1..=last)
            .rev()
            .find(|&i| !self.leaves[i].is_comment())
            .filter(|&i| self.leaves[i].is_keyword("@end"));

        let (kind, display) = match &detail {
            DeclarationDetail::Protocol(_) => (EntityKind::Protocol, name.text.to_string()),
            DeclarationDetail::Category(c) => (
                EntityKind::Category,
                naming::category_name(&c.class_name, c.category_name.as_deref()),
            ),
            DeclarationDetail::Extension(c) => (
                EntityKind::Extension,
                naming::category_name(&c.class_name, None),
            ),
            _ => (EntityKind::Class, name.text.to_string()),
        };

        let mut location = self.span(start, header_end);
        if let Some(end) = end_keyword {
            location.range.extend_to(&self.span(end, end).range);
        }
        let declaration = Declaration {
            kind,
            name: SmolStr::new(display),
            signature: self.render(at, header_end),
            location,
            blank_lines_before: self.leaves[start].blank_lines_before,
            parent: None,
            attributes,
            detail,
        };
        if end_keyword.is_none() {
            self.unterminated(&declaration);
        }

        let enclosing = Enclosing {
            index,
            body,
            start: capture.start,
            end: capture.end,
            header_end,
            close: end_keyword.unwrap_or(last + 1),
        };
        let plan = Planned {
            start,
            end: header_end,
            skip: ivars,
            declarations: vec![declaration],
        };
        Some((plan, enclosing))
    }

    /// `(Category)` or `()` after a class name, plus any protocol list.
    fn category_clause(&mut self, class: Leaf<'a>, implementation: bool) -> Option<DeclarationDetail> {
        self.bump();
        let category = self.eat_ident();
        if !self.eat_punct(')') {
            return None;
        }
        let decl = CategoryDecl {
            class_name: SmolStr::new(class.text),
            category_name: category.map(|l| SmolStr::new(l.text)),
            protocols: self.protocol_list(),
            implementation,
        };
        Some(if decl.category_name.is_some() {
            DeclarationDetail::Category(decl)
        } else {
            DeclarationDetail::Extension(decl)
        })
    }

    /// `<ObjectType, KeyType>` directly after a class name, recognized by what
    /// follows the closing `>`.
    fn skip_generic_parameters(&mut self) {
        if !self.peek_punct('<') {
            return;
        }
        let mut depth = 0usize;
        let mut cursor = self.code_index(self.pos);
        while let Some(i) = cursor {
            let leaf = self.leaves[i];
            if leaf.is_punct('<') {
                depth += 1;
            } else if leaf.is_punct('>') {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let follows = self.code_index(i + 1).map(|j| self.leaves[j]);
                    if follows.is_some_and(|l| l.is_punct(':') || l.is_punct('(')) {
                        self.pos = i + 1;
                    }
                    return;
                }
            } else if leaf.kind == LeafKind::AtKeyword || leaf.is_punct(';') {
                return;
            }
            cursor = self.code_index(i + 1);
        }
    }

    /// `<A, B>`; a bracket holding pointer types is a generic argument list and
    /// names no protocols.
    fn protocol_list(&mut self) -> Vec<SmolStr> {
        let mut protocols = Vec::new();
        while self.eat_punct('<') {
            let mut names = Vec::new();
            let mut generic = false;
            while let Some(leaf) = self.peek() {
                if leaf.is_ident() {
                    names.push(SmolStr::new(leaf.text));
                } else if leaf.is_punct('*') {
                    generic = true;
                } else if leaf.is_punct('>') {
                    self.bump();
                    break;
                } else if !leaf.is_punct(',') {
                    break;
                }
                self.bump();
            }
            if !generic {
                protocols.extend(names);
            }
        }
        protocols
    }

    fn unterminated(&mut self, declaration: &Declaration) {
        let diagnostic = Diagnostic::warning(
            DiagnosticKind::UnterminatedConstruct,
            format!("missing `@end` for `{}`", declaration.name),
        )
        .at(declaration.location.clone())
        .about(declaration.name.to_string());
        self.diagnostics.push(diagnostic);
    }
}
