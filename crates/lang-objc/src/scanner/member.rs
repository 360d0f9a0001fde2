use super::{BodyKind, Enclosing, Planned, Scanner, is_attribute_macro};
use crate::syntax::LeafKind;
use docscope_api::models::{
    ArgumentDecl, Declaration, DeclarationDetail, EntityKind, MethodDecl, MethodScope,
    PropertyDecl,
};
use smol_str::SmolStr;

impl<'a> Scanner<'a> {
    /// Read the member whose node starts at leaf `first`, stopping before `limit`.
    pub(super) fn plan_member(
        &mut self,
        enclosing: &Enclosing,
        first: usize,
        floor: usize,
        limit: usize,
    ) -> Option<Planned> {
        let start = self.prefix_start(first, floor);
        self.pos = start;
        self.limit = limit.min(self.leaves.len());
        let prefix = self.collect_attributes();
        let optional = self.optional_at(enclosing.header_end, start);
        match self.peek() {
            Some(leaf) if leaf.is_punct('-') || leaf.is_punct('+') => {
                self.plan_method(enclosing, start, prefix, optional)
            }
            Some(leaf) if leaf.is_keyword("@property") => {
                self.plan_property(enclosing, start, prefix, optional)
            }
            _ => {
                self.malformed_at(first, "expected a method or property declaration");
                None
            }
        }
    }

    /// `- (Type)part:(Type)name part:(Type)name, ... ATTRS;` with an optional body.
    fn plan_method(
        &mut self,
        enclosing: &Enclosing,
        start: usize,
        prefix: Vec<SmolStr>,
        optional: bool,
    ) -> Option<Planned> {
        let sign = self.bump()?;
        let scope = if self.leaves[sign].is_punct('+') {
            MethodScope::Class
        } else {
            MethodScope::Instance
        };

        let return_type = if self.peek_punct('(') {
            let Some((open, close)) = self.paren_group() else {
                self.malformed_at(sign, "unbalanced parentheses in method return type");
                return None;
            };
            self.inner_text(open, close)
        } else {
            None
        };

        let Some(first) = self.eat_ident() else {
            self.malformed_at(sign, "expected a selector in method declaration");
            return None;
        };

        let mut selector = String::new();
        let mut arguments = Vec::new();
        let mut variadic = false;

        if !self.peek_punct(':') {
            selector.push_str(first.text);
        } else {
            let mut part = first.text;
            while self.eat_punct(':') {
                selector.push_str(part);
                selector.push(':');

                let type_name = if self.peek_punct('(') {
                    let Some((open, close)) = self.paren_group() else {
                        self.malformed_at(sign, format!("unbalanced parentheses in `{selector}`"));
                        return None;
                    };
                    self.inner_text(open, close)
                } else {
                    None
                };

                let Some(name) = self.eat_ident() else {
                    self.malformed_at(sign, format!("expected an argument name in `{selector}`"));
                    return None;
                };
                arguments.push(ArgumentDecl {
                    selector_part: SmolStr::new(part),
                    type_name,
                    name: SmolStr::new(name.text),
                    line: name.line,
                    col: name.col,
                });

                match (self.peek(), self.peek_at(1)) {
                    (Some(next), Some(colon))
                        if next.is_ident()
                            && !is_attribute_macro(next.text)
                            && colon.is_punct(':') =>
                    {
                        self.bump();
                        part = next.text;
                    }
                    (Some(next), _) if next.is_punct(':') => part = "",
                    (Some(comma), _) if comma.is_punct(',') => {
                        if self.eat_ellipsis() {
                            variadic = true;
                        }
                        break;
                    }
                    _ => break,
                }
            }
        }

        let mut attributes = prefix;
        attributes.extend(self.collect_attributes());
        let signature_end = self.last_code_index();

        let (end, body) = match self.peek() {
            Some(leaf) if leaf.is_punct(';') => {
                let semicolon = self.here();
                self.bump();
                if enclosing.body == BodyKind::Implementation && self.peek_punct('{') {
                    (semicolon, self.body_range())
                } else {
                    (semicolon, None)
                }
            }
            Some(leaf) if leaf.is_punct('{') => (signature_end, self.body_range()),
            _ => {
                self.malformed_at(sign, format!("expected `;` after method `{selector}`"));
                return None;
            }
        };

        let declaration = Declaration {
            kind: EntityKind::Method,
            name: SmolStr::new(&selector),
            signature: self.render(sign, signature_end),
            location: self.span(start, signature_end),
            blank_lines_before: self.leaves[start].blank_lines_before,
            parent: Some(enclosing.index),
            attributes,
            detail: DeclarationDetail::Method(MethodDecl {
                scope,
                return_type,
                arguments,
                variadic,
                optional,
                implementation: body.is_some(),
            }),
        };
        Some(Planned {
            start,
            end,
            skip: body,
            declarations: vec![declaration],
        })
    }

    /// Braces of a method body at the cursor; an unclosed body runs to the limit.
    fn body_range(&mut self) -> Option<(usize, usize)> {
        let open = self.here();
        let close = self
            .skip_balanced()
            .unwrap_or_else(|| self.limit.saturating_sub(1).max(open));
        Some((open, close))
    }

    /// `, ...` closing a variadic selector.
    fn eat_ellipsis(&mut self) -> bool {
        if !self.peek_punct(',') {
            return false;
        }
        let steps = match self.peek_at(1) {
            Some(leaf) if leaf.kind == LeafKind::Punct && leaf.text == "..." => 2,
            Some(leaf)
                if leaf.is_punct('.')
                    && (2..=3).all(|i| self.peek_at(i).is_some_and(|l| l.is_punct('.'))) =>
            {
                4
            }
            _ => return false,
        };
        for _ in 0..steps {
            self.bump();
        }
        true
    }

    /// `@property (attrs) Type name[, *other] ATTRS;`
    fn plan_property(
        &mut self,
        enclosing: &Enclosing,
        start: usize,
        prefix: Vec<SmolStr>,
        optional: bool,
    ) -> Option<Planned> {
        let at = self.bump()?;

        let mut property_attributes = Vec::new();
        if self.peek_punct('(') {
            let Some((open, close)) = self.paren_group() else {
                self.malformed_at(at, "unbalanced parentheses in property attributes");
                return None;
            };
            property_attributes = self
                .split_top_level(open + 1, close)
                .into_iter()
                .map(|group| SmolStr::new(self.render_indices(group)))
                .filter(|s| !s.is_empty())
                .collect();
        }

        let body_start = self.pos;
        let mut depth = 0usize;
        let semicolon = loop {
            let Some(leaf) = self.peek() else {
                self.malformed_at(at, "expected `;` after property declaration");
                return None;
            };
            let i = self.here();
            if depth == 0 && leaf.is_punct(';') {
                break i;
            }
            if depth == 0 && leaf.kind == LeafKind::AtKeyword {
                self.malformed_at(at, "expected `;` after property declaration");
                return None;
            }
            self.bump();
            if leaf.kind == LeafKind::Punct {
                match leaf.text {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
        };
        self.pos = semicolon + 1;

        let mut code: Vec<usize> = (body_start..semicolon)
            .filter(|&i| !self.leaves[i].is_comment())
            .collect();
        let mut attributes = prefix;
        attributes.extend(self.strip_trailing_attributes(&mut code));

        let declarators = self.split_declarators(&code);
        let Some(first) = declarators.first() else {
            self.malformed_at(at, "expected a property type and name");
            return None;
        };
        let base_type: Vec<usize> = first
            .iter()
            .copied()
            .take_while(|&i| {
                let l = &self.leaves[i];
                !(l.is_punct('*') || l.is_punct('^') || l.is_punct('('))
            })
            .collect();

        let signature_end = code.last().copied().unwrap_or(at);
        let signature = self.render(at, signature_end);
        let mut declarations = Vec::new();
        for (n, declarator) in declarators.iter().enumerate() {
            let Some(name_idx) = self.declarator_name(declarator) else {
                self.malformed_at(at, "expected a property name");
                continue;
            };
            let rest: Vec<usize> = declarator.iter().copied().filter(|&i| i != name_idx).collect();
            let type_name = if n == 0 {
                self.render_indices(rest)
            } else {
                let base = self.render_indices(base_type.iter().copied().filter(|&i| i != name_idx));
                let own = self.render_indices(rest);
                format!("{base} {own}").trim().to_string()
            };
            let end = declarator.last().copied().unwrap_or(name_idx);

            declarations.push(Declaration {
                kind: EntityKind::Property,
                name: SmolStr::new(self.leaves[name_idx].text),
                signature: signature.clone(),
                location: self.span(start, end.max(signature_end)),
                blank_lines_before: self.leaves[start].blank_lines_before,
                parent: Some(enclosing.index),
                attributes: attributes.clone(),
                detail: DeclarationDetail::Property(PropertyDecl {
                    type_name,
                    attributes: property_attributes.clone(),
                    optional,
                }),
            });
        }
        if declarations.is_empty() {
            return None;
        }
        Some(Planned {
            start,
            end: semicolon,
            skip: None,
            declarations,
        })
    }

    /// Remove attribute macros (with their argument lists) from the end of `code`.
    fn strip_trailing_attributes(&self, code: &mut Vec<usize>) -> Vec<SmolStr> {
        let mut stripped = Vec::new();
        while let Some(&last) = code.last() {
            let leaf = self.leaves[last];
            if leaf.is_ident() && is_attribute_macro(leaf.text) {
                stripped.insert(0, SmolStr::new(leaf.text));
                code.pop();
                continue;
            }
            if leaf.is_punct(')') {
                if let Some(open) = self.matching_open(code) {
                    if open >= 1 {
                        let head = code[open - 1];
                        let name = self.leaves[head];
                        if name.is_ident() && is_attribute_macro(name.text) {
                            stripped.insert(0, SmolStr::new(self.render(head, last)));
                            code.truncate(open - 1);
                            continue;
                        }
                    }
                }
            }
            break;
        }
        stripped
    }

    /// Position in `code` of the `(` matching its final `)`.
    fn matching_open(&self, code: &[usize]) -> Option<usize> {
        let mut depth = 0usize;
        for (pos, &i) in code.iter().enumerate().rev() {
            let leaf = &self.leaves[i];
            if leaf.is_punct(')') {
                depth += 1;
            } else if leaf.is_punct('(') {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(pos);
                }
            }
        }
        None
    }

    /// Split leaf indices at commas outside of brackets.
    fn split_declarators(&self, code: &[usize]) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new()];
        let mut depth = 0usize;
        for &i in code {
            let leaf = &self.leaves[i];
            if leaf.kind == LeafKind::Punct {
                match leaf.text {
                    "(" | "[" | "{" | "<" => depth += 1,
                    ")" | "]" | "}" | ">" => depth = depth.saturating_sub(1),
                    "," if depth == 0 => {
                        groups.push(Vec::new());
                        continue;
                    }
                    _ => {}
                }
            }
            if let Some(group) = groups.last_mut() {
                group.push(i);
            }
        }
        groups.retain(|g| !g.is_empty());
        groups
    }

    /// Comma-separated groups of the leaf range `from..to`.
    fn split_top_level(&self, from: usize, to: usize) -> Vec<Vec<usize>> {
        let code: Vec<usize> = (from..to)
            .filter(|&i| !self.leaves[i].is_comment())
            .collect();
        self.split_declarators(&code)
    }

    /// Name leaf of a declarator: the identifier inside `(^name)` or `(*name)`
    /// for block and function pointer types, the last identifier otherwise.
    fn declarator_name(&self, declarator: &[usize]) -> Option<usize> {
        for window in declarator.windows(4) {
            let [open, star, name, close] = [window[0], window[1], window[2], window[3]];
            if self.leaves[open].is_punct('(')
                && (self.leaves[star].is_punct('^') || self.leaves[star].is_punct('*'))
                && self.leaves[name].is_ident()
                && self.leaves[close].is_punct(')')
            {
                return Some(name);
            }
        }
        declarator
            .iter()
            .rev()
            .copied()
            .find(|&i| self.leaves[i].is_ident())
    }
}
