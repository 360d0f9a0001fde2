//! Canonical entity names and the grammar of reference tokens.
//!
//! | Kind      | Canonical name          |
//! |-----------|-------------------------|
//! | class     | `Foo`                   |
//! | category  | `Foo(Bar)`              |
//! | extension | `Foo()`                 |
//! | protocol  | `Foo`                   |
//! | method    | `-[Foo doThing:with:]`  |
//! | property  | `Foo.name`              |
//! | argument  | `-[Foo doThing:with:]#0` |

use super::kind::MethodScope;

pub fn category_name(class: &str, category: Option<&str>) -> String {
    format!("{}({})", class, category.unwrap_or(""))
}

pub fn method_name(scope: MethodScope, owner: &str, selector: &str) -> String {
    format!("{}[{} {}]", scope.prefix(), owner, selector)
}

pub fn property_name(owner: &str, property: &str) -> String {
    format!("{owner}.{property}")
}

pub fn argument_name(method: &str, position: usize) -> String {
    format!("{method}#{position}")
}

/// Shape of a reference token after delimiters were removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefShape {
    /// `Foo`: a class or protocol.
    Symbol(String),
    /// `Foo(Bar)` or `Foo()`.
    Category {
        class: String,
        category: Option<String>,
    },
    /// `Foo bar:`, `-[Foo bar:]`, `+[Foo(Cat) make]`.
    Member {
        scope: Option<MethodScope>,
        owner: String,
        member: String,
    },
    /// `bar:` or `bar:baz:`: a selector of the documenting entity's container.
    Selector(String),
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_selector(s: &str) -> bool {
    if is_identifier(s) {
        return true;
    }
    s.ends_with(':')
        && s.split(':')
            .filter(|p| !p.is_empty())
            .all(is_identifier)
        && s.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

fn parse_owner(owner: &str) -> Option<String> {
    if is_identifier(owner) {
        return Some(owner.to_string());
    }
    let (class, rest) = owner.split_once('(')?;
    let category = rest.strip_suffix(')')?;
    if is_identifier(class) && (category.is_empty() || is_identifier(category)) {
        Some(owner.to_string())
    } else {
        None
    }
}

/// Parse a normalized reference token. Returns `None` for text that is not
/// symbol-like at all.
pub fn parse_ref_token(token: &str) -> Option<RefShape> {
    let token = token.trim();
    let (scope, body) = match token.chars().next() {
        Some(c @ ('+' | '-')) => (MethodScope::from_prefix(c), &token[1..]),
        _ => (None, token),
    };
    let body = body
        .strip_prefix('[')
        .and_then(|b| b.strip_suffix(']'))
        .unwrap_or(body)
        .trim();

    if let Some((owner, member)) = body.split_once(char::is_whitespace) {
        let member = member.trim();
        let owner = parse_owner(owner.trim())?;
        if !is_selector(member) {
            return None;
        }
        return Some(RefShape::Member {
            scope,
            owner,
            member: member.to_string(),
        });
    }

    if scope.is_some() {
        return None;
    }

    if body.contains('(') {
        let (class, rest) = body.split_once('(')?;
        let category = rest.strip_suffix(')')?;
        if !is_identifier(class) || !(category.is_empty() || is_identifier(category)) {
            return None;
        }
        return Some(RefShape::Category {
            class: class.to_string(),
            category: (!category.is_empty()).then(|| category.to_string()),
        });
    }

    if body.ends_with(':') && is_selector(body) {
        return Some(RefShape::Selector(body.to_string()));
    }
    if is_identifier(body) {
        return Some(RefShape::Symbol(body.to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        let owner = category_name("Foo", Some("Bar"));
        assert_eq!(owner, "Foo(Bar)");
        assert_eq!(category_name("Foo", None), "Foo()");
        let method = method_name(MethodScope::Instance, &owner, "doThing:with:");
        assert_eq!(method, "-[Foo(Bar) doThing:with:]");
        assert_eq!(argument_name(&method, 1), "-[Foo(Bar) doThing:with:]#1");
        assert_eq!(property_name("Foo", "title"), "Foo.title");
    }

    #[test]
    fn test_parse_ref_token_shapes() {
        assert_eq!(parse_ref_token("Foo"), Some(RefShape::Symbol("Foo".into())));
        assert_eq!(
            parse_ref_token("Foo(Bar)"),
            Some(RefShape::Category {
                class: "Foo".into(),
                category: Some("Bar".into())
            })
        );
        assert_eq!(
            parse_ref_token("Foo()"),
            Some(RefShape::Category {
                class: "Foo".into(),
                category: None
            })
        );
        assert_eq!(
            parse_ref_token("-[Foo doThing:with:]"),
            Some(RefShape::Member {
                scope: Some(MethodScope::Instance),
                owner: "Foo".into(),
                member: "doThing:with:".into()
            })
        );
        assert_eq!(
            parse_ref_token("Foo count"),
            Some(RefShape::Member {
                scope: None,
                owner: "Foo".into(),
                member: "count".into()
            })
        );
        assert_eq!(
            parse_ref_token("doThing:"),
            Some(RefShape::Selector("doThing:".into()))
        );
    }

    #[test]
    fn test_parse_ref_token_rejects_prose() {
        assert_eq!(parse_ref_token("see the docs"), None);
        assert_eq!(parse_ref_token("1 + 2"), None);
        assert_eq!(parse_ref_token("-Foo"), None);
        assert_eq!(parse_ref_token(""), None);
    }
}
