use super::entity::EntityId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which part of a comment a cross-reference was found in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
#[serde(tag = "section", content = "name", rename_all = "snake_case")]
pub enum DocSection {
    Abstract,
    Discussion,
    Parameter(String),
    Returns,
    SeeAlso,
    Deprecated,
    Availability,
    Note,
    Exception(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RefStyle {
    /// `[Foo]`, `[Foo bar:]`, `-[Foo bar]`
    Bracketed,
    /// `` `Foo` ``
    Backtick,
    /// `Foo(Bar)` written directly in prose.
    Inline,
    /// Operand of a see-also marker.
    SeeAlso,
}

/// A symbol mention inside a comment, resolved after every file is built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct CrossRef {
    /// Text exactly as written, delimiters included.
    pub literal: String,
    /// Normalized symbol text used for lookup (`Foo`, `Foo(Bar)`, `-[Foo bar:]`, `bar:`).
    pub token: String,
    pub section: DocSection,
    pub style: RefStyle,
    pub target: Option<EntityId>,
}

impl CrossRef {
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

/// A run of documentation prose plus the references found in it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct DocText {
    pub text: String,
    pub refs: Vec<CrossRef>,
}

impl DocText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            refs: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct ParamDoc {
    pub name: String,
    pub description: DocText,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Warning,
    Bug,
    Note,
    Important,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Note {
    pub kind: NoteKind,
    pub text: DocText,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct ExceptionDoc {
    pub name: String,
    pub description: DocText,
}

/// Structured documentation of one entity.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct Documentation {
    #[serde(rename = "abstract")]
    pub abstract_text: Option<DocText>,
    pub discussion: Option<DocText>,
    pub params: Vec<ParamDoc>,
    pub returns: Option<DocText>,
    pub see_also: Vec<CrossRef>,
    pub deprecated: Option<DocText>,
    pub availability: Option<DocText>,
    pub notes: Vec<Note>,
    pub exceptions: Vec<ExceptionDoc>,
}

fn fill(slot: &mut Option<DocText>, other: &Option<DocText>) {
    let missing = slot.as_ref().is_none_or(DocText::is_empty);
    if missing {
        if let Some(text) = other.as_ref().filter(|t| !t.is_empty()) {
            *slot = Some(text.clone());
        }
    }
}

impl Documentation {
    pub fn is_empty(&self) -> bool {
        self.abstract_text.as_ref().is_none_or(DocText::is_empty)
            && self.discussion.as_ref().is_none_or(DocText::is_empty)
            && self.params.is_empty()
            && self.returns.as_ref().is_none_or(DocText::is_empty)
            && self.see_also.is_empty()
            && self.deprecated.is_none()
            && self.availability.as_ref().is_none_or(DocText::is_empty)
            && self.notes.is_empty()
            && self.exceptions.is_empty()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.is_some()
    }

    pub fn abstract_str(&self) -> Option<&str> {
        self.abstract_text.as_ref().map(|t| t.text.as_str())
    }

    pub fn discussion_str(&self) -> Option<&str> {
        self.discussion.as_ref().map(|t| t.text.as_str())
    }

    pub fn param(&self, name: &str) -> Option<&ParamDoc> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Merge another sighting's documentation into this one.
    ///
    /// Each section keeps the first non-empty value; later sightings only
    /// fill sections that are still empty. Parameters and exceptions are
    /// filled per name, see-also entries per token.
    pub fn fill_gaps_from(&mut self, other: &Documentation) {
        fill(&mut self.abstract_text, &other.abstract_text);
        fill(&mut self.discussion, &other.discussion);
        fill(&mut self.returns, &other.returns);
        fill(&mut self.availability, &other.availability);
        if self.deprecated.is_none() {
            self.deprecated = other.deprecated.clone();
        }

        for param in &other.params {
            if self.param(&param.name).is_none() {
                self.params.push(param.clone());
            }
        }
        for exception in &other.exceptions {
            if !self.exceptions.iter().any(|e| e.name == exception.name) {
                self.exceptions.push(exception.clone());
            }
        }
        for see in &other.see_also {
            if !self.see_also.iter().any(|s| s.token == see.token) {
                self.see_also.push(see.clone());
            }
        }
        if self.notes.is_empty() {
            self.notes = other.notes.clone();
        }
    }

    /// Every cross-reference, in section order.
    pub fn cross_refs(&self) -> Vec<&CrossRef> {
        let mut refs = Vec::new();
        let texts = self
            .abstract_text
            .iter()
            .chain(self.discussion.iter())
            .chain(self.params.iter().map(|p| &p.description))
            .chain(self.returns.iter())
            .chain(self.deprecated.iter())
            .chain(self.availability.iter())
            .chain(self.notes.iter().map(|n| &n.text))
            .chain(self.exceptions.iter().map(|e| &e.description));
        for text in texts {
            refs.extend(text.refs.iter());
        }
        refs.extend(self.see_also.iter());
        refs
    }

    /// Mutable access to every cross-reference, in the same order as [`Self::cross_refs`].
    pub fn cross_refs_mut(&mut self) -> Vec<&mut CrossRef> {
        let mut refs = Vec::new();
        let texts = self
            .abstract_text
            .iter_mut()
            .chain(self.discussion.iter_mut())
            .chain(self.params.iter_mut().map(|p| &mut p.description))
            .chain(self.returns.iter_mut())
            .chain(self.deprecated.iter_mut())
            .chain(self.availability.iter_mut())
            .chain(self.notes.iter_mut().map(|n| &mut n.text))
            .chain(self.exceptions.iter_mut().map(|e| &mut e.description));
        for text in texts {
            refs.extend(text.refs.iter_mut());
        }
        refs.extend(self.see_also.iter_mut());
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(abstract_text: &str) -> Documentation {
        Documentation {
            abstract_text: Some(DocText::new(abstract_text)),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_non_empty_section_wins() {
        let mut first = doc("First.");
        let mut second = doc("Second.");
        second.discussion = Some(DocText::new("Only here."));

        first.fill_gaps_from(&second);

        assert_eq!(first.abstract_str(), Some("First."));
        assert_eq!(first.discussion_str(), Some("Only here."));
    }

    #[test]
    fn test_empty_abstract_is_filled() {
        let mut first = Documentation {
            abstract_text: Some(DocText::new("   ")),
            ..Default::default()
        };
        first.fill_gaps_from(&doc("Filled."));
        assert_eq!(first.abstract_str(), Some("Filled."));
    }

    #[test]
    fn test_params_fill_per_name() {
        let mut first = Documentation {
            params: vec![ParamDoc {
                name: "a".into(),
                description: DocText::new("from first"),
            }],
            ..Default::default()
        };
        let second = Documentation {
            params: vec![
                ParamDoc {
                    name: "a".into(),
                    description: DocText::new("from second"),
                },
                ParamDoc {
                    name: "b".into(),
                    description: DocText::new("b text"),
                },
            ],
            ..Default::default()
        };

        first.fill_gaps_from(&second);

        assert_eq!(first.params.len(), 2);
        assert_eq!(first.param("a").unwrap().description.text, "from first");
        assert_eq!(first.param("b").unwrap().description.text, "b text");
    }

    #[test]
    fn test_cross_refs_cover_all_sections() {
        let make_ref = |token: &str, section: DocSection| CrossRef {
            literal: format!("[{token}]"),
            token: token.to_string(),
            section,
            style: RefStyle::Bracketed,
            target: None,
        };
        let mut documentation = Documentation {
            abstract_text: Some(DocText {
                text: "Uses [Foo].".into(),
                refs: vec![make_ref("Foo", DocSection::Abstract)],
            }),
            see_also: vec![make_ref("Bar", DocSection::SeeAlso)],
            ..Default::default()
        };

        assert_eq!(documentation.cross_refs().len(), 2);
        for r in documentation.cross_refs_mut() {
            r.target = Some(EntityId(7));
        }
        assert!(documentation.cross_refs().iter().all(|r| r.is_resolved()));
    }
}
