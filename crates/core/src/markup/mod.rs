//! Comment markup parsing.
//!
//! A comment body is split into prose and marker sections. Markers start a
//! line and use either prefix (`@param`, `\param`); a section runs until the
//! next marker. Prose before the first marker yields the abstract (its first
//! paragraph) and the discussion (the rest). Markers that are not recognized
//! stay in the discussion verbatim.

pub mod refs;

use crate::config::ResolverConfig;
use docscope_api::models::{
    DocSection, DocText, Documentation, ExceptionDoc, Note, NoteKind, ParamDoc,
};
pub use refs::{extract_refs, see_also_ref, see_also_refs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Param,
    Returns,
    SeeAlso,
    Deprecated,
    Availability,
    Abstract,
    Discussion,
    Note(NoteKind),
    Exception,
}

fn marker_for(word: &str) -> Option<Marker> {
    let marker = match word.to_ascii_lowercase().as_str() {
        "param" | "parameter" | "arg" => Marker::Param,
        "return" | "returns" | "result" => Marker::Returns,
        "see" | "sa" | "seealso" => Marker::SeeAlso,
        "deprecated" => Marker::Deprecated,
        "since" | "available" | "availability" => Marker::Availability,
        "abstract" | "brief" => Marker::Abstract,
        "discussion" | "details" => Marker::Discussion,
        "warning" | "attention" => Marker::Note(NoteKind::Warning),
        "bug" => Marker::Note(NoteKind::Bug),
        "note" => Marker::Note(NoteKind::Note),
        "important" => Marker::Note(NoteKind::Important),
        "exception" | "throws" => Marker::Exception,
        _ => return None,
    };
    Some(marker)
}

/// `@word rest` or `\word rest` at the start of a (trimmed) line.
fn split_marker(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    let body = trimmed
        .strip_prefix('@')
        .or_else(|| trimmed.strip_prefix('\\'))?;
    let end = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(body.len());
    if end == 0 {
        return None;
    }
    Some((&body[..end], &body[end..]))
}

enum Block<'a> {
    Prose(Vec<&'a str>),
    Marked {
        marker: Marker,
        first: &'a str,
        rest: Vec<&'a str>,
    },
    /// An unrecognized marker and its continuation lines, kept as written.
    Verbatim(Vec<&'a str>),
}

fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = vec![Block::Prose(Vec::new())];
    let mut in_fence = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        } else if !in_fence {
            if let Some((word, rest)) = split_marker(line) {
                match marker_for(word) {
                    Some(marker) => {
                        blocks.push(Block::Marked {
                            marker,
                            first: rest,
                            rest: Vec::new(),
                        });
                        continue;
                    }
                    None if !matches!(blocks.last(), Some(Block::Prose(_))) => {
                        blocks.push(Block::Verbatim(vec![line]));
                        continue;
                    }
                    None => {}
                }
            }
        }
        match blocks.last_mut() {
            Some(Block::Prose(lines)) | Some(Block::Verbatim(lines)) => lines.push(line),
            Some(Block::Marked { rest, .. }) => rest.push(line),
            None => {}
        }
    }
    blocks
}

/// Split prose into paragraphs at blank lines outside fenced code.
fn paragraphs(lines: &[&str]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_fence = false;
    for &line in lines {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        if !in_fence && line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Marker text: first line plus continuation lines, outer blank lines dropped.
fn section_text(first: &str, rest: &[&str]) -> String {
    let mut lines: Vec<&str> = Vec::with_capacity(rest.len() + 1);
    lines.push(first.trim());
    let mut in_fence = false;
    for &line in rest {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            lines.push(line.trim());
        } else if in_fence {
            lines.push(line.trim_end());
        } else {
            lines.push(line.trim());
        }
    }
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// First whitespace-delimited word and the remainder.
fn split_name(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], &text[i..]),
        None => (text, ""),
    }
}

/// Parses comment bodies into [`Documentation`].
#[derive(Debug, Clone, Default)]
pub struct MarkupParser {
    resolver: ResolverConfig,
}

impl MarkupParser {
    pub fn new(resolver: &ResolverConfig) -> Self {
        Self {
            resolver: resolver.clone(),
        }
    }

    /// Wrap prose belonging to `section`, extracting its references.
    pub fn doc_text(&self, text: String, section: DocSection) -> DocText {
        let refs = extract_refs(&text, &section, &self.resolver);
        DocText { text, refs }
    }

    pub fn parse(&self, text: &str) -> Documentation {
        let mut doc = Documentation::default();
        let mut prose: Vec<String> = Vec::new();
        let mut explicit_abstract: Option<String> = None;
        let mut extra_discussion: Vec<String> = Vec::new();

        for block in split_blocks(text) {
            match block {
                Block::Prose(lines) => prose.extend(paragraphs(&lines)),
                Block::Verbatim(lines) => {
                    let text = section_text("", &lines);
                    if !text.is_empty() {
                        extra_discussion.push(text);
                    }
                }
                Block::Marked {
                    marker,
                    first,
                    rest,
                } => {
                    let body = section_text(first, &rest);
                    self.apply_marker(
                        &mut doc,
                        marker,
                        body,
                        &mut explicit_abstract,
                        &mut extra_discussion,
                    );
                }
            }
        }

        let mut prose = prose.into_iter();
        let abstract_text = match explicit_abstract {
            Some(text) => Some(text),
            None => prose.next(),
        };
        let mut discussion: Vec<String> = prose.collect();
        discussion.extend(extra_discussion);

        if let Some(text) = abstract_text.filter(|t| !t.trim().is_empty()) {
            doc.abstract_text = Some(self.doc_text(text, DocSection::Abstract));
        }
        if !discussion.is_empty() {
            doc.discussion = Some(self.doc_text(discussion.join("\n\n"), DocSection::Discussion));
        }
        doc
    }

    fn apply_marker(
        &self,
        doc: &mut Documentation,
        marker: Marker,
        body: String,
        explicit_abstract: &mut Option<String>,
        extra_discussion: &mut Vec<String>,
    ) {
        match marker {
            Marker::Param => {
                let (name, description) = split_name(&body);
                if name.is_empty() {
                    return;
                }
                let name = name.trim_end_matches(':').to_string();
                let description = description.trim().to_string();
                let section = DocSection::Parameter(name.clone());
                if doc.param(&name).is_none() {
                    doc.params.push(ParamDoc {
                        description: self.doc_text(description, section),
                        name,
                    });
                }
            }
            Marker::Exception => {
                let (name, description) = split_name(&body);
                if name.is_empty() {
                    return;
                }
                let name = name.to_string();
                let section = DocSection::Exception(name.clone());
                doc.exceptions.push(ExceptionDoc {
                    description: self.doc_text(description.trim().to_string(), section),
                    name,
                });
            }
            Marker::Returns => {
                if doc.returns.is_none() {
                    doc.returns = Some(self.doc_text(body, DocSection::Returns));
                }
            }
            Marker::SeeAlso => {
                for line in body.lines() {
                    doc.see_also.extend(see_also_refs(line));
                }
            }
            Marker::Deprecated => {
                if doc.deprecated.is_none() {
                    doc.deprecated = Some(self.doc_text(body, DocSection::Deprecated));
                }
            }
            Marker::Availability => {
                if doc.availability.is_none() {
                    doc.availability = Some(self.doc_text(body, DocSection::Availability));
                }
            }
            Marker::Abstract => {
                if explicit_abstract.is_none() && !body.is_empty() {
                    *explicit_abstract = Some(body);
                }
            }
            Marker::Discussion => {
                if !body.is_empty() {
                    extra_discussion.push(body);
                }
            }
            Marker::Note(kind) => {
                doc.notes.push(Note {
                    kind,
                    text: self.doc_text(body, DocSection::Note),
                });
            }
        }
    }
}
