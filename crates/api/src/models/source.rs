use super::declaration::Declaration;
use super::diagnostic::Diagnostic;
use super::location::SourceLocation;
use crate::error::{ApiError, ApiResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One (file identifier, raw text) pair handed to the core.
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub file: Arc<str>,
    pub text: String,
}

impl SourceInput {
    pub fn new(file: impl Into<Arc<str>>, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            text: text.into(),
        }
    }

    /// Build an input from raw bytes, rejecting anything that is not UTF-8.
    pub fn from_bytes(file: impl Into<Arc<str>>, bytes: Vec<u8>) -> ApiResult<Self> {
        let file = file.into();
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Self { file, text }),
            Err(e) => Err(ApiError::InvalidEncoding {
                file: file.to_string(),
                reason: e.utf8_error().to_string(),
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
    /// `/** ... */` or `/*! ... */`
    Block,
    /// A run of `///` or `//!` lines
    Line,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommentPlacement {
    /// Starts a line; candidate to lead the next declaration.
    Leading,
    /// Code precedes it on the same line.
    SameLine,
    /// Written as `/**<` or `///<`.
    ExplicitTrailing,
}

/// A documentation comment with its delimiters stripped.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct CommentBlock {
    pub text: String,
    pub location: SourceLocation,
    pub blank_lines_before: usize,
    pub style: CommentStyle,
    pub placement: CommentPlacement,
}

impl CommentBlock {
    pub fn is_trailing(&self) -> bool {
        self.placement != CommentPlacement::Leading
    }
}

/// Position of one scanned element in source order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(tag = "item", rename_all = "lowercase")]
pub enum SourceItem {
    Declaration { index: usize },
    Comment { index: usize },
    /// Anything else; breaks comment adjacency.
    Code { line: usize },
}

/// Scanned form of one file. Immutable once the scanner hands it over.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct SourceUnit {
    #[serde(with = "crate::models::util::serde_arc_str")]
    #[schemars(with = "String")]
    pub file: Arc<str>,
    pub declarations: Vec<Declaration>,
    pub comments: Vec<CommentBlock>,
    pub items: Vec<SourceItem>,
}

impl SourceUnit {
    pub fn new(file: Arc<str>) -> Self {
        Self {
            file,
            declarations: Vec::new(),
            comments: Vec::new(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub unit: SourceUnit,
    pub diagnostics: Vec<Diagnostic>,
}

/// Comment text attached to a declaration by the associator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct AttachedComment {
    pub text: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct AssociatedDeclaration {
    pub declaration: Declaration,
    /// Leading comment blocks, concatenated in source order.
    pub comment: Option<AttachedComment>,
    /// Same-line comment after the declaration.
    pub trailing: Option<AttachedComment>,
    /// Same-line comments after individual arguments, keyed by argument index.
    pub argument_comments: Vec<(usize, AttachedComment)>,
}

impl AssociatedDeclaration {
    pub fn undocumented(declaration: Declaration) -> Self {
        Self {
            declaration,
            comment: None,
            trailing: None,
            argument_comments: Vec::new(),
        }
    }
}

/// Declarations of one unit in source order, with their comments.
#[derive(Debug, Clone)]
pub struct AssociationOutput {
    pub file: Arc<str>,
    pub declarations: Vec<AssociatedDeclaration>,
    pub diagnostics: Vec<Diagnostic>,
}
