use super::location::SourceLocation;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MalformedDeclaration,
    UnterminatedConstruct,
    AmbiguousAssociation,
    OrphanComment,
    MergeConflict,
    UnknownParameter,
    UnresolvedReference,
    AmbiguousReference,
    UnresolvedRelation,
    DuplicateSource,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MalformedDeclaration => "malformed-declaration",
            DiagnosticKind::UnterminatedConstruct => "unterminated-construct",
            DiagnosticKind::AmbiguousAssociation => "ambiguous-association",
            DiagnosticKind::OrphanComment => "orphan-comment",
            DiagnosticKind::MergeConflict => "merge-conflict",
            DiagnosticKind::UnknownParameter => "unknown-parameter",
            DiagnosticKind::UnresolvedReference => "unresolved-reference",
            DiagnosticKind::AmbiguousReference => "ambiguous-reference",
            DiagnosticKind::UnresolvedRelation => "unresolved-relation",
            DiagnosticKind::DuplicateSource => "duplicate-source",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal anomaly found while scanning, associating, building or resolving.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub location: Option<SourceLocation>,
    pub message: String,
    /// Entity name or literal token the diagnostic is about.
    pub subject: Option<String>,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            location: None,
            message: message.into(),
            subject: None,
        }
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(kind, message)
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn about(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Key used to give diagnostic lists a stable order.
    pub fn sort_key(&self) -> (Option<&SourceLocation>, DiagnosticKind, &str, Option<&str>) {
        (
            self.location.as_ref(),
            self.kind,
            self.message.as_str(),
            self.subject.as_deref(),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.location {
            Some(loc) => write!(f, "{loc}: {severity}[{}]: {}", self.kind, self.message),
            None => write!(f, "{severity}[{}]: {}", self.kind, self.message),
        }
    }
}

/// Sort diagnostics into their stable reporting order.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}
