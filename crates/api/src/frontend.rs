use crate::models::{AssociationOutput, Language, ScanOutput, SourceUnit};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Rules for attaching comments to declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationConfig {
    /// Blank lines tolerated between a comment and the declaration it documents.
    pub max_blank_lines: usize,
    /// Report same-line comments that could also lead the next declaration.
    pub report_ambiguities: bool,
    /// Report documentation comments that end up attached to nothing.
    pub report_orphans: bool,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            max_blank_lines: 1,
            report_ambiguities: false,
            report_orphans: false,
        }
    }
}

/// Language-specific front half of the pipeline: scanning and comment association.
///
/// Both operations work on a single source unit and never fail; anything
/// odd becomes a diagnostic in the output.
pub trait LanguageFrontend: Send + Sync {
    fn language(&self) -> Language;

    fn supported_extensions(&self) -> &[&str];

    /// Split raw text into declarations and documentation comments.
    fn scan(&self, file: Arc<str>, text: &str) -> ScanOutput;

    /// Attach comment blocks to the declarations they document.
    fn associate(&self, unit: SourceUnit, config: &AssociationConfig) -> AssociationOutput;

    fn supports_file(&self, file: &str) -> bool {
        match file.rsplit_once('.') {
            Some((_, ext)) => self
                .supported_extensions()
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}
