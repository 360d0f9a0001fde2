//! Generation settings.

use crate::error::{DocscopeError, Result};
use docscope_api::AssociationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Literals that look like symbols in backticks but never name one.
pub const DEFAULT_IGNORED_TOKENS: &[&str] = &[
    "nil", "Nil", "NULL", "YES", "NO", "self", "super", "true", "false",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Report superclasses, adopted protocols and owning classes that are not
    /// part of the input (framework types such as `NSObject` included).
    pub report_unresolved_relations: bool,
    pub ignored_tokens: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            report_unresolved_relations: true,
            ignored_tokens: DEFAULT_IGNORED_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResolverConfig {
    pub fn is_ignored(&self, token: &str) -> bool {
        self.ignored_tokens.iter().any(|t| t == token)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocConfig {
    pub association: AssociationConfig,
    pub resolver: ResolverConfig,
    /// Worker threads for the per-file phase; the global rayon pool when unset.
    pub threads: Option<usize>,
}

impl DocConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DocConfig =
            serde_json::from_str(json).map_err(|e| DocscopeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(DocscopeError::Config("`threads` must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocConfig::default();
        assert_eq!(config.association.max_blank_lines, 1);
        assert!(!config.association.report_orphans);
        assert!(config.resolver.report_unresolved_relations);
        assert!(config.resolver.is_ignored("nil"));
        assert!(!config.resolver.is_ignored("Foo"));
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            DocConfig::from_json_str(r#"{"association": {"max_blank_lines": 3}, "threads": 2}"#)
                .unwrap();
        assert_eq!(config.association.max_blank_lines, 3);
        assert!(!config.association.report_ambiguities);
        assert_eq!(config.threads, Some(2));
        assert!(config.resolver.report_unresolved_relations);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(matches!(
            DocConfig::from_json_str(r#"{"threads": 0}"#),
            Err(DocscopeError::Config(_))
        ));
        assert!(matches!(
            DocConfig::from_json_str("not json"),
            Err(DocscopeError::Config(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docscope.json");
        std::fs::write(&path, r#"{"resolver": {"ignored_tokens": ["TODO"]}}"#).unwrap();
        let config = DocConfig::from_json_file(&path).unwrap();
        assert_eq!(config.resolver.ignored_tokens, vec!["TODO"]);
        assert!(config.resolver.report_unresolved_relations);
    }
}
