use crate::error::{ObjcError, Result};
use crate::queries::objc_definitions::{DefinitionIndices, OBJC_DEFINITIONS_SCM};
use crate::queries::load_query;
use std::sync::Arc;
use tree_sitter::{Parser, Query, Tree};

/// Objective-C grammar plus the compiled definition query.
pub struct ObjcParser {
    pub language: tree_sitter::Language,
    pub(crate) definition_query: Arc<Query>,
    pub(crate) indices: DefinitionIndices,
}

impl Clone for ObjcParser {
    fn clone(&self) -> Self {
        Self {
            language: self.language.clone(),
            definition_query: Arc::clone(&self.definition_query),
            indices: self.indices.clone(),
        }
    }
}

impl std::fmt::Debug for ObjcParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjcParser")
            .field("captures", &self.definition_query.capture_names().len())
            .finish()
    }
}

impl ObjcParser {
    pub fn new() -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_objc::LANGUAGE.into();
        Parser::new()
            .set_language(&language)
            .map_err(|e| ObjcError::Language(e.to_string()))?;

        let definition_query = load_query(&language, OBJC_DEFINITIONS_SCM)?;
        let indices = DefinitionIndices::new(&definition_query)?;

        Ok(Self {
            language,
            definition_query: Arc::new(definition_query),
            indices,
        })
    }

    /// Parsers are not shareable across threads, so each call builds its own.
    pub fn parse(&self, source: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ObjcError::Language(e.to_string()))?;
        parser.parse(source, None).ok_or(ObjcError::NoTree)
    }
}
