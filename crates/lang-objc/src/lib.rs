//! Objective-C front end: tree-sitter parsing, declaration scanner and comment associator.

pub mod associator;
pub mod comment;
pub mod error;
pub mod parser;
pub mod queries;
pub mod scanner;
pub mod syntax;

pub use error::{ObjcError, Result};
pub use parser::ObjcParser;

use docscope_api::models::{AssociationOutput, Language, ScanOutput, SourceUnit};
use docscope_api::{AssociationConfig, LanguageFrontend};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ObjcFrontend {
    parser: ObjcParser,
}

impl ObjcFrontend {
    /// Loads the grammar and compiles the definition query.
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: ObjcParser::new()?,
        })
    }
}

impl LanguageFrontend for ObjcFrontend {
    fn language(&self) -> Language {
        Language::OBJC
    }

    fn supported_extensions(&self) -> &[&str] {
        &["h", "m", "mm"]
    }

    fn scan(&self, file: Arc<str>, text: &str) -> ScanOutput {
        scanner::scan(&self.parser, file, text)
    }

    fn associate(&self, unit: SourceUnit, config: &AssociationConfig) -> AssociationOutput {
        associator::associate(unit, config)
    }
}
