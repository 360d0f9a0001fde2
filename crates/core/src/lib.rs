pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod markup;
pub mod model;
pub mod resolver;

pub use config::DocConfig;
pub use engine::{DocEngine, GenerationOutput, GenerationStats};
pub use error::{DocscopeError, Result};
pub use model::{RelationGraph, SymbolTable};
