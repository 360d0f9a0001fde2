pub mod builder;
pub mod pipeline;

pub use builder::SymbolTableBuilder;
pub use pipeline::{IngestPipeline, process_unit};
