pub mod graph;
pub mod table;

pub use graph::{HierarchyNode, RelationGraph};
pub use table::SymbolTable;
