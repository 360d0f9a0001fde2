use crate::view::render_hierarchy;
use docscope_core::{DocConfig, RelationGraph};
use std::path::PathBuf;

pub fn run(config: DocConfig, paths: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let output = crate::generate(config, paths)?;
    let graph = RelationGraph::from_table(&output.table);
    for line in render_hierarchy(&graph.class_hierarchy()) {
        println!("{line}");
    }
    Ok(())
}
