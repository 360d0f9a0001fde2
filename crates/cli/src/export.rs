use crate::view::render_diagnostic;
use docscope_core::DocConfig;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(
    config: DocConfig,
    paths: &[PathBuf],
    output: Option<&Path>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let generated = crate::generate(config, paths)?;
    for diagnostic in &generated.diagnostics {
        eprintln!("{}", render_diagnostic(diagnostic));
    }

    let json = if pretty {
        serde_json::to_string_pretty(&generated.table)?
    } else {
        serde_json::to_string(&generated.table)?
    };
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Exported {} entities to {}", generated.table.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
