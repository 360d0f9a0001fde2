use crate::view::{KindCountView, render_diagnostic};
use docscope_core::DocConfig;
use nu_ansi_term::Color;
use std::path::PathBuf;
use tabled::{Table, settings::Style};

pub fn run(config: DocConfig, paths: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let output = crate::generate(config, paths)?;

    println!("{}", Table::new(KindCountView::rows(&output.table)).with(Style::psql()));
    println!(
        "\n{} units, {} entities, {} relationships",
        output.stats.units,
        output.stats.entities,
        output.table.relationships().len()
    );
    println!(
        "references: {} resolved, {} unresolved, {} ambiguous",
        output.stats.resolve.resolved,
        output.stats.resolve.unresolved,
        output.stats.resolve.ambiguous
    );

    if !output.diagnostics.is_empty() {
        println!();
        for diagnostic in &output.diagnostics {
            println!("{}", render_diagnostic(diagnostic));
        }
    }
    let summary = format!("{} diagnostics", output.diagnostics.len());
    if output.has_errors() {
        println!("\n{}", Color::Red.paint(summary));
    } else {
        println!("\n{}", Color::Green.paint(summary));
    }
    Ok(())
}
