mod export;
mod hierarchy;
mod scan;
mod view;

use clap::{Parser, Subcommand};
use docscope_core::{DocConfig, GenerationOutput};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "docscope",
    version,
    about = "Documentation model generator for Objective-C sources",
    long_about = "Docscope scans Objective-C headers and implementation files, attaches documentation \
                  comments to the declarations they describe, and builds a cross-referenced symbol \
                  model that renderers can consume as JSON."
)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, short, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Mirror log output to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the symbol model and print a summary with every diagnostic
    Scan {
        /// Files or directories to scan
        #[arg(value_name = "PATHS", required = true)]
        paths: Vec<PathBuf>,
    },
    /// Build the symbol model and write it as JSON
    #[command(
        long_about = "Builds the symbol model and writes the resolved table, including all \
                            relationships, as JSON. Writes to stdout when no output file is given."
    )]
    Export {
        /// Files or directories to scan
        #[arg(value_name = "PATHS", required = true)]
        paths: Vec<PathBuf>,
        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the class hierarchy of the scanned sources
    Hierarchy {
        /// Files or directories to scan
        #[arg(value_name = "PATHS", required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print the JSON schema of the exported symbol table
    Schema,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = docscope_runtime::init_logging("cli", cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Scan { paths } => scan::run(config, &paths),
        Commands::Export {
            paths,
            output,
            pretty,
        } => export::run(config, &paths, output.as_deref(), pretty),
        Commands::Hierarchy { paths } => hierarchy::run(config, &paths),
        Commands::Schema => {
            let schema = docscope_core::SymbolTable::json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DocConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Ok(DocConfig::from_json_file(path)?)
        }
        None => Ok(DocConfig::default()),
    }
}

/// Discover, read and generate in one go.
pub(crate) fn generate(
    config: DocConfig,
    paths: &[PathBuf],
) -> Result<GenerationOutput, Box<dyn std::error::Error>> {
    let engine = docscope_runtime::build_default_engine(config)?;
    let files = docscope_runtime::discover_sources(&engine, paths);
    info!("Generating documentation model from {} files", files.len());
    let inputs = docscope_runtime::read_sources(&files)?;
    Ok(engine.generate_bytes(inputs)?)
}
