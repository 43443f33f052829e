use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use villa_core::seed::Catalog;
use villa_tools::{check_catalog, export_catalog, logger, schema_json, schema_summary, Result};

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug, Clone)]
#[clap(author, version = APP_VERSION, about, long_about = None)]
struct AppArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Print the JSON Schema of the seed catalog
    Schema {
        /// One line per record instead of the full schema
        #[arg(long)]
        summary: bool,
    },
    /// Write the seed catalog as JSON
    Export {
        /// Output file, stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Parse a catalog JSON file and report its contents
    Check { path: PathBuf },
}

fn run(args: AppArgs) -> Result<()> {
    match args.command {
        Command::Schema { summary } => {
            if summary {
                print!("{}", schema_summary());
            } else {
                println!("{}", schema_json()?);
            }
        }
        Command::Export { output } => {
            let json = export_catalog(&Catalog::seed())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!("Catalog written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Command::Check { path } => {
            let json = std::fs::read_to_string(&path)?;
            println!("{}: {}", path.display(), check_catalog(&json)?);
        }
    }
    Ok(())
}

fn main() {
    logger::setup_stderr("villa_tools", "info");

    let args = AppArgs::parse();
    info!("Received args: {:?}", args);
    if let Err(err) = run(args) {
        eprintln!("villa-tools: {err}");
        std::process::exit(1);
    }
}
