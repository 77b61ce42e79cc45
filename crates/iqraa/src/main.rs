//! iqraa CLI - content engine.
//!
//! Provides commands for:
//! - `render`: Run a page initialization over a static HTML file
//! - `markers`: List the marker catalog

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{MarkersArgs, RenderArgs};
use output::Output;

/// iqraa - marker-driven content rewriting for article pages.
#[derive(Parser)]
#[command(name = "iqraa", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite markers and activate media in an HTML page.
    Render(RenderArgs),
    /// List recognized markers by family.
    Markers(MarkersArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Markers(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
