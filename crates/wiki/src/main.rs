//! Wiki CLI - markdown renderer.
//!
//! Provides commands for:
//! - `render`: Render a wiki page to sanitized HTML
//! - `tree`: Print the document tree after embeds and shortcodes as JSON

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, TreeArgs};
use output::Output;

/// Wiki - markdown renderer with embeds and shortcodes.
#[derive(Parser)]
#[command(name = "wiki", version, about)]
struct Cli {
    /// Enable verbose output (log each pipeline stage).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file (or stdin) to HTML.
    Render(RenderArgs),
    /// Print the transformed document tree as JSON.
    Tree(TreeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Tree(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
