//! `wiki tree` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use wiki_config::Config;

use super::{build_pipeline, read_source};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Markdown file to parse (default: stdin).
    file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover wiki.toml).
    #[arg(short, long, env = "WIKI_CONFIG")]
    config: Option<PathBuf>,
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// Prints the tree after the embed and shortcode passes, before heading
    /// ids are assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading or parsing fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let pipeline = build_pipeline(&config)?;

        let source = read_source(self.file.as_deref())?;
        let transformed = pipeline.transform(&source)?;
        output.warnings(&transformed.warnings);

        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &transformed.root)?;
        writeln!(stdout)?;
        Ok(())
    }
}
