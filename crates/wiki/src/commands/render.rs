//! `wiki render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use wiki_config::{CliSettings, Config};

use super::{build_pipeline, read_source};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover wiki.toml).
    #[arg(short, long, env = "WIKI_CONFIG")]
    config: Option<PathBuf>,

    /// Extract title from first H1 heading and report it on stderr.
    #[arg(long)]
    title: bool,

    /// Leave video links as plain links.
    #[arg(long)]
    no_embeds: bool,

    /// Disable GitHub Flavored Markdown extensions.
    #[arg(long)]
    no_gfm: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading or rendering fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            extract_title: self.title.then_some(true),
            video_embeds: self.no_embeds.then_some(false),
            gfm: self.no_gfm.then_some(false),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let pipeline = build_pipeline(&config)?;

        let source = read_source(self.file.as_deref())?;
        let result = pipeline.render(&source)?;

        output.warnings(&result.warnings);
        if let Some(title) = &result.title {
            output.highlight(&format!("Title: {title}"));
        }

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", result.html)?;
        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Parser)]
    struct Command {
        #[command(flatten)]
        args: RenderArgs,
    }

    #[test]
    fn test_config_path_from_env() {
        // SAFETY: no other test reads or writes WIKI_CONFIG
        unsafe {
            std::env::set_var("WIKI_CONFIG", "/srv/wiki/wiki.toml");
        }
        let from_env = Command::try_parse_from(["render", "page.md"]).unwrap();
        let from_flag =
            Command::try_parse_from(["render", "--config", "local.toml", "page.md"]).unwrap();
        unsafe {
            std::env::remove_var("WIKI_CONFIG");
        }

        assert_eq!(
            from_env.args.config,
            Some(PathBuf::from("/srv/wiki/wiki.toml"))
        );
        assert_eq!(from_env.args.file, Some(PathBuf::from("page.md")));
        assert_eq!(from_flag.args.config, Some(PathBuf::from("local.toml")));
    }
}
