//! CLI error types.

use wiki_config::ConfigError;
use wiki_renderer::RenderError;
use wiki_renderer::shortcode::RegistryError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid shortcode configuration: {0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
