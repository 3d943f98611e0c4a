//! Configuration management for the wiki renderer.
//!
//! Parses `wiki.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [render]
//! gfm = true
//! math = true
//! extract_title = false
//! heading_ids = true
//! max_nesting = 128
//!
//! [shortcodes]
//! hints = ["tip", "note", "todo", "success", "warning", "danger"]
//! blueprint_base_url = "https://blueprintue.com/render"
//! version_gate = true
//!
//! [embeds]
//! video = true
//! ```
//!
//! `shortcodes.blueprint_base_url` supports `${VAR}` and `${VAR:-default}`
//! environment variable expansion.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "wiki.toml";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override GFM extensions flag.
    pub gfm: Option<bool>,
    /// Override math flag.
    pub math: Option<bool>,
    /// Override title extraction flag.
    pub extract_title: Option<bool>,
    /// Override video embed flag.
    pub video_embeds: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown rendering options.
    pub render: RenderConfig,
    /// Shortcode set.
    pub shortcodes: ShortcodesConfig,
    /// Link embedding.
    pub embeds: EmbedsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown rendering options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable GitHub Flavored Markdown extensions.
    pub gfm: bool,
    /// Enable `$...$` math.
    pub math: bool,
    /// Report the first H1 as the page title.
    pub extract_title: bool,
    /// Generate heading anchors.
    pub heading_ids: bool,
    /// Deepest container nesting accepted.
    pub max_nesting: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            math: true,
            extract_title: false,
            heading_ids: true,
            max_nesting: 128,
        }
    }
}

/// Shortcode configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ShortcodesConfig {
    /// Hint block kinds (`{{tip}}`, `{{warning}}`, ...).
    pub hints: Vec<String>,
    /// Base URL of the blueprint viewer.
    pub blueprint_base_url: String,
    /// Register the `{{version}}` block.
    pub version_gate: bool,
}

impl Default for ShortcodesConfig {
    fn default() -> Self {
        Self {
            hints: ["tip", "note", "todo", "success", "warning", "danger"]
                .map(str::to_owned)
                .to_vec(),
            blueprint_base_url: "https://blueprintue.com/render".to_owned(),
            version_gate: true,
        }
    }
}

/// Link embedding configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EmbedsConfig {
    /// Turn standalone video links into players.
    pub video: bool,
}

impl Default for EmbedsConfig {
    fn default() -> Self {
        Self { video: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`shortcodes.blueprint_base_url`").
        field: String,
        /// Error message (e.g., "${`BLUEPRINT_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wiki.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Search for `wiki.toml` in `start` and its parents.
    #[must_use]
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Parse configuration from TOML text and validate it.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, variable expansion or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(gfm) = settings.gfm {
            self.render.gfm = gfm;
        }
        if let Some(math) = settings.math {
            self.render.math = math;
        }
        if let Some(extract_title) = settings.extract_title {
            self.render.extract_title = extract_title;
        }
        if let Some(video) = settings.video_embeds {
            self.embeds.video = video;
        }
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_shortcodes()?;
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        if self.render.max_nesting == 0 {
            return Err(ConfigError::Validation(
                "render.max_nesting must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_shortcodes(&self) -> Result<(), ConfigError> {
        let shortcodes = &self.shortcodes;
        for (i, hint) in shortcodes.hints.iter().enumerate() {
            require_non_empty(hint, "shortcodes.hints")?;
            if shortcodes.hints[..i].contains(hint) {
                return Err(ConfigError::Validation(format!(
                    "shortcodes.hints lists {hint:?} more than once"
                )));
            }
        }
        require_non_empty(&shortcodes.blueprint_base_url, "shortcodes.blueprint_base_url")?;
        require_http_url(&shortcodes.blueprint_base_url, "shortcodes.blueprint_base_url")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.shortcodes.blueprint_base_url = expand::expand_env(
            &self.shortcodes.blueprint_base_url,
            "shortcodes.blueprint_base_url",
        )?;
        Ok(())
    }
}
