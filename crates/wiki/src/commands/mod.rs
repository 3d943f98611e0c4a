//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod tree;

pub(crate) use render::RenderArgs;
pub(crate) use tree::TreeArgs;

use std::io::Read;
use std::path::Path;

use wiki_config::Config;
use wiki_renderer::shortcode::{Blueprint, Hint, ShortcodeRegistry, VersionGate};
use wiki_renderer::{EmbedRewriter, Pipeline, PipelineConfig};

use crate::error::CliError;

/// Build the render pipeline described by `config`.
pub(crate) fn build_pipeline(config: &Config) -> Result<Pipeline, CliError> {
    let shortcodes = &config.shortcodes;
    let mut builder = shortcodes
        .hints
        .iter()
        .fold(ShortcodeRegistry::builder(), |builder, kind| {
            builder.with_block(Hint::new(kind.as_str()))
        })
        .with_inline(Blueprint::new(shortcodes.blueprint_base_url.as_str()));
    if shortcodes.version_gate {
        builder = builder.with_block(VersionGate);
    }
    let registry = builder.build()?;

    let embeds = if config.embeds.video {
        EmbedRewriter::default()
    } else {
        EmbedRewriter::new()
    };

    let pipeline_config = PipelineConfig {
        gfm: config.render.gfm,
        math: config.render.math,
        heading_ids: config.render.heading_ids,
        extract_title: config.render.extract_title,
        max_nesting: config.render.max_nesting,
    };
    tracing::info!(
        shortcodes = registry.len(),
        video = config.embeds.video,
        config = ?config.config_path,
        "Pipeline configured"
    );
    Ok(Pipeline::new(pipeline_config, registry, embeds))
}

/// Read markdown from `path`, or from stdin when `path` is `None` or `-`.
pub(crate) fn read_source(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}
