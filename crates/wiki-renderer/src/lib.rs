//! Wiki markdown renderer.
//!
//! Turns extended markdown into sanitized HTML through a fixed sequence of
//! tree passes over a [`wiki_tree::Node`] document:
//!
//! 1. parse (`pulldown-cmark`, with GFM, math and bare-URL autolinks)
//! 2. embed single-link paragraphs ([`EmbedRewriter`])
//! 3. expand `{{...}}` shortcodes ([`ShortcodeProcessor`])
//! 4. assign heading ids and collect the table of contents
//! 5. serialize to HTML
//! 6. sanitize ([`Sanitizer`], an `ammonia` allow-list)
//!
//! # Example
//!
//! ```
//! use wiki_renderer::{EmbedRewriter, Pipeline, PipelineConfig};
//! use wiki_renderer::shortcode::ShortcodeRegistry;
//!
//! let pipeline = Pipeline::new(
//!     PipelineConfig::default(),
//!     ShortcodeRegistry::builtin(),
//!     EmbedRewriter::default(),
//! );
//! let result = pipeline
//!     .render("## Intro\n\n{{note}}\n\nRead this first.\n\n{{/note}}")
//!     .unwrap();
//! assert_eq!(result.toc[0].id, "intro");
//! assert!(result.html.contains(r#"<div class="hint is-note">"#));
//! ```

mod autolink;
mod embed;
mod error;
mod headings;
mod html;
mod parse;
mod pipeline;
mod sanitize;
pub mod shortcode;
mod util;
pub mod version;

pub use embed::{EmbedProvider, EmbedRewriter};
pub use error::{PassError, RenderError, Stage};
pub use headings::{Outline, TocEntry};
pub use html::to_html;
pub use parse::{ParseOptions, parse};
pub use pipeline::{Pipeline, PipelineConfig, RenderResult, Transformed};
pub use sanitize::Sanitizer;
pub use util::{escape_html, slugify};
