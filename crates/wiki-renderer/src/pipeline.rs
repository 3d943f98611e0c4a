//! Render pipeline.
//!
//! parse → embeds → shortcodes → heading ids → HTML → sanitize.

use wiki_tree::Node;

use crate::embed::EmbedRewriter;
use crate::error::{RenderError, Stage};
use crate::headings::{HeadingPass, TocEntry};
use crate::html::to_html;
use crate::parse::{ParseOptions, parse};
use crate::sanitize::Sanitizer;
use crate::shortcode::{ShortcodeProcessor, ShortcodeRegistry};

/// Pipeline options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Enable GitHub Flavored Markdown (tables, strikethrough, task lists, alerts).
    pub gfm: bool,
    /// Enable `$inline$` and `$$display$$` math.
    pub math: bool,
    /// Generate `id` attributes for headings.
    pub heading_ids: bool,
    /// Take the first H1 out of the table of contents and report it as the title.
    pub extract_title: bool,
    /// Deepest container nesting accepted by the parser.
    pub max_nesting: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            math: true,
            heading_ids: true,
            extract_title: false,
            max_nesting: 128,
        }
    }
}

impl PipelineConfig {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            gfm: self.gfm,
            math: self.math,
            max_nesting: self.max_nesting,
        }
    }
}

/// Result of rendering a document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Sanitized HTML.
    pub html: String,
    /// Title extracted from the first H1 (if `extract_title` is enabled).
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Warnings produced while expanding shortcodes.
    pub warnings: Vec<String>,
}

/// Document tree after the embed and shortcode passes.
#[derive(Clone, Debug)]
pub struct Transformed {
    /// Transformed tree.
    pub root: Node,
    /// Warnings produced while expanding shortcodes.
    pub warnings: Vec<String>,
}

/// Markdown to sanitized HTML renderer.
///
/// Built once and shared; rendering takes `&self` and keeps all per-document
/// state local to the call.
///
/// # Example
///
/// ```
/// use wiki_renderer::Pipeline;
///
/// let pipeline = Pipeline::default();
/// let result = pipeline.render("{{tip}}\n\nSave often.\n\n{{/tip}}").unwrap();
/// assert_eq!(result.html, r#"<div class="hint is-tip"><p>Save often.</p></div>"#);
/// ```
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    registry: ShortcodeRegistry,
    embeds: EmbedRewriter,
    sanitizer: Sanitizer,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(
            PipelineConfig::default(),
            ShortcodeRegistry::builtin(),
            EmbedRewriter::default(),
        )
    }
}

impl Pipeline {
    /// Create a pipeline.
    ///
    /// Iframes produced by `embeds` and by registered shortcodes are allowed
    /// through the sanitizer; any other iframe source is stripped.
    #[must_use]
    pub fn new(config: PipelineConfig, registry: ShortcodeRegistry, embeds: EmbedRewriter) -> Self {
        let sanitizer = Sanitizer::new(
            embeds
                .sources()
                .chain(registry.embed_sources())
                .map(str::to_owned),
        );
        Self {
            config,
            registry,
            embeds,
            sanitizer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &ShortcodeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// Parse `source` and run the embed and shortcode passes.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] naming the stage that failed.
    pub fn transform(&self, source: &str) -> Result<Transformed, RenderError> {
        tracing::debug!(stage = %Stage::Parse, bytes = source.len(), "Running stage");
        let root =
            parse(source, &self.config.parse_options()).map_err(RenderError::at(Stage::Parse))?;

        tracing::debug!(stage = %Stage::Embed, "Running stage");
        let root = self.embeds.rewrite(root);

        tracing::debug!(stage = %Stage::Shortcode, "Running stage");
        let mut processor = ShortcodeProcessor::new(&self.registry).with_source(source);
        let root = processor
            .process_root(root)
            .map_err(RenderError::at(Stage::Shortcode))?;

        Ok(Transformed {
            root,
            warnings: processor.into_warnings(),
        })
    }

    /// Render `source` to sanitized HTML.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] naming the stage that failed. Malformed
    /// shortcodes are not errors; they are reported in
    /// [`RenderResult::warnings`].
    pub fn render(&self, source: &str) -> Result<RenderResult, RenderError> {
        let Transformed { root, warnings } = self.transform(source)?;

        tracing::debug!(stage = %Stage::Headings, "Running stage");
        let (root, outline) = HeadingPass {
            assign_ids: self.config.heading_ids,
            extract_title: self.config.extract_title,
        }
        .apply(root);

        tracing::debug!(stage = %Stage::Serialize, nodes = root.count(), "Running stage");
        let html = to_html(&root).map_err(RenderError::at(Stage::Serialize))?;

        tracing::debug!(stage = %Stage::Sanitize, bytes = html.len(), "Running stage");
        let html = self.sanitizer.clean(&html);

        Ok(RenderResult {
            html,
            title: outline.title,
            toc: outline.toc,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiki_tree::{Attributes, NodeKind};

    use super::*;
    use crate::error::PassError;
    use crate::shortcode::{BlockShortcode, ShortcodeContext, ShortcodeParams};

    fn render(source: &str) -> RenderResult {
        Pipeline::default().render(source).unwrap()
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }

    #[test]
    fn test_plain_markdown() {
        let result = render("Hello, *world*!");
        assert_eq!(result.html, "<p>Hello, <em>world</em>!</p>");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_tip_block() {
        let result = render("{{tip}}\n\nHello\n\n{{/tip}}");
        assert_eq!(result.html, r#"<div class="hint is-tip"><p>Hello</p></div>"#);
        assert!(!result.html.contains("{{"));
    }

    #[test]
    fn test_tip_block_tree_shape() {
        let transformed = Pipeline::default()
            .transform("{{tip}}\n\nHello\n\n{{/tip}}")
            .unwrap();
        let root = transformed.root;
        assert_eq!(root.children.len(), 1);
        let hint = &root.children[0];
        assert_eq!(
            hint.attributes().and_then(|a| a.get_str("class")),
            Some("hint is-tip")
        );
        assert_eq!(hint.children.len(), 1);
        assert!(hint.children[0].is_paragraph());
        assert_eq!(hint.children[0].plain_text(), "Hello");
    }

    #[test]
    fn test_blueprint_embed() {
        let result = render(r#"{{blueprint id="AbCdEfGh"}}"#);
        assert!(result.html.starts_with("<iframe"));
        assert!(
            result
                .html
                .contains(r#"src="https://blueprintue.com/render/AbCdEfGh""#)
        );
        assert!(result.html.contains(r#"class="blueprint""#));
    }

    #[test]
    fn test_blueprint_invalid() {
        let result = render(r#"{{blueprint id="short"}}"#);
        assert_eq!(result.html, r#"<div class="blueprint is-invalid"></div>"#);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("line 1: {{blueprint}}"));
    }

    #[test]
    fn test_youtube_link_embedded() {
        let result = render("https://www.youtube.com/watch?v=abc123");
        assert!(result.html.starts_with(r#"<div class="video"><iframe"#));
        assert!(
            result
                .html
                .contains(r#"src="https://www.youtube.com/embed/abc123""#)
        );
        assert!(result.html.contains(r#"title="YouTube Video Player""#));
    }

    #[test]
    fn test_youtube_short_link_embedded() {
        for source in ["https://youtu.be/abc123", "<https://youtu.be/abc123>"] {
            let result = render(source);
            assert!(
                result
                    .html
                    .contains(r#"src="https://www.youtube.com/embed/abc123""#),
                "{source}"
            );
        }
    }

    #[test]
    fn test_bare_url_in_sentence_linked_not_embedded() {
        let result = render("See https://www.youtube.com/watch?v=abc123 for details");
        assert!(!result.html.contains("iframe"));
        assert!(result.html.starts_with(r#"<p>See <a href="https://www.youtube.com/watch?v=abc123""#));
        assert!(result.html.ends_with(">https://www.youtube.com/watch?v=abc123</a> for details</p>"));
    }

    #[test]
    fn test_bare_url_without_gfm_stays_text() {
        let pipeline = Pipeline::new(
            PipelineConfig {
                gfm: false,
                ..PipelineConfig::default()
            },
            ShortcodeRegistry::builtin(),
            EmbedRewriter::default(),
        );
        let result = pipeline.render("https://youtu.be/abc123").unwrap();
        assert_eq!(result.html, "<p>https://youtu.be/abc123</p>");
    }

    #[test]
    fn test_youtube_link_with_text_untouched() {
        let result = render("Watch [this](https://www.youtube.com/watch?v=abc123) now");
        assert!(!result.html.contains("iframe"));
        assert!(result.html.contains("<a href=\"https://www.youtube.com/watch?v=abc123\""));
    }

    #[test]
    fn test_youtube_link_in_list_untouched() {
        let result = render("- [video](https://www.youtube.com/watch?v=abc123)");
        assert!(!result.html.contains("iframe"));
    }

    #[test]
    fn test_unterminated_tip_kept_literal() {
        let result = render("{{tip}}\n\nHello");
        assert_eq!(result.html, "<p>{{tip}}</p><p>Hello</p>");
        assert_eq!(
            result.warnings,
            vec!["line 1: {{tip}} has no matching {{/tip}}".to_owned()]
        );
    }

    #[test]
    fn test_unknown_tag_kept_literal() {
        let result = render("{{foo}}\n\nbody\n\n{{/foo}}");
        assert_eq!(result.html, "<p>{{foo}}</p><p>body</p><p>{{/foo}}</p>");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_version_rules() {
        let result = render("{{version gte=\"5.0\" lt=\"5.02\"}}\n\nNew API\n\n{{/version}}");
        assert_eq!(
            result.html,
            r#"<div class="version" data-rules="version >= 5.0 && version < 5.02"><p>New API</p></div>"#
                .replace("&&", "&amp;&amp;")
        );
    }

    #[test]
    fn test_version_rules_in_tree() {
        let transformed = Pipeline::default()
            .transform("{{version gte=\"5.0\" lt=\"5.02\"}}\n\nNew API\n\n{{/version}}")
            .unwrap();
        let rules = transformed.root.children[0]
            .attributes()
            .and_then(|a| a.get_str("data-rules"))
            .map(str::to_owned);
        assert_eq!(rules.as_deref(), Some("version >= 5.0 && version < 5.02"));
    }

    #[test]
    fn test_shortcode_with_markdown_body() {
        let result = render("{{warning}}\n\n## Careful\n\n- one\n- two\n\n{{/warning}}");
        assert_eq!(
            result.html,
            r#"<div class="hint is-warning"><h2 id="careful">Careful</h2><ul><li>one</li><li>two</li></ul></div>"#
        );
        assert_eq!(result.toc.len(), 1);
    }

    #[test]
    fn test_shortcode_in_blockquote_not_expanded() {
        let result = render("> {{tip}}\n>\n> hi\n>\n> {{/tip}}");
        assert!(result.html.contains("{{tip}}"));
        assert!(!result.html.contains("hint"));
    }

    #[test]
    fn test_toc_and_title() {
        let config = PipelineConfig {
            extract_title: true,
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(
            config,
            ShortcodeRegistry::builtin(),
            EmbedRewriter::default(),
        );
        let result = pipeline
            .render("# Guide\n\n## Setup\n\n## Setup\n")
            .unwrap();
        assert_eq!(result.title.as_deref(), Some("Guide"));
        let ids: Vec<_> = result.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1"]);
    }

    #[test]
    fn test_heading_id_keeps_unicode() {
        let result = render("## Überblick\n");
        assert_eq!(result.html, r#"<h2 id="überblick">Überblick</h2>"#);
        assert_eq!(result.toc[0].id, "überblick");
    }

    #[test]
    fn test_script_removed() {
        let result = render("<script>alert(1)</script>\n\ntext");
        assert!(!result.html.contains("script"));
        assert!(result.html.contains("<p>text</p>"));
    }

    #[test]
    fn test_raw_iframe_from_unknown_source_stripped() {
        let result = render(r#"<iframe src="https://evil.example.com/x"></iframe>"#);
        assert!(!result.html.contains("evil.example.com"));
    }

    #[test]
    fn test_embeds_disabled() {
        let pipeline = Pipeline::new(
            PipelineConfig::default(),
            ShortcodeRegistry::builtin(),
            EmbedRewriter::new(),
        );
        let result = pipeline
            .render("[video](https://www.youtube.com/watch?v=abc123)")
            .unwrap();
        assert!(!result.html.contains("iframe"));
        assert!(pipeline.sanitizer().sources().iter().all(|s| !s.contains("youtube")));
    }

    #[test]
    fn test_nesting_limit_is_parse_error() {
        let pipeline = Pipeline::new(
            PipelineConfig {
                max_nesting: 4,
                ..PipelineConfig::default()
            },
            ShortcodeRegistry::builtin(),
            EmbedRewriter::default(),
        );
        let err = pipeline
            .render(&format!("{}deep\n", "> ".repeat(10)))
            .unwrap_err();
        assert_eq!(err.stage, Stage::Parse);
        assert!(matches!(err.source, PassError::TooDeep { limit: 4, .. }));
    }

    #[derive(Debug)]
    struct BadTag;

    impl BlockShortcode for BadTag {
        fn name(&self) -> &'static str {
            "bad"
        }

        fn node(
            &self,
            _params: &ShortcodeParams,
            children: Vec<Node>,
            _ctx: &mut ShortcodeContext<'_>,
        ) -> Node {
            Node::element("not a tag", Attributes::new()).with_children(children)
        }
    }

    #[test]
    fn test_invalid_element_is_serialize_error() {
        let registry = ShortcodeRegistry::builder()
            .with_block(BadTag)
            .build()
            .unwrap();
        let pipeline = Pipeline::new(PipelineConfig::default(), registry, EmbedRewriter::default());
        let err = pipeline.render("{{bad}}\n\nx\n\n{{/bad}}").unwrap_err();
        assert_eq!(err.stage, Stage::Serialize);
        assert_eq!(
            err.to_string(),
            r#"serialize stage failed: invalid element name "not a tag""#
        );
    }

    #[test]
    fn test_transform_keeps_spans() {
        let source = "intro\n\n{{note}}\n\nbody\n\n{{/note}}\n";
        let transformed = Pipeline::default().transform(source).unwrap();
        let note = &transformed.root.children[1];
        assert!(matches!(note.kind, NodeKind::Element { .. }));
        let span = note.span.unwrap();
        assert_eq!(source[span.start..span.end].trim_end(), "{{note}}\n\nbody\n\n{{/note}}");
    }

    #[test]
    fn test_gfm_disabled() {
        let pipeline = Pipeline::new(
            PipelineConfig {
                gfm: false,
                ..PipelineConfig::default()
            },
            ShortcodeRegistry::builtin(),
            EmbedRewriter::default(),
        );
        let result = pipeline.render("~~gone~~").unwrap();
        assert_eq!(result.html, "<p>~~gone~~</p>");
    }

    #[test]
    fn test_math_rendered() {
        let result = render("$x^2$");
        assert!(result.html.contains(r#"class="math math-inline""#));
    }
}
