//! Shortcode expansion over a sibling list.
//!
//! The list is scanned from the last node to the first. Each opening marker
//! with a registered tag is replaced by its handler's output; block
//! shortcodes first search forward for the nearest `{{/tag}}` and capture
//! everything in between as the handler's children.
//!
//! Scanning backwards means inner blocks of the same tag are replaced before
//! their outer opener is reached, so properly nested blocks pair correctly.
//! An opener with no closer after it pairs with nothing and stays as text;
//! two unclosed openers followed by one closer pair the later opener with it.

use wiki_tree::{Node, Span};

use super::marker;
use super::registry::{Shortcode, ShortcodeContext, ShortcodeRegistry};
use crate::error::PassError;
use crate::util::line_of;

/// Expands shortcodes in one sibling list.
pub struct ShortcodeProcessor<'r> {
    registry: &'r ShortcodeRegistry,
    source: Option<&'r str>,
    warnings: Vec<String>,
}

impl<'r> ShortcodeProcessor<'r> {
    /// Create a processor over `registry`.
    #[must_use]
    pub fn new(registry: &'r ShortcodeRegistry) -> Self {
        Self {
            registry,
            source: None,
            warnings: Vec::new(),
        }
    }

    /// Markdown source the nodes were parsed from, used for line numbers in
    /// warnings.
    #[must_use]
    pub fn with_source(mut self, source: &'r str) -> Self {
        self.source = Some(source);
        self
    }

    /// Expand shortcodes among the document root's children.
    ///
    /// Deeper levels are not scanned.
    pub fn process_root(&mut self, mut root: Node) -> Result<Node, PassError> {
        if !root.kind.is_root() {
            return Err(PassError::NotRoot {
                found: root.kind.name(),
            });
        }
        let children = std::mem::take(&mut root.children);
        root.children = self.process(children);
        Ok(root)
    }

    /// Expand shortcodes in a sibling list.
    ///
    /// Unknown tags and unterminated blocks are left in place as ordinary
    /// paragraphs.
    #[must_use]
    pub fn process(&mut self, siblings: Vec<Node>) -> Vec<Node> {
        let registry = self.registry;
        let mut nodes = siblings;
        let mut i = nodes.len();

        while i > 0 {
            i -= 1;
            let Some((shortcode, directive)) = registry.recognize(&nodes[i]) else {
                continue;
            };

            match shortcode {
                Shortcode::Inline(handler) => {
                    let span = nodes[i].span;
                    let mut ctx = self.context(&directive.tag, span);
                    let node = handler.node(&directive.params, &mut ctx);
                    nodes[i] = with_fallback_span(node, span);
                }
                Shortcode::Block(handler) => {
                    let Some(close) = (i + 1..nodes.len())
                        .find(|&j| marker::is_closing(&nodes[j], &directive.tag))
                    else {
                        self.unterminated(&directive.tag, nodes[i].span);
                        continue;
                    };

                    let mut body: Vec<Node> = nodes.drain(i..=close).collect();
                    let closer = body.pop();
                    let opener = body.remove(0);
                    let span = match (opener.span, closer.and_then(|c| c.span)) {
                        (Some(open), Some(close)) => Some(open.merge(close)),
                        (open, close) => open.or(close),
                    };

                    let mut ctx = self.context(&directive.tag, span);
                    let node = handler.node(&directive.params, body, &mut ctx);
                    nodes.insert(i, with_fallback_span(node, span));
                }
            }
        }

        nodes
    }

    fn context<'a>(&'a mut self, tag: &'a str, span: Option<Span>) -> ShortcodeContext<'a> {
        ShortcodeContext {
            registry: self.registry,
            source: self.source,
            tag,
            span,
            warnings: &mut self.warnings,
        }
    }

    fn unterminated(&mut self, tag: &str, span: Option<Span>) {
        let warning = match self.source.zip(span) {
            Some((source, span)) => format!(
                "line {}: {{{{{tag}}}}} has no matching {{{{/{tag}}}}}",
                line_of(source, span)
            ),
            None => format!("{{{{{tag}}}}} has no matching {{{{/{tag}}}}}"),
        };
        tracing::warn!(tag, "{warning}");
        self.warnings.push(warning);
    }

    /// Warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Consume the processor, returning its warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

fn with_fallback_span(node: Node, span: Option<Span>) -> Node {
    if node.span.is_some() {
        return node;
    }
    node.with_span(span)
}
