//! Shortcode handlers and the registry that maps tags to them.

use std::collections::HashMap;
use std::fmt;

use wiki_tree::{Node, Span};

use super::builtin::{Blueprint, Hint, VersionGate};
use super::marker;
use super::params::ShortcodeParams;
use super::processor::ShortcodeProcessor;
use crate::util::line_of;

/// Handler for block shortcodes: `{{name ...}}` ... `{{/name}}`.
///
/// The sibling nodes between the two markers are passed as `children`.
/// They are not expanded further unless the handler calls
/// [`ShortcodeContext::expand`].
///
/// # Example
///
/// ```
/// use wiki_renderer::shortcode::{BlockShortcode, ShortcodeContext, ShortcodeParams};
/// use wiki_tree::{Attributes, Node};
///
/// struct Spoiler;
///
/// impl BlockShortcode for Spoiler {
///     fn name(&self) -> &str { "spoiler" }
///
///     fn node(&self, _params: &ShortcodeParams, children: Vec<Node>, _ctx: &mut ShortcodeContext<'_>) -> Node {
///         Node::element("details", Attributes::new()).with_children(children)
///     }
/// }
/// ```
pub trait BlockShortcode: Send + Sync {
    /// Tag matched against `{{name}}`.
    fn name(&self) -> &str;

    /// Build the replacement for the opener, body and closer.
    fn node(
        &self,
        params: &ShortcodeParams,
        children: Vec<Node>,
        ctx: &mut ShortcodeContext<'_>,
    ) -> Node;

    /// URL prefix of iframes this handler emits, if any.
    fn embed_source(&self) -> Option<&str> {
        None
    }
}

/// Handler for self-contained shortcodes: `{{name ...}}`.
pub trait InlineShortcode: Send + Sync {
    /// Tag matched against `{{name}}`.
    fn name(&self) -> &str;

    /// Build the replacement for the marker paragraph.
    fn node(&self, params: &ShortcodeParams, ctx: &mut ShortcodeContext<'_>) -> Node;

    /// URL prefix of iframes this handler emits, if any.
    fn embed_source(&self) -> Option<&str> {
        None
    }
}

/// A registered handler.
pub enum Shortcode {
    Block(Box<dyn BlockShortcode>),
    Inline(Box<dyn InlineShortcode>),
}

impl Shortcode {
    /// Tag this handler answers to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Block(handler) => handler.name(),
            Self::Inline(handler) => handler.name(),
        }
    }

    /// Whether the handler needs a closing marker.
    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }

    fn embed_source(&self) -> Option<&str> {
        match self {
            Self::Block(handler) => handler.embed_source(),
            Self::Inline(handler) => handler.embed_source(),
        }
    }
}

impl fmt::Debug for Shortcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = if self.is_block() { "Block" } else { "Inline" };
        f.debug_tuple(form).field(&self.name()).finish()
    }
}

/// A recognized opening marker with a registered handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortcodeDirective {
    /// Directive tag.
    pub tag: String,
    /// Parsed parameters.
    pub params: ShortcodeParams,
    /// Whether a closing marker is required.
    pub is_block: bool,
}

/// Error building a [`ShortcodeRegistry`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two handlers share a tag.
    #[error("shortcode {0:?} is registered more than once")]
    Duplicate(String),
    /// A handler has an empty tag.
    #[error("shortcode name must not be empty")]
    EmptyName,
    /// A handler's tag cannot appear in a marker.
    #[error("invalid shortcode name {0:?}: use letters, digits, '-' and '_'")]
    InvalidName(String),
}

/// Immutable tag-to-handler map.
///
/// Built once, then shared by reference between renders.
#[derive(Debug, Default)]
pub struct ShortcodeRegistry {
    shortcodes: HashMap<String, Shortcode>,
}

impl ShortcodeRegistry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry with the built-in shortcodes: the six hints, `blueprint`
    /// and `version`.
    #[must_use]
    pub fn builtin() -> Self {
        let mut shortcodes = HashMap::new();
        for shortcode in RegistryBuilder::default().with_builtins().entries {
            shortcodes.insert(shortcode.name().to_owned(), shortcode);
        }
        Self { shortcodes }
    }

    /// Look up a handler.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&Shortcode> {
        self.shortcodes.get(tag)
    }

    /// Whether `tag` is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.shortcodes.contains_key(tag)
    }

    /// Registered tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.shortcodes.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shortcodes.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shortcodes.is_empty()
    }

    /// Iframe URL prefixes emitted by registered handlers.
    pub fn embed_sources(&self) -> impl Iterator<Item = &str> {
        self.shortcodes.values().filter_map(Shortcode::embed_source)
    }

    /// Recognize `node` as the opening marker of a registered shortcode.
    #[must_use]
    pub fn recognize(&self, node: &Node) -> Option<(&Shortcode, ShortcodeDirective)> {
        let opening = marker::parse_opening(node)?;
        let Some(shortcode) = self.get(opening.tag) else {
            tracing::debug!(tag = opening.tag, "Unknown shortcode, leaving as text");
            return None;
        };
        let directive = ShortcodeDirective {
            tag: opening.tag.to_owned(),
            params: ShortcodeParams::parse(opening.params),
            is_block: shortcode.is_block(),
        };
        Some((shortcode, directive))
    }
}

/// Builder for [`ShortcodeRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<Shortcode>,
}

impl RegistryBuilder {
    /// Register a block shortcode.
    #[must_use]
    pub fn with_block<S: BlockShortcode + 'static>(mut self, shortcode: S) -> Self {
        self.entries.push(Shortcode::Block(Box::new(shortcode)));
        self
    }

    /// Register an inline shortcode.
    #[must_use]
    pub fn with_inline<S: InlineShortcode + 'static>(mut self, shortcode: S) -> Self {
        self.entries.push(Shortcode::Inline(Box::new(shortcode)));
        self
    }

    /// Register the built-in shortcodes.
    #[must_use]
    pub fn with_builtins(self) -> Self {
        Hint::DEFAULT_KINDS
            .iter()
            .fold(self, |builder, kind| builder.with_block(Hint::new(*kind)))
            .with_inline(Blueprint::default())
            .with_block(VersionGate)
    }

    /// Validate names and build the registry.
    pub fn build(self) -> Result<ShortcodeRegistry, RegistryError> {
        let mut shortcodes = HashMap::with_capacity(self.entries.len());
        for shortcode in self.entries {
            let name = shortcode.name().to_owned();
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if !is_valid_tag(&name) {
                return Err(RegistryError::InvalidName(name));
            }
            if shortcodes.contains_key(&name) {
                return Err(RegistryError::Duplicate(name));
            }
            shortcodes.insert(name, shortcode);
        }
        Ok(ShortcodeRegistry { shortcodes })
    }
}

fn is_valid_tag(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Context handed to shortcode handlers.
pub struct ShortcodeContext<'a> {
    pub(crate) registry: &'a ShortcodeRegistry,
    pub(crate) source: Option<&'a str>,
    pub(crate) tag: &'a str,
    pub(crate) span: Option<Span>,
    pub(crate) warnings: &'a mut Vec<String>,
}

impl ShortcodeContext<'_> {
    /// Tag of the shortcode being expanded.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.tag
    }

    /// Source span of the opening marker (through the closer for blocks).
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// 1-indexed source line of the opening marker, when the source is known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        Some(line_of(self.source?, self.span?))
    }

    /// Record a non-fatal problem with this shortcode.
    pub fn warn(&mut self, message: impl fmt::Display) {
        let warning = match self.line() {
            Some(line) => format!("line {line}: {{{{{}}}}}: {message}", self.tag),
            None => format!("{{{{{}}}}}: {message}", self.tag),
        };
        tracing::warn!(tag = self.tag, "{warning}");
        self.warnings.push(warning);
    }

    /// Expand shortcodes in `children` with the same registry.
    ///
    /// Handlers that want nested shortcodes processed call this on the body
    /// they were given.
    pub fn expand(&mut self, children: Vec<Node>) -> Vec<Node> {
        let mut processor = ShortcodeProcessor::new(self.registry);
        if let Some(source) = self.source {
            processor = processor.with_source(source);
        }
        let expanded = processor.process(children);
        self.warnings.extend(processor.into_warnings());
        expanded
    }
}
