//! Single-link paragraph embeds.
//!
//! A top-level paragraph whose only child is a link to an allow-listed
//! provider is replaced with a `div.video` wrapping an `iframe`:
//!
//! ```markdown
//! https://www.youtube.com/watch?v=dQw4w9WgXcQ
//! ```
//!
//! becomes
//!
//! ```html
//! <div class="video"><iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ" ...></iframe></div>
//! ```
//!
//! Links anywhere else (inside lists, blockquotes, or next to other text)
//! are left alone.

use std::sync::LazyLock;

use regex::Regex;
use wiki_tree::{Attributes, Node, NodeKind, map};

static YOUTUBE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?youtu\.?be(?:\.com)?/?.*(?:watch|embed)?(?:.*v=|v/|/)([\w\-]+)&?")
        .unwrap()
});

const YOUTUBE_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// An embeddable media source.
///
/// The pattern's first capture group is the media id; it is appended to
/// `embed_base` to form the iframe `src`.
#[derive(Clone, Debug)]
pub struct EmbedProvider {
    name: String,
    pattern: Regex,
    embed_base: String,
    allow: String,
    title: String,
}

impl EmbedProvider {
    /// Create a provider.
    ///
    /// `embed_base` should end with `/`; the media id is appended verbatim.
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: Regex, embed_base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern,
            embed_base: embed_base.into(),
            allow: String::new(),
            title: String::new(),
        }
    }

    /// YouTube watch, share and embed links.
    #[must_use]
    pub fn youtube() -> Self {
        Self::new(
            "youtube",
            YOUTUBE_LINK.clone(),
            "https://www.youtube.com/embed/",
        )
        .with_allow(YOUTUBE_ALLOW)
        .with_title("YouTube Video Player")
    }

    /// Set the iframe `allow` capability list.
    #[must_use]
    pub fn with_allow(mut self, allow: impl Into<String>) -> Self {
        self.allow = allow.into();
        self
    }

    /// Set the iframe `title`.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Provider name, for logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL prefix every iframe produced by this provider starts with.
    #[must_use]
    pub fn embed_base(&self) -> &str {
        &self.embed_base
    }

    /// Embed URL for `url`, if this provider recognizes it.
    #[must_use]
    pub fn embed_src(&self, url: &str) -> Option<String> {
        let id = self.pattern.captures(url)?.get(1)?.as_str();
        Some(format!("{}{id}", self.embed_base))
    }

    fn iframe(&self, src: String) -> Node {
        let mut attributes = Attributes::new()
            .with("src", src)
            .with("allowfullscreen", true);
        if !self.allow.is_empty() {
            attributes.insert("allow", self.allow.as_str());
        }
        if !self.title.is_empty() {
            attributes.insert("title", self.title.as_str());
        }
        Node::element("iframe", attributes)
    }
}

/// Tree pass replacing single-link paragraphs with provider embeds.
#[derive(Clone, Debug)]
pub struct EmbedRewriter {
    providers: Vec<EmbedProvider>,
}

impl Default for EmbedRewriter {
    fn default() -> Self {
        Self::new().with_provider(EmbedProvider::youtube())
    }
}

impl EmbedRewriter {
    /// Create a rewriter with no providers; it leaves every tree unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Add a provider. Earlier providers take precedence.
    #[must_use]
    pub fn with_provider(mut self, provider: EmbedProvider) -> Self {
        self.providers.push(provider);
        self
    }

    /// Registered providers.
    #[must_use]
    pub fn providers(&self) -> &[EmbedProvider] {
        &self.providers
    }

    /// Embed URL prefixes of all providers.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(EmbedProvider::embed_base)
    }

    /// Rewrite eligible top-level paragraphs of `root`.
    #[must_use]
    pub fn rewrite(&self, root: Node) -> Node {
        if self.providers.is_empty() {
            return root;
        }
        map(root, |node, _index, parent| {
            if !parent.is_some_and(NodeKind::is_root) {
                return node;
            }
            self.embed(&node).unwrap_or(node)
        })
    }

    fn embed(&self, node: &Node) -> Option<Node> {
        if !node.is_paragraph() {
            return None;
        }
        let NodeKind::Link { url, .. } = &node.only_child()?.kind else {
            return None;
        };
        let (provider, src) = self
            .providers
            .iter()
            .find_map(|provider| provider.embed_src(url).map(|src| (provider, src)))?;

        tracing::debug!(provider = provider.name(), %src, "Embedding link");
        Some(
            Node::element("div", Attributes::new().with("class", "video"))
                .with_children(vec![provider.iframe(src)])
                .with_span(node.span),
        )
    }
}
