//! HTML sanitization.
//!
//! Rendered pages may contain raw HTML written by authors, so the final
//! markup passes through an `ammonia` allow-list. Iframes survive only when
//! their `src` points at one of the configured embed sources.

use std::borrow::Cow;
use std::fmt;

/// Tags allowed on top of ammonia's defaults.
const EXTRA_TAGS: &[&str] = &["iframe", "input"];

const IFRAME_ATTRIBUTES: &[&str] = &[
    "src",
    "allow",
    "allowfullscreen",
    "title",
    "height",
    "width",
    "scrolling",
    "frameborder",
];

const INPUT_ATTRIBUTES: &[&str] = &["type", "checked", "disabled"];

/// Allow-list sanitizer for rendered HTML.
pub struct Sanitizer {
    sources: Vec<String>,
    builder: ammonia::Builder<'static>,
}

impl Sanitizer {
    /// Create a sanitizer accepting iframes from the given URL prefixes.
    ///
    /// Prefixes are normalized to end with `/`; empty prefixes are ignored.
    #[must_use]
    pub fn new<I, S>(embed_sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sources: Vec<String> = Vec::new();
        for source in embed_sources {
            let mut source = source.into();
            if source.is_empty() {
                continue;
            }
            if !source.ends_with('/') {
                source.push('/');
            }
            if !sources.contains(&source) {
                sources.push(source);
            }
        }

        let allowed = sources.clone();
        let mut builder = ammonia::Builder::default();
        builder
            .add_tags(EXTRA_TAGS)
            .add_tag_attributes("iframe", IFRAME_ATTRIBUTES)
            .add_tag_attributes("input", INPUT_ATTRIBUTES)
            .add_tag_attributes("div", &["data-rules"])
            .add_tag_attributes("th", &["align"])
            .add_tag_attributes("td", &["align"])
            .add_tag_attributes("ol", &["start"])
            .add_generic_attributes(&["class", "id"])
            .attribute_filter(move |element, attribute, value| {
                if element == "iframe" && attribute == "src" {
                    return allowed
                        .iter()
                        .any(|prefix| value.starts_with(prefix.as_str()))
                        .then_some(Cow::Borrowed(value));
                }
                Some(Cow::Borrowed(value))
            });

        Self { sources, builder }
    }

    /// Normalized iframe source prefixes.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Sanitize an HTML fragment.
    #[must_use]
    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sanitizer")
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}
