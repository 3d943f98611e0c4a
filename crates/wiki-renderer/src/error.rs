//! Render error types.

use std::fmt;

/// Pipeline stage, used to report where a render failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Embed,
    Shortcode,
    Headings,
    Serialize,
    Sanitize,
}

impl Stage {
    /// Stage name as used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Embed => "embed",
            Self::Shortcode => "shortcode",
            Self::Headings => "headings",
            Self::Serialize => "serialize",
            Self::Sanitize => "sanitize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural error raised by a single tree pass.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PassError {
    /// The document nests deeper than the configured limit.
    #[error("document nesting exceeds {limit} levels at byte {offset}")]
    TooDeep {
        /// Configured nesting limit.
        limit: usize,
        /// Byte offset of the construct that crossed the limit.
        offset: usize,
    },
    /// A pass that operates on a document received some other node.
    #[error("expected document root, found {found}")]
    NotRoot {
        /// Kind name of the node that was received.
        found: &'static str,
    },
    /// A generated element carries a tag or attribute name that cannot be serialized.
    #[error("invalid {what} name {name:?}")]
    InvalidName {
        /// "element" or "attribute".
        what: &'static str,
        /// Offending name.
        name: String,
    },
    /// Writing serialized output failed.
    #[error("failed to write output")]
    Format(#[from] std::fmt::Error),
}

/// Error returned when rendering a document fails.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {source}")]
pub struct RenderError {
    /// Stage that failed.
    pub stage: Stage,
    /// Underlying pass error.
    #[source]
    pub source: PassError,
}

impl RenderError {
    pub(crate) fn at(stage: Stage) -> impl FnOnce(PassError) -> Self {
        move |source| Self { stage, source }
    }
}
