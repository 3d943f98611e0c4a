//! Document tree node types.
//!
//! A [`Node`] pairs a closed [`NodeKind`] with an ordered list of owned
//! children and an optional source [`Span`]. Every pass in the rendering
//! pipeline consumes a tree and produces a new one; nodes are never shared.

use std::collections::BTreeMap;
use std::fmt;

/// Byte range in the original markdown source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// GFM alert kind for `> [!NOTE]` style blockquotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    /// Lowercase name used in CSS classes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }
}

/// Table column alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// Attribute value on a generated element.
///
/// Boolean attributes (`allowfullscreen`) render as bare names when `true`
/// and are omitted when `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttrValue {
    Str(String),
    Bool(bool),
}

impl AttrValue {
    /// String payload, if this is a string attribute.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Bool(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Ordered attribute map for generated elements.
///
/// Keys are kept sorted so serialized output is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    /// Create an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// Look up a string attribute.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(AttrValue::as_str)
    }

    /// Iterate attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Node category together with the payload relevant to it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum NodeKind {
    /// Document root.
    Root,
    Paragraph,
    Heading {
        level: u8,
        /// Anchor id, assigned by the heading pass or `{#id}` syntax.
        id: Option<String>,
        classes: Vec<String>,
    },
    BlockQuote {
        alert: Option<AlertKind>,
    },
    CodeBlock {
        lang: Option<String>,
        code: String,
    },
    List {
        /// Start number for ordered lists, `None` for bullet lists.
        start: Option<u64>,
    },
    ListItem,
    TaskMarker {
        checked: bool,
    },
    Table {
        alignments: Vec<Alignment>,
    },
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Superscript,
    Subscript,
    Link {
        url: String,
        title: String,
    },
    /// Image; alt text lives in the children.
    Image {
        url: String,
        title: String,
    },
    Text {
        value: String,
    },
    InlineCode {
        value: String,
    },
    /// Raw HTML from the source, block or inline.
    Html {
        value: String,
    },
    InlineMath {
        value: String,
    },
    DisplayMath {
        value: String,
    },
    FootnoteReference {
        label: String,
    },
    FootnoteDefinition {
        label: String,
    },
    DefinitionList,
    DefinitionTitle,
    DefinitionDetails,
    SoftBreak,
    HardBreak,
    Rule,
    /// Element synthesized by a tree pass (embeds, shortcodes).
    Element {
        tag: String,
        attributes: Attributes,
    },
}

impl NodeKind {
    /// Short lowercase name of the kind, for logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Paragraph => "paragraph",
            Self::Heading { .. } => "heading",
            Self::BlockQuote { .. } => "blockquote",
            Self::CodeBlock { .. } => "code",
            Self::List { .. } => "list",
            Self::ListItem => "listItem",
            Self::TaskMarker { .. } => "taskMarker",
            Self::Table { .. } => "table",
            Self::TableHead => "tableHead",
            Self::TableRow => "tableRow",
            Self::TableCell => "tableCell",
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::Strikethrough => "delete",
            Self::Superscript => "superscript",
            Self::Subscript => "subscript",
            Self::Link { .. } => "link",
            Self::Image { .. } => "image",
            Self::Text { .. } => "text",
            Self::InlineCode { .. } => "inlineCode",
            Self::Html { .. } => "html",
            Self::InlineMath { .. } => "inlineMath",
            Self::DisplayMath { .. } => "math",
            Self::FootnoteReference { .. } => "footnoteReference",
            Self::FootnoteDefinition { .. } => "footnoteDefinition",
            Self::DefinitionList => "definitionList",
            Self::DefinitionTitle => "definitionTitle",
            Self::DefinitionDetails => "definitionDetails",
            Self::SoftBreak => "softBreak",
            Self::HardBreak => "break",
            Self::Rule => "thematicBreak",
            Self::Element { .. } => "element",
        }
    }

    /// Whether this is the document root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

/// A node in the document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: NodeKind,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<Node>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub span: Option<Span>,
}

impl Node {
    /// Create a childless node of the given kind.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            span: None,
        }
    }

    /// Create an empty document root.
    #[must_use]
    pub fn root() -> Self {
        Self::new(NodeKind::Root)
    }

    /// Create a paragraph with the given children.
    #[must_use]
    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph).with_children(children)
    }

    /// Create a text leaf.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text {
            value: value.into(),
        })
    }

    /// Create a link with the given label children.
    #[must_use]
    pub fn link(url: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Link {
            url: url.into(),
            title: String::new(),
        })
        .with_children(children)
    }

    /// Create a generated element.
    #[must_use]
    pub fn element(tag: impl Into<String>, attributes: Attributes) -> Self {
        Self::new(NodeKind::Element {
            tag: tag.into(),
            attributes,
        })
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Set source span.
    #[must_use]
    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    /// Scalar text payload of text-bearing kinds.
    #[must_use]
    pub fn text_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { value }
            | NodeKind::InlineCode { value }
            | NodeKind::Html { value }
            | NodeKind::InlineMath { value }
            | NodeKind::DisplayMath { value } => Some(value),
            NodeKind::CodeBlock { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether this node is a paragraph.
    #[must_use]
    pub fn is_paragraph(&self) -> bool {
        matches!(self.kind, NodeKind::Paragraph)
    }

    /// The only child of this node, if it has exactly one.
    #[must_use]
    pub fn only_child(&self) -> Option<&Node> {
        match self.children.as_slice() {
            [child] => Some(child),
            _ => None,
        }
    }

    /// Element tag for generated elements.
    #[must_use]
    pub fn element_tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Attributes of a generated element.
    #[must_use]
    pub fn attributes(&self) -> Option<&Attributes> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    ///
    /// Breaks contribute a single space; code and math contribute their source.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::SoftBreak | NodeKind::HardBreak => out.push(' '),
            NodeKind::Html { .. } => {}
            _ => {
                if let Some(value) = self.text_value() {
                    out.push_str(value);
                }
            }
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Maximum depth of this subtree; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Node::depth).max().unwrap_or(0)
    }
}
