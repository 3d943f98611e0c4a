//! Markdown source to document tree.
//!
//! Drives a `pulldown-cmark` offset iterator and folds its start/end events
//! into an owned [`Node`] tree. Adjacent text runs are merged, so a marker
//! such as `{{blueprint id="a_b&c"}}` reaches the tree passes as a single
//! text node even though the parser splits it at `_` and `&`. With GFM on,
//! bare URLs are then linked by [`autolink`](crate::autolink::autolink).

use std::ops::Range;

use pulldown_cmark::{BlockQuoteKind, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use wiki_tree::{AlertKind, Alignment, Node, NodeKind, Span};

use crate::autolink::autolink;
use crate::error::PassError;
use crate::util::heading_level_to_num;

/// Parser settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Tables, strikethrough, task lists, alerts, footnotes and autolink literals.
    pub gfm: bool,
    /// `$inline$` and `$$display$$` math.
    pub math: bool,
    /// Maximum container nesting below the root.
    pub max_nesting: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            math: true,
            max_nesting: 128,
        }
    }
}

impl ParseOptions {
    /// `pulldown-cmark` options for these settings.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::ENABLE_HEADING_ATTRIBUTES;
        if self.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
                | Options::ENABLE_FOOTNOTES;
        }
        if self.math {
            options |= Options::ENABLE_MATH;
        }
        options
    }
}

/// Parse markdown into a document tree rooted at [`NodeKind::Root`].
///
/// # Errors
///
/// Returns [`PassError::TooDeep`] if containers nest deeper than
/// `options.max_nesting`.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Node, PassError> {
    let mut builder = TreeBuilder::new(source.len(), options.max_nesting);
    for (event, range) in Parser::new_ext(source, options.parser_options()).into_offset_iter() {
        builder.event(event, range)?;
    }
    let root = builder.finish();
    Ok(if options.gfm { autolink(root) } else { root })
}

struct TreeBuilder {
    stack: Vec<Node>,
    max_nesting: usize,
}

impl TreeBuilder {
    fn new(len: usize, max_nesting: usize) -> Self {
        Self {
            stack: vec![Node::root().with_span(Some(Span::new(0, len)))],
            max_nesting,
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) -> Result<(), PassError> {
        match event {
            Event::Start(tag) => self.start_tag(tag, range)?,
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                if let Some(NodeKind::CodeBlock { code, .. }) =
                    self.stack.last_mut().map(|node| &mut node.kind)
                {
                    code.push_str(&text);
                } else {
                    self.leaf(
                        NodeKind::Text {
                            value: text.into_string(),
                        },
                        range,
                    );
                }
            }
            Event::Code(code) => self.leaf(
                NodeKind::InlineCode {
                    value: code.into_string(),
                },
                range,
            ),
            Event::Html(html) | Event::InlineHtml(html) => self.leaf(
                NodeKind::Html {
                    value: html.into_string(),
                },
                range,
            ),
            Event::InlineMath(value) => self.leaf(
                NodeKind::InlineMath {
                    value: value.into_string(),
                },
                range,
            ),
            Event::DisplayMath(value) => self.leaf(
                NodeKind::DisplayMath {
                    value: value.into_string(),
                },
                range,
            ),
            Event::FootnoteReference(label) => self.leaf(
                NodeKind::FootnoteReference {
                    label: label.into_string(),
                },
                range,
            ),
            Event::SoftBreak => self.leaf(NodeKind::SoftBreak, range),
            Event::HardBreak => self.leaf(NodeKind::HardBreak, range),
            Event::Rule => self.leaf(NodeKind::Rule, range),
            Event::TaskListMarker(checked) => self.leaf(NodeKind::TaskMarker { checked }, range),
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>, range: Range<usize>) -> Result<(), PassError> {
        let kind = match tag {
            // Raw HTML blocks arrive as `Html` events; the wrapper adds nothing.
            Tag::HtmlBlock | Tag::MetadataBlock(_) => return Ok(()),
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading {
                level, id, classes, ..
            } => NodeKind::Heading {
                level: heading_level_to_num(level),
                id: id.map(CowStr::into_string),
                classes: classes.into_iter().map(CowStr::into_string).collect(),
            },
            Tag::BlockQuote(kind) => NodeKind::BlockQuote {
                alert: kind.map(alert_kind),
            },
            Tag::CodeBlock(kind) => NodeKind::CodeBlock {
                lang: match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
                    CodeBlockKind::Indented => None,
                },
                code: String::new(),
            },
            Tag::List(start) => NodeKind::List { start },
            Tag::Item => NodeKind::ListItem,
            Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition {
                label: label.into_string(),
            },
            Tag::DefinitionList => NodeKind::DefinitionList,
            Tag::DefinitionListTitle => NodeKind::DefinitionTitle,
            Tag::DefinitionListDefinition => NodeKind::DefinitionDetails,
            Tag::Table(alignments) => NodeKind::Table {
                alignments: alignments.into_iter().map(alignment).collect(),
            },
            Tag::TableHead => NodeKind::TableHead,
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => NodeKind::TableCell,
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Superscript => NodeKind::Superscript,
            Tag::Subscript => NodeKind::Subscript,
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => NodeKind::Image {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
        };
        self.open(kind, range)
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if matches!(tag, TagEnd::HtmlBlock | TagEnd::MetadataBlock(_)) {
            return;
        }
        self.close();
    }

    fn open(&mut self, kind: NodeKind, range: Range<usize>) -> Result<(), PassError> {
        // The root sits at the bottom of the stack, so its length is the
        // depth the new container would have.
        if self.stack.len() > self.max_nesting {
            return Err(PassError::TooDeep {
                limit: self.max_nesting,
                offset: range.start,
            });
        }
        self.stack
            .push(Node::new(kind).with_span(Some(Span::new(range.start, range.end))));
        Ok(())
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(node) = self.stack.pop() {
            self.append(node);
        }
    }

    fn leaf(&mut self, kind: NodeKind, range: Range<usize>) {
        self.append(Node::new(kind).with_span(Some(Span::new(range.start, range.end))));
    }

    fn append(&mut self, child: Node) {
        let Some(parent) = self.stack.last_mut() else {
            return;
        };
        if let Some(last) = parent.children.last_mut() {
            match (&mut last.kind, &child.kind) {
                (NodeKind::Text { value: prev }, NodeKind::Text { value: next })
                | (NodeKind::Html { value: prev }, NodeKind::Html { value: next }) => {
                    prev.push_str(next);
                    last.span = merge_spans(last.span, child.span);
                    return;
                }
                _ => {}
            }
        }
        parent.children.push(child);
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.pop().unwrap_or_else(Node::root)
    }
}

fn merge_spans(a: Option<Span>, b: Option<Span>) -> Option<Span> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(b)),
        (a, b) => a.or(b),
    }
}

fn alert_kind(kind: BlockQuoteKind) -> AlertKind {
    match kind {
        BlockQuoteKind::Note => AlertKind::Note,
        BlockQuoteKind::Tip => AlertKind::Tip,
        BlockQuoteKind::Important => AlertKind::Important,
        BlockQuoteKind::Warning => AlertKind::Warning,
        BlockQuoteKind::Caution => AlertKind::Caution,
    }
}

fn alignment(align: pulldown_cmark::Alignment) -> Alignment {
    match align {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}
