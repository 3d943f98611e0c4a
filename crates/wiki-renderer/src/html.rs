//! Document tree to HTML.
//!
//! Produces semantic HTML5: `<pre><code class="language-x">` for code
//! blocks, `div.alert` for GFM alerts, `span.math` for TeX, and generated
//! elements as-is. Raw HTML from the source is copied through unescaped;
//! the sanitizer runs afterwards.

use std::collections::HashMap;
use std::fmt::Write;

use wiki_tree::{AlertKind, Alignment, AttrValue, Attributes, Node, NodeKind};

use crate::error::PassError;
use crate::util::{escape_html, is_valid_markup_name};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Serialize the children of `root` to HTML.
///
/// # Errors
///
/// Returns [`PassError::InvalidName`] if a generated element carries a tag
/// or attribute name that is not a plain identifier.
pub fn to_html(root: &Node) -> Result<String, PassError> {
    let mut writer = HtmlWriter::default();
    writer.children(root)?;
    Ok(writer.out)
}

#[derive(Default)]
struct HtmlWriter {
    out: String,
    /// Footnote label to number, in order of first appearance.
    footnotes: HashMap<String, usize>,
}

impl HtmlWriter {
    fn children(&mut self, node: &Node) -> Result<(), PassError> {
        for child in &node.children {
            self.node(child)?;
        }
        Ok(())
    }

    fn wrap(&mut self, open: &str, node: &Node, close: &str) -> Result<(), PassError> {
        self.out.push_str(open);
        self.children(node)?;
        self.out.push_str(close);
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn node(&mut self, node: &Node) -> Result<(), PassError> {
        match &node.kind {
            NodeKind::Root | NodeKind::TableHead | NodeKind::TableRow | NodeKind::TableCell => {
                // Table parts outside a table have no markup of their own.
                self.children(node)?;
            }
            NodeKind::Paragraph => self.wrap("<p>", node, "</p>")?,
            NodeKind::Heading { level, id, classes } => {
                write!(self.out, "<h{level}")?;
                if let Some(id) = id {
                    write!(self.out, r#" id="{}""#, escape_html(id))?;
                }
                if !classes.is_empty() {
                    write!(self.out, r#" class="{}""#, escape_html(&classes.join(" ")))?;
                }
                self.out.push('>');
                self.children(node)?;
                write!(self.out, "</h{level}>")?;
            }
            NodeKind::BlockQuote { alert: None } => {
                self.wrap("<blockquote>", node, "</blockquote>")?;
            }
            NodeKind::BlockQuote { alert: Some(kind) } => {
                write!(
                    self.out,
                    r#"<div class="alert alert-{}"><div class="alert-title">{}</div><div class="alert-content">"#,
                    kind.as_str(),
                    alert_title(*kind)
                )?;
                self.children(node)?;
                self.out.push_str("</div></div>");
            }
            NodeKind::CodeBlock { lang, code } => match lang {
                Some(lang) => write!(
                    self.out,
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(lang),
                    escape_html(code)
                )?,
                None => write!(self.out, "<pre><code>{}</code></pre>", escape_html(code))?,
            },
            NodeKind::List { start: None } => self.wrap("<ul>", node, "</ul>")?,
            NodeKind::List { start: Some(1) } => self.wrap("<ol>", node, "</ol>")?,
            NodeKind::List { start: Some(n) } => {
                write!(self.out, r#"<ol start="{n}">"#)?;
                self.children(node)?;
                self.out.push_str("</ol>");
            }
            NodeKind::ListItem => self.wrap("<li>", node, "</li>")?,
            NodeKind::TaskMarker { checked } => {
                self.out.push_str(if *checked {
                    r#"<input type="checkbox" disabled checked>"#
                } else {
                    r#"<input type="checkbox" disabled>"#
                });
            }
            NodeKind::Table { alignments } => self.table(node, alignments)?,
            NodeKind::Emphasis => self.wrap("<em>", node, "</em>")?,
            NodeKind::Strong => self.wrap("<strong>", node, "</strong>")?,
            NodeKind::Strikethrough => self.wrap("<s>", node, "</s>")?,
            NodeKind::Superscript => self.wrap("<sup>", node, "</sup>")?,
            NodeKind::Subscript => self.wrap("<sub>", node, "</sub>")?,
            NodeKind::Link { url, title } => {
                write!(self.out, r#"<a href="{}""#, escape_html(url))?;
                if !title.is_empty() {
                    write!(self.out, r#" title="{}""#, escape_html(title))?;
                }
                self.out.push('>');
                self.children(node)?;
                self.out.push_str("</a>");
            }
            NodeKind::Image { url, title } => {
                write!(self.out, r#"<img src="{}""#, escape_html(url))?;
                if !title.is_empty() {
                    write!(self.out, r#" title="{}""#, escape_html(title))?;
                }
                write!(self.out, r#" alt="{}">"#, escape_html(&node.plain_text()))?;
            }
            NodeKind::Text { value } => self.out.push_str(&escape_html(value)),
            NodeKind::InlineCode { value } => {
                write!(self.out, "<code>{}</code>", escape_html(value))?;
            }
            NodeKind::Html { value } => self.out.push_str(value),
            NodeKind::InlineMath { value } => write!(
                self.out,
                r#"<span class="math math-inline">{}</span>"#,
                escape_html(value)
            )?,
            NodeKind::DisplayMath { value } => write!(
                self.out,
                r#"<span class="math math-display">{}</span>"#,
                escape_html(value)
            )?,
            NodeKind::FootnoteReference { label } => {
                let number = self.footnote_number(label);
                write!(
                    self.out,
                    r##"<sup class="footnote-reference"><a href="#fn-{}">{number}</a></sup>"##,
                    escape_html(label)
                )?;
            }
            NodeKind::FootnoteDefinition { label } => {
                let number = self.footnote_number(label);
                write!(
                    self.out,
                    r#"<div class="footnote-definition" id="fn-{}"><sup class="footnote-definition-label">{number}</sup>"#,
                    escape_html(label)
                )?;
                self.children(node)?;
                self.out.push_str("</div>");
            }
            NodeKind::DefinitionList => self.wrap("<dl>", node, "</dl>")?,
            NodeKind::DefinitionTitle => self.wrap("<dt>", node, "</dt>")?,
            NodeKind::DefinitionDetails => self.wrap("<dd>", node, "</dd>")?,
            NodeKind::SoftBreak => self.out.push('\n'),
            NodeKind::HardBreak => self.out.push_str("<br>"),
            NodeKind::Rule => self.out.push_str("<hr>"),
            NodeKind::Element { tag, attributes } => self.element(tag, attributes, node)?,
        }
        Ok(())
    }

    fn table(&mut self, node: &Node, alignments: &[Alignment]) -> Result<(), PassError> {
        self.out.push_str("<table>");
        let mut in_body = false;
        for section in &node.children {
            match section.kind {
                NodeKind::TableHead => {
                    self.out.push_str("<thead><tr>");
                    self.cells(section, alignments, "th")?;
                    self.out.push_str("</tr></thead>");
                }
                NodeKind::TableRow => {
                    if !in_body {
                        self.out.push_str("<tbody>");
                        in_body = true;
                    }
                    self.out.push_str("<tr>");
                    self.cells(section, alignments, "td")?;
                    self.out.push_str("</tr>");
                }
                _ => self.node(section)?,
            }
        }
        if in_body {
            self.out.push_str("</tbody>");
        }
        self.out.push_str("</table>");
        Ok(())
    }

    fn cells(&mut self, row: &Node, alignments: &[Alignment], tag: &str) -> Result<(), PassError> {
        for (index, cell) in row.children.iter().enumerate() {
            let align = match alignments.get(index) {
                Some(Alignment::Left) => r#" align="left""#,
                Some(Alignment::Center) => r#" align="center""#,
                Some(Alignment::Right) => r#" align="right""#,
                Some(Alignment::None) | None => "",
            };
            write!(self.out, "<{tag}{align}>")?;
            self.children(cell)?;
            write!(self.out, "</{tag}>")?;
        }
        Ok(())
    }

    fn element(&mut self, tag: &str, attributes: &Attributes, node: &Node) -> Result<(), PassError> {
        if !is_valid_markup_name(tag) {
            return Err(PassError::InvalidName {
                what: "element",
                name: tag.to_owned(),
            });
        }
        write!(self.out, "<{tag}")?;
        for (name, value) in attributes.iter() {
            if !is_valid_markup_name(name) {
                return Err(PassError::InvalidName {
                    what: "attribute",
                    name: name.to_owned(),
                });
            }
            match value {
                AttrValue::Bool(true) => write!(self.out, " {name}")?,
                AttrValue::Bool(false) => {}
                AttrValue::Str(value) => write!(self.out, r#" {name}="{}""#, escape_html(value))?,
            }
        }
        self.out.push('>');

        if VOID_ELEMENTS.contains(&tag) {
            return Ok(());
        }
        self.children(node)?;
        write!(self.out, "</{tag}>")?;
        Ok(())
    }

    fn footnote_number(&mut self, label: &str) -> usize {
        let next = self.footnotes.len() + 1;
        *self.footnotes.entry(label.to_owned()).or_insert(next)
    }
}

fn alert_title(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Note => "Note",
        AlertKind::Tip => "Tip",
        AlertKind::Important => "Important",
        AlertKind::Warning => "Warning",
        AlertKind::Caution => "Caution",
    }
}
