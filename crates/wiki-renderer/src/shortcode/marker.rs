//! Recognition of `{{tag ...}}` and `{{/tag}}` marker paragraphs.

use wiki_tree::{Node, NodeKind};

/// An opening (or inline) marker split into tag and raw parameter text.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct OpeningMarker<'a> {
    pub tag: &'a str,
    pub params: &'a str,
}

/// Trimmed text between the `{{` and `}}` delimiters.
///
/// Only a paragraph with exactly one text child is a marker; a paragraph
/// that mixes the marker with other inline content is ordinary prose.
fn marker_token(node: &Node) -> Option<&str> {
    if !node.is_paragraph() {
        return None;
    }
    let NodeKind::Text { value } = &node.only_child()?.kind else {
        return None;
    };
    Some(value.strip_prefix("{{")?.strip_suffix("}}")?.trim())
}

/// Parse `node` as an opening marker. Closing markers yield `None`.
pub(crate) fn parse_opening(node: &Node) -> Option<OpeningMarker<'_>> {
    let token = marker_token(node)?;
    if token.starts_with('/') {
        return None;
    }
    let (tag, params) = token.split_once(char::is_whitespace).unwrap_or((token, ""));
    Some(OpeningMarker { tag, params })
}

/// Whether `node` is the closing marker `{{/tag}}`.
pub(crate) fn is_closing(node: &Node, tag: &str) -> bool {
    marker_token(node).and_then(|token| token.strip_prefix('/')) == Some(tag)
}
