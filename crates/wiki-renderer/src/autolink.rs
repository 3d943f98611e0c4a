//! GFM autolink literals.
//!
//! `pulldown-cmark` only links `<https://...>`; a URL pasted on its own
//! stays plain text. This pass splits text nodes around `http(s)://` URLs,
//! `www.` hosts and email addresses and wraps each match in a link, so
//! later passes (video embeds in particular) see the same tree a GFM
//! renderer would produce.

use std::sync::LazyLock;

use linkify::{LinkFinder, LinkKind};
use wiki_tree::{Node, NodeKind, Span, map};

static FINDER: LazyLock<LinkFinder> = LazyLock::new(|| {
    let mut finder = LinkFinder::new();
    finder
        .kinds(&[LinkKind::Url, LinkKind::Email])
        .url_must_have_scheme(false);
    finder
});

/// Link bare URLs in every text node outside links and images.
#[must_use]
pub fn autolink(root: Node) -> Node {
    map(root, |mut node, _index, _parent| {
        if matches!(node.kind, NodeKind::Link { .. } | NodeKind::Image { .. })
            || !node.children.iter().any(is_text)
        {
            return node;
        }
        let children = std::mem::take(&mut node.children);
        node.children = children.into_iter().flat_map(split_text).collect();
        node
    })
}

fn is_text(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Text { .. })
}

fn split_text(node: Node) -> Vec<Node> {
    let NodeKind::Text { value } = &node.kind else {
        return vec![node];
    };
    // Offsets only map back onto the source when the text was not decoded
    // from entities or escapes.
    let base = node
        .span
        .filter(|span| span.len() == value.len())
        .map(|span| span.start);
    let sub_span = |start: usize, end: usize| base.map(|base| Span::new(base + start, base + end));

    let mut out = Vec::new();
    let mut last = 0;
    for link in FINDER.links(value) {
        let Some(href) = href(link.as_str(), link.kind()) else {
            continue;
        };
        if link.start() > last {
            out.push(Node::text(&value[last..link.start()]).with_span(sub_span(last, link.start())));
        }
        let span = sub_span(link.start(), link.end());
        out.push(
            Node::link(href, vec![Node::text(link.as_str()).with_span(span)]).with_span(span),
        );
        last = link.end();
    }
    if out.is_empty() {
        return vec![node];
    }
    if last < value.len() {
        out.push(Node::text(&value[last..]).with_span(sub_span(last, value.len())));
    }
    out
}

/// Link target for a match, or `None` for matches GFM leaves as text.
fn href(text: &str, kind: &LinkKind) -> Option<String> {
    match kind {
        LinkKind::Email => Some(format!("mailto:{text}")),
        LinkKind::Url => {
            let lower = text.to_ascii_lowercase();
            if lower.starts_with("http://") || lower.starts_with("https://") {
                Some(text.to_owned())
            } else if lower.starts_with("www.") {
                Some(format!("http://{text}"))
            } else {
                None
            }
        }
        _ => None,
    }
}
