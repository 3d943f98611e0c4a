//! Pre-order tree rewriting.
//!
//! [`map`] and [`try_map`] offer every node to a transform exactly once,
//! parent before children, in document order. The transform may return the
//! node unchanged, a modified copy, or a different subtree entirely. The
//! children of whatever it returns are then visited, with the returned node
//! as their parent. A returned node is never offered to the transform again,
//! so a rewrite whose output resembles its trigger cannot loop.

use std::convert::Infallible;

use crate::node::{Node, NodeKind};

/// Rewrite a tree in pre-order with an infallible transform.
///
/// The transform receives the node, its index within the parent's child
/// list, and the parent's kind (`None` for the root).
///
/// # Example
///
/// ```
/// use wiki_tree::{Node, NodeKind, map};
///
/// let tree = Node::root().with_children(vec![Node::paragraph(vec![Node::text("hi")])]);
/// let upper = map(tree, |mut node, _index, _parent| {
///     if let NodeKind::Text { value } = &mut node.kind {
///         *value = value.to_uppercase();
///     }
///     node
/// });
/// assert_eq!(upper.plain_text(), "HI");
/// ```
pub fn map<F>(root: Node, mut transform: F) -> Node
where
    F: FnMut(Node, usize, Option<&NodeKind>) -> Node,
{
    match try_map(root, |node, index, parent| {
        Ok::<_, Infallible>(transform(node, index, parent))
    }) {
        Ok(node) => node,
        Err(never) => match never {},
    }
}

/// Rewrite a tree in pre-order with a fallible transform.
///
/// The first error aborts the traversal; no partially rewritten tree is
/// returned.
pub fn try_map<F, E>(root: Node, mut transform: F) -> Result<Node, E>
where
    F: FnMut(Node, usize, Option<&NodeKind>) -> Result<Node, E>,
{
    preorder(root, 0, None, &mut transform)
}

fn preorder<F, E>(
    node: Node,
    index: usize,
    parent: Option<&NodeKind>,
    transform: &mut F,
) -> Result<Node, E>
where
    F: FnMut(Node, usize, Option<&NodeKind>) -> Result<Node, E>,
{
    let mut node = transform(node, index, parent)?;
    if node.children.is_empty() {
        return Ok(node);
    }

    let children = std::mem::take(&mut node.children);
    let mut mapped = Vec::with_capacity(children.len());
    for (child_index, child) in children.into_iter().enumerate() {
        mapped.push(preorder(child, child_index, Some(&node.kind), transform)?);
    }
    node.children = mapped;
    Ok(node)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::node::Attributes;

    fn sample() -> Node {
        Node::root().with_children(vec![
            Node::paragraph(vec![Node::text("one")]),
            Node::new(NodeKind::BlockQuote { alert: None })
                .with_children(vec![Node::paragraph(vec![Node::text("two")])]),
            Node::paragraph(vec![Node::text("three")]),
        ])
    }

    #[test]
    fn test_identity_preserves_tree() {
        let tree = sample();
        let mapped = map(tree.clone(), |node, _, _| node);
        assert_eq!(mapped, tree);
    }

    #[test]
    fn test_visits_each_node_once_in_preorder() {
        let mut visited = Vec::new();
        let tree = sample();
        let total = tree.count();
        map(tree, |node, index, parent| {
            let label = node
                .text_value()
                .map_or_else(|| node.kind.name().to_owned(), ToOwned::to_owned);
            visited.push((label, index, parent.map(NodeKind::name)));
            node
        });

        assert_eq!(visited.len(), total);
        assert_eq!(
            visited,
            vec![
                ("root".to_owned(), 0, None),
                ("paragraph".to_owned(), 0, Some("root")),
                ("one".to_owned(), 0, Some("paragraph")),
                ("blockquote".to_owned(), 1, Some("root")),
                ("paragraph".to_owned(), 0, Some("blockquote")),
                ("two".to_owned(), 0, Some("paragraph")),
                ("paragraph".to_owned(), 2, Some("root")),
                ("three".to_owned(), 0, Some("paragraph")),
            ]
        );
    }

    #[test]
    fn test_replacement_children_are_visited_with_new_parent() {
        let tree = Node::root().with_children(vec![Node::paragraph(vec![Node::text("x")])]);
        let mut parents = Vec::new();
        let mapped = map(tree, |node, _, parent| {
            parents.push(parent.map(NodeKind::name));
            if node.is_paragraph() {
                return Node::element("div", Attributes::new())
                    .with_children(vec![Node::text("a"), Node::text("b")]);
            }
            node
        });

        assert_eq!(parents, vec![None, Some("root"), Some("element"), Some("element")]);
        assert_eq!(mapped.children[0].children.len(), 2);
    }

    #[test]
    fn test_replacement_not_reoffered() {
        // The replacement has the same shape as its trigger; offering it
        // again would rewrite it forever.
        let tree = Node::root().with_children(vec![Node::paragraph(vec![Node::text("x")])]);
        let mut paragraphs_seen = 0;
        let mut texts_seen = Vec::new();
        let mapped = map(tree, |node, _, _| {
            if node.is_paragraph() {
                paragraphs_seen += 1;
                return Node::paragraph(vec![Node::text("replaced")]);
            }
            if let Some(text) = node.text_value() {
                texts_seen.push(text.to_owned());
            }
            node
        });

        assert_eq!(paragraphs_seen, 1);
        assert_eq!(texts_seen, vec!["replaced".to_owned()]);
        assert_eq!(mapped.plain_text(), "replaced");
    }

    #[test]
    fn test_try_map_fails_fast() {
        let mut visited = 0;
        let result: Result<Node, String> = try_map(sample(), |node, _, _| {
            visited += 1;
            if node.text_value() == Some("two") {
                return Err("boom".to_owned());
            }
            Ok(node)
        });

        assert_eq!(result, Err("boom".to_owned()));
        // root, p, "one", blockquote, p, "two" - the third paragraph is never reached
        assert_eq!(visited, 6);
    }

    #[test]
    fn test_removing_children_stops_descent() {
        let mapped = map(sample(), |mut node, _, parent| {
            if parent.is_some_and(NodeKind::is_root) {
                node.children.clear();
            }
            node
        });
        assert_eq!(mapped.count(), 4);
    }
}
