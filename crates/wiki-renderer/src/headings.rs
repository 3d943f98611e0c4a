//! Heading anchors, table of contents and title extraction.

use std::collections::HashMap;

use wiki_tree::{Node, NodeKind, map};

use crate::util::slugify;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Headings collected from a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outline {
    /// Text of the first H1, when title extraction is enabled.
    pub title: Option<String>,
    /// Every other heading, in document order.
    pub toc: Vec<TocEntry>,
}

/// Tree pass assigning heading ids and building the [`Outline`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeadingPass {
    pub assign_ids: bool,
    pub extract_title: bool,
}

impl HeadingPass {
    /// Assign ids to headings that lack one and collect the outline.
    ///
    /// Ids are slugs of the heading text; repeated slugs get `-1`, `-2`, ...
    /// suffixes. Ids given in the source (`## Setup {#install}`) are kept
    /// and reserve their slug.
    pub fn apply(self, root: Node) -> (Node, Outline) {
        let mut state = HeadingState::new(self);
        let root = map(root, |node, _, _| state.visit(node));
        (root, state.finish())
    }
}

struct HeadingState {
    pass: HeadingPass,
    outline: Outline,
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    fn new(pass: HeadingPass) -> Self {
        Self {
            pass,
            outline: Outline::default(),
            id_counts: HashMap::new(),
        }
    }

    fn visit(&mut self, mut node: Node) -> Node {
        let text = match node.kind {
            NodeKind::Heading { .. } => node.plain_text().trim().to_owned(),
            _ => return node,
        };
        let NodeKind::Heading { level, id, .. } = &mut node.kind else {
            return node;
        };

        if self.pass.extract_title && *level == 1 && self.outline.title.is_none() {
            self.outline.title = Some(text);
            return node;
        }
        if !self.pass.assign_ids {
            return node;
        }

        let anchor = match id {
            Some(explicit) => {
                *self.id_counts.entry(explicit.clone()).or_default() += 1;
                explicit.clone()
            }
            None => {
                let generated = self.generate_id(&text);
                *id = Some(generated.clone());
                generated
            }
        };
        self.outline.toc.push(TocEntry {
            level: *level,
            title: text,
            id: anchor,
        });
        node
    }

    /// Generate a unique ID for a heading.
    fn generate_id(&mut self, text: &str) -> String {
        let mut base_id = slugify(text);
        if base_id.is_empty() {
            base_id.push_str("section");
        }
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }

    fn finish(self) -> Outline {
        self.outline
    }
}
