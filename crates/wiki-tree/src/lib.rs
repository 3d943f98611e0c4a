//! Owned document tree for the wiki rendering pipeline.
//!
//! This crate provides the [`Node`] model shared by every pipeline pass and
//! the pre-order rewrite primitives [`map`] and [`try_map`] the passes are
//! built on.
//!
//! # Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for the tree types, producing
//!   an mdast-like JSON shape (`{"type": "paragraph", "children": [...]}`).

mod map;
mod node;

pub use map::{map, try_map};
pub use node::{AlertKind, Alignment, AttrValue, Attributes, Node, NodeKind, Span};
