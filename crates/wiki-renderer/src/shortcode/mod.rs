//! Wiki shortcodes.
//!
//! Shortcodes are paragraphs consisting solely of a `{{...}}` marker:
//!
//! ```markdown
//! {{tip}}
//!
//! Save often.
//!
//! {{/tip}}
//!
//! {{blueprint id="AbCdEfGh"}}
//! ```
//!
//! Block shortcodes capture the sibling nodes between `{{tag}}` and
//! `{{/tag}}`; inline shortcodes replace their own paragraph. Handlers are
//! looked up in a [`ShortcodeRegistry`] and run by a [`ShortcodeProcessor`].

mod builtin;
mod marker;
mod params;
mod processor;
mod registry;

pub use builtin::{Blueprint, Hint, VersionGate};
pub use params::{ParamValue, ShortcodeParams};
pub use processor::ShortcodeProcessor;
pub use registry::{
    BlockShortcode, InlineShortcode, RegistryBuilder, RegistryError, Shortcode,
    ShortcodeContext, ShortcodeDirective, ShortcodeRegistry,
};
