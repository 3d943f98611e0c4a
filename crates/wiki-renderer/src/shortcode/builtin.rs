//! Built-in shortcodes.

use wiki_tree::{Attributes, Node};

use super::params::ShortcodeParams;
use super::registry::{BlockShortcode, InlineShortcode, ShortcodeContext};
use crate::version::VersionRules;

/// Callout box: `{{tip}}` ... `{{/tip}}` becomes `<div class="hint is-tip">`.
#[derive(Clone, Debug)]
pub struct Hint {
    kind: String,
}

impl Hint {
    /// Hint kinds registered by default.
    pub const DEFAULT_KINDS: &'static [&'static str] =
        &["tip", "note", "todo", "success", "warning", "danger"];

    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl BlockShortcode for Hint {
    fn name(&self) -> &str {
        &self.kind
    }

    fn node(
        &self,
        _params: &ShortcodeParams,
        children: Vec<Node>,
        _ctx: &mut ShortcodeContext<'_>,
    ) -> Node {
        Node::element(
            "div",
            Attributes::new().with("class", format!("hint is-{}", self.kind)),
        )
        .with_children(children)
    }
}

/// Blueprint viewer: `{{blueprint id="AbCdEfGh"}}`.
///
/// Ids are exactly eight characters. Anything else renders as an empty
/// `div.blueprint.is-invalid` so the author can spot the mistake.
#[derive(Clone, Debug)]
pub struct Blueprint {
    base_url: String,
}

impl Default for Blueprint {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl Blueprint {
    pub const DEFAULT_BASE_URL: &'static str = "https://blueprintue.com/render/";

    /// Length of a valid blueprint id.
    pub const ID_LEN: usize = 8;

    /// Create a blueprint shortcode rendering from `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }
}

impl InlineShortcode for Blueprint {
    fn name(&self) -> &'static str {
        "blueprint"
    }

    fn node(&self, params: &ShortcodeParams, ctx: &mut ShortcodeContext<'_>) -> Node {
        let id = params.get_str("id").unwrap_or_default();
        if id.chars().count() != Self::ID_LEN {
            ctx.warn(format_args!(
                "id must be {} characters, got {id:?}",
                Self::ID_LEN
            ));
            return Node::element("div", Attributes::new().with("class", "blueprint is-invalid"));
        }

        Node::element(
            "iframe",
            Attributes::new()
                .with("class", "blueprint")
                .with("src", format!("{}{id}", self.base_url))
                .with("scrolling", "no")
                .with("allowfullscreen", true)
                .with("height", "500"),
        )
    }

    fn embed_source(&self) -> Option<&str> {
        Some(&self.base_url)
    }
}

/// Version-gated content: `{{version gte="5.0" lt="5.02"}}` ... `{{/version}}`.
///
/// Becomes `<div class="version" data-rules="version >= 5.0 && version < 5.02">`.
#[derive(Clone, Copy, Debug, Default)]
pub struct VersionGate;

impl BlockShortcode for VersionGate {
    fn name(&self) -> &'static str {
        "version"
    }

    fn node(
        &self,
        params: &ShortcodeParams,
        children: Vec<Node>,
        ctx: &mut ShortcodeContext<'_>,
    ) -> Node {
        let rules = VersionRules::from_params(params);
        if rules.is_empty() {
            ctx.warn("no version bounds given");
        }
        for rule in rules.rules() {
            match rule.version() {
                Ok(version) if version.is_known() => {}
                Ok(_) => ctx.warn(format_args!("unknown engine version {}", rule.operand)),
                Err(err) => ctx.warn(err),
            }
        }

        Node::element(
            "div",
            Attributes::new()
                .with("class", "version")
                .with("data-rules", rules.expression()),
        )
        .with_children(children)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiki_tree::AttrValue;

    use super::*;
    use crate::shortcode::ShortcodeRegistry;

    fn with_ctx<R>(f: impl FnOnce(&mut ShortcodeContext<'_>) -> R) -> (R, Vec<String>) {
        let registry = ShortcodeRegistry::default();
        let mut warnings = Vec::new();
        let mut ctx = ShortcodeContext {
            registry: &registry,
            source: None,
            tag: "test",
            span: None,
            warnings: &mut warnings,
        };
        let result = f(&mut ctx);
        (result, warnings)
    }

    fn class(node: &Node) -> Option<&str> {
        node.attributes()?.get_str("class")
    }

    #[test]
    fn test_hint_wraps_children() {
        let body = vec![Node::paragraph(vec![Node::text("Hello")])];
        let (node, warnings) = with_ctx(|ctx| {
            Hint::new("warning").node(&ShortcodeParams::default(), body.clone(), ctx)
        });
        assert_eq!(node.element_tag(), Some("div"));
        assert_eq!(class(&node), Some("hint is-warning"));
        assert_eq!(node.children, body);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_blueprint_valid_id() {
        let params = ShortcodeParams::parse(r#"id="AbCdEfGh""#);
        let (node, warnings) = with_ctx(|ctx| Blueprint::default().node(&params, ctx));
        assert_eq!(node.element_tag(), Some("iframe"));
        let attrs = node.attributes().unwrap();
        assert_eq!(attrs.get_str("class"), Some("blueprint"));
        assert_eq!(
            attrs.get_str("src"),
            Some("https://blueprintue.com/render/AbCdEfGh")
        );
        assert_eq!(attrs.get_str("scrolling"), Some("no"));
        assert_eq!(attrs.get_str("height"), Some("500"));
        assert_eq!(attrs.get("allowfullscreen"), Some(&AttrValue::Bool(true)));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_blueprint_invalid_ids() {
        for raw in [r#"id="short""#, r#"id="toolongid""#, "id", "", r#"id="""#] {
            let params = ShortcodeParams::parse(raw);
            let (node, warnings) = with_ctx(|ctx| Blueprint::default().node(&params, ctx));
            assert_eq!(node.element_tag(), Some("div"), "{raw}");
            assert_eq!(class(&node), Some("blueprint is-invalid"), "{raw}");
            assert_eq!(warnings.len(), 1, "{raw}");
        }
    }

    #[test]
    fn test_blueprint_counts_characters_not_bytes() {
        let params = ShortcodeParams::parse(r#"id="äbcdefgh""#);
        let (node, _) = with_ctx(|ctx| Blueprint::default().node(&params, ctx));
        assert_eq!(node.element_tag(), Some("iframe"));
    }

    #[test]
    fn test_blueprint_custom_base() {
        let blueprint = Blueprint::new("https://bp.example.com/embed");
        assert_eq!(blueprint.embed_source(), Some("https://bp.example.com/embed/"));
        let params = ShortcodeParams::parse(r#"id="12345678""#);
        let (node, _) = with_ctx(|ctx| blueprint.node(&params, ctx));
        assert_eq!(
            node.attributes().unwrap().get_str("src"),
            Some("https://bp.example.com/embed/12345678")
        );
    }

    #[test]
    fn test_version_gate() {
        let params = ShortcodeParams::parse(r#"gte="5.0" lt="5.02""#);
        let body = vec![Node::paragraph(vec![Node::text("new")])];
        let (node, warnings) =
            with_ctx(|ctx| VersionGate.node(&params, body.clone(), ctx));
        assert_eq!(class(&node), Some("version"));
        assert_eq!(
            node.attributes().unwrap().get_str("data-rules"),
            Some("version >= 5.0 && version < 5.02")
        );
        assert_eq!(node.children, body);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_version_gate_warnings() {
        let params = ShortcodeParams::parse(r#"gte="6.0" lt="soon""#);
        let (node, warnings) = with_ctx(|ctx| VersionGate.node(&params, Vec::new(), ctx));
        assert_eq!(
            node.attributes().unwrap().get_str("data-rules"),
            Some("version >= 6.0 && version < soon")
        );
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("unknown engine version 6.0"));
        assert!(warnings[1].contains("invalid engine version"));

        // Minor releases are hundredths: 4.1 is release 4.10, 5.3 would be 5.30.
        let params = ShortcodeParams::parse(r#"gte="4.1" lt="5.3""#);
        let (_, warnings) = with_ctx(|ctx| VersionGate.node(&params, Vec::new(), ctx));
        assert_eq!(
            warnings,
            vec!["{{test}}: unknown engine version 5.3".to_owned()]
        );

        let (_, warnings) =
            with_ctx(|ctx| VersionGate.node(&ShortcodeParams::default(), Vec::new(), ctx));
        assert_eq!(warnings, vec!["{{test}}: no version bounds given".to_owned()]);
    }
}
