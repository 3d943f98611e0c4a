//! Shortcode parameter parsing.
//!
//! Parses the `name name="value"` region that follows a shortcode tag.

use std::collections::HashMap;

/// Value of a single shortcode parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    /// Bare `name`.
    Flag,
    /// Quoted `name="value"` with a non-empty value.
    Str(String),
}

/// Parameters parsed from a shortcode marker.
///
/// # Example
///
/// ```
/// use wiki_renderer::shortcode::{ParamValue, ShortcodeParams};
///
/// let params = ShortcodeParams::parse(r#"gte="5.0" lt="5.02" beta"#);
/// assert_eq!(params.get_str("gte"), Some("5.0"));
/// assert_eq!(params.get("beta"), Some(&ParamValue::Flag));
/// assert!(params.get("lte").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShortcodeParams {
    values: HashMap<String, ParamValue>,
}

impl ShortcodeParams {
    /// Parse a parameter string.
    ///
    /// Names consist of ASCII letters, digits, `-` and `_`. A later
    /// occurrence of a name replaces an earlier one. A name whose `=` is not
    /// followed by a non-empty quoted value is a flag; what follows the `=`
    /// is scanned again as ordinary input, except that an unterminated quote
    /// discards the rest. Stray characters are skipped one at a time.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut params = Self::default();
        let mut remaining = input;

        loop {
            remaining = remaining.trim_start();
            if remaining.is_empty() {
                break;
            }

            let name_len = remaining
                .find(|c: char| !is_name_char(c))
                .unwrap_or(remaining.len());
            if name_len == 0 {
                // Skip unrecognized character
                let mut chars = remaining.chars();
                chars.next();
                remaining = chars.as_str();
                continue;
            }

            let (name, rest) = remaining.split_at(name_len);
            let Some(after_eq) = rest.strip_prefix('=') else {
                params.insert(name, ParamValue::Flag);
                remaining = rest;
                continue;
            };

            let Some(quoted) = after_eq.strip_prefix('"') else {
                params.insert(name, ParamValue::Flag);
                remaining = after_eq;
                continue;
            };
            let Some(end_quote) = quoted.find('"') else {
                params.insert(name, ParamValue::Flag);
                break;
            };
            let value = &quoted[..end_quote];
            params.insert(
                name,
                if value.is_empty() {
                    ParamValue::Flag
                } else {
                    ParamValue::Str(value.to_owned())
                },
            );
            remaining = &quoted[end_quote + 1..];
        }

        params
    }

    fn insert(&mut self, name: &str, value: ParamValue) {
        self.values.insert(name.to_owned(), value);
    }

    /// Get a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Get a quoted parameter's value. Flags yield `None`.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            ParamValue::Str(value) => Some(value),
            ParamValue::Flag => None,
        }
    }

    /// Whether a parameter is present in any form.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
