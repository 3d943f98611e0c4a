//! Engine versions and version-gate rules.
//!
//! Wiki pages can mark content as applying only to some engine releases:
//!
//! ```markdown
//! {{version gte="5.0" lt="5.02"}}
//!
//! Only relevant to 5.0 and 5.1.
//!
//! {{/version}}
//! ```
//!
//! The rule is carried to the page as a `data-rules` expression
//! (`version >= 5.0 && version < 5.02`) that the client evaluates
//! numerically against the reader's preferred version.
//!
//! Versions are decimal numbers with the minor release in hundredths:
//! `4.01` is release 4.1, `4.1` and `4.10` are both release 4.10, `5.03` is
//! release 5.3.

use std::fmt;
use std::str::FromStr;

use crate::shortcode::ShortcodeParams;

/// An engine version in the wiki's decimal notation, stored as hundredths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionNumber(u32);

/// Published releases.
const RELEASES: &[VersionNumber] = &[
    VersionNumber::new(4, 0),
    VersionNumber::new(4, 1),
    VersionNumber::new(4, 2),
    VersionNumber::new(4, 3),
    VersionNumber::new(4, 4),
    VersionNumber::new(4, 5),
    VersionNumber::new(4, 6),
    VersionNumber::new(4, 7),
    VersionNumber::new(4, 8),
    VersionNumber::new(4, 9),
    VersionNumber::new(4, 10),
    VersionNumber::new(4, 11),
    VersionNumber::new(4, 12),
    VersionNumber::new(4, 13),
    VersionNumber::new(4, 14),
    VersionNumber::new(4, 15),
    VersionNumber::new(4, 16),
    VersionNumber::new(4, 17),
    VersionNumber::new(4, 18),
    VersionNumber::new(4, 19),
    VersionNumber::new(4, 20),
    VersionNumber::new(4, 21),
    VersionNumber::new(4, 22),
    VersionNumber::new(4, 23),
    VersionNumber::new(4, 24),
    VersionNumber::new(4, 25),
    VersionNumber::new(4, 26),
    VersionNumber::new(4, 27),
    VersionNumber::new(5, 0),
    VersionNumber::new(5, 1),
    VersionNumber::new(5, 2),
    VersionNumber::new(5, 3),
];

impl VersionNumber {
    /// Release `major.minor`; `minor` must be below 100.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self(major * 100 + minor)
    }

    /// Whether this is a published release.
    #[must_use]
    pub fn is_known(self) -> bool {
        RELEASES.contains(&self)
    }
}

/// Error parsing a [`VersionNumber`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid engine version {0:?}")]
pub struct ParseVersionError(String);

impl FromStr for VersionNumber {
    type Err = ParseVersionError;

    /// Parse `"5"`, `"5.0"`, `"4.01"` or `"4.1"` (the last two differ).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError(s.to_owned());
        let trimmed = s.trim();
        let (major, fraction) = trimmed.split_once('.').unwrap_or((trimmed, "0"));
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(major) || !digits(fraction) || fraction.len() > 2 {
            return Err(err());
        }
        let major: u32 = major.parse().map_err(|_| err())?;
        let hundredths: u32 = format!("{fraction:0<2}").parse().map_err(|_| err())?;
        major
            .checked_mul(100)
            .and_then(|n| n.checked_add(hundredths))
            .map(Self)
            .ok_or_else(err)
    }
}

impl fmt::Display for VersionNumber {
    /// Shortest decimal form: `4.1` for release 4.10, `4.01` for 4.1.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, hundredths) = (self.0 / 100, self.0 % 100);
        match hundredths {
            0 => write!(f, "{major}"),
            h if h % 10 == 0 => write!(f, "{major}.{}", h / 10),
            h => write!(f, "{major}.{h:02}"),
        }
    }
}

/// Comparison operator in a version rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    /// Operator as written in the rule expression.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// One `version <op> <operand>` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub comparison: Comparison,
    /// Operand as the author wrote it.
    pub operand: String,
}

impl Rule {
    /// Operand parsed as a version.
    ///
    /// # Errors
    ///
    /// Returns [`ParseVersionError`] if the operand is not a decimal version.
    pub fn version(&self) -> Result<VersionNumber, ParseVersionError> {
        self.operand.parse()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "version {} {}", self.comparison.symbol(), self.operand)
    }
}

/// Conjunction of version rules built from shortcode parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionRules {
    rules: Vec<Rule>,
}

impl VersionRules {
    /// Build rules from `is`, `gt`, `gte`, `lt` and `lte` parameters.
    ///
    /// `is` alone decides when present. Otherwise one lower bound (`gte`
    /// before `gt`) and one upper bound (`lte` before `lt`) are combined.
    /// Empty values and bare flags are ignored.
    #[must_use]
    pub fn from_params(params: &ShortcodeParams) -> Self {
        let rule = |comparison, name| {
            params.get_str(name).map(|operand| Rule {
                comparison,
                operand: operand.to_owned(),
            })
        };

        if let Some(is) = rule(Comparison::Eq, "is") {
            return Self { rules: vec![is] };
        }

        let lower = rule(Comparison::Gte, "gte").or_else(|| rule(Comparison::Gt, "gt"));
        let upper = rule(Comparison::Lte, "lte").or_else(|| rule(Comparison::Lt, "lt"));
        Self {
            rules: lower.into_iter().chain(upper).collect(),
        }
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The `data-rules` expression, e.g. `version >= 5.0 && version < 5.02`.
    #[must_use]
    pub fn expression(&self) -> String {
        self.rules
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" && ")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rules(params: &str) -> VersionRules {
        VersionRules::from_params(&ShortcodeParams::parse(params))
    }

    #[test]
    fn test_parse_version() {
        assert_eq!("5.0".parse(), Ok(VersionNumber::new(5, 0)));
        assert_eq!("4.27".parse(), Ok(VersionNumber::new(4, 27)));
        assert_eq!(" 5 ".parse(), Ok(VersionNumber::new(5, 0)));
        assert!("5.".parse::<VersionNumber>().is_err());
        assert!("five".parse::<VersionNumber>().is_err());
        assert!("5.0.1".parse::<VersionNumber>().is_err());
        assert!("-5.0".parse::<VersionNumber>().is_err());
        assert!("4.001".parse::<VersionNumber>().is_err());
    }

    #[test]
    fn test_decimal_notation() {
        let v = |s: &str| s.parse::<VersionNumber>().unwrap();
        assert_eq!(v("4.01"), VersionNumber::new(4, 1));
        assert_eq!(v("4.1"), VersionNumber::new(4, 10));
        assert_eq!(v("4.1"), v("4.10"));
        assert_eq!(v("4.2"), VersionNumber::new(4, 20));
        // `lt="4.2"` admits release 4.10.
        assert!(v("4.1") < v("4.2"));
        assert!(v("4.09") < v("4.1"));
        assert!(v("4.27") < v("5"));
    }

    #[test]
    fn test_display_uses_decimal_notation() {
        assert_eq!(VersionNumber::new(4, 10).to_string(), "4.1");
        assert_eq!(VersionNumber::new(4, 1).to_string(), "4.01");
        assert_eq!(VersionNumber::new(4, 27).to_string(), "4.27");
        assert_eq!(VersionNumber::new(5, 0).to_string(), "5");
    }

    #[test]
    fn test_published_releases_are_known() {
        let published = [
            "4.0", "4.01", "4.02", "4.03", "4.04", "4.05", "4.06", "4.07", "4.08", "4.09", "4.10",
            "4.11", "4.12", "4.13", "4.14", "4.15", "4.16", "4.17", "4.18", "4.19", "4.20", "4.21",
            "4.22", "4.23", "4.24", "4.25", "4.26", "4.27", "5.0", "5.01", "5.02", "5.03",
        ];
        assert_eq!(published.len(), RELEASES.len());
        for number in published {
            assert!(number.parse::<VersionNumber>().unwrap().is_known(), "{number}");
        }
        assert!("4.2".parse::<VersionNumber>().unwrap().is_known());
        assert!(!"4.28".parse::<VersionNumber>().unwrap().is_known());
        assert!(!"5.3".parse::<VersionNumber>().unwrap().is_known());
        assert!(!"3.0".parse::<VersionNumber>().unwrap().is_known());
    }

    #[test]
    fn test_range_expression() {
        assert_eq!(
            rules(r#"gte="5.0" lt="5.02""#).expression(),
            "version >= 5.0 && version < 5.02"
        );
        assert_eq!(rules(r#"gt="4.27""#).expression(), "version > 4.27");
        assert_eq!(rules(r#"lte="5.1""#).expression(), "version <= 5.1");
    }

    #[test]
    fn test_is_takes_sole_effect() {
        assert_eq!(
            rules(r#"gte="4.0" is="5.1" lt="5.3""#).expression(),
            "version == 5.1"
        );
    }

    #[test]
    fn test_gte_beats_gt_and_lte_beats_lt() {
        assert_eq!(
            rules(r#"gt="4.0" gte="4.1" lt="5.3" lte="5.2""#).expression(),
            "version >= 4.1 && version <= 5.2"
        );
    }

    #[test]
    fn test_empty_and_flag_params_ignored() {
        assert_eq!(rules(r#"is="" gte="5.0""#).expression(), "version >= 5.0");
        assert_eq!(rules(r#"gte gt="4.0""#).expression(), "version > 4.0");
        assert!(rules("").is_empty());
        assert_eq!(rules("").expression(), "");
    }
}
