//! `${VAR}` references in configuration strings.
//!
//! Only the braced form is expanded, so URLs containing a bare `$` are safe.
//! `${VAR:-fallback}` uses `fallback` when `VAR` is unset; a plain `${VAR}`
//! naming an unset variable is an error that names the config field.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `value` against the process environment.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |name| std::env::var(name).ok())
}

/// Cause reported by the lookup for a variable that has no value.
struct Unset;

fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| lookup(name).map(Some).ok_or(Unset))
        .map(Cow::into_owned)
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.var_name),
        })
}
