//! `{placeholder}` substitution for kickoff inputs.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;

/// Kickoff inputs, keyed by placeholder name.
pub type Inputs = BTreeMap<String, Value>;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex should be valid")
});

/// Replace every `{name}` in `template` with the matching input.
///
/// Strings are inserted verbatim, other values in their JSON form. Returns
/// the first placeholder name without an input as the error.
pub fn interpolate(template: &str, inputs: &Inputs) -> Result<String, String> {
    let mut missing = None;
    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        let name = &caps[1];
        match inputs.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => {
                missing.get_or_insert_with(|| name.to_string());
                caps[0].to_string()
            }
        }
    });

    match missing {
        Some(name) => Err(name),
        None => Ok(rendered.into_owned()),
    }
}
