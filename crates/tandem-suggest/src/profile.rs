//! Profile context builder.
//!
//! Turns a stored [`UserProfile`] into the [`ProfileContext`] the prompt is
//! rendered from. Nothing here fails: bad list text becomes an empty list and
//! unknown enum values fall back to their defaults.

use std::collections::HashSet;
use std::str::FromStr;

use tandem_core::{ProfileContext, UserProfile};
use tracing::{debug, warn};

/// Build the normalized context for a profile.
pub fn build_context(profile: &UserProfile) -> ProfileContext {
    ProfileContext {
        name: clean_scalar(profile.name.as_deref()).unwrap_or_default(),
        location: clean_scalar(profile.location.as_deref()).unwrap_or_default(),
        time_window: parse_or_default("preferred_time", profile.preferred_time.as_deref()),
        duration_window: parse_or_default(
            "preferred_duration",
            profile.preferred_duration.as_deref(),
        ),
        dietary_preferences: parse_list(
            "dietary_preferences",
            profile.dietary_preferences.as_deref(),
        ),
        allergies: dedup_case_insensitive(parse_list("allergies", profile.allergies.as_deref())),
        interests: dedup_case_insensitive(parse_list("interests", profile.interests.as_deref())),
        budget_hint: parse_optional("budget", profile.budget.as_deref()),
        category_filter: parse_optional("category_filter", profile.category_filter.as_deref()),
    }
}

fn clean_scalar(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse an enum field, degrading to its default when absent or unknown.
fn parse_or_default<T>(field: &str, raw: Option<&str>) -> T
where
    T: FromStr + Default,
{
    let Some(value) = clean_scalar(raw) else {
        return T::default();
    };
    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            debug!(field, value = %value, "Unrecognized profile value, using default");
            T::default()
        }
    }
}

/// Parse a nullable enum field; unknown values become `None`.
fn parse_optional<T: FromStr>(field: &str, raw: Option<&str>) -> Option<T> {
    let value = clean_scalar(raw)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!(field, value = %value, "Unrecognized profile value, ignoring");
            None
        }
    }
}

/// Parse a serialized JSON list. Absent or unparsable text yields an empty list.
///
/// Non-string scalars are rendered to text and blank entries are dropped.
pub fn parse_list(field: &str, raw: Option<&str>) -> Vec<String> {
    let Some(text) = clean_scalar(raw) else {
        return Vec::new();
    };

    let items = match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(serde_json::Value::Null) => return Vec::new(),
        Ok(other) => {
            warn!(field, kind = %json_kind(&other), "Profile list is not a JSON array, ignoring");
            return Vec::new();
        }
        Err(e) => {
            warn!(field, error = %e, "Unparsable profile list, ignoring");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Keep the first occurrence of each entry, comparing case-insensitively.
fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
