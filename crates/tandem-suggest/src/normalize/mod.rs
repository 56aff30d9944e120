//! Response normalization.
//!
//! Turns the raw body returned by the gateway into normalized suggestions:
//!
//! 1. extract the answer text from the vendor envelope
//! 2. strip markdown code fences
//! 3. parse the payload as a JSON array, repairing common deviations
//! 4. decode each item, splitting compound entries
//!
//! Every step degrades to fewer suggestions rather than an error. A bad item
//! is dropped on its own; the rest of the batch survives.

mod compound;
pub mod envelope;
pub mod rules;
pub mod start_time;

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, trace, warn};

use tandem_core::NormalizedSuggestion;

pub use envelope::{extract_answer, strip_code_fences};
pub use start_time::{FirstStartTime, RandomStartTime, StartTimeSource};

/// Fields every response item is asked to carry, with their meaning.
pub const RESPONSE_FIELDS: [(&str, &str); 8] = [
    ("title", "short name of the activity"),
    ("description", "one or two sentences describing the activity"),
    ("estimated_cost", "approximate cost per couple in dollars, or \"Free\""),
    ("location", "venue or area where it takes place"),
    ("category", "exactly one of the valid categories listed below"),
    ("recommended_start_time", "clock time such as \"7:00 PM\""),
    ("duration", "length in hours as a number"),
    ("sequence", "1-based position of the activity within the outing"),
];

/// One response item read field by field from untrusted JSON.
///
/// Scalars of any JSON type are rendered to text; arrays are joined with ", ".
#[derive(Debug, Clone, PartialEq)]
pub struct RawModelSuggestion {
    pub title: String,
    pub description: Option<String>,
    pub estimated_cost: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub recommended_start_time: Option<String>,
    pub duration: Option<String>,
    pub sequence: Option<String>,
}

/// Why a response item was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("item is a JSON {0}, not an object")]
    NotAnObject(&'static str),

    #[error("item has no title")]
    MissingTitle,
}

impl RawModelSuggestion {
    /// Read an item from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self, ItemError> {
        let Some(obj) = value.as_object() else {
            return Err(ItemError::NotAnObject(json_kind(value)));
        };

        let title = field_text(obj, &["title", "name"]).ok_or(ItemError::MissingTitle)?;

        Ok(Self {
            title,
            description: field_text(obj, &["description"]),
            estimated_cost: field_text(obj, &["estimated_cost", "cost", "price"]),
            location: field_text(obj, &["location"]),
            category: field_text(obj, &["category"]),
            recommended_start_time: field_text(obj, &["recommended_start_time", "start_time"]),
            duration: field_text(obj, &["duration"]),
            sequence: field_text(obj, &["sequence"]),
        })
    }

    /// Whether the sequence field marks this item as several activities.
    pub fn is_compound(&self) -> bool {
        self.sequence
            .as_deref()
            .map(rules::is_compound_marker)
            .unwrap_or(false)
    }
}

/// First present key rendered to non-blank text.
fn field_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(value_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Result of decoding one response item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Single(NormalizedSuggestion),
    Compound(Vec<NormalizedSuggestion>),
    Discard(ItemError),
}

/// Keys a model commonly wraps the item list in, checked in order.
const WRAPPER_KEYS: [&str; 4] = ["suggestions", "activities", "items", "dates"];

/// The item list inside a wrapper object, if `obj` is one.
///
/// An object with a title is an item even when some of its fields are arrays.
/// Otherwise a known wrapper key wins, then the only array of objects.
fn unwrap_item_list(obj: &Map<String, Value>) -> Option<&Vec<Value>> {
    if obj.contains_key("title") || obj.contains_key("name") {
        return None;
    }

    let holds_objects =
        |items: &&Vec<Value>| !items.is_empty() && items.iter().any(Value::is_object);

    if let Some(items) = WRAPPER_KEYS
        .iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_array))
        .find(holds_objects)
    {
        return Some(items);
    }

    let mut candidates = obj.values().filter_map(Value::as_array).filter(holds_objects);
    match (candidates.next(), candidates.next()) {
        (Some(items), None) => Some(items),
        _ => None,
    }
}

/// Parse the payload as a list of items.
///
/// Accepts a JSON array, an object wrapping an array (`{"suggestions": [...]}`),
/// a bare object (one item), or an array embedded in surrounding prose.
fn parse_items(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => return Some(items),
        Ok(Value::Object(obj)) => {
            if let Some(items) = unwrap_item_list(&obj) {
                return Some(items.clone());
            }
            return Some(vec![Value::Object(obj)]);
        }
        Ok(_) => return None,
        Err(_) => {}
    }

    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Maps raw model output onto normalized suggestions.
#[derive(Clone)]
pub struct Normalizer {
    start_times: Arc<dyn StartTimeSource>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer").finish_non_exhaustive()
    }
}

impl Normalizer {
    /// Normalizer that picks missing start times at random.
    pub fn new() -> Self {
        Self::with_start_time_source(RandomStartTime)
    }

    /// Normalizer with a custom start-time source.
    pub fn with_start_time_source(source: impl StartTimeSource + 'static) -> Self {
        Self {
            start_times: Arc::new(source),
        }
    }

    /// Normalize a raw response body into an ordered list of suggestions.
    pub fn normalize(&self, raw: &str) -> Vec<NormalizedSuggestion> {
        let Some(answer) = extract_answer(raw) else {
            return Vec::new();
        };
        let payload = strip_code_fences(&answer);

        let Some(items) = parse_items(payload) else {
            warn!(
                response_len = payload.len(),
                "Unparsable suggestion payload, returning no suggestions"
            );
            return Vec::new();
        };

        let item_count = items.len();
        let mut suggestions = Vec::with_capacity(item_count);
        let mut dropped = 0usize;

        for (index, item) in items.iter().enumerate() {
            match self.decode_item(item) {
                ItemOutcome::Single(suggestion) => {
                    trace!(index, title = %suggestion.title, "Normalized item");
                    suggestions.push(suggestion);
                }
                ItemOutcome::Compound(parts) => {
                    debug!(index, fragments = parts.len(), "Split compound item");
                    suggestions.extend(parts);
                }
                ItemOutcome::Discard(reason) => {
                    warn!(index, reason = %reason, "Dropping malformed suggestion item");
                    dropped += 1;
                }
            }
        }

        debug!(
            item_count,
            dropped,
            suggestion_count = suggestions.len(),
            "Normalized response"
        );
        suggestions
    }

    /// Decode a single response item.
    pub fn decode_item(&self, value: &Value) -> ItemOutcome {
        let raw = match RawModelSuggestion::from_value(value) {
            Ok(raw) => raw,
            Err(e) => return ItemOutcome::Discard(e),
        };

        if raw.is_compound() {
            match compound::split_compound(&raw, self.start_times.as_ref()) {
                Some(parts) => return ItemOutcome::Compound(parts),
                None => debug!(
                    title = %raw.title,
                    "Compound marker without a connective, keeping as one suggestion"
                ),
            }
        }

        ItemOutcome::Single(self.normalize_single(&raw))
    }

    fn normalize_single(&self, raw: &RawModelSuggestion) -> NormalizedSuggestion {
        let category = rules::category_from_text(raw.category.as_deref().unwrap_or_default());
        let recommended_start_time = raw
            .recommended_start_time
            .clone()
            .unwrap_or_else(|| start_time::pick_start_time(self.start_times.as_ref(), category));
        let sequence = if raw.is_compound() {
            1
        } else {
            rules::parse_sequence(raw.sequence.as_deref())
        };

        NormalizedSuggestion {
            title: raw.title.clone(),
            description: raw.description.clone().unwrap_or_default(),
            location: raw.location.clone(),
            budget: rules::budget_from_cost(raw.estimated_cost.as_deref().unwrap_or_default()),
            category,
            recommended_start_time: Some(recommended_start_time),
            duration: raw.duration.as_deref().and_then(rules::parse_duration),
            sequence,
        }
    }
}
