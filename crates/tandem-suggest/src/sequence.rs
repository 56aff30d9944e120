//! Batch sequencing.
//!
//! Fixes the final order of a batch: positions are renumbered 1..N in the
//! order received, the first entry becomes the root and every other entry is
//! linked to it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use tandem_core::{Error, NormalizedSuggestion, Result};

/// A sequenced suggestion with its provisional identity and parent link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    /// Provisional id; persistence maps it onto a durable key.
    pub id: Uuid,
    /// Root entry id for every entry except the root itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    #[serde(flatten)]
    pub suggestion: NormalizedSuggestion,
}

impl BatchEntry {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Ordered suggestions from one generation call.
///
/// Only [`sequence`] builds a batch, so numbering and root linkage always hold.
/// A batch cannot be read back from JSON:
///
/// ```compile_fail
/// let batch: tandem_suggest::SuggestionBatch =
///     serde_json::from_str(r#"{"generated_at":"2026-01-01T00:00:00Z","entries":[]}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionBatch {
    generated_at: DateTime<Utc>,
    entries: Vec<BatchEntry>,
}

impl SuggestionBatch {
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at sequence 1.
    pub fn root(&self) -> Option<&BatchEntry> {
        self.entries.first()
    }

    /// Entries linked to the root.
    pub fn children(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().skip(1)
    }

    pub fn into_entries(self) -> Vec<BatchEntry> {
        self.entries
    }

    /// Reject a batch with nothing usable in it.
    pub fn into_non_empty(self) -> Result<Self> {
        if self.is_empty() {
            Err(Error::EmptyBatch)
        } else {
            Ok(self)
        }
    }
}

/// Sequence normalized suggestions into a batch.
///
/// Sequence hints from the normalizer are advisory and overwritten.
pub fn sequence(suggestions: Vec<NormalizedSuggestion>) -> SuggestionBatch {
    let mut root_id = None;
    let entries = suggestions
        .into_iter()
        .enumerate()
        .map(|(index, mut suggestion)| {
            suggestion.sequence = index as u32 + 1;
            let id = Uuid::now_v7();
            let parent_id = match root_id {
                Some(root) => Some(root),
                None => {
                    root_id = Some(id);
                    None
                }
            };
            BatchEntry {
                id,
                parent_id,
                suggestion,
            }
        })
        .collect();

    SuggestionBatch {
        generated_at: Utc::now(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::{Budget, Category};

    fn suggestion(title: &str, hint: u32) -> NormalizedSuggestion {
        NormalizedSuggestion {
            title: title.to_string(),
            description: String::new(),
            location: None,
            budget: Budget::Low,
            category: Category::Dining,
            recommended_start_time: Some("7:00 PM".to_string()),
            duration: Some(1.0),
            sequence: hint,
        }
    }

    #[test]
    fn test_sequence_renumbers_in_received_order() {
        let batch = sequence(vec![
            suggestion("a", 3),
            suggestion("b", 1),
            suggestion("c", 1),
        ]);
        let seqs: Vec<_> = batch.entries().iter().map(|e| e.suggestion.sequence).collect();
        let titles: Vec<_> = batch
            .entries()
            .iter()
            .map(|e| e.suggestion.title.as_str())
            .collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_root_and_parent_links() {
        let batch = sequence(vec![
            suggestion("a", 1),
            suggestion("b", 2),
            suggestion("c", 3),
        ]);
        let root = batch.root().unwrap();
        assert!(root.is_root());
        assert_eq!(batch.children().count(), 2);
        assert!(batch.children().all(|e| e.parent_id == Some(root.id)));
    }

    #[test]
    fn test_ids_are_unique() {
        let batch = sequence(vec![suggestion("a", 1), suggestion("b", 1)]);
        assert_ne!(batch.entries()[0].id, batch.entries()[1].id);
    }

    #[test]
    fn test_single_entry_has_no_children() {
        let batch = sequence(vec![suggestion("only", 5)]);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.root().unwrap().suggestion.sequence, 1);
        assert_eq!(batch.children().count(), 0);
    }

    #[test]
    fn test_empty_batch() {
        let batch = sequence(Vec::new());
        assert!(batch.is_empty());
        assert!(batch.root().is_none());
        assert!(matches!(batch.into_non_empty(), Err(Error::EmptyBatch)));
    }

    #[test]
    fn test_into_non_empty_keeps_entries() {
        let batch = sequence(vec![suggestion("a", 1)]).into_non_empty().unwrap();
        assert_eq!(batch.into_entries().len(), 1);
    }

    #[test]
    fn test_entry_serializes_flat() {
        let batch = sequence(vec![suggestion("a", 1), suggestion("b", 1)]);
        let json = serde_json::to_value(&batch).unwrap();
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries[0]["title"], "a");
        assert_eq!(entries[0]["sequence"], 1);
        assert!(entries[0].get("parent_id").is_none());
        assert_eq!(entries[1]["parent_id"], entries[0]["id"]);
        assert_eq!(entries[1]["category"], "dining");
        assert!(json["generated_at"].is_string());
    }
}
