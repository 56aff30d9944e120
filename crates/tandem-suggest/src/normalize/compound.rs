//! Splitting of compound entries.
//!
//! Models sometimes pack several activities into one item ("Hike the trail.
//! followed by Lunch at the cafe." with `sequence: "1,2"`). Such an item is
//! split on the "followed by" connective and each fragment becomes its own
//! suggestion, with the shared fields apportioned across fragments.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use tandem_core::NormalizedSuggestion;

use super::rules::{self, CLOCK_RE};
use super::start_time::{pick_start_time, StartTimeSource};
use super::RawModelSuggestion;

static FOLLOWED_BY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfollowed\s+by\b").expect("valid connective regex"));

/// Split a compound item into its fragments.
///
/// Returns `None` when the description has fewer than two non-empty
/// fragments; the caller then treats the item as a single suggestion.
pub(crate) fn split_compound(
    raw: &RawModelSuggestion,
    start_times: &dyn StartTimeSource,
) -> Option<Vec<NormalizedSuggestion>> {
    let description = raw.description.as_deref().unwrap_or_default();
    let fragments: Vec<&str> = FOLLOWED_BY_RE
        .split(description)
        .map(|f| f.trim().trim_end_matches([',', ';']).trim())
        .filter(|f| !f.is_empty())
        .collect();

    let count = fragments.len();
    if count < 2 {
        return None;
    }

    let locations: Vec<&str> = raw
        .location
        .as_deref()
        .map(|l| l.split('&').map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let shared_location = raw
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let budget = rules::budget_from_cost(raw.estimated_cost.as_deref().unwrap_or_default());
    let shared_duration = raw.duration.as_deref().and_then(rules::parse_duration);

    let suggestions = fragments
        .iter()
        .enumerate()
        .map(|(index, fragment)| {
            let category = rules::infer_category(fragment);
            let location = if locations.len() >= count {
                Some(locations[index].to_string())
            } else {
                shared_location.map(str::to_string)
            };
            let recommended_start_time =
                apportion_start_time(raw.recommended_start_time.as_deref(), index)
                    .unwrap_or_else(|| pick_start_time(start_times, category));
            let duration = shared_duration
                .map(|d| rules::round_tenth(d / count as f64))
                .filter(|d| *d > 0.0);

            trace!(index, category = %category, "Split compound fragment");

            NormalizedSuggestion {
                title: fragment_title(fragment),
                description: fragment.to_string(),
                location,
                budget,
                category,
                recommended_start_time: Some(recommended_start_time),
                duration,
                sequence: index as u32 + 1,
            }
        })
        .collect();

    Some(suggestions)
}

/// Title of a fragment: its first sentence, capitalized.
fn fragment_title(fragment: &str) -> String {
    let sentence = fragment
        .split(['.', '!', '?'])
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(fragment);

    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pick the start time belonging to fragment `index`.
///
/// Explicit "&" or "," separators win, then clock times found in the text
/// (the first one when there are too few); otherwise every fragment shares the
/// original string.
fn apportion_start_time(raw: Option<&str>, index: usize) -> Option<String> {
    let text = raw.map(str::trim).filter(|t| !t.is_empty())?;

    if text.contains(['&', ',']) {
        let parts: Vec<&str> = text
            .split(['&', ','])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        return Some(parts.get(index).copied().unwrap_or(text).to_string());
    }

    let clocks: Vec<&str> = CLOCK_RE.find_iter(text).map(|m| m.as_str()).collect();
    if let Some(clock) = clocks.get(index).or(clocks.first()) {
        return Some(clock.to_string());
    }

    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::start_time::FirstStartTime;
    use tandem_core::{Budget, Category};

    fn compound(description: &str) -> RawModelSuggestion {
        RawModelSuggestion {
            title: "Day out".to_string(),
            description: Some(description.to_string()),
            estimated_cost: Some("$40".to_string()),
            location: Some("Trailhead & Cafe Main St".to_string()),
            category: Some("outdoor, dining".to_string()),
            recommended_start_time: Some("10:00 AM & 1:00 PM".to_string()),
            duration: Some("3".to_string()),
            sequence: Some("1,2".to_string()),
        }
    }

    #[test]
    fn test_split_two_fragments() {
        let raw = compound("Hike the trail. followed by Lunch at the cafe.");
        let parts = split_compound(&raw, &FirstStartTime).expect("should split");

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].title, "Hike the trail");
        assert_eq!(parts[0].category, Category::Outdoor);
        assert_eq!(parts[0].location.as_deref(), Some("Trailhead"));
        assert_eq!(parts[0].sequence, 1);
        assert_eq!(parts[0].recommended_start_time.as_deref(), Some("10:00 AM"));

        assert_eq!(parts[1].title, "Lunch at the cafe");
        assert_eq!(parts[1].category, Category::Dining);
        assert_eq!(parts[1].location.as_deref(), Some("Cafe Main St"));
        assert_eq!(parts[1].sequence, 2);
        assert_eq!(parts[1].recommended_start_time.as_deref(), Some("1:00 PM"));
    }

    #[test]
    fn test_split_shares_budget_and_divides_duration() {
        let raw = compound("Hike the trail. followed by Lunch at the cafe.");
        let parts = split_compound(&raw, &FirstStartTime).unwrap();
        for part in &parts {
            assert_eq!(part.budget, Budget::Low);
            assert_eq!(part.duration, Some(1.5));
        }
    }

    #[test]
    fn test_duration_rounded_to_one_decimal() {
        let mut raw = compound("Museum tour followed by Dinner followed by A concert");
        raw.duration = Some("4".to_string());
        let parts = split_compound(&raw, &FirstStartTime).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.duration == Some(1.3)));
    }

    #[test]
    fn test_connective_is_case_insensitive() {
        let raw = compound("Visit the gallery, FOLLOWED BY dinner downtown");
        let parts = split_compound(&raw, &FirstStartTime).unwrap();
        assert_eq!(parts[0].title, "Visit the gallery");
        assert_eq!(parts[0].category, Category::Cultural);
        assert_eq!(parts[1].title, "Dinner downtown");
        assert_eq!(parts[1].category, Category::Dining);
    }

    #[test]
    fn test_too_few_locations_share_full_location() {
        let mut raw = compound("Park stroll followed by Movie night");
        raw.location = Some("Downtown".to_string());
        let parts = split_compound(&raw, &FirstStartTime).unwrap();
        assert!(parts.iter().all(|p| p.location.as_deref() == Some("Downtown")));
    }

    #[test]
    fn test_no_connective_does_not_split() {
        let raw = compound("A long day of hiking and eating.");
        assert!(split_compound(&raw, &FirstStartTime).is_none());

        let raw = compound("followed by lunch");
        assert!(split_compound(&raw, &FirstStartTime).is_none());
    }

    #[test]
    fn test_apportion_start_time() {
        assert_eq!(apportion_start_time(Some("6pm, 8pm"), 1).as_deref(), Some("8pm"));
        assert_eq!(
            apportion_start_time(Some("6:00 PM then 8:30 PM"), 1).as_deref(),
            Some("8:30 PM")
        );
        assert_eq!(apportion_start_time(Some("evening"), 1).as_deref(), Some("evening"));
        assert_eq!(
            apportion_start_time(Some("Starts around 7pm"), 0).as_deref(),
            Some("7pm")
        );
        assert_eq!(
            apportion_start_time(Some("Starts around 7pm"), 1).as_deref(),
            Some("7pm")
        );
        assert_eq!(apportion_start_time(Some("6pm & 8pm"), 2).as_deref(), Some("6pm & 8pm"));
        assert_eq!(apportion_start_time(Some("  "), 0), None);
        assert_eq!(apportion_start_time(None, 0), None);
    }

    #[test]
    fn test_missing_start_time_comes_from_pool() {
        let mut raw = compound("Hike the trail followed by Lunch at the cafe");
        raw.recommended_start_time = None;
        let parts = split_compound(&raw, &FirstStartTime).unwrap();
        assert_eq!(parts[0].recommended_start_time.as_deref(), Some("9:00 AM"));
        assert_eq!(parts[1].recommended_start_time.as_deref(), Some("12:00 PM"));
    }
}
