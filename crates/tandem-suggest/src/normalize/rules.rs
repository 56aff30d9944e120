//! Field-level normalization rules.
//!
//! Each free-form field is mapped through an ordered list of rules; the first
//! rule that recognizes the text decides the value and a fixed fallback covers
//! everything else.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use tandem_core::{Budget, Category};

// =============================================================================
// PATTERNS
// =============================================================================

/// First whole-dollar amount, allowing thousands separators ("1,200").
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,3}(?:,\d{3})+|\d+").expect("valid amount regex"));

static DOLLAR_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$+").expect("valid dollar regex"));

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));

static MINUTES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bmin(?:ute)?s?\b").expect("valid minutes regex"));

static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\s*-\s*\d+").expect("valid range regex"));

static FOR_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfor\b").expect("valid for regex"));

/// Clock times such as "7pm", "7:30 PM" or "19:30".
pub(crate) static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}(?::\d{2})?\s*[ap]\.?m\.?|\b\d{1,2}:\d{2}\b")
        .expect("valid clock regex")
});

// =============================================================================
// CATEGORY
// =============================================================================

/// Map a model category field onto a legal category.
///
/// The text may hold several tokens ("outdoor, dining"); the first legal one
/// wins. Nothing legal means [`Category::Entertainment`].
pub fn category_from_text(raw: &str) -> Category {
    raw.split(|c: char| c == ',' || c == '/' || c == '|' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .find_map(|token| token.parse::<Category>().ok())
        .unwrap_or_default()
}

/// Keyword table for inferring the category of a split fragment.
///
/// Checked in order with a case-insensitive substring match.
pub const CATEGORY_KEYWORDS: &[(&[&str], Category)] = &[
    (
        &[
            "food",
            "restaurant",
            "cafe",
            "dinner",
            "lunch",
            "breakfast",
            "brunch",
            "cook",
        ],
        Category::Dining,
    ),
    (
        &["park", "beach", "hike", "nature", "garden", "outdoor"],
        Category::Outdoor,
    ),
    (
        &["movie", "theater", "concert", "show", "music", "performance"],
        Category::Entertainment,
    ),
    (
        &["class", "museum", "art", "gallery", "historic", "culture"],
        Category::Cultural,
    ),
    (&["spa", "massage", "relax", "wellness"], Category::Relaxation),
];

/// Infer a category from free text using [`CATEGORY_KEYWORDS`].
pub fn infer_category(text: &str) -> Category {
    let lower = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or_default()
}

// =============================================================================
// BUDGET
// =============================================================================

type BudgetRule = fn(&str) -> Option<Budget>;

/// Budget rules in evaluation order. Input is trimmed and lowercased.
pub const BUDGET_RULES: &[(&str, BudgetRule)] = &[
    ("free", budget_free),
    ("amount", budget_amount),
    ("dollar_signs", budget_dollar_signs),
    ("keywords", budget_keywords),
];

fn budget_free(text: &str) -> Option<Budget> {
    (text.is_empty() || text.contains("free")).then_some(Budget::Free)
}

fn budget_amount(text: &str) -> Option<Budget> {
    let found = AMOUNT_RE.find(text)?;
    let amount = found
        .as_str()
        .replace(',', "")
        .parse::<u64>()
        .unwrap_or(u64::MAX);
    Some(Budget::from_amount(amount))
}

fn budget_dollar_signs(text: &str) -> Option<Budget> {
    let longest = DOLLAR_RUN_RE.find_iter(text).map(|m| m.len()).max()?;
    Some(match longest {
        1 => Budget::Low,
        2 => Budget::Medium,
        _ => Budget::High,
    })
}

fn budget_keywords(text: &str) -> Option<Budget> {
    // "inexpensive" contains "expensive", so the low tier is checked first.
    const LOW: &[&str] = &["cheap", "affordable", "inexpensive", "budget"];
    const HIGH: &[&str] = &["expensive", "luxury", "pricey", "upscale", "splurge"];

    if LOW.iter().any(|k| text.contains(k)) {
        Some(Budget::Low)
    } else if HIGH.iter().any(|k| text.contains(k)) {
        Some(Budget::High)
    } else {
        None
    }
}

/// Map an estimated-cost field onto a budget tier. Unrecognized text is medium.
pub fn budget_from_cost(raw: &str) -> Budget {
    let text = raw.trim().to_lowercase();
    for (name, rule) in BUDGET_RULES {
        if let Some(budget) = rule(&text) {
            trace!(rule = name, budget = %budget, "Budget rule matched");
            return budget;
        }
    }
    Budget::Medium
}

// =============================================================================
// DURATION / SEQUENCE
// =============================================================================

/// Parse a duration in hours.
///
/// Plain numbers are hours. Otherwise the first number in the text is used,
/// converted from minutes when the text says so. Non-positive results are `None`.
pub fn parse_duration(raw: &str) -> Option<f64> {
    let text = raw.trim();
    let hours = match text.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            let value: f64 = NUMBER_RE.find(text)?.as_str().parse().ok()?;
            if MINUTES_RE.is_match(text) && !text.to_lowercase().contains("hour") {
                value / 60.0
            } else {
                value
            }
        }
    };
    (hours.is_finite() && hours > 0.0).then_some(hours)
}

/// Whether a sequence field describes several activities ("1,2", "1-2",
/// "1 & 2", "for 1 and 2").
pub fn is_compound_marker(raw: &str) -> bool {
    let text = raw.trim();
    text.contains(',')
        || text.contains('&')
        || text.starts_with('[')
        || RANGE_RE.is_match(text)
        || FOR_WORD_RE.is_match(text)
}

/// Parse a single sequence position, defaulting to 1.
pub fn parse_sequence(raw: Option<&str>) -> u32 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

/// Round to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
