//! Domain models for date suggestions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::defaults;

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Activity category of a suggestion.
///
/// A normalized suggestion always carries one of these six values, never the
/// raw model text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Dining,
    Outdoor,
    /// Fallback when the model's category matches nothing legal.
    #[default]
    Entertainment,
    Adventure,
    Relaxation,
    Cultural,
}

impl Category {
    /// Every legal category, in the order they are presented to the model.
    pub const ALL: [Category; 6] = [
        Category::Dining,
        Category::Outdoor,
        Category::Entertainment,
        Category::Adventure,
        Category::Relaxation,
        Category::Cultural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dining => "dining",
            Category::Outdoor => "outdoor",
            Category::Entertainment => "entertainment",
            Category::Adventure => "adventure",
            Category::Relaxation => "relaxation",
            Category::Cultural => "cultural",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dining" => Ok(Self::Dining),
            "outdoor" => Ok(Self::Outdoor),
            "entertainment" => Ok(Self::Entertainment),
            "adventure" => Ok(Self::Adventure),
            "relaxation" => Ok(Self::Relaxation),
            "cultural" => Ok(Self::Cultural),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// Spending tier of a suggestion, also used as the profile's budget hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Free,
    Low,
    Medium,
    High,
}

impl Budget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Free => "free",
            Budget::Low => "low",
            Budget::Medium => "medium",
            Budget::High => "high",
        }
    }

    /// Bucket a whole-dollar amount: 0 free, 1-50 low, 51-100 medium, above high.
    pub fn from_amount(amount: u64) -> Self {
        match amount {
            0 => Budget::Free,
            1..=50 => Budget::Low,
            51..=100 => Budget::Medium,
            _ => Budget::High,
        }
    }

    /// Human-readable description used when rendering prompts.
    pub fn describe(&self) -> &'static str {
        match self {
            Budget::Free => "Free (no cost)",
            Budget::Low => "Low ($1-$50)",
            Budget::Medium => "Medium ($51-$100)",
            Budget::High => "High (over $100)",
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Budget {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Invalid budget: {}", s)),
        }
    }
}

/// Preferred time of day for an outing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Any,
    Morning,
    Afternoon,
    Evening,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Any => "any",
            TimeWindow::Morning => "morning",
            TimeWindow::Afternoon => "afternoon",
            TimeWindow::Evening => "evening",
        }
    }

    /// Human-readable rendering including the clock range.
    pub fn describe(&self) -> &'static str {
        match self {
            TimeWindow::Any => "Any time of day",
            TimeWindow::Morning => "Morning (6am-12pm)",
            TimeWindow::Afternoon => "Afternoon (12pm-5pm)",
            TimeWindow::Evening => "Evening (5pm-11pm)",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TimeWindow {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            _ => Err(format!("Invalid time window: {}", s)),
        }
    }
}

/// How long the outing should last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationWindow {
    #[default]
    Flexible,
    Quick,
    Medium,
    Extended,
}

impl DurationWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationWindow::Flexible => "flexible",
            DurationWindow::Quick => "quick",
            DurationWindow::Medium => "medium",
            DurationWindow::Extended => "extended",
        }
    }

    /// Human-readable rendering including the hour range.
    pub fn describe(&self) -> &'static str {
        match self {
            DurationWindow::Flexible => "Flexible duration",
            DurationWindow::Quick => "Quick (1-2 hours)",
            DurationWindow::Medium => "Medium (2-4 hours)",
            DurationWindow::Extended => "Extended (4+ hours, several activities)",
        }
    }

    /// Number of activities requested from the model.
    ///
    /// Fixed per window: extended outings get three connected activities,
    /// everything else a single one.
    pub fn activity_count(&self) -> usize {
        match self {
            DurationWindow::Extended => defaults::EXTENDED_ACTIVITY_COUNT,
            _ => defaults::SINGLE_ACTIVITY_COUNT,
        }
    }
}

impl fmt::Display for DurationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DurationWindow {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flexible" => Ok(Self::Flexible),
            "quick" => Ok(Self::Quick),
            "medium" => Ok(Self::Medium),
            "extended" => Ok(Self::Extended),
            _ => Err(format!("Invalid duration window: {}", s)),
        }
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// User profile record as supplied by the persistence collaborator.
///
/// List fields hold serialized JSON text (e.g. `["vegan", "halal"]`) and every
/// field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub location: Option<String>,
    pub preferred_time: Option<String>,
    pub preferred_duration: Option<String>,
    pub dietary_preferences: Option<String>,
    pub allergies: Option<String>,
    pub interests: Option<String>,
    pub budget: Option<String>,
    pub category_filter: Option<String>,
}

/// Normalized context derived from a [`UserProfile`]. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileContext {
    pub name: String,
    pub location: String,
    pub time_window: TimeWindow,
    pub duration_window: DurationWindow,
    /// Ordered as the user listed them.
    pub dietary_preferences: Vec<String>,
    /// De-duplicated, first-seen order.
    pub allergies: Vec<String>,
    /// De-duplicated, first-seen order.
    pub interests: Vec<String>,
    pub budget_hint: Option<Budget>,
    pub category_filter: Option<Category>,
}

impl ProfileContext {
    /// Activities to request for this context.
    pub fn activity_count(&self) -> usize {
        self.duration_window.activity_count()
    }
}

// =============================================================================
// SUGGESTIONS
// =============================================================================

/// A model suggestion after normalization onto the domain enumerations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSuggestion {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub budget: Budget,
    pub category: Category,
    pub recommended_start_time: Option<String>,
    /// Hours; strictly positive when present.
    pub duration: Option<f64>,
    /// 1-based position. Advisory until the batch is sequenced.
    pub sequence: u32,
}
