//! Start-time selection for suggestions the model left untimed.

use rand::seq::SliceRandom;

use tandem_core::Category;

/// Chooses a start time from a category's pool.
///
/// Implementations must return a value from `pool`; the pool is never empty.
pub trait StartTimeSource: Send + Sync {
    fn choose(&self, category: Category, pool: &[&'static str]) -> String;
}

/// Picks uniformly at random. Used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStartTime;

impl StartTimeSource for RandomStartTime {
    fn choose(&self, _category: Category, pool: &[&'static str]) -> String {
        pool.choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(DEFAULT_START_TIME)
            .to_string()
    }
}

/// Always picks the first entry of the pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstStartTime;

impl StartTimeSource for FirstStartTime {
    fn choose(&self, _category: Category, pool: &[&'static str]) -> String {
        pool.first().copied().unwrap_or(DEFAULT_START_TIME).to_string()
    }
}

const DEFAULT_START_TIME: &str = "7:00 PM";

/// Plausible start times for each category.
pub fn start_time_pool(category: Category) -> &'static [&'static str] {
    match category {
        Category::Dining => &["12:00 PM", "6:30 PM", "7:00 PM", "7:30 PM"],
        Category::Outdoor => &["9:00 AM", "10:00 AM", "2:00 PM", "4:00 PM"],
        Category::Entertainment => &["7:00 PM", "7:30 PM", "8:00 PM"],
        Category::Adventure => &["9:00 AM", "10:00 AM", "1:00 PM"],
        Category::Relaxation => &["10:00 AM", "2:00 PM", "4:00 PM"],
        Category::Cultural => &["11:00 AM", "1:00 PM", "3:00 PM"],
    }
}

/// Pick a start time for `category` through `source`.
pub fn pick_start_time(source: &dyn StartTimeSource, category: Category) -> String {
    source.choose(category, start_time_pool(category))
}
