//! Prompt composition.
//!
//! Renders a [`ProfileContext`] into a single prompt. Output is fully
//! deterministic: the same context and filter always produce the same text and
//! target count.

use std::str::FromStr;

use tandem_core::{Category, DurationWindow, ProfileContext};
use tracing::{debug, warn};

use crate::normalize::RESPONSE_FIELDS;

/// A rendered prompt and the number of suggestions it asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub text: String,
    pub target_count: usize,
}

/// Decide which category, if any, the batch is restricted to.
///
/// An explicit filter naming a legal category wins. An explicit filter that
/// names nothing legal is ignored. Without an explicit filter the profile's own
/// filter applies.
pub fn resolve_category_filter(
    ctx: &ProfileContext,
    category_filter: Option<&str>,
) -> Option<Category> {
    match category_filter.map(str::trim).filter(|f| !f.is_empty()) {
        Some(raw) => match Category::from_str(raw) {
            Ok(category) => Some(category),
            Err(_) => {
                warn!(filter = %raw, "Ignoring unrecognized category filter");
                None
            }
        },
        None => ctx.category_filter,
    }
}

fn legal_categories() -> String {
    Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compose the generation prompt for a context.
pub fn compose(ctx: &ProfileContext, category_filter: Option<&str>) -> ComposedPrompt {
    let target_count = ctx.activity_count();
    let category = resolve_category_filter(ctx, category_filter);
    let noun = if target_count == 1 {
        "date activity"
    } else {
        "date activities"
    };
    let name = if ctx.name.is_empty() {
        "the user"
    } else {
        ctx.name.as_str()
    };
    let location = if ctx.location.is_empty() {
        "a location of their choosing"
    } else {
        ctx.location.as_str()
    };

    let mut prompt = String::new();

    prompt.push_str(&format!(
        "You are a thoughtful date planner. Suggest exactly {} {} for {} in {}.\n\n",
        target_count, noun, name, location
    ));

    prompt.push_str("Preferences:\n");
    prompt.push_str(&format!(
        "- Preferred time: {}\n",
        ctx.time_window.describe()
    ));
    prompt.push_str(&format!(
        "- Preferred duration: {}\n",
        ctx.duration_window.describe()
    ));
    match category {
        Some(c) => prompt.push_str(&format!(
            "- Category: restrict every suggestion to the \"{}\" category.\n",
            c
        )),
        None => prompt.push_str(
            "- Category: vary the category across the batch; do not repeat one category for every suggestion.\n",
        ),
    }
    if !ctx.dietary_preferences.is_empty() {
        prompt.push_str(&format!(
            "- Dietary preferences: {}\n",
            ctx.dietary_preferences.join(", ")
        ));
    }
    if !ctx.allergies.is_empty() {
        prompt.push_str(&format!(
            "- Allergies (must be avoided): {}\n",
            ctx.allergies.join(", ")
        ));
    }
    if !ctx.interests.is_empty() {
        prompt.push_str(&format!("- Interests: {}\n", ctx.interests.join(", ")));
    }
    if let Some(budget) = ctx.budget_hint {
        prompt.push_str(&format!("- Budget: {}\n", budget.describe()));
    }

    if ctx.duration_window == DurationWindow::Extended {
        prompt.push_str(&format!(
            "\nThese {} activities form one continuous outing. Keep the locations close \
             together, include transition time between activities, and make the activities \
             flow as a connected sequence. Give each activity its own object and number them \
             with \"sequence\" 1 to {} in the order they happen.\n",
            target_count, target_count
        ));
    }

    prompt.push_str(&format!(
        "\nRespond with ONLY a JSON array of exactly {} object(s). Each object must have \
         exactly these fields:\n",
        target_count
    ));
    for (field, meaning) in RESPONSE_FIELDS {
        prompt.push_str(&format!("- \"{}\": {}\n", field, meaning));
    }

    prompt.push_str(&format!(
        "\nValid categories: {}. Any other category value is invalid.\n",
        legal_categories()
    ));
    prompt.push_str("Do not wrap the array in markdown or add any text before or after it.\n");

    debug!(
        target_count,
        prompt_len = prompt.len(),
        category = category.map(|c| c.as_str()).unwrap_or("varied"),
        "Composed prompt"
    );

    ComposedPrompt {
        text: prompt,
        target_count,
    }
}
