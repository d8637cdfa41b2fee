//! Plain-text views of the dashboard.

use std::fmt::Write;

use kitchen_mealplan::PrepReminder;
use kitchen_shared::{Ingredient, Recipe, recipe::title_case};
use kitchen_shopping::CheckedItem;
use time::{Date, macros::format_description};

/// Shown instead of the dashboard when no recipe source could be read.
pub const LOAD_FAILED: &str = "Failed to load recipes.json";

/// "Tuesday, Apr 1 • Italian • Dinner"
pub fn day_info(today: Date, category: &str, meal: &str) -> String {
    let day = today
        .format(format_description!(
            "[weekday], [month repr:short] [day padding:none]"
        ))
        .unwrap_or_else(|_| today.to_string());

    format!("{day} • {} • {meal}", title_case(category))
}

pub fn recipe_card(recipe: Option<&Recipe>, today: Date, category: &str, meal: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", day_info(today, category, meal));

    let Some(recipe) = recipe else {
        let _ = writeln!(out, "\nNo recipe");
        return out;
    };

    let _ = writeln!(out, "\n{}", recipe.title);

    let _ = writeln!(out, "\nIngredients");
    for line in recipe.ingredients.iter().filter_map(Ingredient::display) {
        let _ = writeln!(out, "  - {line}");
    }

    let _ = writeln!(out, "\nSteps");
    for (i, step) in recipe.steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }

    if let Some(note) = recipe.prep_note() {
        let _ = writeln!(out, "\nPrep note: {note}");
    }

    out
}

pub fn prep_list(reminders: &[PrepReminder]) -> String {
    if reminders.is_empty() {
        return "No prep needed for upcoming recipes.\n".to_owned();
    }

    let mut out = String::new();
    for reminder in reminders {
        let _ = writeln!(
            out,
            "{} {}: {}\n    {}",
            reminder.when, reminder.slot, reminder.title, reminder.note
        );
    }

    out
}

pub fn grocery_list(items: &[CheckedItem]) -> String {
    if items.is_empty() {
        return "Nothing to buy.\n".to_owned();
    }

    let mut out = String::new();
    for entry in items {
        let mark = if entry.checked { "x" } else { " " };
        let _ = write!(out, "[{mark}] {}", entry.item.name);

        let quantity = entry.item.quantity_label();
        if !quantity.is_empty() {
            let _ = write!(out, ": {quantity}");
        }

        match (entry.item.has_quantity, entry.item.unmeasured) {
            (_, 0) => {}
            (false, 1) => {}
            (false, n) => {
                let _ = write!(out, " (x{n})");
            }
            (true, n) => {
                let _ = write!(out, " (+{n} unmeasured)");
            }
        }

        out.push('\n');
    }

    out
}
