use std::time::Duration;

use kitchen_shared::{Storage, day_number, recipe::title_case};
use kitchen_shopping::GroceryKey;
use time::Date;

use crate::{
    error::{AppError, Result},
    render,
    state::AppState,
};

pub fn today(state: &AppState, today: Date) -> String {
    render::recipe_card(
        state.current_recipe(today),
        today,
        &state.category,
        &state.meal,
    )
}

pub fn prep(state: &AppState, today: Date) -> String {
    render::prep_list(&state.upcoming_prep(today))
}

pub fn grocery(state: &AppState, today: Date, storage: &dyn Storage) -> Result<String> {
    Ok(render::grocery_list(&state.grocery(today, storage)?))
}

pub fn categories(state: &AppState) -> String {
    state
        .dataset
        .categories()
        .map(|c| {
            let marker = if c == state.category { "*" } else { " " };
            format!("{marker} {c} ({})\n", title_case(c))
        })
        .collect()
}

/// Toggle a grocery line given as typed by the user ("Rice", "cups").
pub fn check(
    state: &AppState,
    today: Date,
    name: &str,
    unit: Option<&str>,
    storage: &dyn Storage,
) -> Result<String> {
    let key = GroceryKey::normalized(name, unit.unwrap_or_default());
    if key.name.is_empty() {
        return Err(AppError::InvalidInput("item name is empty".to_owned()));
    }

    let checked = state.toggle_item(today, &key, storage)?;
    let mark = if checked { "checked" } else { "unchecked" };

    Ok(format!("{} {mark}\n", key.name))
}

pub fn clear(state: &AppState, today: Date, storage: &dyn Storage) -> Result<String> {
    state.clear_checked(today, storage)?;

    Ok("Cleared all checkmarks for this week.\n".to_owned())
}

/// Whether the dashboard must be redrawn for `day` after last drawing `last`.
pub fn refresh_due(last: Option<i64>, day: i64) -> bool {
    last != Some(day)
}

/// Recipe card, prep list and grocery list for `date`.
///
/// A grocery failure only replaces that section; the rest still renders.
pub fn dashboard(state: &AppState, date: Date, storage: &dyn Storage) -> String {
    let grocery = grocery(state, date, storage).unwrap_or_else(|err| {
        tracing::warn!(err = %err, "Grocery list unavailable");
        "Grocery list unavailable.\n".to_owned()
    });

    format!("{}\n{}\n{}", today(state, date), prep(state, date), grocery)
}

/// Re-render the whole dashboard whenever the day number changes.
///
/// Every tick recomputes from the current date; overlapping ticks render the
/// same output.
pub async fn watch(
    state: &AppState,
    storage: &dyn Storage,
    tz: Option<&str>,
    period: Duration,
) -> Result<()> {
    let mut interval = tokio::time::interval(period);
    let mut last_day = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping dashboard watch");
                return Ok(());
            }
        }

        let date = crate::clock::today(tz);
        let day = day_number(date);
        if !refresh_due(last_day, day) {
            continue;
        }

        if last_day.is_some() {
            tracing::info!(day, "Day rolled over, refreshing dashboard");
        }
        last_day = Some(day);

        println!("{}", dashboard(state, date, storage));
    }
}
