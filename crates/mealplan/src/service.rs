use std::fmt;

use kitchen_shared::{Recipe, RecipeDataset};
use time::Date;

use crate::{MealSlots, select_recipe};

pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Recipe picked for one slot of one day of the horizon.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedMeal<'a> {
    pub day_offset: i64,
    pub slot: String,
    pub recipe: &'a Recipe,
}

/// Rotation picks for `horizon_days` days starting today, day by day and slot
/// by slot. Slots without a recipe are left out.
pub fn plan_horizon<'a>(
    dataset: &'a RecipeDataset,
    category: &str,
    slots: &MealSlots,
    today: Date,
    horizon_days: u32,
) -> Vec<PlannedMeal<'a>> {
    let mut meals = Vec::new();

    for day_offset in 0..i64::from(horizon_days) {
        for slot in slots.names() {
            let Some(recipe) = select_recipe(dataset, category, slot, today, day_offset) else {
                continue;
            };

            meals.push(PlannedMeal {
                day_offset,
                slot: slot.to_owned(),
                recipe,
            });
        }
    }

    tracing::debug!(
        category,
        horizon_days,
        meals = meals.len(),
        "planned rotation horizon"
    );

    meals
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum When {
    Today,
    Tomorrow,
}

impl When {
    fn from_offset(day_offset: i64) -> Self {
        if day_offset == 0 {
            When::Today
        } else {
            When::Tomorrow
        }
    }
}

impl fmt::Display for When {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            When::Today => f.write_str("Today"),
            When::Tomorrow => f.write_str("Tomorrow"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrepReminder {
    pub slot: String,
    pub when: When,
    pub title: String,
    pub note: String,
}

/// Prep notes of the meals coming after `current`.
pub fn upcoming_prep(
    dataset: &RecipeDataset,
    category: &str,
    slots: &MealSlots,
    current: &str,
    today: Date,
) -> Vec<PrepReminder> {
    slots
        .upcoming(current)
        .into_iter()
        .filter_map(|upcoming| {
            let recipe = select_recipe(dataset, category, &upcoming.slot, today, upcoming.day_offset)?;
            let note = recipe.prep_note()?;

            Some(PrepReminder {
                when: When::from_offset(upcoming.day_offset),
                title: recipe.title.to_owned(),
                note: note.to_owned(),
                slot: upcoming.slot,
            })
        })
        .collect()
}
