use kitchen_mealplan::{MealSlots, PrepReminder, select_recipe, upcoming_prep};
use kitchen_shared::{Recipe, RecipeDataset, Storage, StorageKey};
use kitchen_shopping::{
    CheckedItem, CheckedSet, GroceryKey, checked_scope, merge_checked, shopping_list,
};
use time::Date;

use crate::{
    config::DashboardConfig,
    error::{AppError, Result},
};

/// Everything the dashboard shows is recomputed from this struct and a date;
/// only category and meal selection change it.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: RecipeDataset,
    pub category: String,
    pub meal: String,
    pub slots: MealSlots,
    pub horizon_days: u32,
}

impl AppState {
    /// Restore the persisted category and meal, falling back to the configured
    /// category (or the first one of the dataset) and to `default_meal`.
    pub fn restore(
        dataset: RecipeDataset,
        config: &DashboardConfig,
        storage: &dyn Storage,
        default_meal: &str,
    ) -> Result<Self> {
        let stored_category = storage.get(&StorageKey::Category)?;
        let category = [stored_category.as_deref(), Some(config.default_category.as_str())]
            .into_iter()
            .flatten()
            .find(|c| dataset.has_category(c))
            .or_else(|| dataset.categories().next())
            .unwrap_or(config.default_category.as_str())
            .to_owned();

        let meal = storage
            .get(&StorageKey::MealSlot)?
            .filter(|m| config.meal_slots.contains(m))
            .unwrap_or_else(|| default_meal.to_owned());

        Ok(Self {
            dataset,
            category,
            meal,
            slots: config.meal_slots.clone(),
            horizon_days: config.horizon_days,
        })
    }

    pub fn select_category(&mut self, category: &str, storage: &dyn Storage) -> Result<()> {
        if !self.dataset.has_category(category) {
            return Err(AppError::InvalidInput(format!("unknown category '{category}'")));
        }

        self.category = category.to_owned();
        storage.set(&StorageKey::Category, category)?;

        Ok(())
    }

    pub fn select_meal(&mut self, meal: &str, storage: &dyn Storage) -> Result<()> {
        if !self.slots.contains(meal) {
            return Err(AppError::InvalidInput(format!("unknown meal '{meal}'")));
        }

        self.meal = meal.to_owned();
        storage.set(&StorageKey::MealSlot, meal)?;

        Ok(())
    }

    pub fn current_recipe(&self, today: Date) -> Option<&Recipe> {
        select_recipe(&self.dataset, &self.category, &self.meal, today, 0)
    }

    pub fn upcoming_prep(&self, today: Date) -> Vec<PrepReminder> {
        upcoming_prep(&self.dataset, &self.category, &self.slots, &self.meal, today)
    }

    /// Week's shopping list with this week's checkmarks applied.
    pub fn grocery(&self, today: Date, storage: &dyn Storage) -> Result<Vec<CheckedItem>> {
        let items = shopping_list(
            &self.dataset,
            &self.category,
            &self.slots,
            today,
            self.horizon_days,
        );
        let checked = CheckedSet::load(storage, checked_scope(today, &self.category))?;

        Ok(merge_checked(items, &checked))
    }

    /// Flip one grocery line; returns whether it is now checked.
    pub fn toggle_item(&self, today: Date, key: &GroceryKey, storage: &dyn Storage) -> Result<bool> {
        let checked = CheckedSet::load(storage, checked_scope(today, &self.category))?.toggle(key);
        checked.save(storage)?;

        Ok(checked.contains(key))
    }

    pub fn clear_checked(&self, today: Date, storage: &dyn Storage) -> Result<()> {
        CheckedSet::load(storage, checked_scope(today, &self.category))?
            .clear_all()
            .save(storage)?;

        Ok(())
    }
}
