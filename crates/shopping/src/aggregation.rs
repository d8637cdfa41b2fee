use std::{collections::HashMap, fmt};

use fraction::BigFraction;
use kitchen_mealplan::{MealSlots, plan_horizon};
use kitchen_shared::RecipeDataset;
use serde::Serialize;
use time::Date;

use crate::fraction_utils::{format_quantity, is_measurable, to_f64};
use crate::parser::{ParsedIngredient, canonical_unit, parse_ingredient};

/// Identity of a grocery line: the same name in two units stays two lines.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroceryKey {
    pub name: String,
    pub unit: String,
}

impl GroceryKey {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
        }
    }

    /// Key for a name and unit typed by hand ("Olive  Oil", "Tbsp."), folded
    /// the same way aggregated lines are.
    pub fn normalized(name: &str, unit: &str) -> Self {
        let unit = canonical_unit(unit)
            .map(str::to_owned)
            .unwrap_or_else(|| unit.trim().to_lowercase());

        Self::new(normalize_name(name), unit)
    }
}

/// `name|unit`, with `\` and `|` inside either part escaped by a backslash.
impl fmt::Display for GroceryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", escape(&self.name), escape(&self.unit))
    }
}

fn escape(part: &str) -> String {
    part.replace('\\', "\\\\").replace('|', "\\|")
}

/// Lowercase, single-spaced, without trailing punctuation.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_owned()
}

/// One line of the shopping list.
///
/// Measured occurrences are summed into `quantity`, unmeasured ones are only
/// counted in `unmeasured`; the two never mix.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GroceryItem {
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub unmeasured: u32,
    pub has_quantity: bool,
}

impl GroceryItem {
    pub fn key(&self) -> GroceryKey {
        GroceryKey::new(&self.name, &self.unit)
    }

    /// "3 cup", "1.5", "cup" or "" depending on what is known.
    pub fn quantity_label(&self) -> String {
        let quantity = if self.has_quantity {
            format_quantity(self.quantity)
        } else {
            String::new()
        };

        [quantity.as_str(), self.unit.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exact running total of one grocery line.
struct Tally {
    total: BigFraction,
    measured: bool,
    unmeasured: u32,
}

impl Tally {
    fn new() -> Self {
        Self {
            total: BigFraction::new(0u64, 1u64),
            measured: false,
            unmeasured: 0,
        }
    }

    fn add(&mut self, quantity: Option<BigFraction>) {
        match quantity.filter(is_measurable) {
            Some(quantity) => {
                self.total += quantity;
                self.measured = true;
            }
            None => self.unmeasured += 1,
        }
    }

    fn into_item(self, key: GroceryKey) -> GroceryItem {
        GroceryItem {
            name: key.name,
            unit: key.unit,
            quantity: if self.measured { to_f64(&self.total) } else { 0.0 },
            unmeasured: self.unmeasured,
            has_quantity: self.measured,
        }
    }
}

/// Stateless merge of parsed ingredients into grocery lines.
pub struct IngredientAggregationService;

impl IngredientAggregationService {
    /// Group by (normalized name, unit), sum known quantities, count the rest.
    ///
    /// Ingredients whose name normalizes to nothing are dropped. The result is
    /// sorted by name (case-insensitive) then unit.
    pub fn aggregate<I>(ingredients: I) -> Vec<GroceryItem>
    where
        I: IntoIterator<Item = ParsedIngredient>,
    {
        let mut groups: HashMap<GroceryKey, Tally> = HashMap::new();

        for ingredient in ingredients {
            let name = normalize_name(&ingredient.name);
            if name.is_empty() {
                tracing::debug!(?ingredient, "dropping ingredient without a usable name");
                continue;
            }

            groups
                .entry(GroceryKey::new(name, ingredient.unit.trim()))
                .or_insert_with(Tally::new)
                .add(ingredient.quantity);
        }

        let mut result = groups
            .into_iter()
            .map(|(key, tally)| tally.into_item(key))
            .collect::<Vec<_>>();
        result.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.unit.cmp(&b.unit))
        });

        result
    }
}

/// Shopping list for every rotation pick of the next `horizon_days` days.
pub fn shopping_list(
    dataset: &RecipeDataset,
    category: &str,
    slots: &MealSlots,
    today: Date,
    horizon_days: u32,
) -> Vec<GroceryItem> {
    let parsed = plan_horizon(dataset, category, slots, today, horizon_days)
        .into_iter()
        .flat_map(|meal| meal.recipe.ingredients.iter())
        .filter_map(parse_ingredient)
        .collect::<Vec<_>>();

    let items = IngredientAggregationService::aggregate(parsed);
    tracing::debug!(category, horizon_days, items = items.len(), "aggregated shopping list");

    items
}
