pub mod aggregation;
pub mod checked;
pub mod fraction_utils;
pub mod parser;

// Re-export commonly used types
pub use aggregation::{
    GroceryItem, GroceryKey, IngredientAggregationService, normalize_name, shopping_list,
};
pub use checked::{CheckedItem, CheckedSet, checked_scope, merge_checked};
pub use fraction_utils::format_quantity;
pub use parser::{ParsedIngredient, canonical_unit, parse_ingredient, parse_raw};
