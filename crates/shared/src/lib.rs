mod command;
mod date;
pub mod recipe;
pub mod storage;

pub use command::*;
pub use date::*;
pub use recipe::{Ingredient, Recipe, RecipeDataset, StructuredIngredient};
pub use storage::{CheckedScope, FileStorage, MemoryStorage, Storage, StorageKey};
