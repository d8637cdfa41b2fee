use std::collections::BTreeSet;

use kitchen_shared::{CheckedScope, Storage, StorageKey, day_number, week_number};
use serde::Serialize;
use time::Date;

use crate::aggregation::{GroceryItem, GroceryKey};

/// Scope of the checklist shown on `today` for `category`.
///
/// The week number changes every seven days, so a new week reads a fresh, empty
/// set while older weeks stay untouched in storage.
pub fn checked_scope(today: Date, category: &str) -> CheckedScope {
    CheckedScope::new(week_number(day_number(today)), category)
}

/// Grocery keys ticked off for one (week, category).
#[derive(Clone, Debug, PartialEq)]
pub struct CheckedSet {
    scope: CheckedScope,
    keys: BTreeSet<String>,
}

impl CheckedSet {
    pub fn new(scope: CheckedScope) -> Self {
        Self {
            scope,
            keys: BTreeSet::new(),
        }
    }

    pub fn scope(&self) -> &CheckedScope {
        &self.scope
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &GroceryKey) -> bool {
        self.keys.contains(&key.to_string())
    }

    /// Flip `key`: checked becomes unchecked and the other way round.
    pub fn toggle(mut self, key: &GroceryKey) -> Self {
        let key = key.to_string();
        if !self.keys.remove(&key) {
            self.keys.insert(key);
        }

        self
    }

    pub fn clear_all(mut self) -> Self {
        self.keys.clear();
        self
    }

    /// Load the persisted set; missing or unreadable data gives an empty set.
    pub fn load(storage: &dyn Storage, scope: CheckedScope) -> kitchen_shared::Result<Self> {
        let storage_key = StorageKey::Checked(scope.clone());
        let Some(raw) = storage.get(&storage_key)? else {
            return Ok(Self::new(scope));
        };

        let keys = match serde_json::from_str::<BTreeSet<String>>(&raw) {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(key = %storage_key, err = %err, "ignoring unreadable checked set");
                BTreeSet::new()
            }
        };

        Ok(Self { scope, keys })
    }

    /// Persist the set; an empty set removes its entry.
    pub fn save(&self, storage: &dyn Storage) -> kitchen_shared::Result<()> {
        let storage_key = StorageKey::Checked(self.scope.clone());
        if self.keys.is_empty() {
            return storage.remove(&storage_key);
        }

        storage.set(&storage_key, &serde_json::to_string(&self.keys)?)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CheckedItem {
    #[serde(flatten)]
    pub item: GroceryItem,
    pub checked: bool,
}

/// Annotate each grocery line with its checked state. Keys in the set with no
/// matching line are ignored.
pub fn merge_checked(items: Vec<GroceryItem>, checked: &CheckedSet) -> Vec<CheckedItem> {
    items
        .into_iter()
        .map(|item| CheckedItem {
            checked: checked.contains(&item.key()),
            item,
        })
        .collect()
}
