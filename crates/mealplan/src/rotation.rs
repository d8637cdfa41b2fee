use kitchen_shared::{Recipe, RecipeDataset, day_number_with_offset};
use time::Date;

/// Position in a rotation of `len` recipes for a given day number.
///
/// Returns `None` for an empty rotation. The result is always in `0..len`,
/// including for days before the epoch.
pub fn rotation_index(day_number: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }

    Some(day_number.rem_euclid(len as i64) as usize)
}

/// Recipe of the rotation for `category`/`slot` on `today + day_offset`.
///
/// Pure arithmetic on the day number: the same dataset and calendar day always
/// give the same recipe, and an absent or empty rotation gives `None`.
pub fn select_recipe<'a>(
    dataset: &'a RecipeDataset,
    category: &str,
    slot: &str,
    today: Date,
    day_offset: i64,
) -> Option<&'a Recipe> {
    let recipes = dataset.recipes(category, slot);
    let index = rotation_index(day_number_with_offset(today, day_offset), recipes.len())?;

    recipes.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_shared::day_number;
    use std::collections::BTreeMap;
    use time::macros::date;

    fn recipe(title: &str) -> Recipe {
        Recipe {
            title: title.to_owned(),
            ..Default::default()
        }
    }

    fn dataset(titles: &[&str]) -> RecipeDataset {
        let mut slots = BTreeMap::new();
        slots.insert(
            "Dinner".to_owned(),
            titles.iter().map(|t| recipe(t)).collect::<Vec<_>>(),
        );

        let mut cuisines = BTreeMap::new();
        cuisines.insert("italian".to_owned(), slots);

        RecipeDataset { cuisines }
    }

    #[test]
    fn test_rotation_index_range() {
        for day in [-15, -1, 0, 1, 7, 20_000] {
            for len in 1..6 {
                let index = rotation_index(day, len).unwrap();
                assert!(index < len);
            }
        }
    }

    #[test]
    fn test_rotation_index_empty() {
        assert_eq!(rotation_index(20_000, 0), None);
    }

    #[test]
    fn test_rotation_index_negative_day() {
        assert_eq!(rotation_index(-1, 3), Some(2));
    }

    #[test]
    fn test_select_recipe_uses_day_number() {
        let dataset = dataset(&["A", "B", "C"]);
        let today = date!(2025 - 01 - 20);
        let expected = ["A", "B", "C"][(day_number(today) % 3) as usize];

        let selected = select_recipe(&dataset, "italian", "Dinner", today, 0).unwrap();
        assert_eq!(selected.title, expected);
    }

    #[test]
    fn test_select_recipe_offset_advances_rotation() {
        let dataset = dataset(&["A", "B", "C"]);
        let today = date!(2025 - 01 - 20);

        let tomorrow = select_recipe(&dataset, "italian", "Dinner", today, 1).unwrap();
        let next_day = select_recipe(&dataset, "italian", "Dinner", date!(2025 - 01 - 21), 0)
            .unwrap();
        assert_eq!(tomorrow, next_day);
    }

    #[test]
    fn test_select_recipe_single_entry() {
        let dataset = dataset(&["Only"]);

        for offset in 0..10 {
            let selected =
                select_recipe(&dataset, "italian", "Dinner", date!(2024 - 02 - 29), offset);
            assert_eq!(selected.map(|r| r.title.as_str()), Some("Only"));
        }
    }

    #[test]
    fn test_select_recipe_none_when_empty_or_missing() {
        let dataset = dataset(&[]);
        let today = date!(2025 - 01 - 20);

        assert!(select_recipe(&dataset, "italian", "Dinner", today, 0).is_none());
        assert!(select_recipe(&dataset, "italian", "Lunch", today, 0).is_none());
        assert!(select_recipe(&dataset, "thai", "Dinner", today, 0).is_none());
    }
}
