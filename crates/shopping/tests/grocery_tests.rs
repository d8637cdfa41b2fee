use fraction::BigFraction;
use kitchen_mealplan::MealSlots;
use kitchen_shared::{MemoryStorage, RecipeDataset};
use kitchen_shopping::{
    CheckedSet, GroceryItem, GroceryKey, checked_scope, format_quantity, merge_checked, parse_raw,
    shopping_list,
};
use time::macros::date;

/// One recipe per slot so every day of the week picks the same meals.
const DATASET: &str = r#"{
    "cuisines": {
        "home": {
            "Breakfast": [
                {"title": "Rice pudding", "ingredients": ["1 cup rice", "salt", "½ cup sugar"], "steps": []}
            ],
            "Lunch": [
                {"title": "Fried rice", "ingredients": ["2 cups rice", "2-3 eggs", "a clove of garlic (minced)"], "steps": []}
            ],
            "Dinner": [
                {
                    "title": "Risotto",
                    "ingredients": [
                        {"name": "Rice", "quantity": 1, "unit": "cups"},
                        {"name": "Parmesan", "unit": "g"},
                        "salt - to taste",
                        "()"
                    ],
                    "steps": []
                }
            ]
        }
    }
}"#;

fn item<'a>(items: &'a [GroceryItem], name: &str, unit: &str) -> &'a GroceryItem {
    items
        .iter()
        .find(|i| i.name == name && i.unit == unit)
        .unwrap_or_else(|| panic!("missing {name}|{unit}"))
}

#[test]
fn test_parse_examples() {
    let flour = parse_raw("1 1/2 cups flour");
    assert_eq!(
        (flour.name.as_str(), flour.unit.as_str(), flour.quantity),
        ("flour", "cup", Some(BigFraction::new(3u64, 2u64)))
    );

    let garlic = parse_raw("a clove of garlic");
    assert_eq!(
        (garlic.name.as_str(), garlic.unit.as_str(), garlic.quantity),
        ("garlic", "clove", Some(BigFraction::new(1u64, 1u64)))
    );

    let eggs = parse_raw("2-3 eggs");
    assert_eq!(
        (eggs.name.as_str(), eggs.unit.as_str(), eggs.quantity),
        ("eggs", "", Some(BigFraction::new(2u64, 1u64)))
    );
}

#[test]
fn test_week_shopping_list() -> anyhow::Result<()> {
    let dataset = RecipeDataset::from_json(DATASET)?;
    let items = shopping_list(&dataset, "home", &MealSlots::default(), date!(2025 - 03 - 03), 7);

    // (1 + 2 + 1) cups of rice per day
    let rice = item(&items, "rice", "cup");
    assert_eq!(rice.quantity, 28.0);
    assert!(rice.has_quantity);
    assert_eq!(rice.unmeasured, 0);

    let salt = item(&items, "salt", "");
    assert_eq!(salt.unmeasured, 14);
    assert!(!salt.has_quantity);

    let parmesan = item(&items, "parmesan", "g");
    assert_eq!(parmesan.unmeasured, 7);

    assert_eq!(item(&items, "eggs", "").quantity, 14.0);
    assert_eq!(item(&items, "garlic", "clove").quantity, 7.0);
    assert_eq!(format_quantity(item(&items, "sugar", "cup").quantity), "3.5");

    let names = items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["eggs", "garlic", "parmesan", "rice", "salt", "sugar"]);

    Ok(())
}

#[test]
fn test_two_rice_lines_merge() -> anyhow::Result<()> {
    let dataset = RecipeDataset::from_json(
        r#"{"cuisines": {"x": {"Dinner": [{"title": "t", "ingredients": ["1 cup rice", "2 cups rice"]}]}}}"#,
    )?;
    let items = shopping_list(&dataset, "x", &MealSlots::from_names(["Dinner"]), date!(2025 - 03 - 03), 1);

    assert_eq!(
        items,
        vec![GroceryItem {
            name: "rice".to_owned(),
            unit: "cup".to_owned(),
            quantity: 3.0,
            unmeasured: 0,
            has_quantity: true,
        }]
    );

    Ok(())
}

#[test]
fn test_malformed_ingredient_is_left_out() -> anyhow::Result<()> {
    let dataset = RecipeDataset::from_json(
        r#"{"cuisines": {"home": {"Dinner": [{"title": "Soup", "ingredients": ["1 cup rice", {"quantity": 2, "unit": "cup"}]}]}}}"#,
    )?;
    let items = shopping_list(&dataset, "home", &MealSlots::from_names(["Dinner"]), date!(2025 - 03 - 03), 2);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].key(), GroceryKey::new("rice", "cup"));
    assert_eq!(items[0].quantity, 2.0);

    Ok(())
}

#[test]
fn test_onion_lines_merge_despite_qualifier() -> anyhow::Result<()> {
    let dataset = RecipeDataset::from_json(
        r#"{"cuisines": {"x": {"Dinner": [{"title": "t", "ingredients": ["1 onion, diced", "1 onion"]}]}}}"#,
    )?;
    let items = shopping_list(&dataset, "x", &MealSlots::from_names(["Dinner"]), date!(2025 - 03 - 03), 1);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "onion");
    assert_eq!(items[0].quantity, 2.0);

    Ok(())
}

#[test]
fn test_thirds_add_up_to_whole_cups() -> anyhow::Result<()> {
    let dataset = RecipeDataset::from_json(
        r#"{"cuisines": {"x": {"Dinner": [{"title": "t", "ingredients": ["1/3 cup cream"]}]}}}"#,
    )?;
    let items = shopping_list(&dataset, "x", &MealSlots::from_names(["Dinner"]), date!(2025 - 03 - 03), 3);

    assert_eq!(items[0].quantity, 1.0);
    assert_eq!(items[0].quantity_label(), "1 cup");

    Ok(())
}

#[test]
fn test_week_of_coprime_fractions_is_summed() -> anyhow::Result<()> {
    let dataset = RecipeDataset::from_json(
        r#"{"cuisines": {"x": {"Dinner": [
            {"title": "a", "ingredients": ["1/97 cup stock", "1/89 cup stock"]},
            {"title": "b", "ingredients": ["1/83 cup stock", "1/79 cup stock"]},
            {"title": "c", "ingredients": ["1/73 cup stock", "1/71 cup stock"]},
            {"title": "d", "ingredients": ["1/67 cup stock", "1/61 cup stock"]},
            {"title": "e", "ingredients": ["1/59 cup stock", "1/53 cup stock", "1/47 cup stock"]},
            {"title": "f", "ingredients": ["1/43 cup stock", "1/41 cup stock"]},
            {"title": "g", "ingredients": ["1/37 cup stock", "1/31 cup stock"]}
        ]}}}"#,
    )?;
    let items = shopping_list(&dataset, "x", &MealSlots::from_names(["Dinner"]), date!(2025 - 03 - 03), 7);

    let expected = [97, 89, 83, 79, 73, 71, 67, 61, 59, 53, 47, 43, 41, 37, 31]
        .iter()
        .map(|p| 1.0 / f64::from(*p))
        .sum::<f64>();
    let stock = item(&items, "stock", "cup");
    assert!(stock.has_quantity);
    assert_eq!(stock.unmeasured, 0);
    assert!((stock.quantity - expected).abs() < 1e-12);

    Ok(())
}

#[test]
fn test_whole_number_beyond_u64_is_measured() -> anyhow::Result<()> {
    let flour = parse_raw("99999999999999999999999 g flour");

    assert_eq!((flour.name.as_str(), flour.unit.as_str()), ("flour", "g"));
    let quantity = flour.quantity.expect("quantity parsed");
    assert!(!quantity.is_nan());
    assert_eq!(
        quantity,
        BigFraction::new("99999999999999999999999".parse::<fraction::BigUint>()?, 1u64)
    );

    Ok(())
}

#[test]
fn test_unknown_category_gives_empty_list() -> anyhow::Result<()> {
    let dataset = RecipeDataset::from_json(DATASET)?;

    assert!(shopping_list(&dataset, "thai", &MealSlots::default(), date!(2025 - 03 - 03), 7).is_empty());

    Ok(())
}

#[test]
fn test_checked_state_over_weeks() -> anyhow::Result<()> {
    let storage = MemoryStorage::new();
    let dataset = RecipeDataset::from_json(DATASET)?;
    let today = date!(2025 - 03 - 03);
    let items = shopping_list(&dataset, "home", &MealSlots::default(), today, 7);

    let rice = GroceryKey::new("rice", "cup");
    CheckedSet::load(&storage, checked_scope(today, "home"))?
        .toggle(&rice)
        .save(&storage)?;

    let this_week = CheckedSet::load(&storage, checked_scope(today, "home"))?;
    let merged = merge_checked(items.clone(), &this_week);
    let checked = merged
        .iter()
        .filter(|i| i.checked)
        .map(|i| i.item.key())
        .collect::<Vec<_>>();
    assert_eq!(checked, vec![rice]);

    let next_week = CheckedSet::load(&storage, checked_scope(date!(2025 - 03 - 10), "home"))?;
    assert!(merge_checked(items, &next_week).iter().all(|i| !i.checked));

    Ok(())
}
