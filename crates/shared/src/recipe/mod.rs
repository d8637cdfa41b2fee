use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Ingredient as it appears in the dataset: free text or a structured record.
///
/// Anything else (a record without `name`, a number, a list) is kept as
/// `Invalid` so that one bad entry never rejects the whole dataset.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Ingredient {
    Raw(String),
    Structured(StructuredIngredient),
    Invalid(serde_json::Value),
}

impl Ingredient {
    /// Text shown on the recipe card, `None` for an invalid entry.
    pub fn display(&self) -> Option<String> {
        match self {
            Ingredient::Raw(text) => Some(text.trim().to_owned()),
            Ingredient::Structured(s) => Some(s.display()),
            Ingredient::Invalid(_) => None,
        }
    }
}

impl From<&str> for Ingredient {
    fn from(value: &str) -> Self {
        Ingredient::Raw(value.to_owned())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct StructuredIngredient {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl StructuredIngredient {
    fn display(&self) -> String {
        let mut parts = Vec::new();
        if let Some(quantity) = self.quantity {
            parts.push(quantity.to_string());
        }
        if let Some(unit) = self.unit.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            parts.push(unit.to_owned());
        }
        parts.push(self.name.trim().to_owned());

        let text = parts.join(" ");
        match self.note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(note) => format!("{text} ({note})"),
            None => text,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityValue {
    Number(f64),
    Text(String),
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<QuantityValue>::deserialize(deserializer)?;

    Ok(match value {
        Some(QuantityValue::Number(n)) => Some(n),
        Some(QuantityValue::Text(text)) => text.trim().parse::<f64>().ok(),
        None => None,
    })
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, rename = "prepNotes")]
    pub prep_notes: Option<String>,
}

impl Recipe {
    /// Prep note with surrounding whitespace removed, `None` when blank.
    pub fn prep_note(&self) -> Option<&str> {
        self.prep_notes
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
    }
}

/// Category -> meal slot -> ordered recipe rotation.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RecipeDataset {
    #[serde(alias = "categories")]
    pub cuisines: BTreeMap<String, BTreeMap<String, Vec<Recipe>>>,
}

impl RecipeDataset {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.cuisines.keys().map(String::as_str)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.cuisines.contains_key(category)
    }

    /// Rotation for a category/slot pair; empty when either key is absent.
    pub fn recipes(&self, category: &str, slot: &str) -> &[Recipe] {
        self.cuisines
            .get(category)
            .and_then(|slots| slots.get(slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// "middle-eastern" -> "Middle Eastern"
pub fn title_case(key: &str) -> String {
    key.replace(['-', '_'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
