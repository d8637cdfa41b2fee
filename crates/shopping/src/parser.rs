//! Ingredient line parsing.
//!
//! Turns "1 1/2 cups flour" into `{ quantity: 3/2, unit: "cup", name: "flour" }`.
//! Free text goes through a small cursor over whitespace tokens: one quantity
//! matcher (tried in a fixed priority order), an optional unit from the alias
//! table, an optional "of", and the rest is the name. Structured ingredients
//! skip all of it and are only normalized.

use std::sync::LazyLock;

use fraction::BigFraction;
use kitchen_shared::{Ingredient, StructuredIngredient};
use regex::Regex;

use crate::fraction_utils::{
    normalize_fraction_glyphs, parse_decimal, parse_fraction, parse_quantity,
};

/// Alias -> canonical unit.
const UNIT_ALIASES: &[(&str, &str)] = &[
    ("cup", "cup"),
    ("cups", "cup"),
    ("tbsp", "tbsp"),
    ("tbsps", "tbsp"),
    ("tablespoon", "tbsp"),
    ("tablespoons", "tbsp"),
    ("tsp", "tsp"),
    ("tsps", "tsp"),
    ("teaspoon", "tsp"),
    ("teaspoons", "tsp"),
    ("g", "g"),
    ("gram", "g"),
    ("grams", "g"),
    ("kg", "kg"),
    ("kilogram", "kg"),
    ("kilograms", "kg"),
    ("ml", "ml"),
    ("milliliter", "ml"),
    ("milliliters", "ml"),
    ("millilitre", "ml"),
    ("millilitres", "ml"),
    ("l", "l"),
    ("liter", "l"),
    ("liters", "l"),
    ("litre", "l"),
    ("litres", "l"),
    ("oz", "oz"),
    ("ounce", "oz"),
    ("ounces", "oz"),
    ("lb", "lb"),
    ("lbs", "lb"),
    ("pound", "lb"),
    ("pounds", "lb"),
    ("clove", "clove"),
    ("cloves", "clove"),
    ("slice", "slice"),
    ("slices", "slice"),
    ("can", "can"),
    ("cans", "can"),
    ("piece", "piece"),
    ("pieces", "piece"),
];

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid parentheses regex"));

static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?|\d+/\d+)[-–](\d+(?:\.\d+)?|\d+/\d+)$")
        .expect("valid range regex")
});

/// Separators introducing a trailing qualifier ("salt - to taste", "onion, diced").
const QUALIFIER_SEPARATORS: &[&str] = &[" - ", " — ", " – ", ","];

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedIngredient {
    pub name: String,
    /// Canonical unit, empty when the line has none.
    pub unit: String,
    pub quantity: Option<BigFraction>,
}

/// Canonical form of a unit token, `None` when the token is not a known unit.
pub fn canonical_unit(token: &str) -> Option<&'static str> {
    let token = token.trim().trim_end_matches('.').to_lowercase();

    UNIT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, unit)| *unit)
}

/// `None` for a dataset entry that is neither text nor a named record.
pub fn parse_ingredient(ingredient: &Ingredient) -> Option<ParsedIngredient> {
    match ingredient {
        Ingredient::Raw(text) => Some(parse_raw(text)),
        Ingredient::Structured(structured) => Some(parse_structured(structured)),
        Ingredient::Invalid(value) => {
            tracing::debug!(%value, "skipping malformed ingredient");
            None
        }
    }
}

fn parse_structured(ingredient: &StructuredIngredient) -> ParsedIngredient {
    let unit = ingredient
        .unit
        .as_deref()
        .map(|unit| {
            canonical_unit(unit)
                .map(str::to_owned)
                .unwrap_or_else(|| unit.trim().to_lowercase())
        })
        .unwrap_or_default();

    ParsedIngredient {
        name: ingredient.name.trim().to_lowercase(),
        unit,
        quantity: ingredient
            .quantity
            .filter(|q| q.is_finite() && *q >= 0.0)
            .map(BigFraction::from),
    }
}

pub fn parse_raw(text: &str) -> ParsedIngredient {
    let normalized = normalize_text(text);
    let mut cursor = TokenCursor::new(&normalized);

    let quantity = QUANTITY_MATCHERS
        .iter()
        .find_map(|matcher| matcher.consume(&mut cursor));

    let unit = match cursor.peek().and_then(canonical_unit) {
        Some(unit) => {
            cursor.advance(1);
            unit.to_owned()
        }
        None => String::new(),
    };

    if cursor.peek() == Some("of") {
        cursor.advance(1);
    }

    let mut name = clean_name(&cursor.rest().join(" "));
    if name.is_empty() {
        name = normalized.clone();
    }

    ParsedIngredient {
        name,
        unit,
        quantity,
    }
}

fn normalize_text(text: &str) -> String {
    let text = normalize_fraction_glyphs(text);
    let text = PARENTHESIZED.replace_all(&text, " ");

    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn clean_name(name: &str) -> String {
    let mut name = name;
    for separator in QUALIFIER_SEPARATORS {
        if let Some(index) = name.find(separator) {
            name = &name[..index];
        }
    }

    name.trim()
        .trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || c.is_whitespace())
        .to_owned()
}

struct TokenCursor<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<&'a str> {
        self.tokens.get(self.pos + n).copied()
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.tokens.len());
    }

    fn rest(&self) -> &[&'a str] {
        &self.tokens[self.pos..]
    }
}

#[derive(Clone, Copy, Debug)]
enum QuantityMatcher {
    /// "2-3": lower bound, the upper bound is dropped.
    Range,
    /// "1", "1.5", optionally followed by a fraction token: "1 1/2".
    NumberWithFraction,
    /// "1/2"
    Fraction,
    /// "a" / "an"
    Article,
}

const QUANTITY_MATCHERS: [QuantityMatcher; 4] = [
    QuantityMatcher::Range,
    QuantityMatcher::NumberWithFraction,
    QuantityMatcher::Fraction,
    QuantityMatcher::Article,
];

impl QuantityMatcher {
    /// Consume the tokens this matcher recognizes and return the quantity.
    /// The cursor only moves on a match.
    fn consume(self, cursor: &mut TokenCursor<'_>) -> Option<BigFraction> {
        let token = cursor.peek()?;

        match self {
            QuantityMatcher::Range => {
                let caps = RANGE.captures(token)?;
                let lower = parse_quantity(&caps[1])?;
                cursor.advance(1);
                Some(lower)
            }
            QuantityMatcher::NumberWithFraction => {
                let whole = parse_decimal(token)?;
                match cursor.peek_at(1).and_then(parse_fraction) {
                    Some(fraction) => {
                        cursor.advance(2);
                        Some(whole + fraction)
                    }
                    None => {
                        cursor.advance(1);
                        Some(whole)
                    }
                }
            }
            QuantityMatcher::Fraction => {
                let fraction = parse_fraction(token)?;
                cursor.advance(1);
                Some(fraction)
            }
            QuantityMatcher::Article => {
                if token != "a" && token != "an" {
                    return None;
                }
                cursor.advance(1);
                Some(BigFraction::new(1u64, 1u64))
            }
        }
    }
}
