use std::{str::FromStr, sync::LazyLock};

use fraction::{BigFraction, BigUint, ToPrimitive, Zero};
use regex::Regex;

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+(?:\.\d*)?|\.\d+)$").expect("valid decimal regex"));

static FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)/(\d+)$").expect("valid fraction regex"));

/// Unicode vulgar fractions and their ASCII spelling.
const FRACTION_GLYPHS: &[(char, &str)] = &[
    ('¼', "1/4"),
    ('½', "1/2"),
    ('¾', "3/4"),
    ('⅓', "1/3"),
    ('⅔', "2/3"),
    ('⅛', "1/8"),
    ('⅜', "3/8"),
    ('⅝', "5/8"),
    ('⅞', "7/8"),
];

/// Replace fraction glyphs with ASCII fractions.
///
/// A glyph glued to a number is split off ("1½" -> "1 1/2") so that it reads as
/// a mixed number once tokenized.
pub fn normalize_fraction_glyphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);

    for c in text.chars() {
        match FRACTION_GLYPHS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, ascii)) => {
                if out.chars().last().is_some_and(|prev| prev.is_ascii_digit()) {
                    out.push(' ');
                }
                out.push_str(ascii);
            }
            None => out.push(c),
        }
    }

    out
}

/// Parse a whole number or decimal token ("2", "1.5", ".5").
///
/// The value is exact whatever the number of digits.
pub fn parse_decimal(token: &str) -> Option<BigFraction> {
    if !DECIMAL.is_match(token) {
        return None;
    }

    let token = token.strip_suffix('.').unwrap_or(token);
    let token = match token.strip_prefix('.') {
        Some(fraction) => format!("0.{fraction}"),
        None => token.to_owned(),
    };

    BigFraction::from_str(&token).ok()
}

/// Parse a fraction token ("1/2"). A zero denominator is not a quantity.
pub fn parse_fraction(token: &str) -> Option<BigFraction> {
    let caps = FRACTION.captures(token)?;
    let numerator: BigUint = caps[1].parse().ok()?;
    let denominator: BigUint = caps[2].parse().ok()?;

    if denominator.is_zero() {
        return None;
    }

    Some(BigFraction::new(numerator, denominator))
}

/// Parse either a decimal or a fraction token.
pub fn parse_quantity(token: &str) -> Option<BigFraction> {
    parse_decimal(token).or_else(|| parse_fraction(token))
}

/// A summable amount: finite and not negative.
pub fn is_measurable(quantity: &BigFraction) -> bool {
    !quantity.is_nan() && !quantity.is_infinite() && !quantity.is_sign_negative()
}

/// Decimal value of a quantity; NaN when it has no finite value.
pub fn to_f64(quantity: &BigFraction) -> f64 {
    quantity.to_f64().unwrap_or(f64::NAN)
}

/// Format a summed quantity for display.
///
/// - within 0.01 of a whole number: the whole number ("2")
/// - otherwise two decimals with trailing zeros trimmed ("1.5", "0.33")
/// - zero, negative or non-finite: empty
pub fn format_quantity(quantity: f64) -> String {
    if !quantity.is_finite() || quantity <= 0.0 {
        return String::new();
    }

    let rounded = quantity.round();
    if (quantity - rounded).abs() < 0.01 {
        if rounded == 0.0 {
            return String::new();
        }

        return format!("{rounded:.0}");
    }

    let fixed = format!("{quantity:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');

    if trimmed == "0" {
        return String::new();
    }

    trimmed.to_owned()
}
