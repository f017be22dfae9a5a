use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

/// Parse a user- or upstream-supplied decimal string. Surrounding whitespace is ignored;
/// anything else that is not a plain or scientific decimal is rejected.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(is_numeric_char) {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

// `Decimal::from_str` also takes `_` digit separators; amounts never contain them.
fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')
}

/// Monetary value of a raw JSON leaf, with missing or unparsable values counted as zero.
pub fn coerce_decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::String(s)) => parse_amount(s),
        Some(Value::Number(n)) => parse_amount(&n.to_string()),
        _ => None,
    }
    .unwrap_or(Decimal::ZERO)
}

/// Text of a raw JSON leaf; strings as-is, numbers in their JSON form, anything else empty.
pub fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Widen to at least two fraction digits without changing the value.
pub fn money_scale(mut amount: Decimal) -> Decimal {
    if amount.scale() < 2 {
        amount.rescale(2);
    }
    amount
}

/// Two fraction digits, half away from zero.
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}
