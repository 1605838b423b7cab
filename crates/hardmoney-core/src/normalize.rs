//! Boundary layer that turns loosely-typed deal fields (JSON numbers,
//! "$250,000"-style strings, empty strings) into `Decimal` values.
//!
//! Malformed input never errors here. `None` means "field unset"; callers
//! apply domain defaults or raise a missing-field error themselves.

use rust_decimal::Decimal;
use serde_json::Value;

/// Parse a loosely-typed monetary or percentage field.
///
/// Numbers pass through as-is. Strings are trimmed, a single leading
/// currency symbol and thousands separators are stripped, and the rest
/// must parse as a decimal. Anything else yields `None`.
pub fn to_number(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64_retain)
            }
        }
        Value::String(s) => parse_money_str(s),
        _ => None,
    }
}

fn parse_money_str(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    let stripped = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let cleaned: String = stripped.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

/// Read a string field, treating whitespace-only values as unset.
pub fn to_trimmed(value: Option<&String>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Round a monetary amount to 2 decimal places, passing `None` through.
pub fn round_money(x: Option<Decimal>) -> Option<Decimal> {
    x.map(|v| v.round_dp(2))
}

/// Round a percentage to 2 decimal places, passing `None` through.
pub fn round_percent(x: Option<Decimal>) -> Option<Decimal> {
    x.map(|v| v.round_dp(2))
}
