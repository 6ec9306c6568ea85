//! Lenient numeric parsing for user-typed fields and remote payloads.
//!
//! Field values are coerced rather than rejected: an amount that cannot be
//! read becomes zero, a term that cannot be read becomes one month.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Parse a typed amount or percentage. Empty or unreadable input yields zero.
///
/// Accepts a decimal comma (`"38,5"`), surrounding whitespace, and trailing
/// garbage after a numeric prefix (`"1500 ARS"` reads as 1500).
pub fn parse_amount(raw: &str) -> Decimal {
    let normalized = raw.trim().replace(',', ".");
    let prefix = numeric_prefix(&normalized);
    decimal_from_literal(prefix).unwrap_or(Decimal::ZERO)
}

/// Parse a term in months. Empty, unreadable or zero input yields one.
///
/// Only the leading integer is read (`"36.5"` reads as 36). Negative values
/// are passed through; the calculator clamps them.
pub fn parse_term(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 1;
    }

    let negative = bytes[0] == b'-';
    let value = trimmed[digits_start..end]
        .parse::<i64>()
        .unwrap_or(i64::MAX);
    match (value, negative) {
        (0, _) => 1,
        (v, true) => -v,
        (v, false) => v,
    }
}

/// Read a rate value out of a JSON payload.
///
/// Numbers are taken as-is; strings are trimmed and may use a decimal
/// comma. Anything else (null, booleans, partial numbers like `"38%"`)
/// is not a usable value.
pub fn parse_rate_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => decimal_from_literal(&n.to_string()),
        Value::String(s) => {
            let normalized = s.trim().replace(',', ".");
            if normalized.is_empty() || numeric_prefix(&normalized).len() != normalized.len() {
                return None;
            }
            decimal_from_literal(&normalized)
        }
        _ => None,
    }
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return "";
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

fn decimal_from_literal(literal: &str) -> Option<Decimal> {
    if literal.is_empty() {
        return None;
    }
    let literal = literal.strip_prefix('+').unwrap_or(literal);
    let (sign, unsigned) = match literal.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", literal),
    };
    // rust_decimal wants a digit on both sides of the point
    let unsigned = unsigned.replace(".e", "e").replace(".E", "E");
    let unsigned = unsigned.strip_suffix('.').unwrap_or(&unsigned);
    let canonical = if unsigned.starts_with('.') {
        format!("{sign}0{unsigned}")
    } else {
        format!("{sign}{unsigned}")
    };

    if canonical.contains(['e', 'E']) {
        Decimal::from_scientific(&canonical.to_ascii_lowercase()).ok()
    } else {
        Decimal::from_str(&canonical).ok()
    }
}
