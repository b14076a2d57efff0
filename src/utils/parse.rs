//! Lenient integer parsing
//!
//! Browser clients send ids and ratings either as JSON numbers or as strings
//! ("3", "4 stars"). Both services accept the leading integer prefix of a
//! string and truncate fractional numbers toward zero.

use serde_json::Value;

/// Parse the leading integer of a string.
///
/// Leading whitespace and a single sign are allowed; parsing stops at the
/// first non-digit. Returns `None` when no digit was consumed or the value
/// does not fit in an `i64`.
///
/// ```
/// use storefront::utils::parse_int;
/// assert_eq!(parse_int("  42abc"), Some(42));
/// assert_eq!(parse_int("-7"), Some(-7));
/// assert_eq!(parse_int("abc"), None);
/// ```
pub fn parse_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse an integer out of an arbitrary JSON value.
///
/// Numbers are truncated toward zero, strings go through [`parse_int`],
/// everything else (null, bool, arrays, objects) yields `None`.
pub fn parse_int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
            }
        }
        Value::String(s) => parse_int(s),
        _ => None,
    }
}

/// True when a path segment is a non-empty run of ASCII digits
pub fn is_digit_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
