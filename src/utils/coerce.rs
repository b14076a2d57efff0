//! Loose JSON value coercions
//!
//! Product fields written by browser clients are stored exactly as sent, so
//! a price may be `12`, `12.5` or `"12"`. These helpers decide whether such
//! a value counts as given, turn it into a number for price arithmetic and
//! render it back into a message, using the same rules as the storefront's
//! JavaScript client.

use serde_json::Value;

/// False for `null`, `false`, `0`, `""` (and NaN); true for everything else,
/// including empty arrays and objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric value of a JSON value, NaN when it has none.
///
/// `null` is 0, booleans are 0/1, strings are parsed after trimming (an
/// empty string is 0) and single-element arrays use their element.
///
/// ```
/// use serde_json::json;
/// use storefront::utils::to_number;
/// assert_eq!(to_number(&json!(" 12.5 ")), 12.5);
/// assert_eq!(to_number(&json!(null)), 0.0);
/// assert!(to_number(&json!("12 EUR")).is_nan());
/// ```
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s),
        Value::Array(_) => parse_number(&display_string(value)),
        Value::Object(_) => f64::NAN,
    }
}

/// String form of a value as it appears when interpolated into a message
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            // f64 Display drops a zero fraction: 3.0 -> "3"
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn parse_number(input: &str) -> f64 {
    let s = input.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }

    // Rust also accepts "inf"/"nan" spellings; only plain decimal literals count here
    let decimal_chars = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal_chars || !s.bytes().any(|b| b.is_ascii_digit()) {
        return f64::NAN;
    }

    s.parse().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
    .unwrap_or(f64::NAN)
}
