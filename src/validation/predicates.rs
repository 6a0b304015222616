//! Value predicates shared by the rule handlers.
//!
//! Payload values arrive as loosely typed JSON (query strings and path
//! parameters are always strings), so a few checks work on a coerced view
//! of the value: numbers may be written as numeric strings, and pattern
//! rules test the value's string form.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use crate::types::ValueKind;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$")
        .expect("email pattern is valid")
});

static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("decimal pattern is valid")
});

static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}(?:-(?:0[1-9]|1[0-2]))?$").expect("year pattern is valid"));

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Type predicate used by both `type` and `arrayElementType`.
pub fn matches_kind(kind: ValueKind, value: &Value) -> bool {
    match kind {
        ValueKind::Date => is_date(value),
        ValueKind::Array => value.is_array(),
        ValueKind::Number => to_number(value).is_some(),
        ValueKind::String => value.is_string(),
        ValueKind::Boolean => value.is_boolean(),
        ValueKind::Object => value.is_object(),
    }
}

/// Numeric view of a value, following loose client-side number conversion:
/// booleans become `1`/`0`, `null` and blank strings become `0`, strings
/// must hold a numeric literal and arrays convert through their string
/// form (`[7]` is `7`, `[1, 2]` is not a number). Objects never convert.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_numeric_literal(text),
        Value::Array(items) => parse_numeric_literal(&join_literals(items)),
        Value::Object(_) => None,
    }
}

fn parse_numeric_literal(text: &str) -> Option<f64> {
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if text.is_empty() {
        return Some(0.0);
    }

    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &text[2..];
        if digits.starts_with(['+', '-']) {
            return None;
        }
        return u64::from_str_radix(digits, radix)
            .ok()
            .map(|n| n as f64);
    }

    if !DECIMAL_LITERAL.is_match(text) {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Whether a value is a string naming a calendar date or date-time.
pub fn is_date(value: &Value) -> bool {
    let Some(text) = value.as_str() else {
        return false;
    };
    let text = text.trim();

    DateTime::parse_from_rfc3339(text).is_ok()
        || DateTime::parse_from_rfc2822(text).is_ok()
        || DATE_TIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(text, format).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|format| NaiveDate::parse_from_str(text, format).is_ok())
        || YEAR_MONTH.is_match(text)
}

pub fn is_email(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}

/// Number of own keys: object entries, array elements or string units.
/// Scalars have none.
pub fn own_key_count(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        Value::String(text) => utf16_len(text),
        _ => 0,
    }
}

/// Own keys in iteration order. Arrays and strings are keyed by index.
pub fn own_keys(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.keys().cloned().collect(),
        _ => (0..own_key_count(value)).map(|index| index.to_string()).collect(),
    }
}

/// String length in UTF-16 code units, the unit request clients count in.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Strict membership equality: no cross-kind coercion, numbers compare by
/// value so `1` and `1.0` are equal.
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

/// String form of a value as a loosely typed client would render it:
/// strings unquoted, arrays comma-joined with `null` elements left empty,
/// objects as `[object Object]`.
pub fn loose_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_string(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => join_literals(items),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Comma-joined rendering of a literal list, used by the `equals` message.
pub fn join_literals(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            other => loose_string(other),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn number_string(number: &Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(uint) = number.as_u64() {
        return uint.to_string();
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 1e21 => format!("{:.0}", float),
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}
