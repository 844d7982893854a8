use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Parse a non-negative quantity from form or spreadsheet text.
///
/// Handles formats like:
/// - "1000" -> 1000
/// - " 0.12 " -> 0.12
/// - "1,500.25" -> 1500.25 (comma thousands grouping)
/// - "2.5e3" -> 2500
///
/// Returns `None` for empty, negative or unparsable text. Callers at the
/// input boundary treat `None` as zero.
pub fn parse_non_negative_number(s: &str) -> Option<Decimal> {
    match parse_number(s)? {
        v if v.is_zero() => Some(Decimal::ZERO),
        v if v.is_sign_negative() => None,
        v => Some(v),
    }
}

/// Parse a signed decimal number, accepting the same notations as
/// [`parse_non_negative_number`].
pub fn parse_number(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let cleaned = strip_thousands_separators(s)?;
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Remove comma thousands separators, rejecting commas in any other position.
fn strip_thousands_separators(s: &str) -> Option<String> {
    if !s.contains(',') {
        return Some(s.to_string());
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    if frac_part.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let digits = int_part.strip_prefix('-').unwrap_or(int_part);
    let groups: Vec<&str> = digits.split(',').collect();
    let first_ok = !groups[0].is_empty() && groups[0].len() <= 3;
    let rest_ok = groups[1..].iter().all(|g| g.len() == 3);
    let all_digits = groups.iter().all(|g| g.chars().all(|c| c.is_ascii_digit()));
    if !(first_ok && rest_ok && all_digits) {
        return None;
    }

    let mut out = int_part.replace(',', "");
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    Some(out)
}

/// Outcome of coercing a loosely-typed JSON field into a number.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// Field absent, `null` or an empty string.
    Missing,
    Value(Decimal),
    /// Field present but not a non-negative number; carries the reason.
    Invalid(String),
}

impl Coerced {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Coerced::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Smallest magnitude a `Decimal` can hold (28 fractional digits).
const DECIMAL_EPSILON: f64 = 1e-28;

/// Coerce a JSON number or numeric string into a non-negative decimal.
pub fn coerce_number(value: Option<&Value>) -> Coerced {
    let text = match value {
        None | Some(Value::Null) => return Coerced::Missing,
        Some(Value::Number(n)) => return coerce_json_number(n),
        Some(Value::String(s)) if s.trim().is_empty() => return Coerced::Missing,
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Coerced::Invalid(format!("expected a number, found {}", json_kind(other)))
        }
    };

    match parse_number(&text) {
        Some(v) => non_negative(v, &text),
        None => Coerced::Invalid(format!("invalid number '{}'", text.trim())),
    }
}

/// JSON numbers are always well-formed; the only failure is falling outside
/// what a `Decimal` can represent.
fn coerce_json_number(n: &serde_json::Number) -> Coerced {
    let text = n.to_string();
    if let Some(v) = parse_number(&text) {
        return non_negative(v, &text);
    }
    match n.as_f64() {
        Some(f) if f.abs() < DECIMAL_EPSILON => Coerced::Value(Decimal::ZERO),
        _ => Coerced::Invalid(format!("number '{}' is outside the decimal range", text)),
    }
}

fn non_negative(v: Decimal, text: &str) -> Coerced {
    if v.is_zero() {
        Coerced::Value(Decimal::ZERO)
    } else if v.is_sign_negative() {
        Coerced::Invalid(format!("negative value '{}'", text.trim()))
    } else {
        Coerced::Value(v)
    }
}

/// Short name of a JSON value's type, for diagnostics.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
