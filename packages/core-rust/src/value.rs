use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Generic runtime value held by table rows and form data.
///
/// Supports all JSON-compatible types. Deserializes untagged, so a plain JSON
/// or `MsgPack` document loads directly into a [`Record`] without wrapper
/// objects.
///
/// A key that is missing from a [`Record`] is distinct from a key holding
/// [`Value::Null`]: lookups go through [`field_value`], which returns `None`
/// for the former.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON integer (signed 64-bit).
    Int(i64),
    /// JSON floating-point (64-bit IEEE 754).
    Float(f64),
    /// JSON string (UTF-8).
    String(String),
    /// JSON array (ordered sequence of values).
    Array(Vec<Value>),
    /// JSON object.
    /// Uses `BTreeMap` for deterministic iteration and serialization order.
    Map(BTreeMap<String, Value>),
}

/// A schemaless record: one table row or one form's data.
pub type Record = BTreeMap<String, Value>;

/// A table row.
pub type Row = Record;

/// The current values of a form, keyed by field key.
pub type FormData = Record;

/// Looks up `key` in `record`.
///
/// Every row and form-data access in this crate goes through here so that the
/// "missing key" case is handled in one place: it yields `None`, never a
/// default value.
#[must_use]
pub fn field_value<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    record.get(key)
}

impl Value {
    /// Whether this value is `Int` or `Float`.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view of `Int` and `Float` values.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String slice of a `String` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of an `Array` value.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this value counts as "not filled in": `Null` or the empty string.
    ///
    /// A missing value is also empty; see [`is_blank`].
    #[must_use]
    pub fn is_empty_input(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Strict equality.
    ///
    /// Numbers compare by numeric value across `Int` and `Float` (`1 == 1.0`,
    /// `NaN` never equals anything). Values of different variants are never
    /// equal; no coercion happens.
    #[must_use]
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (a, b) if a.is_number() && b.is_number() => a.as_f64() == b.as_f64(),
            _ => self == other,
        }
    }
}

/// Strict equality over optional values, where `None` is a missing value.
///
/// A missing value only equals another missing value; in particular it does
/// not equal `Null`.
#[must_use]
pub fn strict_eq_opt(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.strict_eq(b),
        _ => false,
    }
}

/// Whether a possibly-missing value is blank: missing, `Null`, or `""`.
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    value.map_or(true, Value::is_empty_input)
}

/// Coerces a possibly-missing value to its display string.
///
/// Missing and `Null` values become the empty string. Numbers use their
/// shortest decimal form (`3.0` renders as `"3"`, `1e21` as `"1e+21"`), arrays join their coerced
/// elements with `","`, and maps render as `"[object Object]"`.
#[must_use]
pub fn coerce_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Int(i)) => i.to_string(),
        Some(Value::Float(f)) => format_float(*f),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| coerce_to_string(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Map(_)) => "[object Object]".to_string(),
    }
}

#[allow(clippy::float_cmp)]
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f == 0.0 {
        // Covers negative zero.
        "0".to_string()
    } else if f.abs() >= 1e21 || f.abs() < 1e-6 {
        exponent_form(f)
    } else {
        f.to_string()
    }
}

/// Shortest round-trip digits with an explicitly signed exponent: `1e+21`,
/// `1.5e-7`.
fn exponent_form(f: f64) -> String {
    let text = format!("{f:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_distinguishes_missing_from_null() {
        let mut record = Record::new();
        record.insert("a".to_string(), Value::Null);
        assert_eq!(field_value(&record, "a"), Some(&Value::Null));
        assert_eq!(field_value(&record, "b"), None);
    }

    #[test]
    fn strict_eq_compares_numbers_across_variants() {
        assert!(Value::Int(1).strict_eq(&Value::Float(1.0)));
        assert!(!Value::Float(f64::NAN).strict_eq(&Value::Float(f64::NAN)));
        assert!(!Value::Int(1).strict_eq(&Value::String("1".into())));
        assert!(!Value::Bool(false).strict_eq(&Value::Int(0)));
    }

    #[test]
    fn strict_eq_opt_missing_is_not_null() {
        assert!(strict_eq_opt(None, None));
        assert!(!strict_eq_opt(None, Some(&Value::Null)));
        assert!(strict_eq_opt(Some(&Value::Null), Some(&Value::Null)));
    }

    #[test]
    fn blank_values() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&Value::Null)));
        assert!(is_blank(Some(&Value::from(""))));
        assert!(!is_blank(Some(&Value::from(" "))));
        assert!(!is_blank(Some(&Value::Int(0))));
        assert!(!is_blank(Some(&Value::Bool(false))));
    }

    #[test]
    fn coerce_scalars() {
        assert_eq!(coerce_to_string(None), "");
        assert_eq!(coerce_to_string(Some(&Value::Null)), "");
        assert_eq!(coerce_to_string(Some(&Value::Bool(true))), "true");
        assert_eq!(coerce_to_string(Some(&Value::Int(-42))), "-42");
        assert_eq!(coerce_to_string(Some(&Value::Float(3.0))), "3");
        assert_eq!(coerce_to_string(Some(&Value::Float(1.5))), "1.5");
        assert_eq!(coerce_to_string(Some(&Value::Float(-0.0))), "0");
        assert_eq!(coerce_to_string(Some(&Value::Float(f64::NAN))), "NaN");
        assert_eq!(coerce_to_string(Some(&Value::Float(f64::NEG_INFINITY))), "-Infinity");
    }

    #[test]
    fn coerce_extreme_floats_uses_exponent_form() {
        let f = |x: f64| coerce_to_string(Some(&Value::Float(x)));
        assert_eq!(f(1e21), "1e+21");
        assert_eq!(f(-2.5e22), "-2.5e+22");
        assert_eq!(f(1e-7), "1e-7");
        assert_eq!(f(1.5e-7), "1.5e-7");
        assert_eq!(f(1e20), "100000000000000000000");
        assert_eq!(f(0.000_001), "0.000001");
    }

    #[test]
    fn coerce_containers() {
        let arr = Value::Array(vec![Value::Int(1), Value::Null, Value::from("x")]);
        assert_eq!(coerce_to_string(Some(&arr)), "1,,x");
        let map = Value::Map(BTreeMap::new());
        assert_eq!(coerce_to_string(Some(&map)), "[object Object]");
    }

    #[test]
    fn deserializes_plain_json_record() {
        let record: Record =
            serde_json::from_str(r#"{"name":"Alice","age":30,"score":9.5,"tags":["a"],"x":null}"#)
                .expect("deserialize");
        assert_eq!(record["name"], Value::from("Alice"));
        assert_eq!(record["age"], Value::Int(30));
        assert_eq!(record["score"], Value::Float(9.5));
        assert_eq!(record["tags"], Value::Array(vec![Value::from("a")]));
        assert_eq!(record["x"], Value::Null);
    }

    #[test]
    fn from_serde_json_value() {
        let json = serde_json::json!({"n": 2, "f": 0.5, "list": [true]});
        let value = Value::from(json);
        let Value::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(map["n"], Value::Int(2));
        assert_eq!(map["f"], Value::Float(0.5));
        assert_eq!(map["list"], Value::Array(vec![Value::Bool(true)]));
    }
}
