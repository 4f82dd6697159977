//! Ordered alias lookup over loosely-shaped JSON objects.
//!
//! Several inputs (GeoJSON properties, geocoder addresses, prediction
//! payloads) carry the same logical attribute under different keys. Each
//! attribute is described once as a [`FieldAliases`] constant and resolved
//! through the methods here; the first alias that is present (and usable)
//! wins.

use serde_json::{Map, Value};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldAliases {
    /// Logical attribute name, for logs.
    pub field: &'static str,
    /// Keys in priority order.
    pub keys: &'static [&'static str],
}

impl FieldAliases {
    pub const fn new(field: &'static str, keys: &'static [&'static str]) -> Self {
        Self { field, keys }
    }

    /// First alias whose value is present and not `null`.
    pub fn lookup<'a>(&self, obj: &'a Map<String, Value>) -> Option<&'a Value> {
        self.keys
            .iter()
            .filter_map(|k| obj.get(*k))
            .find(|v| !v.is_null())
    }

    /// First alias that renders as non-empty text.
    ///
    /// Strings are trimmed; numbers and booleans are rendered with their JSON
    /// spelling. Arrays and objects never match.
    pub fn text(&self, obj: &Map<String, Value>) -> Option<String> {
        self.keys
            .iter()
            .filter_map(|k| obj.get(*k))
            .find_map(value_text)
    }

    /// First alias that yields a finite number.
    ///
    /// Accepts JSON numbers, numeric strings, and objects carrying the number
    /// under `value` or `probability`.
    pub fn number(&self, obj: &Map<String, Value>) -> Option<f64> {
        self.keys
            .iter()
            .filter_map(|k| obj.get(*k))
            .find_map(value_number)
    }
}

pub fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn value_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Object(obj) => ["value", "probability"]
            .iter()
            .filter_map(|k| obj.get(*k))
            .find_map(value_number),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
