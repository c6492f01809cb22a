use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde_json::Value as JsonValue;

/// Tolerance for numeric equality in filter comparisons.
pub const NUMERIC_EPSILON: f64 = 1e-9;

/// A dynamically typed scalar or nested value, as found in chart data rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Object(Row),
}

impl Value {
    /// Numeric coercion: numbers pass through, text is parsed, booleans map
    /// to 1/0. Everything else is not a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text coercion used for group keys and text comparison.
    pub fn as_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::List(_) | Value::Object(_) => String::new(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Filter comparison policy: numeric if both sides coerce to numbers
    /// (with near-zero epsilon equality), otherwise case-insensitive text.
    ///
    /// The epsilon makes this non-transitive, so it must never drive a sort;
    /// use [`Value::compare_exact`] there.
    pub fn compare(&self, other: &Value) -> Ordering {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            if (a - b).abs() < NUMERIC_EPSILON {
                Ordering::Equal
            } else if a < b {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        } else {
            let a = self.as_text().to_lowercase();
            let b = other.as_text().to_lowercase();
            a.cmp(&b)
        }
    }

    /// Exact total ordering for sorting: numeric via `f64::total_cmp` if both
    /// sides coerce to numbers, otherwise case-insensitive text.
    pub fn compare_exact(&self, other: &Value) -> Ordering {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            a.total_cmp(&b)
        } else {
            let a = self.as_text().to_lowercase();
            let b = other.as_text().to_lowercase();
            a.cmp(&b)
        }
    }

    fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Value::Text(s.clone()),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => {
                let mut row = Row::new();
                for (k, v) in map {
                    row.insert(k, Value::from_json(v));
                }
                Value::Object(row)
            }
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A single data row: field name -> value. Keys are unique; insertion order
/// is irrelevant to every consumer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Numeric view of a field, if present and coercible.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_number)
    }

    /// Text view of a field; missing fields read as empty text.
    pub fn text(&self, field: &str) -> String {
        self.get(field).map(Value::as_text).unwrap_or_default()
    }

    /// Build a row from a JSON object. Non-object values are rejected upstream.
    pub fn from_json_object(json: &JsonValue) -> Option<Row> {
        let map = json.as_object()?;
        let mut row = Row::new();
        for (k, v) in map {
            row.insert(k, Value::from_json(v));
        }
        Some(row)
    }
}

/// Convert a JSON array of objects into rows, skipping non-object items.
pub fn rows_from_json(json: &JsonValue) -> Vec<Row> {
    match json.as_array() {
        Some(items) => items.iter().filter_map(Row::from_json_object).collect(),
        None => Vec::new(),
    }
}
