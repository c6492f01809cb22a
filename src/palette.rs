//! Categorical color palette and the ordinal color scale.

use std::collections::HashMap;

use crate::value::Value;

/// The classic category10 palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Returned for values outside the recorded domain (e.g. a scale built before
/// the data changed).
pub const FALLBACK_COLOR: &str = "#cccccc";

/// Assigns a fixed palette color to each distinct value in first-seen order.
#[derive(Debug, Clone)]
pub struct OrdinalColorScale {
    categories: Vec<String>,
    index: HashMap<String, usize>,
}

impl OrdinalColorScale {
    pub fn new(categories: Vec<String>) -> Self {
        let mut index = HashMap::new();
        let mut distinct = Vec::new();
        for cat in categories {
            if !index.contains_key(&cat) {
                index.insert(cat.clone(), distinct.len());
                distinct.push(cat);
            }
        }
        Self {
            categories: distinct,
            index,
        }
    }

    /// Build from raw field values, using their text representation.
    pub fn from_values<'a>(values: impl Iterator<Item = &'a Value>) -> Self {
        Self::new(values.map(Value::as_text).collect())
    }

    /// The ordered distinct categories.
    pub fn domain(&self) -> &[String] {
        &self.categories
    }

    /// Color for a value; values outside the domain get the fallback color.
    pub fn map(&self, value: &Value) -> &'static str {
        match self.index.get(&value.as_text()) {
            Some(&i) => CATEGORY10[i % CATEGORY10.len()],
            None => FALLBACK_COLOR,
        }
    }
}
