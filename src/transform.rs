//! The data transform pipeline: filter, aggregate, sort, bin.
//!
//! Transforms run in spec order, each consuming the previous output. All
//! transforms produce fresh row vectors except bin, which augments rows in
//! place with two new fields (a compatibility exception).

use std::collections::HashMap;

use log::debug;

use crate::error::{Error, Result};
use crate::expr::FilterExpr;
use crate::spec::{AggregateFieldSpec, BinSpec, SortKeySpec, TransformKind, TransformSpec};
use crate::value::{Row, Value};

/// Delimiter joining group-by components into a composite key. Raw values
/// containing it can collide; that is ambiguous input, accepted as-is.
const GROUP_KEY_DELIMITER: &str = "|";

/// Apply each spec's transform in list order. An empty spec list returns the
/// input unchanged; specs with no recognized payload pass through.
///
/// Rows missing a sort key field are excluded by the sort transform; rows
/// missing a group-by field contribute an empty key component instead.
pub fn apply_transforms(rows: Vec<Row>, specs: &[TransformSpec]) -> Result<Vec<Row>> {
    let mut current = rows;
    for spec in specs {
        let before = current.len();
        current = match spec.kind() {
            TransformKind::Filter(expr) => apply_filter(current, expr),
            TransformKind::Aggregate { fields, groupby } => {
                apply_aggregate(current, fields, groupby)?
            }
            TransformKind::Sort(keys) => apply_sort(current, keys),
            TransformKind::Bin { field, spec, alias } => apply_bin(current, field, spec, alias)?,
            TransformKind::Passthrough => current,
        };
        debug!("transform step: {before} -> {} rows", current.len());
    }
    Ok(current)
}

/// Keep rows matching the expression, preserving input order. An expression
/// that fails to parse includes every row (documented quirk, not an error).
fn apply_filter(rows: Vec<Row>, expr: &str) -> Vec<Row> {
    match FilterExpr::parse(expr) {
        Some(predicate) => rows.into_iter().filter(|r| predicate.eval(r)).collect(),
        None => rows,
    }
}

fn apply_aggregate(
    rows: Vec<Row>,
    fields: &[AggregateFieldSpec],
    groupby: &[String],
) -> Result<Vec<Row>> {
    // Partition into groups, keeping first-seen key order so single-key
    // grouping behaves predictably downstream.
    let mut key_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Row>> = HashMap::new();
    for row in rows {
        let key = groupby
            .iter()
            .map(|f| row.text(f))
            .collect::<Vec<_>>()
            .join(GROUP_KEY_DELIMITER);
        if !groups.contains_key(&key) {
            key_order.push(key.clone());
        }
        groups.entry(key).or_default().push(row);
    }

    let mut out = Vec::with_capacity(key_order.len());
    for key in key_order {
        let group = &groups[&key];
        let mut row = Row::new();

        // Group-by values come from the group's first row.
        if let Some(first) = group.first() {
            for field in groupby {
                if let Some(v) = first.get(field) {
                    row.insert(field.clone(), v.clone());
                }
            }
        }

        for agg in fields {
            let value = compute_aggregate(group, agg)?;
            row.insert(agg.output_name(), value);
        }
        out.push(row);
    }
    Ok(out)
}

/// Compute one aggregate op over a group. Every op over an empty value set
/// yields 0; a non-null value that fails numeric coercion is a hard error.
fn compute_aggregate(group: &[Row], agg: &AggregateFieldSpec) -> Result<f64> {
    let op = agg.op.to_lowercase();

    // Count is plain row count, not filtered by null or field presence.
    if op == "count" {
        return Ok(group.len() as f64);
    }

    let mut values = Vec::with_capacity(group.len());
    for row in group {
        match row.get(&agg.field) {
            None => continue,
            Some(Value::Null) => continue,
            Some(v) => match v.as_number() {
                Some(n) => values.push(n),
                None => {
                    return Err(Error::Coercion {
                        field: agg.field.clone(),
                        op: agg.op.clone(),
                        value: v.as_text(),
                    })
                }
            },
        }
    }

    if values.is_empty() {
        return Ok(0.0);
    }

    let result = match op.as_str() {
        "mean" | "average" | "avg" => values.iter().sum::<f64>() / values.len() as f64,
        "min" => values.iter().cloned().fold(f64::INFINITY, f64::min),
        "max" => values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        "median" => median(&mut values),
        // sum, and the documented fallback for unrecognized ops
        _ => values.iter().sum(),
    };
    Ok(result)
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    }
}

/// Stable multi-key sort. Later keys break ties from earlier keys; full ties
/// keep input order. Rows missing any key field are excluded first.
fn apply_sort(rows: Vec<Row>, keys: &[SortKeySpec]) -> Vec<Row> {
    let mut sortable: Vec<Row> = rows
        .into_iter()
        .filter(|r| keys.iter().all(|k| r.contains(&k.field)))
        .collect();

    sortable.sort_by(|a, b| {
        for key in keys {
            let (va, vb) = (a.get(&key.field), b.get(&key.field));
            let ord = match (va, vb) {
                (Some(va), Some(vb)) => va.compare_exact(vb),
                _ => std::cmp::Ordering::Equal,
            };
            let ord = if key.descending() { ord.reverse() } else { ord };
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });
    sortable
}

/// Assign fixed-width bins, augmenting rows in place. Rows without the field
/// pass through untouched; rows whose value fails numeric coercion are a hard
/// error. With no explicit extent and no numeric data the transform is a no-op.
fn apply_bin(
    mut rows: Vec<Row>,
    field: &str,
    spec: &BinSpec,
    alias: Option<&str>,
) -> Result<Vec<Row>> {
    let data_extent = numeric_extent(&rows, field);
    let min = spec.extent_min.or(data_extent.map(|(lo, _)| lo));
    let max = spec.extent_max.or(data_extent.map(|(_, hi)| hi));
    let (min, max) = match (min, max) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => return Ok(rows),
    };

    let maxbins = match spec.maxbins {
        Some(m) if m > 0 => m,
        _ => 10,
    };
    let mut step = spec.step.unwrap_or((max - min) / maxbins as f64);
    if !(step > 0.0) {
        step = 1.0;
    }

    let start_field = alias
        .map(String::from)
        .unwrap_or_else(|| format!("{field}_bin"));
    let end_field = format!("{start_field}_end");

    for row in &mut rows {
        let value = match row.get(field) {
            None | Some(Value::Null) => continue,
            Some(v) => v.as_number().ok_or_else(|| Error::Coercion {
                field: field.to_string(),
                op: "bin".to_string(),
                value: v.as_text(),
            })?,
        };
        let start = min + ((value - min) / step).floor() * step;
        row.insert(start_field.clone(), start);
        row.insert(end_field.clone(), start + step);
    }
    Ok(rows)
}

/// Min/max over numeric-coercible values of a field; non-numeric and absent
/// fields are ignored here (assignment still sees them).
fn numeric_extent(rows: &[Row], field: &str) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in rows {
        if let Some(v) = row.number(field) {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}
