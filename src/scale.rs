//! Scale system: linear, band, and log scales plus per-channel resolution.
//!
//! Each scale is constructed once from a materialized domain and exposes
//! `map` into a numeric range, with `range_min`/`range_max` accessors needed
//! downstream for bounds computation.

use std::collections::HashMap;

use crate::palette::OrdinalColorScale;
use crate::spec::{ChannelSpec, ChannelType, ScaleKind};
use crate::value::{Row, Value};

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Debug, Clone)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Build from raw domain values. An empty value set degenerates to the
    /// [0, 1] domain; `include_zero` extends the domain to contain 0; `nice`
    /// rounds bounds outward to 1/2/5 × 10ⁿ steps.
    pub fn new(values: &[f64], range_min: f64, range_max: f64, include_zero: bool, nice: bool) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let (mut min, mut max) = if finite.is_empty() {
            (0.0, 1.0)
        } else {
            let min = finite.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            (min, max)
        };

        if include_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        if nice {
            (min, max) = nice_domain(min, max);
        }

        Self {
            domain: (min, max),
            range: (range_min, range_max),
        }
    }

    /// Build directly from an explicit domain.
    pub fn with_domain(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Linear interpolation of `v` into the range. A degenerate domain maps
    /// everything to the range start.
    pub fn map_number(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        r0 + (v - d0) / denom * (r1 - r0)
    }

    pub fn range_min(&self) -> f64 {
        self.range.0
    }

    pub fn range_max(&self) -> f64 {
        self.range.1
    }
}

/// Round a domain outward to conventional tick steps so labels land on round
/// numbers.
fn nice_domain(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if !(span > 0.0) {
        return (min, max);
    }
    let step = nice_step(span / 10.0);
    if step == 0.0 {
        return (min, max);
    }
    ((min / step).floor() * step, (max / step).ceil() * step)
}

/// Snap a raw step to 1/2/5 × power of ten.
fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let factor = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// A discrete band scale: categories in first-seen order, each mapped to an
/// evenly spaced sub-interval of the range with inner/outer padding.
#[derive(Debug, Clone)]
pub struct BandScale {
    categories: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    pub fn new(
        categories: Vec<String>,
        range_min: f64,
        range_max: f64,
        padding_inner: f64,
        padding_outer: f64,
    ) -> Self {
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
            range: (range_min, range_max),
            padding_inner,
            padding_outer,
        }
    }

    /// Build from raw field values, using their text representation.
    pub fn from_values<'a>(
        values: impl Iterator<Item = &'a Value>,
        range_min: f64,
        range_max: f64,
        padding_inner: f64,
        padding_outer: f64,
    ) -> Self {
        Self::new(
            values.map(Value::as_text).collect(),
            range_min,
            range_max,
            padding_inner,
            padding_outer,
        )
    }

    pub fn domain(&self) -> &[String] {
        &self.categories
    }

    /// Band step: range width / (N - padding_inner + 2 * padding_outer).
    fn step(&self) -> f64 {
        let n = self.categories.len() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let denom = n - self.padding_inner + 2.0 * self.padding_outer;
        if denom == 0.0 {
            return 0.0;
        }
        (self.range.1 - self.range.0) / denom
    }

    pub fn band_width(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Leading edge of a category's band; `None` for unknown categories.
    pub fn map_band_start(&self, category: &str) -> Option<f64> {
        let i = *self.index.get(category)?;
        let step = self.step();
        Some(self.range.0 + self.padding_outer * step + i as f64 * step)
    }

    /// Band center for a value; unknown categories map to the range start.
    pub fn map_value(&self, value: &Value) -> f64 {
        match self.map_band_start(&value.as_text()) {
            Some(start) => start + self.band_width() / 2.0,
            None => self.range.0,
        }
    }

    pub fn range_min(&self) -> f64 {
        self.range.0
    }

    pub fn range_max(&self) -> f64 {
        self.range.1
    }
}

/// A log-transformed mapping from a strictly positive domain to a range.
///
/// Callers must filter non-positive values before construction; non-positive
/// inputs to `map_number` fall back to the range start.
#[derive(Debug, Clone)]
pub struct LogScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LogScale {
    /// Build from strictly positive domain values. An empty set degenerates
    /// to the [1, 10] domain.
    pub fn new(positive_values: &[f64], range_min: f64, range_max: f64) -> Self {
        let finite: Vec<f64> = positive_values
            .iter()
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();
        let domain = if finite.is_empty() {
            (1.0, 10.0)
        } else {
            (
                finite.iter().cloned().fold(f64::INFINITY, f64::min),
                finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            )
        };
        Self {
            domain,
            range: (range_min, range_max),
        }
    }

    /// Build directly from an explicit domain. Non-positive domain bounds
    /// make every mapping fall back to the range start.
    pub fn with_domain(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn map_number(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if v <= 0.0 || d0 <= 0.0 || d1 <= 0.0 {
            return r0;
        }
        let denom = d1.ln() - d0.ln();
        if denom == 0.0 {
            return r0;
        }
        r0 + (v.ln() - d0.ln()) / denom * (r1 - r0)
    }

    pub fn range_min(&self) -> f64 {
        self.range.0
    }

    pub fn range_max(&self) -> f64 {
        self.range.1
    }
}

/// A resolved per-channel numeric scale.
#[derive(Debug, Clone)]
pub enum Scale {
    Linear(LinearScale),
    Band(BandScale),
    Log(LogScale),
}

impl Scale {
    /// Map a row value into the range. Values that fail numeric coercion on a
    /// continuous scale map to the range start.
    pub fn map(&self, value: &Value) -> f64 {
        match self {
            Scale::Linear(s) => value
                .as_number()
                .map(|v| s.map_number(v))
                .unwrap_or_else(|| s.range_min()),
            Scale::Band(s) => s.map_value(value),
            Scale::Log(s) => value
                .as_number()
                .map(|v| s.map_number(v))
                .unwrap_or_else(|| s.range_min()),
        }
    }

    pub fn range_min(&self) -> f64 {
        match self {
            Scale::Linear(s) => s.range_min(),
            Scale::Band(s) => s.range_min(),
            Scale::Log(s) => s.range_min(),
        }
    }

    pub fn range_max(&self) -> f64 {
        match self {
            Scale::Linear(s) => s.range_max(),
            Scale::Band(s) => s.range_max(),
            Scale::Log(s) => s.range_max(),
        }
    }

    /// Band width for band scales; `None` otherwise.
    pub fn band_width(&self) -> Option<f64> {
        match self {
            Scale::Band(s) => Some(s.band_width()),
            _ => None,
        }
    }
}

/// Build a numeric scale for an encoding channel from processed rows.
///
/// The scale kind follows the explicit `scale.type` when present, else the
/// channel type (quantitative/temporal → linear, ordinal/nominal → band).
/// Explicit `scale.domain`/`scale.range` override the inferred domain and the
/// caller-supplied range. Returns `None` for constant channels with no field.
pub fn resolve_channel_scale(
    rows: &[Row],
    channel: &ChannelSpec,
    range_min: f64,
    range_max: f64,
) -> Option<Scale> {
    let field = channel.field.as_deref()?;

    let (range_min, range_max) = match channel.scale.range.as_deref() {
        Some([r0, r1, ..]) => (*r0, *r1),
        _ => (range_min, range_max),
    };

    let kind = channel.scale.scale_type.unwrap_or(match channel.channel_type {
        Some(ChannelType::Ordinal) | Some(ChannelType::Nominal) => ScaleKind::Band,
        _ => ScaleKind::Linear,
    });

    let scale = match kind {
        ScaleKind::Linear => {
            let scale = match channel.scale.domain.as_deref() {
                Some([d0, d1, ..]) => {
                    LinearScale::with_domain((*d0, *d1), (range_min, range_max))
                }
                _ => LinearScale::new(
                    &numeric_field_values(rows, field),
                    range_min,
                    range_max,
                    channel.scale.zero.unwrap_or(false),
                    channel.scale.nice.unwrap_or(false),
                ),
            };
            Scale::Linear(scale)
        }
        ScaleKind::Log => {
            let scale = match channel.scale.domain.as_deref() {
                Some([d0, d1, ..]) => LogScale::with_domain((*d0, *d1), (range_min, range_max)),
                _ => {
                    // The log scale contract wants positive values only.
                    let values: Vec<f64> = numeric_field_values(rows, field)
                        .into_iter()
                        .filter(|v| *v > 0.0)
                        .collect();
                    LogScale::new(&values, range_min, range_max)
                }
            };
            Scale::Log(scale)
        }
        ScaleKind::Band | ScaleKind::Ordinal => Scale::Band(BandScale::from_values(
            rows.iter().filter_map(|r| r.get(field)),
            range_min,
            range_max,
            channel.scale.padding_inner.unwrap_or(0.1),
            channel.scale.padding_outer.unwrap_or(0.1),
        )),
    };
    Some(scale)
}

/// Build an ordinal color scale for a channel from processed rows.
pub fn resolve_color_scale(rows: &[Row], channel: &ChannelSpec) -> Option<OrdinalColorScale> {
    let field = channel.field.as_deref()?;
    Some(OrdinalColorScale::from_values(
        rows.iter().filter_map(|r| r.get(field)),
    ))
}

fn numeric_field_values(rows: &[Row], field: &str) -> Vec<f64> {
    rows.iter().filter_map(|r| r.number(field)).collect()
}
