//! Declarative spec structures consumed by the core.
//!
//! These arrive as already-parsed JSON-shaped values; schema defaulting beyond
//! the serde defaults below is an external collaborator's job.

use serde::Deserialize;

// =============================================================================
// Transforms
// =============================================================================

/// One entry in a transform pipeline. Exactly one of the four payloads is
/// honored, tested in fixed priority order: filter > aggregate > sort > bin.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TransformSpec {
    /// Filter expression, e.g. `"value > 10"`.
    pub filter: Option<String>,
    /// Aggregate ops to compute per group.
    pub aggregate: Option<Vec<AggregateFieldSpec>>,
    /// Group-by field names for the aggregate payload.
    #[serde(default)]
    pub groupby: Vec<String>,
    /// Multi-key sort order.
    pub sort: Option<Vec<SortKeySpec>>,
    /// Binning parameters; requires `bin_field`.
    pub bin: Option<BinSpec>,
    /// Field to bin.
    #[serde(rename = "binField")]
    pub bin_field: Option<String>,
    /// Output alias for the bin start field (end gets an `_end` suffix).
    #[serde(rename = "as")]
    pub bin_as: Option<String>,
}

/// The transform payload a spec resolves to, decided once per spec rather
/// than per row.
#[derive(Debug, Clone, Copy)]
pub enum TransformKind<'a> {
    Filter(&'a str),
    Aggregate {
        fields: &'a [AggregateFieldSpec],
        groupby: &'a [String],
    },
    Sort(&'a [SortKeySpec]),
    Bin {
        field: &'a str,
        spec: &'a BinSpec,
        alias: Option<&'a str>,
    },
    /// No recognized payload: the transform passes rows through unchanged.
    Passthrough,
}

impl TransformSpec {
    /// Resolve the first recognized payload in priority order.
    pub fn kind(&self) -> TransformKind<'_> {
        if let Some(expr) = &self.filter {
            return TransformKind::Filter(expr);
        }
        if let Some(fields) = &self.aggregate {
            return TransformKind::Aggregate {
                fields,
                groupby: &self.groupby,
            };
        }
        if let Some(keys) = &self.sort {
            return TransformKind::Sort(keys);
        }
        if let (Some(spec), Some(field)) = (&self.bin, &self.bin_field) {
            return TransformKind::Bin {
                field,
                spec,
                alias: self.bin_as.as_deref(),
            };
        }
        TransformKind::Passthrough
    }
}

/// A single aggregate output: `{op, field, as}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregateFieldSpec {
    /// Op name (count/sum/mean/average/avg/min/max/median); anything else
    /// falls back to sum.
    pub op: String,
    /// Target field; `count` works without one.
    #[serde(default)]
    pub field: String,
    /// Output field name; defaults to `{op}_{field}`.
    #[serde(rename = "as")]
    pub alias: Option<String>,
}

impl AggregateFieldSpec {
    pub fn output_name(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None if self.field.is_empty() => self.op.clone(),
            None => format!("{}_{}", self.op, self.field),
        }
    }
}

/// One key of a multi-key sort: `{field, order}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SortKeySpec {
    pub field: String,
    /// Ascending unless this reads `"descending"` (case-insensitive).
    #[serde(default)]
    pub order: Option<String>,
}

impl SortKeySpec {
    pub fn descending(&self) -> bool {
        self.order
            .as_deref()
            .map(|o| o.eq_ignore_ascii_case("descending"))
            .unwrap_or(false)
    }
}

/// Bin parameters. Extent falls back to the data min/max of the target field.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BinSpec {
    pub maxbins: Option<u32>,
    pub step: Option<f64>,
    pub extent_min: Option<f64>,
    pub extent_max: Option<f64>,
}

// =============================================================================
// Encoding channels (consumed by the scale system)
// =============================================================================

/// Channel data type, Vega-Lite style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Quantitative,
    Ordinal,
    Nominal,
    Temporal,
}

/// Scale kind override on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Linear,
    Log,
    Band,
    Ordinal,
}

/// Per-channel scale options.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScaleOptions {
    #[serde(rename = "type")]
    pub scale_type: Option<ScaleKind>,
    pub padding_inner: Option<f64>,
    pub padding_outer: Option<f64>,
    /// Extend a quantitative domain to include zero.
    pub zero: Option<bool>,
    /// Round quantitative domain bounds to nice numbers.
    pub nice: Option<bool>,
    /// Explicit domain override `[min, max]`.
    pub domain: Option<Vec<f64>>,
    /// Explicit range override `[min, max]`.
    pub range: Option<Vec<f64>>,
}

/// An encoding channel: a field mapping or a constant value.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChannelSpec {
    pub field: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: Option<ChannelType>,
    #[serde(default)]
    pub scale: ScaleOptions,
    /// Constant value for the channel, bypassing the scale.
    pub value: Option<serde_json::Value>,
    /// Stack mode marker (consumed by renderers, carried through here).
    pub stack: Option<String>,
}

// =============================================================================
// Graph layout
// =============================================================================

/// Layout algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutAlgorithm {
    Force,
    Circular,
    Hierarchical,
    Grid,
    Random,
    Preset,
}

/// Growth axis for hierarchical layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LayoutDirection {
    #[default]
    #[serde(rename = "top-bottom")]
    TopBottom,
    #[serde(rename = "bottom-top")]
    BottomTop,
    #[serde(rename = "left-right")]
    LeftRight,
    #[serde(rename = "right-left")]
    RightLeft,
}

/// Graph layout selection plus its numeric parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutSpec {
    #[serde(rename = "type")]
    pub algorithm: LayoutAlgorithm,
    #[serde(default)]
    pub params: LayoutParams,
}

/// Per-algorithm numeric configuration. Zero or out-of-range values degrade
/// to usable defaults inside the engine instead of failing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutParams {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_unit")]
    pub repulsion: f64,
    #[serde(default = "default_unit")]
    pub attraction: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Circular layout radius; non-positive means "derive from graph size".
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub start_angle: f64,
    #[serde(default = "default_end_angle")]
    pub end_angle: f64,
    #[serde(default)]
    pub direction: LayoutDirection,
    #[serde(default = "default_level_separation")]
    pub level_separation: f64,
    #[serde(default = "default_node_separation")]
    pub node_separation: f64,
    /// Grid columns; zero means `ceil(sqrt(node_count))`.
    #[serde(default)]
    pub columns: usize,
    /// Grid spacing; non-positive means `graph_size / columns`.
    #[serde(default)]
    pub spacing: f64,
}

fn default_iterations() -> usize {
    50
}
fn default_unit() -> f64 {
    1.0
}
fn default_damping() -> f64 {
    0.9
}
fn default_gravity() -> f64 {
    0.1
}
fn default_end_angle() -> f64 {
    std::f64::consts::TAU
}
fn default_level_separation() -> f64 {
    40.0
}
fn default_node_separation() -> f64 {
    30.0
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            repulsion: default_unit(),
            attraction: default_unit(),
            damping: default_damping(),
            gravity: default_gravity(),
            radius: 0.0,
            start_angle: 0.0,
            end_angle: default_end_angle(),
            direction: LayoutDirection::default(),
            level_separation: default_level_separation(),
            node_separation: default_node_separation(),
            columns: 0,
            spacing: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_priority_order() {
        let spec: TransformSpec = serde_json::from_value(json!({
            "filter": "x > 1",
            "aggregate": [{"op": "sum", "field": "x"}],
            "groupby": ["g"]
        }))
        .unwrap();
        assert!(matches!(spec.kind(), TransformKind::Filter(_)));
    }

    #[test]
    fn test_empty_spec_is_passthrough() {
        let spec = TransformSpec::default();
        assert!(matches!(spec.kind(), TransformKind::Passthrough));
    }

    #[test]
    fn test_bin_requires_field() {
        let spec: TransformSpec =
            serde_json::from_value(json!({"bin": {"maxbins": 5}})).unwrap();
        assert!(matches!(spec.kind(), TransformKind::Passthrough));

        let spec: TransformSpec =
            serde_json::from_value(json!({"bin": {"maxbins": 5}, "binField": "v"})).unwrap();
        assert!(matches!(spec.kind(), TransformKind::Bin { field: "v", .. }));
    }

    #[test]
    fn test_aggregate_output_name() {
        let f: AggregateFieldSpec =
            serde_json::from_value(json!({"op": "sum", "field": "sales"})).unwrap();
        assert_eq!(f.output_name(), "sum_sales");

        let f: AggregateFieldSpec =
            serde_json::from_value(json!({"op": "sum", "field": "sales", "as": "total"})).unwrap();
        assert_eq!(f.output_name(), "total");

        let f: AggregateFieldSpec = serde_json::from_value(json!({"op": "count"})).unwrap();
        assert_eq!(f.output_name(), "count");
    }

    #[test]
    fn test_layout_params_defaults() {
        let spec: LayoutSpec = serde_json::from_value(json!({"type": "force"})).unwrap();
        assert_eq!(spec.params.iterations, 50);
        assert!(matches!(spec.algorithm, LayoutAlgorithm::Force));

        let spec: LayoutSpec = serde_json::from_value(json!({
            "type": "hierarchical",
            "params": {"direction": "left-right", "levelSeparation": 80.0}
        }))
        .unwrap();
        assert!(matches!(spec.params.direction, LayoutDirection::LeftRight));
        assert_eq!(spec.params.level_separation, 80.0);
        // untouched params keep their defaults
        assert_eq!(spec.params.node_separation, 30.0);
    }

    #[test]
    fn test_sort_order_case_insensitive() {
        let key: SortKeySpec =
            serde_json::from_value(json!({"field": "v", "order": "Descending"})).unwrap();
        assert!(key.descending());
        let key: SortKeySpec = serde_json::from_value(json!({"field": "v"})).unwrap();
        assert!(!key.descending());
    }
}
