//! Graph layout engine: computes per-node 3D positions for node/edge graphs.
//!
//! A layout is a single pass: select the algorithm, compute raw positions,
//! normalize into the viewport, done. The position table is fresh per
//! invocation and covers every node that carries an `"id"` field.

mod arrange;
mod force;
mod hierarchy;

use std::collections::HashMap;

use glam::DVec3;
use log::debug;

use crate::geom::Bounds3;
use crate::spec::{LayoutAlgorithm, LayoutParams};
use crate::value::Row;

/// Node id → computed position. Fully covers the layout's node id set.
pub type PositionTable = HashMap<String, DVec3>;

/// Viewport information supplied by the rendering collaborator.
#[derive(Debug, Clone, Copy)]
pub struct LayoutBounds {
    /// Characteristic size of the graph viewport in world units.
    pub graph_size: f64,
    /// Visual size of a node, reserved as margin during normalization.
    pub node_size: f64,
    /// Multiplier applied to preset x/y/z coordinates.
    pub unit_scale: f64,
}

impl Default for LayoutBounds {
    fn default() -> Self {
        Self {
            graph_size: 100.0,
            node_size: 1.0,
            unit_scale: 1.0,
        }
    }
}

impl LayoutBounds {
    /// Radius the normalized layout may occupy: 40% of the graph size minus a
    /// margin for node visuals, floored at twice the node size.
    pub fn available_radius(&self) -> f64 {
        (0.4 * self.graph_size - 2.0 * self.node_size).max(2.0 * self.node_size)
    }
}

/// Node/edge rows resolved into an indexed graph. Nodes without an `"id"` and
/// edges without resolvable `"source"`/`"target"` endpoints are dropped here,
/// so the algorithms never see a dangling reference.
struct GraphData<'a> {
    ids: Vec<String>,
    nodes: Vec<&'a Row>,
    edges: Vec<(usize, usize)>,
}

impl<'a> GraphData<'a> {
    fn build(nodes: &'a [Row], edges: &'a [Row]) -> Self {
        let mut ids = Vec::new();
        let mut kept: Vec<&Row> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for row in nodes {
            let Some(id) = row.get("id").map(|v| v.as_text()) else {
                continue;
            };
            if index.contains_key(&id) {
                continue;
            }
            index.insert(id.clone(), ids.len());
            ids.push(id);
            kept.push(row);
        }

        let mut resolved = Vec::new();
        for row in edges {
            let (Some(source), Some(target)) = (row.get("source"), row.get("target")) else {
                continue;
            };
            let (Some(&a), Some(&b)) = (
                index.get(&source.as_text()),
                index.get(&target.as_text()),
            ) else {
                continue;
            };
            resolved.push((a, b));
        }

        Self {
            ids,
            nodes: kept,
            edges: resolved,
        }
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Compute positions for a graph and normalize them into the viewport.
///
/// Every node with an id gets exactly one entry; isolated nodes are valid
/// input, as is a single-node graph.
pub fn compute_layout(
    nodes: &[Row],
    edges: &[Row],
    algorithm: LayoutAlgorithm,
    params: &LayoutParams,
    bounds: &LayoutBounds,
) -> PositionTable {
    let graph = GraphData::build(nodes, edges);
    debug!(
        "layout {:?}: {} nodes, {} edges",
        algorithm,
        graph.len(),
        graph.edges.len()
    );

    let mut positions = match algorithm {
        LayoutAlgorithm::Force => force::run(graph.len(), &graph.edges, params, bounds),
        LayoutAlgorithm::Circular => arrange::circular(graph.len(), params, bounds),
        LayoutAlgorithm::Hierarchical => hierarchy::run(&graph.ids, &graph.edges, params),
        LayoutAlgorithm::Grid => arrange::grid(graph.len(), params, bounds),
        LayoutAlgorithm::Random => arrange::random(graph.len(), bounds),
        LayoutAlgorithm::Preset => arrange::preset(&graph.nodes, bounds),
    };

    normalize(&mut positions, bounds);

    graph.ids.into_iter().zip(positions).collect()
}

/// Degenerate boxes below this extent are treated as points and only
/// translated, never scaled.
const MIN_EXTENT: f64 = 1e-9;

/// Center the layout's bounding box on the origin and shrink it so its
/// longest dimension fits within `2 × available_radius`. Sparse layouts are
/// never upscaled.
fn normalize(positions: &mut [DVec3], bounds: &LayoutBounds) {
    let Some(bbox) = Bounds3::from_points(positions.iter()) else {
        return;
    };
    let center = bbox.center();
    let longest = bbox.longest_dimension();
    let scale = if longest > MIN_EXTENT {
        (2.0 * bounds.available_radius() / longest).min(1.0)
    } else {
        1.0
    };
    for p in positions.iter_mut() {
        *p = (*p - center) * scale;
    }
}
