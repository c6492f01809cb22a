//! Force-directed layout, a Fruchterman–Reingold variant.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::LayoutBounds;
use crate::spec::LayoutParams;

/// Fixed seed for the initial scatter, so repeated layouts of the same graph
/// are reproducible.
const FORCE_LAYOUT_SEED: u64 = 0x5EED_CA11;

/// Distance floor preventing infinite forces between coincident nodes.
const MIN_DISTANCE: f64 = 0.01;

pub(super) fn run(
    node_count: usize,
    edges: &[(usize, usize)],
    params: &LayoutParams,
    bounds: &LayoutBounds,
) -> Vec<DVec3> {
    if node_count == 0 {
        return Vec::new();
    }

    let size = bounds.graph_size.max(1.0);
    let mut rng = StdRng::seed_from_u64(FORCE_LAYOUT_SEED);
    let half = size / 2.0;
    let mut positions: Vec<DVec3> = (0..node_count)
        .map(|_| {
            DVec3::new(
                rng.gen_range(-half..=half),
                rng.gen_range(-half..=half),
                rng.gen_range(-half..=half),
            )
        })
        .collect();

    let area = size * size;
    let k = (area / node_count as f64).sqrt();
    let iterations = params.iterations.max(1);
    let mut displacement = vec![DVec3::ZERO; node_count];

    for iteration in 0..iterations {
        displacement.fill(DVec3::ZERO);

        // Pairwise repulsion: k²/d, O(n²).
        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let delta = positions[i] - positions[j];
                let dist = delta.length().max(MIN_DISTANCE);
                let push = params.repulsion * k * k / dist;
                let dir = delta / dist;
                displacement[i] += dir * push;
                displacement[j] -= dir * push;
            }
        }

        // Spring attraction along edges: d²/k.
        for &(a, b) in edges {
            let delta = positions[a] - positions[b];
            let dist = delta.length().max(MIN_DISTANCE);
            let pull = params.attraction * dist * dist / k;
            let dir = delta / dist;
            displacement[a] -= dir * pull;
            displacement[b] += dir * pull;
        }

        // Gravity toward the origin.
        for (disp, pos) in displacement.iter_mut().zip(&positions) {
            *disp -= *pos * params.gravity;
        }

        // Temperature decays linearly from graph size to 0.
        let temperature =
            params.damping * size * (1.0 - iteration as f64 / iterations as f64);
        for (pos, disp) in positions.iter_mut().zip(&displacement) {
            let len = disp.length();
            if len > 0.0 {
                *pos += *disp / len * len.min(temperature);
            }
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_gravity_params() -> LayoutParams {
        LayoutParams {
            iterations: 100,
            gravity: 0.0,
            ..LayoutParams::default()
        }
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let edges = [(0, 1), (1, 2)];
        let bounds = LayoutBounds::default();
        let params = no_gravity_params();
        let a = run(3, &edges, &params, &bounds);
        let b = run(3, &edges, &params, &bounds);
        assert_eq!(a, b);
    }

    #[test]
    fn test_two_nodes_converge_near_k() {
        // equilibrium of repulsion k²/d against attraction d²/k sits at d = k
        let bounds = LayoutBounds::default();
        let positions = run(2, &[(0, 1)], &no_gravity_params(), &bounds);
        let distance = (positions[0] - positions[1]).length();
        let area = bounds.graph_size * bounds.graph_size;
        let k = (area / 2.0).sqrt();
        assert!(
            (distance - k).abs() / k < 0.25,
            "distance {distance} should be near k = {k}"
        );
    }

    #[test]
    fn test_disconnected_nodes_spread_apart() {
        let bounds = LayoutBounds::default();
        let positions = run(4, &[], &no_gravity_params(), &bounds);
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert!((positions[i] - positions[j]).length() > 1.0);
            }
        }
    }

    #[test]
    fn test_gravity_pulls_toward_origin() {
        let bounds = LayoutBounds::default();
        let loose = run(2, &[], &no_gravity_params(), &bounds);
        let heavy = run(
            2,
            &[],
            &LayoutParams {
                iterations: 100,
                gravity: 2.0,
                ..LayoutParams::default()
            },
            &bounds,
        );
        let spread = |p: &[DVec3]| (p[0] - p[1]).length();
        assert!(spread(&heavy) < spread(&loose));
    }

    #[test]
    fn test_zero_iterations_clamps() {
        let positions = run(
            2,
            &[],
            &LayoutParams {
                iterations: 0,
                ..LayoutParams::default()
            },
            &LayoutBounds::default(),
        );
        assert_eq!(positions.len(), 2);
        assert!(positions.iter().all(|p| p.is_finite()));
    }
}
