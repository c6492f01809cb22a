//! Deterministic arrangements: circular, grid, random scatter and preset
//! positions carried on the node rows themselves.

use glam::DVec3;
use rand::Rng;

use crate::spec::LayoutParams;
use crate::value::Row;

use super::LayoutBounds;

pub(super) fn circular(n: usize, params: &LayoutParams, bounds: &LayoutBounds) -> Vec<DVec3> {
    if n == 0 {
        return Vec::new();
    }
    let radius = if params.radius > 0.0 {
        params.radius
    } else {
        0.4 * bounds.graph_size
    };
    let step = (params.end_angle - params.start_angle) / n as f64;
    (0..n)
        .map(|i| {
            let angle = params.start_angle + i as f64 * step;
            DVec3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
        })
        .collect()
}

pub(super) fn grid(n: usize, params: &LayoutParams, bounds: &LayoutBounds) -> Vec<DVec3> {
    if n == 0 {
        return Vec::new();
    }
    let columns = if params.columns > 0 {
        params.columns as usize
    } else {
        ((n as f64).sqrt().ceil() as usize).max(1)
    };
    let spacing = if params.spacing > 0.0 {
        params.spacing
    } else {
        bounds.graph_size / columns as f64
    };
    let rows = n.div_ceil(columns);
    // center the full grid on the origin in both axes
    let x_offset = (columns as f64 - 1.0) / 2.0;
    let y_offset = (rows as f64 - 1.0) / 2.0;
    (0..n)
        .map(|i| {
            let col = (i % columns) as f64;
            let row = (i / columns) as f64;
            DVec3::new((col - x_offset) * spacing, (y_offset - row) * spacing, 0.0)
        })
        .collect()
}

pub(super) fn random(n: usize, bounds: &LayoutBounds) -> Vec<DVec3> {
    let half = bounds.graph_size / 2.0;
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| {
            DVec3::new(
                rng.gen_range(-half..=half),
                rng.gen_range(-half..=half),
                rng.gen_range(-half..=half),
            )
        })
        .collect()
}

pub(super) fn preset(nodes: &[&Row], bounds: &LayoutBounds) -> Vec<DVec3> {
    nodes
        .iter()
        .map(|row| {
            DVec3::new(
                row.number("x").unwrap_or(0.0),
                row.number("y").unwrap_or(0.0),
                row.number("z").unwrap_or(0.0),
            ) * bounds.unit_scale
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::f64::consts::{FRAC_PI_2, TAU};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_circular_default_radius_and_spacing() {
        let bounds = LayoutBounds::default();
        let positions = circular(4, &LayoutParams::default(), &bounds);
        // default radius is 40% of graph size
        for p in &positions {
            assert!(close(p.truncate().length(), 40.0));
        }
        // four nodes a quarter turn apart
        assert!(close(positions[0].x, 40.0));
        assert!(close(positions[1].y, 40.0));
        assert!(close(positions[2].x, -40.0));
    }

    #[test]
    fn test_circular_arc_range() {
        let mut params = LayoutParams::default();
        params.start_angle = 0.0;
        params.end_angle = FRAC_PI_2;
        params.radius = 10.0;
        let positions = circular(2, &params, &LayoutBounds::default());
        assert!(close(positions[0].x, 10.0));
        // second node at a quarter of the half-pi arc * 1 step = pi/4
        assert!(close(positions[1].x, 10.0 * (FRAC_PI_2 / 2.0).cos()));
        // full circle never stacks first and last node
        let mut full = LayoutParams::default();
        full.end_angle = TAU;
        let positions = circular(3, &full, &LayoutBounds::default());
        assert!((positions[0] - positions[2]).length() > 1.0);
    }

    #[test]
    fn test_grid_rows_and_columns() {
        let mut params = LayoutParams::default();
        params.columns = 2;
        params.spacing = 10.0;
        let positions = grid(4, &params, &LayoutBounds::default());
        // 2x2 grid centered on the origin
        assert!(close(positions[0].x, -5.0));
        assert!(close(positions[0].y, 5.0));
        assert!(close(positions[1].x, 5.0));
        assert!(close(positions[3].y, -5.0));
    }

    #[test]
    fn test_grid_defaults_to_square() {
        let positions = grid(9, &LayoutParams::default(), &LayoutBounds::default());
        // 9 nodes -> 3 columns; first row shares a y
        assert!(close(positions[0].y, positions[2].y));
        assert!(positions[3].y < positions[0].y);
        // default spacing divides the graph size by the column count
        assert!(close(positions[1].x - positions[0].x, 100.0 / 3.0));
    }

    #[test]
    fn test_random_stays_in_cube() {
        let bounds = LayoutBounds::default();
        let positions = random(50, &bounds);
        assert_eq!(positions.len(), 50);
        for p in positions {
            assert!(p.x.abs() <= 50.0 && p.y.abs() <= 50.0 && p.z.abs() <= 50.0);
        }
    }

    #[test]
    fn test_preset_reads_coordinates_with_unit_scale() {
        let mut a = Row::new();
        a.insert("x", Value::Number(3.0));
        a.insert("y", Value::Number(-2.0));
        let b = Row::new();
        let bounds = LayoutBounds {
            unit_scale: 2.0,
            ..LayoutBounds::default()
        };
        let positions = preset(&[&a, &b], &bounds);
        assert!(close(positions[0].x, 6.0));
        assert!(close(positions[0].y, -4.0));
        assert_eq!(positions[1], DVec3::ZERO);
    }
}
