//! Hierarchical (layered tree) layout.

use std::collections::VecDeque;

use glam::DVec3;

use crate::spec::{LayoutDirection, LayoutParams};

/// Assign breadth-first levels from the roots and place each level on a line
/// perpendicular to the growth direction.
pub(super) fn run(ids: &[String], edges: &[(usize, usize)], params: &LayoutParams) -> Vec<DVec3> {
    let n = ids.len();
    if n == 0 {
        return Vec::new();
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut incoming = vec![0usize; n];
    for &(source, target) in edges {
        children[source].push(target);
        incoming[target] += 1;
    }

    // Roots have no incoming edge; a rootless graph (e.g. a cycle) falls back
    // to the first node.
    let mut roots: Vec<usize> = (0..n).filter(|&i| incoming[i] == 0).collect();
    if roots.is_empty() {
        roots.push(0);
    }

    let mut level: Vec<Option<usize>> = vec![None; n];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for &root in &roots {
        level[root] = Some(0);
        queue.push_back(root);
    }
    let mut deepest = 0;
    while let Some(node) = queue.pop_front() {
        let next = level[node].unwrap_or(0) + 1;
        for &child in &children[node] {
            if level[child].is_none() {
                level[child] = Some(next);
                deepest = deepest.max(next);
                queue.push_back(child);
            }
        }
    }

    // Nodes unreachable from any root land in an overflow row below the
    // deepest level.
    let overflow = deepest + 1;
    let levels: Vec<usize> = level
        .into_iter()
        .map(|l| l.unwrap_or(overflow))
        .collect();

    let level_count = levels.iter().max().copied().unwrap_or(0) + 1;
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); level_count];
    for (node, &l) in levels.iter().enumerate() {
        members[l].push(node);
    }

    let node_sep = params.node_separation;
    let level_sep = params.level_separation;
    let mut positions = vec![DVec3::ZERO; n];
    for (l, nodes) in members.iter().enumerate() {
        let count = nodes.len();
        for (i, &node) in nodes.iter().enumerate() {
            let spread = (i as f64 - (count as f64 - 1.0) / 2.0) * node_sep;
            let depth = l as f64 * level_sep;
            positions[node] = match params.direction {
                LayoutDirection::TopBottom => DVec3::new(spread, -depth, 0.0),
                LayoutDirection::BottomTop => DVec3::new(spread, depth, 0.0),
                LayoutDirection::LeftRight => DVec3::new(depth, spread, 0.0),
                LayoutDirection::RightLeft => DVec3::new(-depth, spread, 0.0),
            };
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_levels_from_root() {
        // 0 -> 1 -> 2, 0 -> 3
        let positions = run(
            &ids(4),
            &[(0, 1), (1, 2), (0, 3)],
            &LayoutParams::default(),
        );
        // root alone on level 0, centered
        assert_eq!(positions[0].x, 0.0);
        assert_eq!(positions[0].y, 0.0);
        // children one level down
        assert_eq!(positions[1].y, -40.0);
        assert_eq!(positions[3].y, -40.0);
        assert_eq!(positions[2].y, -80.0);
        // two nodes on level 1, centered around 0 and separated
        assert_eq!((positions[1].x - positions[3].x).abs(), 30.0);
        assert_eq!(positions[1].x + positions[3].x, 0.0);
    }

    #[test]
    fn test_cycle_falls_back_to_first_node_as_root() {
        let positions = run(&ids(3), &[(0, 1), (1, 2), (2, 0)], &LayoutParams::default());
        assert_eq!(positions[0].y, 0.0);
        assert_eq!(positions[1].y, -40.0);
        assert_eq!(positions[2].y, -80.0);
    }

    #[test]
    fn test_unreachable_nodes_get_overflow_row() {
        // component 0->1 plus isolated-but-cyclic 2<->3 (never a root)
        let positions = run(
            &ids(4),
            &[(0, 1), (2, 3), (3, 2)],
            &LayoutParams::default(),
        );
        // 2 and 3 each have an incoming edge, so neither is a root; deepest
        // reachable level is 1 and the overflow row sits at level 2
        assert_eq!(positions[2].y, -80.0);
        assert_eq!(positions[3].y, -80.0);
    }

    #[test]
    fn test_direction_axes() {
        let edges = [(0, 1)];
        let p = run(&ids(2), &edges, &LayoutParams::default());
        assert!(p[1].y < p[0].y);

        let mut params = LayoutParams::default();
        params.direction = LayoutDirection::BottomTop;
        let p = run(&ids(2), &edges, &params);
        assert!(p[1].y > p[0].y);

        params.direction = LayoutDirection::LeftRight;
        let p = run(&ids(2), &edges, &params);
        assert!(p[1].x > p[0].x);

        params.direction = LayoutDirection::RightLeft;
        let p = run(&ids(2), &edges, &params);
        assert!(p[1].x < p[0].x);
    }
}
