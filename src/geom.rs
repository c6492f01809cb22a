//! Shared geometry helpers for layout normalization.

use glam::DVec3;

/// Axis-aligned 3D bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds3 {
    /// Bounding box of a point set; `None` when empty.
    pub fn from_points<'a>(points: impl Iterator<Item = &'a DVec3>) -> Option<Bounds3> {
        let mut bounds: Option<Bounds3> = None;
        for p in points {
            bounds = Some(match bounds {
                None => Bounds3 { min: *p, max: *p },
                Some(b) => Bounds3 {
                    min: b.min.min(*p),
                    max: b.max.max(*p),
                },
            });
        }
        bounds
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Length of the longest axis. Zero for a degenerate (point) box.
    pub fn longest_dimension(&self) -> f64 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let pts = vec![
            DVec3::new(-1.0, 2.0, 0.0),
            DVec3::new(3.0, -4.0, 1.0),
            DVec3::new(0.0, 0.0, 0.5),
        ];
        let b = Bounds3::from_points(pts.iter()).unwrap();
        assert_eq!(b.min, DVec3::new(-1.0, -4.0, 0.0));
        assert_eq!(b.max, DVec3::new(3.0, 2.0, 1.0));
        assert_eq!(b.center(), DVec3::new(1.0, -1.0, 0.5));
        assert_eq!(b.longest_dimension(), 6.0);
    }

    #[test]
    fn test_empty_and_degenerate() {
        assert!(Bounds3::from_points([].iter()).is_none());
        let p = DVec3::new(2.0, 2.0, 2.0);
        let b = Bounds3::from_points([p].iter()).unwrap();
        assert_eq!(b.longest_dimension(), 0.0);
        assert_eq!(b.center(), p);
    }
}
