use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in continuous 2D space.
///
/// Boxes are half-open, two boxes that only share an edge do not intersect.
#[derive(Copy, Clone, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Aabb {
    /// Construct a box of the given dimensions around a center point.
    pub fn centered(center: Vec2, dim: Vec2) -> Self {
        let half = dim.abs() / 2.0;
        Aabb {
            min: center - half,
            max: center + half,
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmplt(other.max).all() && other.min.cmplt(self.max).all()
    }
}
