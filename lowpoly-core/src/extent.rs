//! Axis-aligned bounding extent measurement

use crate::buffer::MeshBuffer;
use crate::point::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};

/// Axis-aligned min/max over a mesh's vertex positions at a point in time.
///
/// An extent is a measurement, not state: it must be recomputed after every
/// geometry-mutating step and never cached across mutations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingExtent {
    pub min: Point3f,
    pub max: Point3f,
}

impl BoundingExtent {
    /// Measure the extent of a set of positions. Returns `None` when the
    /// set is empty.
    pub fn from_positions(positions: &[Point3f]) -> Option<Self> {
        let first = positions.first()?;
        let mut extent = BoundingExtent {
            min: *first,
            max: *first,
        };
        for p in &positions[1..] {
            extent.min = Point3f::new(
                extent.min.x.min(p.x),
                extent.min.y.min(p.y),
                extent.min.z.min(p.z),
            );
            extent.max = Point3f::new(
                extent.max.x.max(p.x),
                extent.max.y.max(p.y),
                extent.max.z.max(p.z),
            );
        }
        Some(extent)
    }

    /// Measure the extent of a mesh's current vertex positions.
    pub fn of(mesh: &MeshBuffer) -> Option<Self> {
        Self::from_positions(&mesh.positions)
    }

    /// Edge lengths of the box.
    pub fn size(&self) -> Vector3f {
        self.max - self.min
    }

    /// Vertical (Y) extent of the box.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Geometric center of the box.
    pub fn center(&self) -> Point3f {
        Point3f::from((self.min.coords + self.max.coords) * 0.5)
    }
}
