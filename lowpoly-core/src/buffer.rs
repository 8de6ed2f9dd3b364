//! Mesh buffer data structures and geometry-local operations

use crate::error::{Error, Result};
use crate::extent::BoundingExtent;
use crate::point::{Point3f, Vector2f, Vector3f};
use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};

/// Largest index value (and index count) representable in 16-bit storage.
const U16_INDEX_LIMIT: usize = u16::MAX as usize;

/// Triangle index storage, kept in the smallest integer width that can
/// represent every index value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Build index storage from raw values, widening to 32-bit when the
    /// index count or the maximum index value exceeds the 16-bit range.
    pub fn from_values(values: &[u32]) -> Self {
        let max = values.iter().copied().max().unwrap_or(0) as usize;
        if values.len() > U16_INDEX_LIMIT || max > U16_INDEX_LIMIT {
            IndexBuffer::U32(values.to_vec())
        } else {
            IndexBuffer::U16(values.iter().map(|&v| v as u16).collect())
        }
    }

    /// Number of stored index values (3 per triangle).
    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U16(v) => v.len(),
            IndexBuffer::U32(v) => v.len(),
        }
    }

    /// Check if no indices are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether indices are held in 32-bit storage.
    pub fn is_wide(&self) -> bool {
        matches!(self, IndexBuffer::U32(_))
    }

    /// Read the index value at `i`, widened to `usize`.
    #[inline]
    pub fn get(&self, i: usize) -> usize {
        match self {
            IndexBuffer::U16(v) => v[i] as usize,
            IndexBuffer::U32(v) => v[i] as usize,
        }
    }

    /// Iterate all index values widened to `usize`.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Iterate triangles as `[v0, v1, v2]` index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (0..self.len() / 3).map(move |t| [self.get(3 * t), self.get(3 * t + 1), self.get(3 * t + 2)])
    }
}

impl Default for IndexBuffer {
    fn default() -> Self {
        IndexBuffer::U16(Vec::new())
    }
}

/// A flat-array triangle mesh: equal-length position, normal, and UV
/// attributes plus triangle indices referencing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffer {
    pub positions: Vec<Point3f>,
    pub normals: Vec<Vector3f>,
    pub uvs: Vec<Vector2f>,
    pub indices: IndexBuffer,
}

impl MeshBuffer {
    /// Create a new empty mesh buffer
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: IndexBuffer::default(),
        }
    }

    /// Build a mesh buffer from already-typed attribute arrays, enforcing
    /// the buffer invariants.
    pub fn from_parts(
        positions: Vec<Point3f>,
        normals: Vec<Vector3f>,
        uvs: Vec<Vector2f>,
        indices: IndexBuffer,
    ) -> Result<Self> {
        let mesh = Self {
            positions,
            normals,
            uvs,
            indices,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Build a mesh buffer from the flat numeric arrays an asset loader
    /// produces: positions and normals as 3-component tuples, UVs as
    /// 2-component tuples, plus a triangle index array.
    ///
    /// Missing or mis-sized attributes are an enforced precondition and
    /// fail with [`Error::AttributeMismatch`] rather than being assumed.
    pub fn from_flat_arrays(
        positions: &[f32],
        normals: &[f32],
        uvs: &[f32],
        indices: &[u32],
    ) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(Error::AttributeMismatch(format!(
                "position array length {} is not a multiple of 3",
                positions.len()
            )));
        }
        if normals.len() % 3 != 0 {
            return Err(Error::AttributeMismatch(format!(
                "normal array length {} is not a multiple of 3",
                normals.len()
            )));
        }
        if uvs.len() % 2 != 0 {
            return Err(Error::AttributeMismatch(format!(
                "uv array length {} is not a multiple of 2",
                uvs.len()
            )));
        }

        let positions: Vec<Point3f> = positions
            .chunks_exact(3)
            .map(|c| Point3f::new(c[0], c[1], c[2]))
            .collect();
        let normals: Vec<Vector3f> = normals
            .chunks_exact(3)
            .map(|c| Vector3f::new(c[0], c[1], c[2]))
            .collect();
        let uvs: Vec<Vector2f> = uvs.chunks_exact(2).map(|c| Vector2f::new(c[0], c[1])).collect();

        Self::from_parts(positions, normals, uvs, IndexBuffer::from_values(indices))
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Enforce the buffer invariants: equal attribute lengths, index count
    /// a multiple of 3, and every index within the vertex range.
    pub fn validate(&self) -> Result<()> {
        if self.normals.len() != self.positions.len() {
            return Err(Error::AttributeMismatch(format!(
                "normal count {} != position count {}",
                self.normals.len(),
                self.positions.len()
            )));
        }
        if self.uvs.len() != self.positions.len() {
            return Err(Error::AttributeMismatch(format!(
                "uv count {} != position count {}",
                self.uvs.len(),
                self.positions.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(Error::InvalidData(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        for (i, index) in self.indices.iter().enumerate() {
            if index >= self.positions.len() {
                return Err(Error::InvalidData(format!(
                    "index {} at offset {} exceeds vertex count {}",
                    index,
                    i,
                    self.positions.len()
                )));
            }
        }
        Ok(())
    }

    /// Translate every vertex position by `offset`.
    pub fn translate(&mut self, offset: &Vector3f) {
        for p in &mut self.positions {
            *p += *offset;
        }
    }

    /// Scale every vertex position uniformly about the local origin.
    pub fn scale_uniform(&mut self, factor: f32) {
        for p in &mut self.positions {
            p.coords *= factor;
        }
    }

    /// Rotate positions and normals about the local origin.
    pub fn rotate(&mut self, rotation: &UnitQuaternion<f32>) {
        for p in &mut self.positions {
            *p = rotation.transform_point(p);
        }
        for n in &mut self.normals {
            *n = rotation.transform_vector(n);
        }
    }

    /// Translate the mesh so its bounding-box center coincides with the
    /// local origin. No-op on an empty mesh.
    pub fn center(&mut self) {
        if let Some(extent) = BoundingExtent::of(self) {
            let center = extent.center();
            self.translate(&-center.coords);
        }
    }

    /// Recompute vertex normals from face geometry, replacing whatever the
    /// buffer held. Accumulation is area-weighted via the unnormalized
    /// face cross products.
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulated = vec![Vector3f::zeros(); self.positions.len()];
        for [a, b, c] in self.indices.triangles() {
            let e1 = self.positions[b] - self.positions[a];
            let e2 = self.positions[c] - self.positions[a];
            let n = e1.cross(&e2);
            accumulated[a] += n;
            accumulated[b] += n;
            accumulated[c] += n;
        }
        self.normals = accumulated
            .into_iter()
            .map(|n| {
                let len = n.norm();
                if len.is_finite() && len > f32::EPSILON {
                    n / len
                } else {
                    // Isolated or degenerate vertex: fall back to +Z
                    Vector3f::z()
                }
            })
            .collect();
    }
}

impl Default for MeshBuffer {
    fn default() -> Self {
        Self::new()
    }
}
