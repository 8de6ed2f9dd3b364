//! Buffer merging
//!
//! Combines independently-indexed mesh buffers into one consistent buffer
//! with correctly re-based indices. No deduplication or vertex welding is
//! performed. Per-submesh material correspondence is lost once geometries
//! are merged; this loss is accepted and not compensated for.

use lowpoly_core::{IndexBuffer, MeshBuffer, Result};
use tracing::debug;

/// Merge two mesh buffers into a new buffer.
///
/// Attributes are concatenated in `a`-then-`b` order; every index
/// originating from `b` is offset by `a`'s vertex count so each triangle
/// keeps referencing its originating vertex data. Index storage width is
/// re-selected from the combined index count and maximum value.
///
/// Both inputs must carry position, normal, and UV attributes of equal
/// length; violations fail with [`lowpoly_core::Error::AttributeMismatch`].
/// Neither input is modified.
pub fn merge(a: &MeshBuffer, b: &MeshBuffer) -> Result<MeshBuffer> {
    a.validate()?;
    b.validate()?;

    let offset = a.vertex_count() as u32;

    let mut positions = Vec::with_capacity(a.vertex_count() + b.vertex_count());
    positions.extend_from_slice(&a.positions);
    positions.extend_from_slice(&b.positions);

    let mut normals = Vec::with_capacity(a.normals.len() + b.normals.len());
    normals.extend_from_slice(&a.normals);
    normals.extend_from_slice(&b.normals);

    let mut uvs = Vec::with_capacity(a.uvs.len() + b.uvs.len());
    uvs.extend_from_slice(&a.uvs);
    uvs.extend_from_slice(&b.uvs);

    let mut values: Vec<u32> = Vec::with_capacity(a.indices.len() + b.indices.len());
    values.extend(a.indices.iter().map(|i| i as u32));
    values.extend(b.indices.iter().map(|i| i as u32 + offset));

    let merged = MeshBuffer {
        positions,
        normals,
        uvs,
        indices: IndexBuffer::from_values(&values),
    };
    debug!(
        vertices = merged.vertex_count(),
        triangles = merged.triangle_count(),
        wide_indices = merged.indices.is_wide(),
        "merged mesh buffers"
    );
    Ok(merged)
}

/// Fold a sequence of sub-meshes into a single buffer, merging pairwise in
/// iteration order. An empty sequence yields an empty buffer.
pub fn merge_all(meshes: impl IntoIterator<Item = MeshBuffer>) -> Result<MeshBuffer> {
    let mut iter = meshes.into_iter();
    let mut merged = match iter.next() {
        Some(first) => {
            first.validate()?;
            first
        }
        None => MeshBuffer::new(),
    };
    for next in iter {
        merged = merge(&merged, &next)?;
    }
    Ok(merged)
}
