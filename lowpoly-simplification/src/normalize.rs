//! Height-preserving normalization
//!
//! Rescales a decimated mesh so its vertical extent matches the height
//! captured before decimation, applies the scene rotation, and restores the
//! mesh's vertical placement.

use lowpoly_core::{BoundingExtent, Error, MeshBuffer, Result, Vector3f};
use nalgebra::UnitQuaternion;
use tracing::debug;

/// Rotation applied when the caller does not supply one: 90 degrees about
/// the X axis. Source assets store meshes Y-up-rotated relative to the
/// target scene convention.
pub fn default_rotation() -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3f::x_axis(), std::f32::consts::FRAC_PI_2)
}

/// Normalize a decimated mesh against the height measured before
/// decimation.
///
/// The mesh is rotated by `rotation` (or [`default_rotation`]) first, so
/// the vertical extent is measured in the displayed frame. It is then
/// uniformly rescaled by `baseline_height / post_height`, failing with
/// [`Error::ZeroExtent`] when the rotated height is zero or not finite,
/// and finally translated so its bounding-box center sits at half the
/// baseline height, restoring the pre-decimation vertical placement.
pub fn normalize(
    mut mesh: MeshBuffer,
    baseline_height: f32,
    rotation: Option<UnitQuaternion<f32>>,
) -> Result<MeshBuffer> {
    mesh.rotate(&rotation.unwrap_or_else(default_rotation));

    let extent = BoundingExtent::of(&mesh).ok_or(Error::ZeroExtent)?;
    let post_height = extent.height();
    if !post_height.is_finite() || post_height <= 0.0 {
        return Err(Error::ZeroExtent);
    }

    let scale_factor = baseline_height / post_height;
    debug!(baseline_height, post_height, scale_factor, "normalizing decimated mesh");
    mesh.scale_uniform(scale_factor);

    // Vertical placement is a scene convenience, not a geometry invariant.
    if let Some(extent) = BoundingExtent::of(&mesh) {
        let center = extent.center();
        mesh.translate(&Vector3f::new(0.0, baseline_height * 0.5 - center.y, 0.0));
    }
    Ok(mesh)
}
