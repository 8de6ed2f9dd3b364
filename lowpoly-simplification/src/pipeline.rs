//! Pipeline entry point
//!
//! Ties the stages together: optional pre-scale to a requested height,
//! centering, baseline height capture, iterative decimation, and
//! height-preserving normalization. Returns both the prepared original and
//! the simplified result so a caller can display either.

use crate::{decimate, normalize, DecimateParams, StepCallback, StepSimplifier};
use lowpoly_core::{BoundingExtent, Error, MeshBuffer, Result};
use nalgebra::UnitQuaternion;
use tracing::info;

/// Parameters for the full low-poly generation pipeline.
#[derive(Debug, Clone)]
pub struct PipelineParams {
    /// Rescale the original to this height before anything else runs.
    pub target_height: Option<f32>,
    /// Fraction of triangles to remove, clamped to [0, 1]. Default: 0.5
    pub simplification_ratio: f32,
    /// Upper bound on triangles removed per simplifier call. Default: 2500
    pub max_faces_per_step: usize,
    /// Rotation baked into the simplified mesh; defaults to 90 degrees
    /// about X (see [`crate::default_rotation`]).
    pub rotation: Option<UnitQuaternion<f32>>,
    /// Consecutive degenerate steps tolerated before failing. Default: 5
    pub max_consecutive_stalls: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            target_height: None,
            simplification_ratio: 0.5,
            max_faces_per_step: 2500,
            rotation: None,
            max_consecutive_stalls: 5,
        }
    }
}

/// Output of [`process`]: the prepared original alongside the simplified,
/// normalized result.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub original: MeshBuffer,
    pub simplified: MeshBuffer,
}

/// Run the full pipeline on a pre-merged mesh buffer.
///
/// The input is validated, optionally rescaled to `target_height`, centered
/// about its bounding-box center, and given freshly computed vertex normals
/// (merged buffers carry concatenated per-submesh normals that no longer
/// match the combined surface). The baseline height is captured, the mesh
/// decimated toward `simplification_ratio`, and the result normalized so
/// its height matches the baseline.
pub fn process<S: StepSimplifier>(
    mesh: MeshBuffer,
    simplifier: &S,
    params: &PipelineParams,
    callback: Option<&StepCallback>,
) -> Result<ProcessOutput> {
    mesh.validate()?;
    let mut original = mesh;

    if let Some(target_height) = params.target_height {
        let extent = BoundingExtent::of(&original).ok_or(Error::ZeroExtent)?;
        let height = extent.height();
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::ZeroExtent);
        }
        original.scale_uniform(target_height / height);
    }

    original.center();
    original.compute_vertex_normals();

    let baseline_height = BoundingExtent::of(&original)
        .ok_or(Error::ZeroExtent)?
        .height();

    let starting = original.triangle_count();
    let ratio = params.simplification_ratio.clamp(0.0, 1.0);
    let decimation_face_count = (starting as f32 * ratio).floor() as usize;
    info!(
        starting,
        decimation_face_count, baseline_height, "starting low-poly generation"
    );

    let decimate_params = DecimateParams {
        max_faces_per_step: params.max_faces_per_step,
        max_consecutive_stalls: params.max_consecutive_stalls,
    };
    let simplified = decimate(
        simplifier,
        original.clone(),
        decimation_face_count,
        &decimate_params,
        callback,
    )?;
    let simplified = normalize(simplified, baseline_height, params.rotation)?;

    info!(
        final_triangles = simplified.triangle_count(),
        "low-poly generation complete"
    );
    Ok(ProcessOutput {
        original,
        simplified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;
    use crate::StepOutcome;
    use approx::assert_relative_eq;
    use lowpoly_core::{IndexBuffer, Point3f, Vector2f, Vector3f};
    use std::cell::RefCell;

    /// A unit cube: 8 vertices, 12 triangles.
    fn make_cube(offset: Vector3f) -> MeshBuffer {
        let corners = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ];
        let positions: Vec<Point3f> = corners
            .iter()
            .map(|c| Point3f::new(c[0], c[1], c[2]) + offset)
            .collect();
        let normals = vec![Vector3f::z(); 8];
        let uvs = vec![Vector2f::zeros(); 8];
        let values: [u32; 36] = [
            0, 1, 2, 0, 2, 3, // back
            4, 6, 5, 4, 7, 6, // front
            0, 4, 5, 0, 5, 1, // bottom
            2, 6, 7, 2, 7, 3, // top
            0, 3, 7, 0, 7, 4, // left
            1, 5, 6, 1, 6, 2, // right
        ];
        MeshBuffer::from_parts(positions, normals, uvs, IndexBuffer::from_values(&values))
            .unwrap()
    }

    /// Removes triangles from the tail and shrinks the geometry, so the
    /// normalization pass has real work to do.
    struct ShrinkingSimplifier {
        requests: RefCell<Vec<usize>>,
    }

    impl ShrinkingSimplifier {
        fn new() -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl StepSimplifier for ShrinkingSimplifier {
        fn simplify_step(&self, mesh: &MeshBuffer, faces_to_remove: usize) -> Result<StepOutcome> {
            self.requests.borrow_mut().push(faces_to_remove);
            let keep = mesh.triangle_count().saturating_sub(faces_to_remove);
            let values: Vec<u32> = mesh
                .indices
                .iter()
                .take(keep * 3)
                .map(|i| i as u32)
                .collect();
            let mut next = mesh.clone();
            next.indices = IndexBuffer::from_values(&values);
            next.scale_uniform(0.7);
            Ok(StepOutcome::Simplified(next))
        }
    }

    /// Collapses everything to a single point.
    struct CollapsingSimplifier;

    impl StepSimplifier for CollapsingSimplifier {
        fn simplify_step(&self, mesh: &MeshBuffer, _faces: usize) -> Result<StepOutcome> {
            let mut next = mesh.clone();
            for p in &mut next.positions {
                *p = Point3f::origin();
            }
            Ok(StepOutcome::Simplified(next))
        }
    }

    #[test]
    fn test_two_cube_end_to_end() {
        let merged = merge(
            &make_cube(Vector3f::zeros()),
            &make_cube(Vector3f::new(3.0, 0.0, 0.0)),
        )
        .unwrap();
        assert_eq!(merged.vertex_count(), 16);
        assert_eq!(merged.triangle_count(), 24);

        let simplifier = ShrinkingSimplifier::new();
        let params = PipelineParams {
            simplification_ratio: 0.25,
            max_faces_per_step: 100,
            rotation: Some(UnitQuaternion::identity()),
            ..Default::default()
        };
        let output = process(merged, &simplifier, &params, None).unwrap();

        // floor(24 * 0.25) = 6 faces removed in exactly one step.
        assert_eq!(*simplifier.requests.borrow(), vec![6]);
        assert_eq!(output.simplified.triangle_count(), 18);
        assert_eq!(output.original.triangle_count(), 24);
    }

    #[test]
    fn test_height_preserved_across_ratios() {
        for ratio in [0.1, 0.5, 0.9] {
            let mesh = make_cube(Vector3f::zeros());
            let baseline = BoundingExtent::of(&mesh).unwrap().height();

            let simplifier = ShrinkingSimplifier::new();
            let params = PipelineParams {
                simplification_ratio: ratio,
                max_faces_per_step: 4,
                rotation: Some(UnitQuaternion::identity()),
                ..Default::default()
            };
            let output = process(mesh, &simplifier, &params, None).unwrap();

            let height = BoundingExtent::of(&output.simplified).unwrap().height();
            assert_relative_eq!(height, baseline, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_target_height_rescales_original() {
        let mesh = make_cube(Vector3f::zeros());
        let simplifier = ShrinkingSimplifier::new();
        let params = PipelineParams {
            target_height: Some(5.0),
            simplification_ratio: 0.25,
            rotation: Some(UnitQuaternion::identity()),
            ..Default::default()
        };
        let output = process(mesh, &simplifier, &params, None).unwrap();

        let original_height = BoundingExtent::of(&output.original).unwrap().height();
        let simplified_height = BoundingExtent::of(&output.simplified).unwrap().height();
        assert_relative_eq!(original_height, 5.0, epsilon = 1e-4);
        assert_relative_eq!(simplified_height, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_point_collapse_yields_zero_extent_error() {
        let mesh = make_cube(Vector3f::zeros());
        let params = PipelineParams {
            simplification_ratio: 0.5,
            ..Default::default()
        };
        let err = process(mesh, &CollapsingSimplifier, &params, None).unwrap_err();
        assert!(matches!(err, Error::ZeroExtent));
    }

    #[test]
    fn test_original_is_centered_before_decimation() {
        let mesh = make_cube(Vector3f::new(10.0, 10.0, 10.0));
        let simplifier = ShrinkingSimplifier::new();
        let params = PipelineParams {
            simplification_ratio: 0.25,
            rotation: Some(UnitQuaternion::identity()),
            ..Default::default()
        };
        let output = process(mesh, &simplifier, &params, None).unwrap();

        let extent = BoundingExtent::of(&output.original).unwrap();
        assert_relative_eq!(extent.center().coords.norm(), 0.0, epsilon = 1e-5);
        // Normals are recomputed for the centered geometry.
        for n in &output.original.normals {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-5);
        }
    }
}
