//! Low-poly mesh generation pipeline
//!
//! This crate reduces an arbitrary polygonal mesh (or set of sub-meshes) to
//! a simplified, height-normalized stand-in for the original:
//! - Buffer merging of independently-indexed sub-meshes
//! - Iterative decimation in bounded steps around an external single-step
//!   simplifier, with degenerate-result recovery and progress reporting
//! - Height-preserving normalization (center, rotate, rescale)
//!
//! The per-step collapse algorithm itself is not part of this crate; it is
//! supplied through the [`StepSimplifier`] trait.

pub mod decimate;
pub mod merge;
pub mod normalize;
pub mod pipeline;

pub use decimate::*;
pub use merge::*;
pub use normalize::*;
pub use pipeline::*;

use lowpoly_core::{MeshBuffer, Result};

/// Outcome of a single simplification step.
///
/// Degeneracy is a first-class variant rather than a sentinel value hidden
/// in the geometry: a simplifier that cannot find a valid collapse for this
/// step reports [`StepOutcome::Degenerate`] and the caller keeps its
/// previous geometry.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// The step produced a valid simplified geometry.
    Simplified(MeshBuffer),
    /// The simplifier could not proceed validly for this step.
    Degenerate,
}

/// An external algorithm that removes a bounded number of triangles per
/// invocation using local topology-aware collapses.
pub trait StepSimplifier {
    /// Remove up to (not necessarily exactly) `faces_to_remove` triangles
    /// from `mesh`, returning the new geometry or a degeneracy marker.
    fn simplify_step(&self, mesh: &MeshBuffer, faces_to_remove: usize) -> Result<StepOutcome>;
}
