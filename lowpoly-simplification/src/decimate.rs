//! Iterative decimation
//!
//! Drives an external single-step simplifier in bounded increments until a
//! target face count is reached. Single-step simplifiers tend to be unstable
//! or slow when asked to remove a very large fraction of faces in one call,
//! so each call is capped at `max_faces_per_step` and a final exact-sized
//! step lands on the target precisely.

use crate::{StepOutcome, StepSimplifier};
use lowpoly_core::{Error, MeshBuffer, Result};
use tracing::{debug, warn};

/// Parameters for the iterative decimation loop.
#[derive(Debug, Clone)]
pub struct DecimateParams {
    /// Upper bound on triangles removed by a single simplifier call.
    /// Default: 2500
    pub max_faces_per_step: usize,
    /// How many consecutive degenerate (or no-progress) steps are tolerated
    /// before the loop fails with `SimplificationStalled`. Default: 5
    pub max_consecutive_stalls: usize,
}

impl Default for DecimateParams {
    fn default() -> Self {
        Self {
            max_faces_per_step: 2500,
            max_consecutive_stalls: 5,
        }
    }
}

/// Callback invoked after each successful decimation step with the current
/// intermediate geometry and the overall percent complete (0 to 100).
///
/// Returns `true` to continue, `false` to request cancellation. The callback
/// is `Send + Sync` so the loop can be offloaded to a worker thread.
pub type StepCallback = Box<dyn Fn(&MeshBuffer, u32) -> bool + Send + Sync>;

/// Remove `decimation_face_count` triangles from `geometry` by repeatedly
/// invoking `simplifier`, never asking for more than
/// `params.max_faces_per_step` per call.
///
/// A degenerate step result is recoverable: the previous geometry is kept
/// and the step retried, up to `params.max_consecutive_stalls` times in a
/// row. A degenerate *final* step is skipped once and the last valid
/// geometry returned. Progress reaches exactly 100 on completion.
pub fn decimate<S: StepSimplifier>(
    simplifier: &S,
    geometry: MeshBuffer,
    decimation_face_count: usize,
    params: &DecimateParams,
    callback: Option<&StepCallback>,
) -> Result<MeshBuffer> {
    let starting = geometry.triangle_count();
    if decimation_face_count > starting {
        return Err(Error::InvalidTarget {
            requested: decimation_face_count,
            available: starting,
        });
    }
    let target = starting - decimation_face_count;
    let total = decimation_face_count;
    let mut current = geometry;

    if total == 0 {
        report(callback, &current, 100)?;
        return Ok(current);
    }

    debug!(starting, target, "starting iterative decimation");

    // Bounded loop: keep every call within one step's capacity.
    let mut stalls = 0usize;
    while current.triangle_count().saturating_sub(target) > params.max_faces_per_step {
        match simplifier.simplify_step(&current, params.max_faces_per_step)? {
            StepOutcome::Simplified(next) if next.triangle_count() < current.triangle_count() => {
                current = next;
                stalls = 0;
                let removed = starting - current.triangle_count();
                let percent = (100 * removed / total) as u32;
                debug!(
                    remaining = current.triangle_count().saturating_sub(target),
                    percent,
                    "decimation step complete"
                );
                report(callback, &current, percent)?;
            }
            _ => {
                // Degenerate result, or a step that removed nothing: keep
                // the previous geometry and retry.
                stalls += 1;
                warn!(stalls, "degenerate simplification step, keeping previous geometry");
                if stalls >= params.max_consecutive_stalls {
                    return Err(Error::SimplificationStalled(stalls));
                }
            }
        }
    }

    // One final step sized exactly to the remaining shortfall.
    let remaining = current.triangle_count().saturating_sub(target);
    if remaining > 0 {
        match simplifier.simplify_step(&current, remaining)? {
            StepOutcome::Simplified(next) => current = next,
            StepOutcome::Degenerate => {
                warn!(remaining, "simplifier could not perform the final step, keeping previous geometry");
            }
        }
    }
    report(callback, &current, 100)?;
    Ok(current)
}

fn report(callback: Option<&StepCallback>, mesh: &MeshBuffer, percent: u32) -> Result<()> {
    if let Some(cb) = callback {
        if !cb(mesh, percent) {
            return Err(Error::Cancelled);
        }
    }
    Ok(())
}
