//! Geometric cut update.
//!
//! Applies the deep-cut ellipsoid shrink once the confidence test has
//! licensed discarding the half of the region on the losing arm's side.
//! The update is numerically delicate: center shift, rank-1 deflation, and
//! isotropic rescale all share the same metric-normalized direction and
//! the same pre-cut shape matrix.

use nalgebra::DVector;
use tracing::debug;

use crate::errors::{EngineError, Result};
use crate::linalg;

use super::region::Region;

/// Apply an accepted cut to the region.
///
/// `alpha` is the accepted margin; `left_score`/`right_score` are the
/// comparison scores of the two arms (higher wins). The cut direction
/// points at the losing arm so the center moves toward the winner:
///
/// ```text
/// g  = left - right            when the right arm won
/// gt = g / ||g||_P
/// x  <- x - ((1 + d a)/(1 + d)) P gt
/// P  <- P - 2 ((1 + d a)/((1 + d)(1 + a))) (P gt)(P gt)'
/// P  <- P * d^2 (1 - a^2) / (d^2 - 1)
/// ```
///
/// `alpha` must lie strictly inside (-1, 1); anything else would make the
/// rescale factor non-positive and is rejected with
/// [`EngineError::InvalidCut`] before any mutation. The committed shape is
/// re-checked for symmetry and positive-definiteness by the region.
pub fn apply_cut(
    region: &mut Region,
    left: &DVector<f64>,
    right: &DVector<f64>,
    alpha: f64,
    left_score: f64,
    right_score: f64,
) -> Result<()> {
    if !(alpha > -1.0 && alpha < 1.0) || !alpha.is_finite() {
        return Err(EngineError::InvalidCut { alpha });
    }

    // Step 1 - orient toward the losing arm.
    let g = if left_score < right_score {
        left - right
    } else {
        right - left
    };

    // Step 2 - normalize under the region metric.
    let g_norm = linalg::metric_norm(&g, region.shape());
    if !g_norm.is_finite() || g_norm <= 0.0 {
        return Err(EngineError::numerical(
            "cut direction is degenerate under the region metric",
        ));
    }
    let gt = g / g_norm;

    // All three steps below use the pre-cut shape.
    let shape_gt = region.shape() * &gt;
    let d = region.dimension() as f64;

    // Step 3 - center shift.
    let center_step = (1.0 + d * alpha) / (1.0 + d);
    let center = region.center() - &shape_gt * center_step;

    // Step 4 - rank-1 deflation along the cut direction.
    let deflation = 2.0 * (1.0 + d * alpha) / ((1.0 + d) * (1.0 + alpha));
    let mut shape = region.shape() - (&shape_gt * shape_gt.transpose()) * deflation;

    // Step 5 - isotropic rescale restoring the post-cut volume.
    let rescale = d * d * (1.0 - alpha * alpha) / (d * d - 1.0);
    shape *= rescale;

    debug!(
        round = region.round(),
        alpha,
        rescale,
        "applying ellipsoid cut"
    );
    region.commit_cut(center, shape)
}
