//! Probe direction selection along the region's major axes.
//!
//! Each round the engine probes the two-dimensional eigenspace spanned by
//! the shape matrix's dominant eigenvectors: the component of that
//! subspace orthogonal to the center's projection is the most informative
//! direction that is independent of the current best estimate.

use nalgebra::{DMatrix, DVector};
use tracing::warn;

use crate::errors::Result;
use crate::linalg;

/// Selects the unit probe direction used to build a candidate pair.
#[derive(Debug, Clone)]
pub struct DirectionSelector {
    /// Below this raw-direction norm the center is aligned with both
    /// major axes and the orthogonal construction degenerates.
    degeneracy_tol: f64,
}

impl Default for DirectionSelector {
    fn default() -> Self {
        Self {
            degeneracy_tol: 1e-6,
        }
    }
}

impl DirectionSelector {
    /// Compute the unit probe direction for the current region state.
    ///
    /// With `u1`, `u2` the eigenvectors of the two largest eigenvalues of
    /// `shape`, the raw direction is `(x . u2) u1 - (x . u1) u2`. When the
    /// center is nearly aligned with both axes the raw direction collapses
    /// and the selector falls back to `(u1 + u2) / sqrt(2)`.
    ///
    /// Ties in the spectrum need no special handling: any orthonormal
    /// eigenbasis is acceptable, and the fallback covers the only
    /// numerically unstable configuration.
    pub fn select(&self, center: &DVector<f64>, shape: &DMatrix<f64>) -> Result<DVector<f64>> {
        let (u1, u2) = linalg::top_two_directions(shape)?;

        let raw = &u1 * center.dot(&u2) - &u2 * center.dot(&u1);
        if raw.norm() < self.degeneracy_tol {
            warn!("degenerate probe direction, falling back to the axis bisector");
            return Ok((u1 + u2) / 2.0_f64.sqrt());
        }
        // The norm just cleared the degeneracy tolerance, so this cannot fail.
        Ok(linalg::unit(&raw).expect("norm above degeneracy tolerance"))
    }

    /// Candidate pair for a probe direction: `(g, -g)`.
    pub fn candidate_pair(direction: &DVector<f64>) -> (DVector<f64>, DVector<f64>) {
        (direction.clone(), -direction)
    }
}
