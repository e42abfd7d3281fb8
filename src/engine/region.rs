//! Ellipsoidal confidence region state.
//!
//! The region is the `(center, shape)` pair believed to contain the true
//! target direction, plus the round counters the confidence test depends
//! on. It is pure data with invariant guards: every shape mutation routes
//! through [`Region::commit_cut`], which re-symmetrizes and verifies
//! positive-definiteness, so silent numerical drift surfaces as an
//! explicit [`EngineError::Numerical`] instead of a corrupted matrix.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::errors::{EngineError, Result};
use crate::linalg;

/// Shrinking ellipsoidal confidence region over a d-dimensional
/// parameter space.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Fixed parameter-space dimension (d >= 2).
    dimension: usize,
    /// Current best point estimate of the target direction.
    center: DVector<f64>,
    /// Ellipsoid metric; symmetric positive-definite. Larger eigenvalues
    /// mean more uncertainty along that axis.
    shape: DMatrix<f64>,
    /// Confidence parameter in (0, 1); controls the statistical margin width.
    delta: f64,
    /// Round counter, starts at 1, incremented once per proposal.
    round: u64,
    /// Total planned rounds (bookkeeping only, not an algorithmic bound).
    horizon: u64,
}

impl Region {
    /// Create a fresh region: zero center, identity shape, round 1.
    ///
    /// Fails with [`EngineError::Dimension`] when `dimension < 2` (the
    /// update formulas divide by d^2 - 1 and need a two-dimensional
    /// eigenspace) and [`EngineError::Config`] when `delta` is outside
    /// (0, 1).
    pub fn new(dimension: usize, delta: f64) -> Result<Self> {
        if dimension < 2 {
            return Err(EngineError::Dimension { dimension });
        }
        Self::validate_delta(delta)?;
        Ok(Self {
            dimension,
            center: DVector::zeros(dimension),
            shape: DMatrix::identity(dimension, dimension),
            delta,
            round: 1,
            horizon: 1,
        })
    }

    /// Restore the initial state (zero center, identity shape, round 1)
    /// without reallocating dimension or changing delta.
    pub fn reset(&mut self) {
        self.center = DVector::zeros(self.dimension);
        self.shape = DMatrix::identity(self.dimension, self.dimension);
        self.round = 1;
        self.horizon = 1;
    }

    /// Parameter-space dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Current center (best point estimate).
    pub fn center(&self) -> &DVector<f64> {
        &self.center
    }

    /// Current shape matrix.
    pub fn shape(&self) -> &DMatrix<f64> {
        &self.shape
    }

    /// Confidence parameter.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Current round counter.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Planned horizon.
    pub fn horizon(&self) -> u64 {
        self.horizon
    }

    /// Override the confidence parameter for a new run.
    pub fn set_delta(&mut self, delta: f64) -> Result<()> {
        Self::validate_delta(delta)?;
        self.delta = delta;
        Ok(())
    }

    /// Record the planned horizon for a new run.
    pub fn set_horizon(&mut self, horizon: u64) {
        self.horizon = horizon;
    }

    /// Advance the round counter by `rounds`.
    pub fn advance_rounds(&mut self, rounds: u64) {
        self.round += rounds;
    }

    /// Commit a cut's center/shape update.
    ///
    /// The shape is re-symmetrized before the positive-definiteness check:
    /// repeated rank-1 updates accumulate off-symmetric floating-point
    /// drift. A shape that fails the Cholesky check, or a non-finite
    /// center, rejects the commit with [`EngineError::Numerical`] and
    /// leaves the region untouched.
    pub fn commit_cut(&mut self, center: DVector<f64>, shape: DMatrix<f64>) -> Result<()> {
        if center.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::numerical("cut produced a non-finite center"));
        }
        let shape = linalg::symmetrize(&shape);
        if !linalg::is_positive_definite(&shape) {
            return Err(EngineError::numerical(
                "cut produced a non positive-definite shape matrix",
            ));
        }
        debug!(
            round = self.round,
            trace = shape.trace(),
            "committing region cut"
        );
        self.center = center;
        self.shape = shape;
        Ok(())
    }

    fn validate_delta(delta: f64) -> Result<()> {
        if !(delta > 0.0 && delta < 1.0) {
            return Err(EngineError::config(format!(
                "confidence parameter delta must lie in (0, 1), got {delta}"
            )));
        }
        Ok(())
    }
}
