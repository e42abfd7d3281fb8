//! Preference-generating environment collaborators.
//!
//! The engine never sees the true target direction; it only queries an
//! environment for pairwise comparisons and reads the environment's own
//! uncertainty estimate. This module defines that interface plus two
//! implementations:
//! - **LinearPreferenceEnvironment**: a linear utility model with a hidden
//!   unit-norm target, design-matrix learning, and optional adversarial
//!   drift schedules
//! - **ScriptedEnvironment**: fixed matrices and scripted winners for
//!   deterministic tests

mod linear;
mod mock;

pub use linear::LinearPreferenceEnvironment;
pub use mock::ScriptedEnvironment;

use nalgebra::{DMatrix, DVector};

use crate::errors::Result;

/// Result of one pairwise comparison.
#[derive(Debug, Clone)]
pub struct PreferenceOutcome {
    /// Score of the right arm in [0, 1]; the left arm's score is its
    /// complement.
    pub right_score: f64,
    /// The winning arm's vector.
    pub winner: DVector<f64>,
    /// Raw utility gap (right minus left) behind the score.
    pub score_gap: f64,
}

impl PreferenceOutcome {
    /// Score of the left arm.
    pub fn left_score(&self) -> f64 {
        1.0 - self.right_score
    }
}

/// Interface the engine consumes from a preference environment.
///
/// All queries are synchronous in-process calls; side effects on the
/// environment's internal state are the environment's own concern.
pub trait PreferenceEnvironment {
    /// Arm dimension.
    fn dimension(&self) -> usize;

    /// Compare two candidate arms.
    fn query_preference(
        &mut self,
        left: &DVector<f64>,
        right: &DVector<f64>,
    ) -> PreferenceOutcome;

    /// Inform the environment of the engine's chosen action for its own
    /// bookkeeping (e.g. updating its internal uncertainty matrix).
    fn record_outcome(&mut self, chosen: &DVector<f64>);

    /// Inverse of the environment's uncertainty matrix (assumed invertible).
    fn inverse_uncertainty(&self) -> &DMatrix<f64>;

    /// Exponent controlling how the confidence margin scales with elapsed
    /// rounds (gamma).
    fn drift_exponent(&self) -> f64;

    /// Hidden target direction. Used only for regret accounting; the
    /// engine's update path must never read it.
    fn ground_truth(&self) -> &DVector<f64>;

    /// Eigenvector of the environment's uncertainty matrix with the
    /// smallest eigenvalue (secondary exploration target).
    fn min_uncertainty_direction(&self) -> Result<DVector<f64>>;
}
