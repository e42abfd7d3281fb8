//! Scripted environment for testing.

use nalgebra::{DMatrix, DVector};

use crate::errors::Result;
use crate::linalg;

use super::{PreferenceEnvironment, PreferenceOutcome};

/// Deterministic environment with fixed matrices and scripted winners.
///
/// Preference answers follow the installed script (`true` = right arm
/// wins), cycling when exhausted; with no script the right arm always
/// wins. Every `record_outcome` call is captured for assertions.
#[derive(Debug, Clone)]
pub struct ScriptedEnvironment {
    dimension: usize,
    theta_star: DVector<f64>,
    uncertainty: DMatrix<f64>,
    v_inv: DMatrix<f64>,
    gamma: f64,
    script: Vec<bool>,
    queries: usize,
    /// Outcomes the engine reported, in order.
    pub recorded: Vec<DVector<f64>>,
}

impl ScriptedEnvironment {
    /// A neutral scripted environment: target on the first axis, identity
    /// matrices, zero drift exponent.
    pub fn new(dimension: usize) -> Self {
        let mut theta_star = DVector::zeros(dimension);
        theta_star[0] = 1.0;
        Self {
            dimension,
            theta_star,
            uncertainty: DMatrix::identity(dimension, dimension),
            v_inv: DMatrix::identity(dimension, dimension),
            gamma: 0.0,
            script: Vec::new(),
            queries: 0,
            recorded: Vec::new(),
        }
    }

    /// Replace the hidden target direction (unit-normalized).
    pub fn with_ground_truth(mut self, theta: DVector<f64>) -> Self {
        if let Some(unit) = linalg::unit(&theta) {
            self.theta_star = unit;
        }
        self
    }

    /// Replace the drift exponent.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Replace the inverse-uncertainty matrix seen by the confidence test.
    pub fn with_inverse_uncertainty(mut self, v_inv: DMatrix<f64>) -> Self {
        self.v_inv = v_inv;
        self
    }

    /// Replace the uncertainty matrix backing the minimum-uncertainty
    /// direction.
    pub fn with_uncertainty(mut self, uncertainty: DMatrix<f64>) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    /// Install the winner script (`true` = right arm wins), cycled.
    pub fn with_script(mut self, script: Vec<bool>) -> Self {
        self.script = script;
        self
    }

    /// Comparisons answered so far.
    pub fn queries(&self) -> usize {
        self.queries
    }
}

impl PreferenceEnvironment for ScriptedEnvironment {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn query_preference(
        &mut self,
        left: &DVector<f64>,
        right: &DVector<f64>,
    ) -> PreferenceOutcome {
        let right_wins = if self.script.is_empty() {
            true
        } else {
            self.script[self.queries % self.script.len()]
        };
        self.queries += 1;

        let (right_score, winner, score_gap) = if right_wins {
            (1.0, right.clone(), 1.0)
        } else {
            (0.0, left.clone(), -1.0)
        };
        PreferenceOutcome {
            right_score,
            winner,
            score_gap,
        }
    }

    fn record_outcome(&mut self, chosen: &DVector<f64>) {
        self.recorded.push(chosen.clone());
    }

    fn inverse_uncertainty(&self) -> &DMatrix<f64> {
        &self.v_inv
    }

    fn drift_exponent(&self) -> f64 {
        self.gamma
    }

    fn ground_truth(&self) -> &DVector<f64> {
        &self.theta_star
    }

    fn min_uncertainty_direction(&self) -> Result<DVector<f64>> {
        linalg::min_direction(&self.uncertainty)
    }
}
