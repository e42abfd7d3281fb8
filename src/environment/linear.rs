//! Linear utility preference environment.
//!
//! Holds a hidden unit-norm target direction and answers pairwise
//! comparisons through a logistic link on the utility gap. Every recorded
//! outcome accumulates into a ridge-style design matrix `V = V0 I + sum a a'`
//! whose inverse is maintained incrementally by the Sherman-Morrison
//! identity, so the engine's confidence test sees uncertainty shrink as
//! evidence accumulates.
//!
//! Optional per-round drift schedules perturb the two arms' utilities
//! independently, modeling a non-stationary or adversarial user whose
//! answers degrade with time.

use nalgebra::{DMatrix, DVector};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::errors::Result;
use crate::linalg;

use super::{PreferenceEnvironment, PreferenceOutcome};

/// Seedable linear preference environment with design-matrix learning.
#[derive(Debug, Clone)]
pub struct LinearPreferenceEnvironment {
    dimension: usize,
    /// Hidden unit-norm target direction.
    theta_star: DVector<f64>,
    /// Design matrix `V0 I + sum a a'` over recorded outcomes.
    v: DMatrix<f64>,
    /// Incrementally maintained inverse of `v`.
    v_inv: DMatrix<f64>,
    /// Ridge prior weight for the initial design matrix.
    v0: f64,
    /// Drift exponent exposed to the confidence test.
    gamma: f64,
    /// Per-round additive utility drift for each arm; empty means none.
    drift_left: Vec<f64>,
    drift_right: Vec<f64>,
    /// Comparisons answered so far; indexes the drift schedules.
    queries: usize,
}

impl LinearPreferenceEnvironment {
    /// Create an environment with an entropy-drawn target direction.
    pub fn new(dimension: usize, v0: f64, gamma: f64) -> Self {
        Self::from_rng(dimension, v0, gamma, &mut SmallRng::from_entropy())
    }

    /// Create an environment with a seeded target direction for
    /// reproducible runs.
    pub fn with_seed(dimension: usize, v0: f64, gamma: f64, seed: u64) -> Self {
        Self::from_rng(dimension, v0, gamma, &mut SmallRng::seed_from_u64(seed))
    }

    fn from_rng(dimension: usize, v0: f64, gamma: f64, rng: &mut SmallRng) -> Self {
        let theta_star = loop {
            let raw = DVector::from_iterator(
                dimension,
                (0..dimension).map(|_| StandardNormal.sample(rng)),
            );
            if let Some(unit) = linalg::unit(&raw) {
                break unit;
            }
        };
        Self {
            dimension,
            theta_star,
            v: DMatrix::identity(dimension, dimension) * v0,
            v_inv: DMatrix::identity(dimension, dimension) / v0,
            v0,
            gamma,
            drift_left: Vec::new(),
            drift_right: Vec::new(),
            queries: 0,
        }
    }

    /// Restore the design matrix and query counter to their initial state.
    /// The target direction and drift schedules are kept so repeated runs
    /// stay comparable.
    pub fn reset(&mut self) {
        self.v = DMatrix::identity(self.dimension, self.dimension) * self.v0;
        self.v_inv = DMatrix::identity(self.dimension, self.dimension) / self.v0;
        self.queries = 0;
    }

    /// Override the drift exponent.
    pub fn set_gamma(&mut self, gamma: f64) {
        self.gamma = gamma;
    }

    /// Install per-round additive drift for the two arms.
    pub fn set_drift(&mut self, left: Vec<f64>, right: Vec<f64>) {
        self.drift_left = left;
        self.drift_right = right;
    }

    /// Pin the target direction (unit-normalized) for scripted scenarios.
    pub fn set_ground_truth(&mut self, theta: DVector<f64>) {
        if let Some(unit) = linalg::unit(&theta) {
            self.theta_star = unit;
        }
    }

    /// Uncontaminated utility of an arm under the hidden target.
    pub fn utility(&self, arm: &DVector<f64>) -> f64 {
        self.theta_star.dot(arm)
    }

    /// Comparisons answered so far.
    pub fn queries(&self) -> usize {
        self.queries
    }

    /// The raw design matrix (for diagnostics and tests).
    pub fn uncertainty(&self) -> &DMatrix<f64> {
        &self.v
    }

    fn drift(schedule: &[f64], index: usize) -> f64 {
        schedule.get(index).copied().unwrap_or(0.0)
    }
}

impl PreferenceEnvironment for LinearPreferenceEnvironment {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn query_preference(
        &mut self,
        left: &DVector<f64>,
        right: &DVector<f64>,
    ) -> PreferenceOutcome {
        debug_assert_eq!(left.len(), self.dimension);
        debug_assert_eq!(right.len(), self.dimension);

        let index = self.queries;
        let left_utility = self.utility(left) + Self::drift(&self.drift_left, index);
        let right_utility = self.utility(right) + Self::drift(&self.drift_right, index);
        self.queries += 1;

        let score_gap = right_utility - left_utility;
        let right_score = 1.0 / (1.0 + (-score_gap).exp());
        let winner = if right_utility > left_utility {
            right.clone()
        } else {
            left.clone()
        };
        PreferenceOutcome {
            right_score,
            winner,
            score_gap,
        }
    }

    fn record_outcome(&mut self, chosen: &DVector<f64>) {
        debug_assert_eq!(chosen.len(), self.dimension);

        self.v += chosen * chosen.transpose();

        // Sherman-Morrison: (V + aa')^-1 = V^-1 - (V^-1 a)(a' V^-1) / (1 + a' V^-1 a).
        let vi_a = &self.v_inv * chosen;
        let denom = 1.0 + chosen.dot(&vi_a);
        if denom > linalg::NORM_EPS {
            self.v_inv -= (&vi_a * vi_a.transpose()) / denom;
        }
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
        linalg::min_direction(&self.v)
    }
}
