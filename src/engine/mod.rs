//! Ellipsoid-maintenance-and-cut engine.
//!
//! This module provides the core decision engine with pluggable pieces:
//! - **Region**: ellipsoid state (center, shape, counters) with invariant guards
//! - **DirectionSelector**: probe directions from the shape's dominant eigenvectors
//! - **confidence**: the statistical cut test producing the margin (alpha)
//! - **cut**: the geometric shrink applied on an accepted cut
//! - **registry**: explicit name-to-factory map for engine construction
//!
//! Data flow per round:
//!
//! ```text
//! Region.shape → DirectionSelector → candidate pair → cut margin
//!      ↓                                                  ↓
//! CutUpdater ← accepted cut ← environment preference query
//! ```

mod config;
mod confidence;
mod cut;
mod direction;
mod region;
mod registry;

pub use config::{SimulationConfig, SimulationMode};
pub use confidence::{accepts_cut, cut_margin};
pub use cut::apply_cut;
pub use direction::DirectionSelector;
pub use region::Region;
pub use registry::{AlgorithmRegistry, EngineFactory};

use nalgebra::DVector;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::environment::PreferenceEnvironment;
use crate::errors::Result;
use crate::linalg;

/// A proposed candidate pair with its cut margin.
#[derive(Debug, Clone)]
pub struct Proposal {
    /// First candidate arm (the probe direction).
    pub left: DVector<f64>,
    /// Second candidate arm (the mirrored probe direction).
    pub right: DVector<f64>,
    /// Signed cut margin (alpha) for this pair.
    pub margin: f64,
}

/// The ellipsoid engine: region state plus direction selection, proposing
/// candidate pairs and applying accepted cuts.
///
/// The simulation loop in [`crate::simulation`] drives this engine round
/// by round against a [`PreferenceEnvironment`].
#[derive(Debug)]
pub struct EllipsoidEngine {
    region: Region,
    selector: DirectionSelector,
    rng: SmallRng,
}

impl EllipsoidEngine {
    /// Create an engine with an entropy-seeded random source.
    pub fn new(dimension: usize, delta: f64) -> Result<Self> {
        Ok(Self {
            region: Region::new(dimension, delta)?,
            selector: DirectionSelector::default(),
            rng: SmallRng::from_entropy(),
        })
    }

    /// Create an engine with a fixed seed for reproducible runs.
    pub fn with_seed(dimension: usize, delta: f64, seed: u64) -> Result<Self> {
        Ok(Self {
            region: Region::new(dimension, delta)?,
            selector: DirectionSelector::default(),
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Restore the region to its initial state (dimension and delta kept).
    pub fn reset(&mut self) {
        self.region.reset();
    }

    /// Current region state.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Parameter-space dimension.
    pub fn dimension(&self) -> usize {
        self.region.dimension()
    }

    /// Install per-run parameters before a simulation starts.
    pub fn configure_run(&mut self, delta: f64, horizon: u64) -> Result<()> {
        self.region.set_delta(delta)?;
        self.region.set_horizon(horizon);
        Ok(())
    }

    /// Advance the round counter without proposing (bootstrap bookkeeping).
    pub fn advance_rounds(&mut self, rounds: u64) {
        self.region.advance_rounds(rounds);
    }

    /// Propose a candidate pair and compute its cut margin.
    ///
    /// Advances the round counter by one as part of proposing; the margin
    /// is computed against the pre-advance counter.
    pub fn propose(&mut self, environment: &dyn PreferenceEnvironment) -> Result<Proposal> {
        let direction = self
            .selector
            .select(self.region.center(), self.region.shape())?;
        let (left, right) = DirectionSelector::candidate_pair(&direction);

        let margin = cut_margin(
            self.region.round(),
            environment.drift_exponent(),
            self.region.delta(),
            &left,
            &right,
            &(&direction * 2.0),
            environment.inverse_uncertainty(),
            self.region.shape(),
        )?;

        self.region.advance_rounds(1);
        Ok(Proposal {
            left,
            right,
            margin,
        })
    }

    /// Whether a margin clears the cut decision threshold.
    pub fn accepts(&self, margin: f64, cut_sensitivity: f64) -> bool {
        accepts_cut(margin, cut_sensitivity, self.region.dimension())
    }

    /// Apply an accepted cut for a proposal given the comparison scores.
    pub fn apply_cut(
        &mut self,
        proposal: &Proposal,
        left_score: f64,
        right_score: f64,
    ) -> Result<()> {
        apply_cut(
            &mut self.region,
            &proposal.left,
            &proposal.right,
            proposal.margin,
            left_score,
            right_score,
        )
    }

    /// A uniformly random unit direction from the engine's own seedable
    /// random source.
    pub fn random_direction(&mut self) -> DVector<f64> {
        let dimension = self.dimension();
        loop {
            let raw = DVector::from_iterator(
                dimension,
                (0..dimension).map(|_| StandardNormal.sample(&mut self.rng)),
            );
            if let Some(direction) = linalg::unit(&raw) {
                return direction;
            }
        }
    }
}
