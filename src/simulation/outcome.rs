//! Simulation result traces.
//!
//! Trace state is owned by one simulation invocation and returned as an
//! explicit value, never stored on the engine: reusing an engine instance
//! or running sweeps in parallel cannot contaminate a finished run.

use serde::{Deserialize, Serialize};

/// Per-run traces produced by the simulation loop.
///
/// `regret` holds one entry per simulated round (bootstrap rounds
/// included); `margins` holds one entry per main-loop proposal; entries of
/// `cut_rounds` index into `margins` for the proposals whose cut was
/// accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Per-round regret relative to the hidden target direction.
    pub regret: Vec<f64>,
    /// Computed cut margin (alpha) per main-loop round.
    pub margins: Vec<f64>,
    /// Main-loop round indices at which a cut was accepted.
    pub cut_rounds: Vec<usize>,
}

impl SimulationOutcome {
    /// Running sum of the regret trace.
    pub fn cumulative_regret(&self) -> Vec<f64> {
        let mut total = 0.0;
        self.regret
            .iter()
            .map(|r| {
                total += r;
                total
            })
            .collect()
    }

    /// Total regret over the run.
    pub fn total_regret(&self) -> f64 {
        self.regret.iter().sum()
    }

    /// Number of accepted cuts.
    pub fn cut_count(&self) -> usize {
        self.cut_rounds.len()
    }
}
