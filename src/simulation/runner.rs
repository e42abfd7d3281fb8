//! Round-by-round simulation loop.
//!
//! Drives the ellipsoid engine against a preference environment under one
//! of two warm-start strategies, accumulating regret, margin, and
//! cut-event traces. Rounds execute strictly in order: each proposal
//! depends on the region state mutated by every prior round.

use nalgebra::DVector;
use tracing::{info, warn};

use crate::engine::{EllipsoidEngine, SimulationConfig, SimulationMode};
use crate::environment::PreferenceEnvironment;
use crate::errors::{EngineError, Result};
use crate::linalg;

use super::outcome::SimulationOutcome;

/// Run one simulation and return its traces.
///
/// The engine is not reset: callers decide whether a run continues from
/// prior region state or starts fresh via [`EllipsoidEngine::reset`]. The
/// returned traces are owned by this invocation alone.
///
/// Per main-loop round: propose a candidate pair (advancing the round
/// counter), compute the cut margin, query the environment for a
/// preference, then either apply the accepted cut (unit regret, the cost
/// of one exploratory comparison) or fall back to recommending the
/// unit-normalized center. Errors abort the run; state is well-defined
/// after every completed round.
pub fn run_simulation(
    engine: &mut EllipsoidEngine,
    environment: &mut dyn PreferenceEnvironment,
    config: &SimulationConfig,
) -> Result<SimulationOutcome> {
    config.validate()?;
    if environment.dimension() != engine.dimension() {
        return Err(EngineError::config(format!(
            "environment dimension {} does not match engine dimension {}",
            environment.dimension(),
            engine.dimension()
        )));
    }
    engine.configure_run(config.delta, config.horizon)?;

    let mut outcome = SimulationOutcome::default();
    let main_rounds = match config.mode {
        SimulationMode::BootstrapFirst => {
            run_bootstrap(engine, environment, config.bootstrap_rounds, &mut outcome);
            config.horizon - config.bootstrap_rounds
        }
        SimulationMode::Interleaved => config.horizon,
    };

    let mut warned_zero_center = false;
    for index in 0..main_rounds as usize {
        let proposal = engine.propose(environment)?;
        outcome.margins.push(proposal.margin);

        let preference = environment.query_preference(&proposal.left, &proposal.right);

        if engine.accepts(proposal.margin, config.cut_sensitivity) {
            outcome.cut_rounds.push(index);
            engine.apply_cut(&proposal, preference.left_score(), preference.right_score)?;
            environment.record_outcome(&preference.winner);
            outcome.regret.push(1.0);
        } else if config.mode == SimulationMode::Interleaved
            && engine.region().round() < config.bootstrap_rounds
        {
            // Secondary exploration: probe where the environment itself is
            // most certain, letting its uncertainty estimate spread.
            let probe = environment.min_uncertainty_direction()?;
            environment.record_outcome(&probe);
            outcome
                .regret
                .push(1.0 - environment.ground_truth().dot(&probe));
        } else {
            let recommendation = match linalg::unit(engine.region().center()) {
                Some(unit) => unit,
                None => {
                    if !warned_zero_center {
                        warn!("zero center before any cut; recommending the null action");
                        warned_zero_center = true;
                    }
                    DVector::zeros(engine.dimension())
                }
            };
            environment.record_outcome(&recommendation);
            outcome
                .regret
                .push(1.0 - environment.ground_truth().dot(&recommendation));
        }
    }

    info!(
        rounds = outcome.regret.len(),
        cuts = outcome.cut_count(),
        total_regret = outcome.total_regret(),
        "simulation finished"
    );
    Ok(outcome)
}

/// Warm-start block for bootstrap-first mode: propose the standard basis
/// vectors cyclically so the environment accumulates initial uncertainty
/// estimates, then advance the round counter without touching the region.
fn run_bootstrap(
    engine: &mut EllipsoidEngine,
    environment: &mut dyn PreferenceEnvironment,
    rounds: u64,
    outcome: &mut SimulationOutcome,
) {
    let dimension = engine.dimension();
    for i in 0..rounds {
        let mut arm = DVector::zeros(dimension);
        arm[i as usize % dimension] = 1.0;
        environment.record_outcome(&arm);
        outcome
            .regret
            .push(1.0 - environment.ground_truth().dot(&arm));
    }
    engine.advance_rounds(rounds);
}
