//! Integration tests for the full engine pipeline.
//!
//! These tests verify that components work together correctly:
//! - End-to-end runs in both simulation modes
//! - Shape invariants across whole runs
//! - Seeded reproducibility of complete traces
//! - Ground-truth isolation from the cut decision path
//! - Registry-driven construction

use nalgebra::{DMatrix, DVector};

use crate::engine::{AlgorithmRegistry, EllipsoidEngine, SimulationConfig, SimulationMode};
use crate::environment::{LinearPreferenceEnvironment, PreferenceEnvironment, ScriptedEnvironment};
use crate::linalg;
use crate::simulation::run_simulation;

// =========================================================================
// End-to-end runs
// =========================================================================

#[test]
fn test_bootstrap_first_run_end_to_end() {
    let mut engine = EllipsoidEngine::with_seed(5, 0.2, 21).unwrap();
    let mut env = LinearPreferenceEnvironment::with_seed(5, 1.0, 0.2, 22);
    let config = SimulationConfig {
        horizon: 200,
        bootstrap_rounds: 40,
        delta: 0.2,
        ..SimulationConfig::default()
    };

    let outcome = run_simulation(&mut engine, &mut env, &config).unwrap();
    assert_eq!(outcome.regret.len(), 200);
    assert_eq!(outcome.margins.len(), 160);
    assert!(outcome.regret.iter().all(|r| r.is_finite()));
    assert!(outcome.margins.iter().all(|m| m.is_finite()));
    assert!(
        linalg::is_positive_definite(engine.region().shape()),
        "shape must stay positive-definite through a full run"
    );
    // The round counter advanced once per bootstrap round and proposal.
    assert_eq!(engine.region().round(), 201);
}

#[test]
fn test_interleaved_run_with_adversarial_drift() {
    // Drift schedules in the style of the adversarial user: magnitude
    // t^gamma with alternating signs, occasionally flipped on one side.
    let gamma = 0.2;
    let horizon = 120u64;
    let drift_left: Vec<f64> = (1..=horizon)
        .map(|t| (t as f64).powf(gamma) * if t % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    let drift_right: Vec<f64> = drift_left
        .iter()
        .enumerate()
        .map(|(i, v)| if i % 5 == 0 { -v } else { *v })
        .collect();

    let mut engine = EllipsoidEngine::with_seed(4, 0.1, 23).unwrap();
    let mut env = LinearPreferenceEnvironment::with_seed(4, 1.0, gamma, 24);
    env.set_drift(drift_left, drift_right);
    let config = SimulationConfig {
        horizon,
        bootstrap_rounds: 30,
        mode: SimulationMode::Interleaved,
        ..SimulationConfig::default()
    };

    let outcome = run_simulation(&mut engine, &mut env, &config).unwrap();
    assert_eq!(outcome.regret.len(), 120);
    assert_eq!(outcome.margins.len(), 120);
    assert!(outcome.regret.iter().all(|&r| (0.0..=2.0).contains(&r)));
    for &round in &outcome.cut_rounds {
        assert!(round < outcome.margins.len());
    }
    assert!(linalg::is_positive_definite(engine.region().shape()));
}

#[test]
fn test_cuts_shrink_total_uncertainty() {
    // Every round cuts under a vanishing inverse-uncertainty matrix; the
    // shape's trace must decrease monotonically along the run.
    let mut engine = EllipsoidEngine::with_seed(3, 0.1, 25).unwrap();
    let mut env =
        ScriptedEnvironment::new(3).with_inverse_uncertainty(DMatrix::identity(3, 3) * 1e-8);
    let config = SimulationConfig {
        horizon: 30,
        bootstrap_rounds: 0,
        ..SimulationConfig::default()
    };

    let trace_before = engine.region().shape().trace();
    let outcome = run_simulation(&mut engine, &mut env, &config).unwrap();
    assert_eq!(outcome.cut_count(), 30);
    let trace_after = engine.region().shape().trace();
    assert!(
        trace_after < trace_before,
        "total uncertainty should shrink: {trace_before} -> {trace_after}"
    );
}

// =========================================================================
// Reproducibility
// =========================================================================

#[test]
fn test_seeded_runs_reproduce_exact_traces() {
    let config = SimulationConfig {
        horizon: 80,
        bootstrap_rounds: 16,
        delta: 0.2,
        ..SimulationConfig::default()
    };

    let mut engine = EllipsoidEngine::with_seed(4, 0.2, 31).unwrap();
    let mut env = LinearPreferenceEnvironment::with_seed(4, 1.0, 0.1, 32);
    let first = run_simulation(&mut engine, &mut env, &config).unwrap();

    engine.reset();
    env.reset();
    let second = run_simulation(&mut engine, &mut env, &config).unwrap();

    assert_eq!(first.regret, second.regret);
    assert_eq!(first.margins, second.margins);
    assert_eq!(first.cut_rounds, second.cut_rounds);
}

// =========================================================================
// Ground-truth isolation
// =========================================================================

#[test]
fn test_ground_truth_only_moves_regret() {
    // With scripted preferences and fixed matrices, the hidden target
    // must not leak into the margin trace or the cut decisions; only the
    // regret bookkeeping may change.
    let config = SimulationConfig {
        horizon: 12,
        bootstrap_rounds: 4,
        ..SimulationConfig::default()
    };
    let run = |theta: DVector<f64>| {
        let mut engine = EllipsoidEngine::with_seed(3, 0.1, 41).unwrap();
        let mut env = ScriptedEnvironment::new(3)
            .with_inverse_uncertainty(DMatrix::identity(3, 3) * 1e-8)
            .with_script(vec![true, false, true])
            .with_ground_truth(theta);
        run_simulation(&mut engine, &mut env, &config).unwrap()
    };

    let a = run(DVector::from_vec(vec![1.0, 0.0, 0.0]));
    let b = run(DVector::from_vec(vec![-0.3, 0.8, 0.5]));

    assert_eq!(a.margins, b.margins, "margins depend on the ground truth");
    assert_eq!(a.cut_rounds, b.cut_rounds, "cuts depend on the ground truth");
    assert_ne!(
        a.regret, b.regret,
        "bootstrap regret should reflect the target change"
    );
}

// =========================================================================
// Registry-driven construction
// =========================================================================

#[test]
fn test_registry_runs_both_algorithms() {
    let registry = AlgorithmRegistry::default();
    for name in ["ellipsoid", "ellipsoid-interleaved"] {
        let (mut engine, mode) = registry.create(name, 3, 0.1, Some(51)).unwrap();
        let mut env = LinearPreferenceEnvironment::with_seed(3, 1.0, 0.1, 52);
        let config = SimulationConfig {
            horizon: 50,
            bootstrap_rounds: 10,
            mode,
            ..SimulationConfig::default()
        };
        let outcome = run_simulation(&mut engine, &mut env, &config).unwrap();
        assert_eq!(outcome.regret.len(), 50, "algorithm {name}");
    }
}

// =========================================================================
// Engine update path never reads the ground truth
// =========================================================================

#[test]
fn test_environment_learns_from_recorded_outcomes() {
    // A full run should tighten the environment's uncertainty: the
    // design matrix accumulates one recorded outcome per round.
    let mut engine = EllipsoidEngine::with_seed(3, 0.1, 61).unwrap();
    let mut env = LinearPreferenceEnvironment::with_seed(3, 1.0, 0.0, 62);
    let config = SimulationConfig {
        horizon: 60,
        bootstrap_rounds: 12,
        ..SimulationConfig::default()
    };

    let initial_trace = env.uncertainty().trace();
    run_simulation(&mut engine, &mut env, &config).unwrap();
    assert!(
        env.uncertainty().trace() > initial_trace,
        "design matrix should accumulate evidence"
    );
    let product = env.uncertainty() * env.inverse_uncertainty();
    assert!(
        (&product - DMatrix::identity(3, 3)).norm() < 1e-6,
        "incremental inverse drifted from the design matrix"
    );
}
