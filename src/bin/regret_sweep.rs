//! Drift-Exponent Regret Sweep
//!
//! A diagnostic binary that runs the ellipsoid engine against a seeded
//! linear preference user for several drift exponents and reports the
//! resulting regret, margin, and cut traces. All output is numeric
//! (summary lines or JSON records); rendering is somebody else's job.
//!
//! Usage:
//! ```bash
//! cargo run --bin regret_sweep -- --dimension 5 --horizon 10000 --bootstrap 1000 --gammas 0.2,0.1,0.0
//! ```

use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use duel_cut::{
    run_simulation, AlgorithmRegistry, LinearPreferenceEnvironment, SimulationConfig,
    SimulationOutcome,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser)]
#[command(name = "regret_sweep")]
#[command(version, about = "Drift-exponent sweep for the ellipsoid-cut engine", long_about = None)]
struct Cli {
    /// Parameter-space dimension
    #[arg(long, default_value_t = 5)]
    dimension: usize,

    /// Total rounds per run (T)
    #[arg(long, default_value_t = 10_000)]
    horizon: u64,

    /// Warm-start rounds per run (T0)
    #[arg(long, default_value_t = 1_000)]
    bootstrap: u64,

    /// Confidence parameter delta
    #[arg(long, default_value_t = 0.2)]
    delta: f64,

    /// Cut decision sensitivity
    #[arg(long, default_value_t = 1.0)]
    cut_sensitivity: f64,

    /// Drift exponents to sweep, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.2, 0.1, 0.0])]
    gammas: Vec<f64>,

    /// Registered algorithm to run
    #[arg(long, default_value = "ellipsoid-interleaved")]
    algorithm: String,

    /// Seed for the drift schedules and the hidden target
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Emit one JSON record per run instead of summary lines
    #[arg(long)]
    json: bool,
}

/// One sweep entry, serialized in `--json` mode.
#[derive(Serialize)]
struct SweepRecord {
    gamma: f64,
    algorithm: String,
    total_regret: f64,
    cuts: usize,
    outcome: SimulationOutcome,
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let registry = AlgorithmRegistry::default();
    if !registry.contains(&cli.algorithm) {
        eprintln!(
            "unknown algorithm '{}'; registered: {:?}",
            cli.algorithm,
            registry.names()
        );
        std::process::exit(1);
    }

    // Shared adversarial sign sequences so the gamma curves stay
    // comparable: the second side occasionally flips against the first.
    let mut rng = SmallRng::seed_from_u64(cli.seed);
    let signs_left: Vec<f64> = (0..cli.horizon)
        .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
        .collect();
    let signs_right: Vec<f64> = signs_left
        .iter()
        .map(|s| s * if rng.gen_bool(0.2) { -1.0 } else { 1.0 })
        .collect();

    let mut env =
        LinearPreferenceEnvironment::with_seed(cli.dimension, 1.0, 0.0, cli.seed.wrapping_add(1));

    for &gamma in &cli.gammas {
        env.reset();
        env.set_gamma(gamma);
        env.set_drift(
            drift_schedule(&signs_left, gamma),
            drift_schedule(&signs_right, gamma),
        );

        let (mut engine, mode) = match registry.create(
            &cli.algorithm,
            cli.dimension,
            cli.delta,
            Some(cli.seed),
        ) {
            Ok(built) => built,
            Err(err) => {
                warn!(%err, gamma, "engine construction failed, skipping run");
                continue;
            }
        };
        let config = SimulationConfig {
            horizon: cli.horizon,
            bootstrap_rounds: cli.bootstrap,
            delta: cli.delta,
            cut_sensitivity: cli.cut_sensitivity,
            mode,
        };

        match run_simulation(&mut engine, &mut env, &config) {
            Ok(outcome) => {
                info!(
                    gamma,
                    cuts = outcome.cut_count(),
                    total_regret = outcome.total_regret(),
                    "run finished"
                );
                if cli.json {
                    let record = SweepRecord {
                        gamma,
                        algorithm: cli.algorithm.clone(),
                        total_regret: outcome.total_regret(),
                        cuts: outcome.cut_count(),
                        outcome,
                    };
                    match serde_json::to_string(&record) {
                        Ok(line) => println!("{line}"),
                        Err(err) => warn!(%err, "failed to serialize sweep record"),
                    }
                } else {
                    println!(
                        "gamma={gamma:>5.2} cuts={:>6} total_regret={:>12.3}",
                        outcome.cut_count(),
                        outcome.total_regret()
                    );
                }
            }
            // A degenerate run aborts, the sweep continues.
            Err(err) => warn!(%err, gamma, "run failed"),
        }
    }
}

/// Per-round additive drift `t^gamma * sign(t)` for rounds 1..=T.
fn drift_schedule(signs: &[f64], gamma: f64) -> Vec<f64> {
    signs
        .iter()
        .enumerate()
        .map(|(i, sign)| ((i + 1) as f64).powf(gamma) * sign)
        .collect()
}
