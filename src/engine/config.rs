//! Simulation run configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// Which warm-start strategy a simulation run uses.
///
/// The two modes use different regret bookkeeping on rejected cuts and are
/// deliberately kept as independent strategies rather than merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Run `bootstrap_rounds` preliminary rounds proposing the standard
    /// basis vectors cyclically before the main loop starts.
    BootstrapFirst,
    /// No preliminary block; while the round counter is below
    /// `bootstrap_rounds`, a rejected cut triggers secondary exploration
    /// along the environment's minimum-uncertainty eigenvector.
    Interleaved,
}

/// Configuration for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Total planned rounds (T).
    pub horizon: u64,
    /// Warm-start rounds (T0). In bootstrap-first mode these run before
    /// the main loop; in interleaved mode they bound the secondary
    /// exploration window.
    pub bootstrap_rounds: u64,
    /// Confidence parameter delta in (0, 1).
    pub delta: f64,
    /// Cut decision sensitivity; a cut is accepted when the margin exceeds
    /// `-cut_sensitivity / dimension`. Smaller is more conservative.
    pub cut_sensitivity: f64,
    /// Warm-start strategy.
    pub mode: SimulationMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 1000,
            bootstrap_rounds: 100,
            delta: 0.1,
            cut_sensitivity: 1.0,
            mode: SimulationMode::BootstrapFirst,
        }
    }
}

impl SimulationConfig {
    /// Validate parameter ranges before a run.
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(EngineError::config("horizon must be positive"));
        }
        if self.bootstrap_rounds > self.horizon {
            return Err(EngineError::config(format!(
                "bootstrap rounds ({}) exceed the horizon ({})",
                self.bootstrap_rounds, self.horizon
            )));
        }
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(EngineError::config(format!(
                "confidence parameter delta must lie in (0, 1), got {}",
                self.delta
            )));
        }
        if !(self.cut_sensitivity > 0.0) || !self.cut_sensitivity.is_finite() {
            return Err(EngineError::config(format!(
                "cut sensitivity must be positive and finite, got {}",
                self.cut_sensitivity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bootstrap_exceeding_horizon_rejected() {
        let config = SimulationConfig {
            horizon: 100,
            bootstrap_rounds: 101,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            EngineError::Config(_)
        ));
    }

    #[test]
    fn test_delta_bounds_enforced() {
        for delta in [0.0, 1.0, -0.3, 2.0] {
            let config = SimulationConfig {
                delta,
                ..SimulationConfig::default()
            };
            assert!(config.validate().is_err(), "delta {delta} should fail");
        }
    }

    #[test]
    fn test_cut_sensitivity_must_be_positive() {
        let config = SimulationConfig {
            cut_sensitivity: 0.0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = SimulationConfig {
            horizon: 500,
            bootstrap_rounds: 50,
            delta: 0.05,
            cut_sensitivity: 0.8,
            mode: SimulationMode::Interleaved,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mode, SimulationMode::Interleaved);
        assert_eq!(back.horizon, 500);
        assert!((back.delta - 0.05).abs() < 1e-15);
    }
}
