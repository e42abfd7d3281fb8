//! Explicit algorithm registry.
//!
//! Maps algorithm names to engine factories at startup so unknown names
//! fail fast with [`EngineError::UnknownAlgorithm`] instead of surfacing
//! as a late lookup failure inside a run.

use std::collections::HashMap;

use crate::errors::{EngineError, Result};

use super::config::SimulationMode;
use super::EllipsoidEngine;

/// Builds an engine from `(dimension, delta, seed)`.
pub type EngineFactory = Box<dyn Fn(usize, f64, Option<u64>) -> Result<EllipsoidEngine> + Send + Sync>;

struct AlgorithmEntry {
    mode: SimulationMode,
    factory: EngineFactory,
}

/// Name-to-factory map for engine construction.
pub struct AlgorithmRegistry {
    entries: HashMap<String, AlgorithmEntry>,
}

impl AlgorithmRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The built-in algorithms: the two loop strategies exposed under
    /// explicit names.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(
            "ellipsoid",
            SimulationMode::BootstrapFirst,
            Box::new(default_factory),
        );
        registry.register(
            "ellipsoid-interleaved",
            SimulationMode::Interleaved,
            Box::new(default_factory),
        );
        registry
    }

    /// Register an algorithm under `name`, replacing any previous entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        mode: SimulationMode,
        factory: EngineFactory,
    ) {
        self.entries
            .insert(name.into(), AlgorithmEntry { mode, factory });
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the named algorithm's engine and its simulation mode.
    pub fn create(
        &self,
        name: &str,
        dimension: usize,
        delta: f64,
        seed: Option<u64>,
    ) -> Result<(EllipsoidEngine, SimulationMode)> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| EngineError::UnknownAlgorithm {
                name: name.to_string(),
            })?;
        let engine = (entry.factory)(dimension, delta, seed)?;
        Ok((engine, entry.mode))
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_factory(dimension: usize, delta: f64, seed: Option<u64>) -> Result<EllipsoidEngine> {
    match seed {
        Some(seed) => EllipsoidEngine::with_seed(dimension, delta, seed),
        None => EllipsoidEngine::new(dimension, delta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_builds_both_modes() {
        let registry = AlgorithmRegistry::default();
        assert_eq!(registry.names(), vec!["ellipsoid", "ellipsoid-interleaved"]);

        let (engine, mode) = registry.create("ellipsoid", 3, 0.1, Some(1)).unwrap();
        assert_eq!(engine.dimension(), 3);
        assert_eq!(mode, SimulationMode::BootstrapFirst);

        let (_, mode) = registry
            .create("ellipsoid-interleaved", 3, 0.1, Some(1))
            .unwrap();
        assert_eq!(mode, SimulationMode::Interleaved);
    }

    #[test]
    fn test_unknown_name_fails_fast() {
        let registry = AlgorithmRegistry::default();
        let err = registry.create("neural-duel", 3, 0.1, None).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownAlgorithm {
                name: "neural-duel".to_string()
            }
        );
    }

    #[test]
    fn test_factory_errors_propagate() {
        let registry = AlgorithmRegistry::default();
        // Dimension 1 is rejected by the region constructor.
        let err = registry.create("ellipsoid", 1, 0.1, None).unwrap_err();
        assert_eq!(err, EngineError::Dimension { dimension: 1 });
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = AlgorithmRegistry::empty();
        assert!(!registry.contains("seeded"));
        registry.register(
            "seeded",
            SimulationMode::Interleaved,
            Box::new(|dimension, delta, _| EllipsoidEngine::with_seed(dimension, delta, 99)),
        );
        assert!(registry.contains("seeded"));
        let (engine, _) = registry.create("seeded", 2, 0.2, None).unwrap();
        assert_eq!(engine.dimension(), 2);
    }
}
