#![deny(unreachable_pub)]

//! Ellipsoid-cut dueling bandit engine.
//!
//! Maintains a shrinking ellipsoidal confidence region over a
//! d-dimensional parameter space and proposes mirrored candidate pairs
//! for pairwise preference comparison against an unknown target
//! direction. Each round a statistical test decides whether the evidence
//! licenses a geometric cut of the region; accepted cuts apply the
//! deep-cut ellipsoid update, rejected rounds recommend the current
//! center. Cumulative regret against the hidden target is traced
//! throughout.

// Core modules
mod errors;
mod linalg;

// Feature modules
pub mod engine;
pub mod environment;
pub mod simulation;

#[cfg(test)]
mod tests;

// Re-exports
pub use engine::{
    accepts_cut, apply_cut, cut_margin, AlgorithmRegistry, DirectionSelector, EllipsoidEngine,
    EngineFactory, Proposal, Region, SimulationConfig, SimulationMode,
};
pub use environment::{
    LinearPreferenceEnvironment, PreferenceEnvironment, PreferenceOutcome, ScriptedEnvironment,
};
pub use errors::{EngineError, Result};
pub use simulation::{run_simulation, SimulationOutcome};
