//! Simulation infrastructure.
//!
//! One simulation run drives the ellipsoid engine against a preference
//! environment for a fixed round budget and returns three traces: regret
//! per round, cut margin per proposal, and the indices of accepted cuts.
//!
//! ```text
//! Region.shape → DirectionSelector → candidate pair → ConfidenceTest
//!        ↑                                                 ↓
//!   CutUpdater ← accepted ← environment preference ← margin decision
//! ```
//!
//! Independent runs are embarrassingly parallel as long as each owns its
//! engine and environment; the traces returned here never alias engine
//! state.

mod outcome;
mod runner;

pub use outcome::SimulationOutcome;
pub use runner::run_simulation;
