use thiserror::Error;

/// Errors surfaced by the ellipsoid engine.
///
/// All variants are fatal to the current simulation run: they indicate
/// misconfiguration or a numerically degenerate region that cannot be
/// progressed safely. Callers running parameter sweeps should catch
/// failures per run and continue with other settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Region dimension below the minimum the update formulas support.
    #[error("region dimension must be at least 2, got {dimension}")]
    Dimension { dimension: usize },

    /// Shape or uncertainty matrix degenerate, or eigen-decomposition
    /// failed to converge.
    #[error("numerical degeneracy: {0}")]
    Numerical(String),

    /// A margin accepted for a cut fell outside (-1, 1), which would make
    /// the shape rescale factor non-positive.
    #[error("cut margin {alpha} outside the valid range (-1, 1)")]
    InvalidCut { alpha: f64 },

    /// Invalid simulation or region configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Algorithm name not present in the registry.
    #[error("unknown algorithm: {name}")]
    UnknownAlgorithm { name: String },
}

// Convenience constructors for common error patterns
impl EngineError {
    /// Create a numerical degeneracy error.
    pub fn numerical(msg: impl Into<String>) -> Self {
        EngineError::Numerical(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        EngineError::Config(msg.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EngineError>;
