//! Error types.
//!
//! [`ConfigError`] is returned when an optimizer or parameter space is
//! constructed from invalid values. [`OptimizerError`] covers misuse of
//! the step protocol at run time.

/// Invalid construction parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be at least 1")]
    EmptySize { name: &'static str },

    #[error("parameter space must have at least one dimension")]
    NoDimensions,

    #[error("InvalidBounds: minimum must be smaller than maximum. name={name}, min={min}, max={max}")]
    InvalidBounds { name: String, min: f64, max: f64 },

    #[error("{name} must lie in [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },

    #[error("local_search_radius must be non-negative and finite, got {0}")]
    NegativeRadius(f64),

    #[error("convergence_threshold must be positive and finite, got {0}")]
    InvalidThreshold(f64),

    #[error("max_generations must be at least 1")]
    ZeroGenerations,

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("DimensionMismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Caller errors raised while stepping an optimizer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimizerError {
    #[error("reported fitness is NaN, which marks an unevaluated agent")]
    UnevaluatedFitness,

    #[error("agent {index} has not been evaluated in the current generation")]
    Unevaluated { index: usize },

    #[error("agent index {index} out of range for size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("start_evolving must be called before the first evaluation")]
    NotStarted,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
