use thiserror::Error;

/// Rejected simulation setup. Raised only while building a [`crate::System`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a system needs at least one body")]
    EmptySystem,

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("mass parameter must be positive and finite, got {0}")]
    InvalidMassParameter(f64),

    #[error("damping factor must be non-negative and finite, got {0}")]
    InvalidDamping(f64),

    #[error("invalid initial distribution: {0}")]
    InvalidDistribution(String),

    #[error("distribution provides {actual} states but {expected} bodies were requested")]
    CountMismatch { expected: usize, actual: usize },

    #[error("failed to parse simulation config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
