//! Error taxonomy for culture protocol evaluation and composition.
//!
//! Validation failures are raised before any computation begins, so a
//! returned error never comes with a partial result.

use thiserror::Error;

/// Errors raised by the composer, the session registry and configuration.
#[derive(Debug, Error)]
pub enum CultureError {
    /// The protocol list and weight list differ in length.
    #[error("Arity mismatch: {protocols} protocols but {weights} weights")]
    ArityMismatch { protocols: usize, weights: usize },

    /// Fewer than two protocols were supplied to a blend.
    #[error("Insufficient inputs: at least 2 protocols are required, got {got}")]
    InsufficientInputs { got: usize },

    /// Weights are negative, non-finite, or do not sum to a positive value.
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// A strategy name could not be resolved.
    #[error("Unsupported strategy: {0}")]
    UnsupportedStrategy(String),

    /// Lookup against an unregistered identifier.
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// Amplification intensity must be finite and non-negative.
    #[error("Invalid intensity: {0}")]
    InvalidIntensity(f64),

    /// A meme mutation would exceed the allowed tree depth.
    #[error("Meme mutation tree deeper than {max} levels")]
    MutationDepthExceeded { max: usize },

    /// A mutation path that does not lead to an existing meme.
    #[error("Unknown mutation path: {0:?}")]
    UnknownMutation(Vec<usize>),

    /// Malformed configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CultureError>;
