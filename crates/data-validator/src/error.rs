//! Validation Error Types

use feature_engine::EncodeError;
use thiserror::Error;

/// Errors during input validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinite input
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

/// Errors while loading or applying the feature scaler
#[derive(Debug, Error)]
pub enum ScalerError {
    #[error("Failed to read scaler artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scaler artifact: {0}")]
    InvalidArtifact(String),

    #[error("Scaler expects {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Scaler categories rejected: {0}")]
    Categories(#[from] EncodeError),
}
