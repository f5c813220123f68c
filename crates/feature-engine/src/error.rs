//! Encoding Error Types

use thiserror::Error;

/// Errors while turning a vehicle description into a feature vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Label is not a member of the field's table
    #[error("Unknown {field} label: {label:?}")]
    UnknownLabel { field: &'static str, label: String },

    /// A categorical field received a number
    #[error("{field} expects a label, got number {value}")]
    UnexpectedNumber { field: &'static str, value: f64 },

    /// A numeric field received a label
    #[error("{field} expects a number, got label {label:?}")]
    UnexpectedLabel { field: &'static str, label: String },

    /// Input ended before the field was reached
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Encoded vector does not have the trained width
    #[error("Feature vector shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Artifact declares categories for a field the encoder does not know
    #[error("Artifact declares categories for unknown field: {0}")]
    UnknownCategoryField(String),

    /// Artifact label table differs from the built-in one
    #[error("Category table for {field}: expected {expected:?}, artifact has {actual:?}")]
    CategoryMismatch {
        field: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
}
