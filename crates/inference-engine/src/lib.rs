//! Fuel Consumption Inference Engine
//!
//! Loads the fitted regression model and runs the encode, scale, predict
//! pipeline. ONNX models run on tract; SVR and linear models load from JSON.

mod engine;
mod model;
mod onnx;

pub use engine::{round2, PredictionOutcome, Predictor};
pub use model::{load_model, Kernel, LinearModel, ModelArtifact, Regressor, SvrModel};
pub use onnx::OnnxRegressor;

use data_validator::{ScalerError, ValidationError};
use feature_engine::EncodeError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("Scaling failed: {0}")]
    Scaler(#[from] ScalerError),
}
