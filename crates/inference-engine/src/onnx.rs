//! ONNX Regressor using tract

use crate::model::{single_row, Regressor};
use crate::InferenceError;
use feature_engine::FEATURE_DIMENSION;
use ndarray::Array2;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info};

/// Regression model exported to ONNX, input f32 (1, FEATURE_DIMENSION)
pub struct OnnxRegressor {
    plan: TypedRunnableModel<TypedModel>,
    name: String,
}

impl OnnxRegressor {
    /// Load and optimize the model
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let load_err = |e: TractError| {
            InferenceError::ModelLoadError(format!("{}: {e}", path.display()))
        };

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(load_err)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| format!("onnx:{s}"))
            .unwrap_or_else(|| "onnx".to_string());

        info!("ONNX model loaded: {}", name);
        Ok(Self { plan, name })
    }
}

impl Regressor for OnnxRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, scaled: &Array2<f64>) -> Result<f64, InferenceError> {
        let row: Vec<f32> = single_row(scaled)?.iter().map(|v| *v as f32).collect();
        let failed = |e: TractError| InferenceError::InferenceFailed(e.to_string());

        let input = Tensor::from_shape(&[1, FEATURE_DIMENSION], &row).map_err(failed)?;
        let outputs = self.plan.run(tvec!(input.into())).map_err(failed)?;

        let output = outputs.first().ok_or_else(|| {
            InferenceError::InferenceFailed("model produced no outputs".to_string())
        })?;
        let output = output.cast_to::<f32>().map_err(failed)?;
        let value = output
            .as_slice::<f32>()
            .map_err(failed)?
            .first()
            .copied()
            .ok_or_else(|| InferenceError::InferenceFailed("empty model output".to_string()))?;

        debug!("ONNX output: {}", value);
        Ok(value as f64)
    }
}
