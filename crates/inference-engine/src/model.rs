//! Regression Models

use crate::onnx::OnnxRegressor;
use crate::InferenceError;
use feature_engine::{ArtifactCategories, LabelTables, FEATURE_DIMENSION};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A fitted model mapping one scaled feature row to a scalar
pub trait Regressor: Send + Sync {
    /// Short description for logs and health output
    fn name(&self) -> &str;

    /// Predict from a (1, FEATURE_DIMENSION) matrix
    fn predict(&self, scaled: &Array2<f64>) -> Result<f64, InferenceError>;
}

/// Check the single-row input contract shared by all models
pub(crate) fn single_row(scaled: &Array2<f64>) -> Result<ArrayView1<'_, f64>, InferenceError> {
    if scaled.nrows() != 1 || scaled.ncols() != FEATURE_DIMENSION {
        return Err(InferenceError::InvalidInputShape {
            expected: format!("(1, {FEATURE_DIMENSION})"),
            actual: format!("({}, {})", scaled.nrows(), scaled.ncols()),
        });
    }
    Ok(scaled.row(0))
}

/// SVR kernel function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    Rbf,
    Poly,
    Sigmoid,
}

/// Support vector regressor: `sum_i dual_coef[i] * K(sv_i, x) + intercept`
#[derive(Debug, Clone)]
pub struct SvrModel {
    kernel: Kernel,
    gamma: f64,
    coef0: f64,
    degree: i32,
    support_vectors: Array2<f64>,
    dual_coef: Array1<f64>,
    intercept: f64,
}

impl SvrModel {
    pub fn new(
        kernel: Kernel,
        gamma: f64,
        coef0: f64,
        degree: i32,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, InferenceError> {
        if kernel != Kernel::Linear && !(gamma.is_finite() && gamma > 0.0) {
            return Err(InferenceError::ModelLoadError(format!(
                "SVR {kernel:?} kernel needs gamma > 0, got {gamma}"
            )));
        }
        if support_vectors.is_empty() {
            return Err(InferenceError::ModelLoadError(
                "SVR has no support vectors".to_string(),
            ));
        }
        if support_vectors.len() != dual_coef.len() {
            return Err(InferenceError::ModelLoadError(format!(
                "SVR has {} support vectors but {} dual coefficients",
                support_vectors.len(),
                dual_coef.len()
            )));
        }
        if let Some(bad) = support_vectors.iter().find(|sv| sv.len() != FEATURE_DIMENSION) {
            return Err(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION.to_string(),
                actual: bad.len().to_string(),
            });
        }

        let rows = support_vectors.len();
        let flat: Vec<f64> = support_vectors.into_iter().flatten().collect();
        let support_vectors = Array2::from_shape_vec((rows, FEATURE_DIMENSION), flat)
            .map_err(|e| InferenceError::ModelLoadError(e.to_string()))?;

        Ok(Self {
            kernel,
            gamma,
            coef0,
            degree,
            support_vectors,
            dual_coef: Array1::from_vec(dual_coef),
            intercept,
        })
    }

    pub fn support_vector_count(&self) -> usize {
        self.support_vectors.nrows()
    }

    fn kernel(&self, sv: ArrayView1<'_, f64>, x: ArrayView1<'_, f64>) -> f64 {
        match self.kernel {
            Kernel::Linear => sv.dot(&x),
            Kernel::Rbf => {
                let dist_sq: f64 = sv.iter().zip(x.iter()).map(|(a, b)| (a - b).powi(2)).sum();
                (-self.gamma * dist_sq).exp()
            }
            Kernel::Poly => (self.gamma * sv.dot(&x) + self.coef0).powi(self.degree),
            Kernel::Sigmoid => (self.gamma * sv.dot(&x) + self.coef0).tanh(),
        }
    }
}

impl Regressor for SvrModel {
    fn name(&self) -> &str {
        "svr"
    }

    fn predict(&self, scaled: &Array2<f64>) -> Result<f64, InferenceError> {
        let x = single_row(scaled)?;
        let sum: f64 = self
            .support_vectors
            .rows()
            .into_iter()
            .zip(self.dual_coef.iter())
            .map(|(sv, coef)| coef * self.kernel(sv, x))
            .sum();
        Ok(sum + self.intercept)
    }
}

/// Linear regressor: `coef . x + intercept`
#[derive(Debug, Clone)]
pub struct LinearModel {
    coef: Array1<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Result<Self, InferenceError> {
        if coef.len() != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION.to_string(),
                actual: coef.len().to_string(),
            });
        }
        Ok(Self {
            coef: Array1::from_vec(coef),
            intercept,
        })
    }
}

impl Regressor for LinearModel {
    fn name(&self) -> &str {
        "linear"
    }

    fn predict(&self, scaled: &Array2<f64>) -> Result<f64, InferenceError> {
        let x = single_row(scaled)?;
        Ok(self.coef.dot(&x) + self.intercept)
    }
}

fn default_degree() -> i32 {
    3
}

/// JSON model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelArtifact {
    Svr {
        kernel: Kernel,
        /// Required unless the kernel is linear
        #[serde(default)]
        gamma: Option<f64>,
        #[serde(default)]
        coef0: f64,
        #[serde(default = "default_degree")]
        degree: i32,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
        #[serde(default)]
        categories: Option<ArtifactCategories>,
    },
    Linear {
        coef: Vec<f64>,
        intercept: f64,
        #[serde(default)]
        categories: Option<ArtifactCategories>,
    },
}

impl ModelArtifact {
    /// Parse a JSON artifact
    pub fn from_json_str(json: &str) -> Result<Self, InferenceError> {
        serde_json::from_str(json).map_err(|e| InferenceError::ModelLoadError(e.to_string()))
    }

    /// Validate and build the model
    pub fn into_regressor(self) -> Result<Box<dyn Regressor>, InferenceError> {
        match self {
            ModelArtifact::Svr {
                kernel,
                gamma,
                coef0,
                degree,
                support_vectors,
                dual_coef,
                intercept,
                categories,
            } => {
                check_categories(categories.as_ref())?;
                let gamma = match (kernel, gamma) {
                    (_, Some(gamma)) => gamma,
                    (Kernel::Linear, None) => 0.0,
                    (_, None) => {
                        return Err(InferenceError::ModelLoadError(format!(
                            "SVR artifact with {kernel:?} kernel has no gamma"
                        )));
                    }
                };
                let model = SvrModel::new(
                    kernel,
                    gamma,
                    coef0,
                    degree,
                    support_vectors,
                    dual_coef,
                    intercept,
                )?;
                info!(
                    "Loaded SVR model: kernel={:?}, support_vectors={}",
                    kernel,
                    model.support_vector_count()
                );
                Ok(Box::new(model))
            }
            ModelArtifact::Linear {
                coef,
                intercept,
                categories,
            } => {
                check_categories(categories.as_ref())?;
                info!("Loaded linear model");
                Ok(Box::new(LinearModel::new(coef, intercept)?))
            }
        }
    }
}

fn check_categories(categories: Option<&ArtifactCategories>) -> Result<(), InferenceError> {
    if let Some(categories) = categories {
        LabelTables::validate_against(categories)?;
    }
    Ok(())
}

/// Load a model artifact, choosing the back-end by file extension
pub fn load_model(path: impl AsRef<Path>) -> Result<Box<dyn Regressor>, InferenceError> {
    let path = path.as_ref();
    info!("Loading model from {}", path.display());

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("onnx") => Ok(Box::new(OnnxRegressor::load(path)?)),
        Some("json") => {
            let json = std::fs::read_to_string(path).map_err(|e| {
                InferenceError::ModelLoadError(format!("{}: {e}", path.display()))
            })?;
            ModelArtifact::from_json_str(&json)?.into_regressor()
        }
        other => Err(InferenceError::ModelLoadError(format!(
            "Unsupported model format {:?} for {}",
            other,
            path.display()
        ))),
    }
}
