//! Standard Feature Scaler
//!
//! Applies the per-feature mean and scale learned at training time:
//! `z = (x - mean) / scale`. Statistics are loaded once and never updated.

use crate::error::ScalerError;
use feature_engine::{ArtifactCategories, LabelTables, FEATURE_DIMENSION, FEATURE_NAMES};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Serialized scaler statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    /// Column names the scaler was fit on
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Label tables used when the training data was encoded
    #[serde(default)]
    pub categories: Option<ArtifactCategories>,
}

/// Standard scaler with fixed statistics
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Create a scaler from raw statistics.
    ///
    /// Zero scale entries (constant training columns) are replaced by 1.0.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScalerError> {
        for (name, values) in [("mean", &mean), ("scale", &scale)] {
            if values.len() != FEATURE_DIMENSION {
                return Err(ScalerError::ShapeMismatch {
                    expected: FEATURE_DIMENSION,
                    actual: values.len(),
                });
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ScalerError::InvalidArtifact(format!(
                    "{name} contains non-finite values"
                )));
            }
        }
        if scale.iter().any(|s| *s < 0.0) {
            return Err(ScalerError::InvalidArtifact(
                "scale contains negative values".to_string(),
            ));
        }

        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self {
            mean: Array1::from_vec(mean),
            scale: Array1::from_vec(scale),
        })
    }

    /// Scaler that leaves features unchanged
    pub fn identity() -> Self {
        Self {
            mean: Array1::zeros(FEATURE_DIMENSION),
            scale: Array1::ones(FEATURE_DIMENSION),
        }
    }

    /// Build from a deserialized artifact, checking its metadata
    pub fn from_artifact(artifact: ScalerArtifact) -> Result<Self, ScalerError> {
        if let Some(names) = &artifact.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(ScalerError::InvalidArtifact(format!(
                    "feature names {names:?} do not match {FEATURE_NAMES:?}"
                )));
            }
        }
        if let Some(categories) = &artifact.categories {
            LabelTables::validate_against(categories)?;
        }
        Self::new(artifact.mean, artifact.scale)
    }

    /// Parse a JSON artifact
    pub fn from_json_str(json: &str) -> Result<Self, ScalerError> {
        let artifact: ScalerArtifact = serde_json::from_str(json)
            .map_err(|e| ScalerError::InvalidArtifact(e.to_string()))?;
        Self::from_artifact(artifact)
    }

    /// Load a JSON artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScalerError> {
        let path = path.as_ref();
        info!("Loading scaler from {}", path.display());

        let json = std::fs::read_to_string(path).map_err(|source| ScalerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Normalize each row
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        self.check_width(x)?;
        let scaled = (x - &self.mean) / &self.scale;
        debug!("Scaled {} row(s)", scaled.nrows());
        Ok(scaled)
    }

    /// Undo `transform`
    pub fn inverse_transform(&self, z: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        self.check_width(z)?;
        Ok(z * &self.scale + &self.mean)
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<(), ScalerError> {
        if x.ncols() != FEATURE_DIMENSION {
            return Err(ScalerError::ShapeMismatch {
                expected: FEATURE_DIMENSION,
                actual: x.ncols(),
            });
        }
        Ok(())
    }
}
