//! Fuel Consumption Prediction Pipeline

use crate::model::{load_model, Regressor};
use crate::InferenceError;
use data_validator::{StandardScaler, Validator};
use feature_engine::{FeatureEncoder, FeatureVector, VehicleDescriptor};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Round to two decimal places for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Result of one prediction
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    /// Predicted consumption (L/100km), rounded to 2 decimals
    pub consumption_l_per_100km: f64,
    /// Unrounded model output
    pub raw_output: f64,
    /// Encoded features before scaling
    pub features: FeatureVector,
    /// Features after scaling
    pub scaled_features: Vec<f64>,
    /// Model that produced the value
    pub model: String,
    /// Pipeline latency in microseconds
    pub latency_us: u64,
}

/// Encoder, scaler and model loaded once and shared read-only
pub struct Predictor {
    validator: Validator,
    encoder: FeatureEncoder,
    scaler: StandardScaler,
    model: Box<dyn Regressor>,
}

impl Predictor {
    /// Assemble a predictor from already-loaded parts
    pub fn new(scaler: StandardScaler, model: Box<dyn Regressor>) -> Self {
        Self {
            validator: Validator::default(),
            encoder: FeatureEncoder::new(),
            scaler,
            model,
        }
    }

    /// Load model and scaler artifacts from disk
    pub fn load(
        model_path: impl AsRef<Path>,
        scaler_path: impl AsRef<Path>,
    ) -> Result<Self, InferenceError> {
        let scaler = StandardScaler::load(scaler_path)?;
        let model = load_model(model_path)?;
        info!("Predictor ready with model {}", model.name());
        Ok(Self::new(scaler, model))
    }

    /// Replace the input range validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate, encode, scale and predict
    pub fn predict(
        &self,
        descriptor: &VehicleDescriptor,
    ) -> Result<PredictionOutcome, InferenceError> {
        let start = Instant::now();

        self.validator.validate_descriptor(descriptor).into_result()?;
        let features = self.encoder.encode(descriptor)?;
        let scaled = self.scaler.transform(&features.to_row_matrix())?;
        let raw_output = self.model.predict(&scaled)?;

        if !raw_output.is_finite() {
            return Err(InferenceError::InferenceFailed(format!(
                "model returned non-finite value {raw_output}"
            )));
        }

        let latency_us = start.elapsed().as_micros() as u64;
        debug!("Prediction {:.4} in {}us", raw_output, latency_us);

        Ok(PredictionOutcome {
            consumption_l_per_100km: round2(raw_output),
            raw_output,
            features,
            scaled_features: scaled.iter().copied().collect(),
            model: self.model.name().to_string(),
            latency_us,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearModel;
    use data_validator::ValidationError;
    use feature_engine::{FuelType, Transmission, VehicleClass};
    use ndarray::Array2;

    struct NanModel;

    impl Regressor for NanModel {
        fn name(&self) -> &str {
            "nan"
        }

        fn predict(&self, _scaled: &Array2<f64>) -> Result<f64, InferenceError> {
            Ok(f64::NAN)
        }
    }

    fn compact() -> VehicleDescriptor {
        VehicleDescriptor {
            vehicle_class: VehicleClass::Compact,
            engine_size: 2.0,
            cylinders: 4,
            transmission: Transmission::Automatic,
            co2_rating: 3.5,
            fuel_type: FuelType::RegularGasoline,
        }
    }

    fn sum_predictor() -> Predictor {
        let model = LinearModel::new(vec![1.0; 9], 0.123).unwrap();
        Predictor::new(StandardScaler::identity(), Box::new(model))
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(8.456), 8.46);
        assert_eq!(round2(8.454), 8.45);
        assert_eq!(round2(-1.005e-3), 0.0);
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let outcome = sum_predictor().predict(&compact()).unwrap();

        // 2 + 2 + 4 + 4 + 3.5 + 1 + 0.123
        assert!((outcome.raw_output - 16.623).abs() < 1e-9);
        assert_eq!(outcome.consumption_l_per_100km, 16.62);
        assert_eq!(outcome.features.values()[7], 1.0);
        assert_eq!(outcome.scaled_features.len(), 9);
        assert_eq!(outcome.model, "linear");
    }

    #[test]
    fn test_pipeline_applies_scaler() {
        let scaler = StandardScaler::new(vec![1.0; 9], vec![2.0; 9]).unwrap();
        let model = LinearModel::new(vec![1.0; 9], 0.0).unwrap();
        let predictor = Predictor::new(scaler, Box::new(model));

        let outcome = predictor.predict(&compact()).unwrap();
        // (16.5 - 9) / 2
        assert!((outcome.raw_output - 3.75).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_input_is_rejected() {
        let descriptor = VehicleDescriptor {
            co2_rating: 11.0,
            ..compact()
        };

        assert!(matches!(
            sum_predictor().predict(&descriptor),
            Err(InferenceError::Validation(ValidationError::OutOfRange { field: "co2_rating", .. }))
        ));
    }

    #[test]
    fn test_non_finite_output_is_an_error() {
        let predictor = Predictor::new(StandardScaler::identity(), Box::new(NanModel));
        assert!(matches!(
            predictor.predict(&compact()),
            Err(InferenceError::InferenceFailed(_))
        ));
    }

    #[test]
    fn test_load_missing_artifacts() {
        assert!(Predictor::load("/nonexistent/model.json", "/nonexistent/scaler.json").is_err());
    }
}
