//! Prediction Routes

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use feature_engine::{RawDescriptor, FEATURE_DIMENSION};
use inference_engine::PredictionOutcome;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Response for predictions endpoint
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    /// Predicted consumption, 2 decimals
    pub consumption: f64,
    pub unit: &'static str,
    /// Encoded feature vector sent to the scaler
    pub features: [f64; FEATURE_DIMENSION],
    pub model: String,
    pub predicted_at: DateTime<Utc>,
}

impl From<PredictionOutcome> for PredictionResponse {
    fn from(outcome: PredictionOutcome) -> Self {
        Self {
            consumption: outcome.consumption_l_per_100km,
            unit: "L/100km",
            features: *outcome.features.values(),
            model: outcome.model,
            predicted_at: Utc::now(),
        }
    }
}

/// Predict fuel consumption for one vehicle
pub async fn create_prediction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawDescriptor>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(vehicle) = payload?;
    let outcome = state.predict(vehicle)?;
    Ok(Json(outcome.into()))
}
