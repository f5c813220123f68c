//! Form Option Routes

use axum::{extract::State, Json};
use data_validator::ValidationConfig;
use feature_engine::{FUEL_TYPE_LABELS, TRANSMISSION_LABELS, VEHICLE_CLASS_LABELS};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Accepted labels and numeric ranges
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub vehicle_class: &'static [&'static str],
    pub transmission: &'static [&'static str],
    pub fuel_type: &'static [&'static str],
    pub ranges: ValidationConfig,
}

/// List the values a client form should offer
pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        vehicle_class: &VEHICLE_CLASS_LABELS,
        transmission: &TRANSMISSION_LABELS,
        fuel_type: &FUEL_TYPE_LABELS,
        ranges: state.predictor.validator().config().clone(),
    })
}
