//! Trip Fuel Routes

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use feature_engine::RawDescriptor;
use inference_engine::round2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use trip_estimator::{ResolvedLocation, TripFuelConvention};

use crate::error::ApiError;
use crate::routes::predictions::PredictionResponse;
use crate::AppState;

/// Trip request: a vehicle and two locations ("lat, lon" or place names)
#[derive(Debug, Deserialize)]
pub struct TripRequest {
    pub vehicle: RawDescriptor,
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub prediction: PredictionResponse,
    pub origin: ResolvedLocation,
    pub destination: ResolvedLocation,
    /// Kilometres, 2 decimals
    pub distance_km: f64,
    /// Litres, 2 decimals
    pub fuel_litres: f64,
    pub fuel_convention: TripFuelConvention,
}

/// Predict consumption, then estimate fuel for the trip.
///
/// The rounded prediction is the rate used for the trip total.
pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<TripResponse>, ApiError> {
    let Json(request) = payload?;
    let outcome = state.predict(request.vehicle)?;
    let trip = state
        .plan_trip(
            outcome.consumption_l_per_100km,
            &request.origin,
            &request.destination,
        )
        .await?;

    Ok(Json(TripResponse {
        prediction: outcome.into(),
        origin: trip.origin,
        destination: trip.destination,
        distance_km: round2(trip.estimate.distance_km),
        fuel_litres: round2(trip.estimate.fuel_litres),
        fuel_convention: trip.estimate.convention,
    }))
}
