//! API Error Responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use feature_engine::EncodeError;
use inference_engine::InferenceError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use trip_estimator::{GeocodeError, TripError};

/// Errors surfaced to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Trip(#[from] TripError),
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    /// HTTP status and machine-readable kind
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Encode(_) | ApiError::Inference(InferenceError::Encode(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_label")
            }
            ApiError::Inference(InferenceError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input")
            }
            ApiError::Inference(_) => (StatusCode::INTERNAL_SERVER_ERROR, "inference_failed"),
            ApiError::Trip(TripError::InvalidCoordinate { .. } | TripError::OutOfRange { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_location")
            }
            ApiError::Trip(TripError::InvalidRate(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "inference_failed")
            }
            ApiError::Trip(TripError::Geocode(GeocodeError::NotFound(_))) => {
                (StatusCode::NOT_FOUND, "location_not_found")
            }
            ApiError::Trip(TripError::Geocode(GeocodeError::Timeout(_))) => {
                (StatusCode::GATEWAY_TIMEOUT, "geocoder_timeout")
            }
            ApiError::Trip(TripError::Geocode(_)) => {
                (StatusCode::BAD_GATEWAY, "geocoder_unavailable")
            }
            // 400 for bad JSON syntax, 415 without a JSON content type,
            // 422 for a well-formed body of the wrong shape
            ApiError::Body(rejection) => (rejection.status(), "invalid_body"),
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();
        if status.is_server_error() {
            error!("{}: {}", kind, self);
        } else {
            warn!("Rejected request ({}): {}", kind, self);
        }

        let body = ErrorBody {
            error: kind,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
