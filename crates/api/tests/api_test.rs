//! Router-level tests with an in-memory model and a stub geocoder

use api::{create_router, init_logging, AppState, LoggingConfig};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use data_validator::StandardScaler;
use inference_engine::{LinearModel, Predictor};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use trip_estimator::{
    Coordinate, GeocodeError, Geocoder, LocationResolver, TripFuelConvention, TripPlanner,
};

struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        match query {
            "San Francisco" => Coordinate::new(37.7749, -122.4194)
                .map_err(|e| GeocodeError::InvalidResponse(e.to_string())),
            "Los Angeles" => Coordinate::new(34.0522, -118.2437)
                .map_err(|e| GeocodeError::InvalidResponse(e.to_string())),
            "Slowtown" => Err(GeocodeError::Timeout(5000)),
            other => Err(GeocodeError::NotFound(other.to_string())),
        }
    }
}

/// Model output = 0.5 * co2_rating + 5, so a rating of 3.5 predicts 6.75
fn app(convention: TripFuelConvention) -> Router {
    let mut coef = vec![0.0; 9];
    coef[4] = 0.5;
    let model = LinearModel::new(coef, 5.0).unwrap();
    let predictor = Predictor::new(StandardScaler::identity(), Box::new(model));
    let planner = TripPlanner::new(
        LocationResolver::with_geocoder(Arc::new(StubGeocoder)),
        convention,
    );
    create_router(Arc::new(AppState::new(predictor, planner)))
}

fn compact() -> Value {
    json!({
        "vehicle_class": "Compact",
        "engine_size": 2.0,
        "cylinders": 4,
        "transmission": "A",
        "co2_rating": 3.5,
        "fuel_type": "X"
    })
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let router = app(TripFuelConvention::Per100Km);
    let (status, body) = send(router, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "linear");
    assert_eq!(body["geocoder_enabled"], true);
    assert_eq!(body["fuel_convention"], "per_100km");
}

#[tokio::test]
async fn test_options_lists_label_tables() {
    let router = app(TripFuelConvention::Per100Km);
    let (status, body) = send(router, "GET", "/api/v1/options", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicle_class"].as_array().unwrap().len(), 14);
    assert_eq!(body["vehicle_class"][2], "Compact");
    assert_eq!(body["transmission"], json!(["AV", "AM", "M", "AS", "A"]));
    assert_eq!(body["fuel_type"], json!(["D", "E", "X", "Z"]));
}

#[tokio::test]
async fn test_prediction() {
    let (status, body) = send(
        app(TripFuelConvention::Per100Km),
        "POST",
        "/api/v1/predictions",
        Some(compact()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["consumption"], 6.75);
    assert_eq!(body["unit"], "L/100km");
    assert_eq!(body["features"], json!([2.0, 2.0, 4.0, 4.0, 3.5, 0.0, 0.0, 1.0, 0.0]));
}

#[tokio::test]
async fn test_prediction_unknown_label() {
    let mut vehicle = compact();
    vehicle["fuel_type"] = json!("H");

    let (status, body) = send(
        app(TripFuelConvention::Per100Km),
        "POST",
        "/api/v1/predictions",
        Some(vehicle),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_label");
}

#[tokio::test]
async fn test_prediction_out_of_range() {
    let mut vehicle = compact();
    vehicle["engine_size"] = json!(25.0);

    let (status, body) = send(
        app(TripFuelConvention::Per100Km),
        "POST",
        "/api/v1/predictions",
        Some(vehicle),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_trip_with_coordinates() {
    let request = json!({
        "vehicle": compact(),
        "origin": "37.7749, -122.4194",
        "destination": "34.0522, -118.2437"
    });

    let router = app(TripFuelConvention::Per100Km);
    let (status, body) = send(router, "POST", "/api/v1/trips", Some(request)).await;
    assert_eq!(status, StatusCode::OK);

    let distance = body["distance_km"].as_f64().unwrap();
    let fuel = body["fuel_litres"].as_f64().unwrap();
    assert!((distance - 559.0).abs() < 5.0);
    assert!((fuel - distance * 6.75 / 100.0).abs() < 0.01);
    assert_eq!((distance * 100.0).round() / 100.0, distance);
    assert_eq!((fuel * 100.0).round() / 100.0, fuel);
    assert_eq!(body["origin"]["source"], "parsed");
    assert_eq!(body["prediction"]["consumption"], 6.75);
}

#[tokio::test]
async fn test_trip_raw_product_convention() {
    let request = json!({
        "vehicle": compact(),
        "origin": "San Francisco",
        "destination": "Los Angeles"
    });

    let router = app(TripFuelConvention::RawProduct);
    let (status, body) = send(router, "POST", "/api/v1/trips", Some(request)).await;
    assert_eq!(status, StatusCode::OK);

    let distance = body["distance_km"].as_f64().unwrap();
    let fuel = body["fuel_litres"].as_f64().unwrap();
    assert!((fuel - distance * 6.75).abs() < 0.1);
    assert_eq!(body["destination"]["source"], "geocoded");
    assert_eq!(body["fuel_convention"], "raw_product");
}

#[tokio::test]
async fn test_trip_errors_are_distinguishable() {
    let cases = [
        ("not, a coordinate", StatusCode::NOT_FOUND, "location_not_found"),
        ("95.0, 10.0", StatusCode::BAD_REQUEST, "invalid_location"),
        ("Slowtown", StatusCode::GATEWAY_TIMEOUT, "geocoder_timeout"),
    ];

    for (destination, expected_status, expected_kind) in cases {
        let request = json!({
            "vehicle": compact(),
            "origin": "37.7749, -122.4194",
            "destination": destination
        });
        let router = app(TripFuelConvention::Per100Km);
        let (status, body) = send(router, "POST", "/api/v1/trips", Some(request)).await;
        assert_eq!(status, expected_status, "{destination}");
        assert_eq!(body["error"], expected_kind, "{destination}");
    }
}

#[tokio::test]
async fn test_malformed_location_without_geocoder() {
    let model = LinearModel::new(vec![0.0; 9], 7.0).unwrap();
    let predictor = Predictor::new(StandardScaler::identity(), Box::new(model));
    let planner = TripPlanner::new(
        LocationResolver::coordinates_only(),
        TripFuelConvention::Per100Km,
    );
    let app = create_router(Arc::new(AppState::new(predictor, planner)));

    let request = json!({
        "vehicle": compact(),
        "origin": "not-a-coordinate",
        "destination": "34.0522, -118.2437"
    });
    let (status, body) = send(app, "POST", "/api/v1/trips", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_location");
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let (status, _) = send(app(TripFuelConvention::Per100Km), "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn test_init_logging_propagates_into_main_error() {
    fn startup() -> Result<(), Box<dyn std::error::Error>> {
        init_logging(&LoggingConfig::default())?;
        Ok(())
    }

    let _ = startup();
    // A global subscriber is now installed
    assert!(startup().is_err());
}

async fn send_raw(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let mut negative = compact();
    negative["cylinders"] = json!(-1);
    let mut fractional = compact();
    fractional["cylinders"] = json!(4.5);
    let mut missing = compact();
    missing.as_object_mut().unwrap().remove("co2_rating");

    for vehicle in [negative, fractional, missing] {
        let (status, body) = send_raw(
            app(TripFuelConvention::Per100Km),
            "/api/v1/predictions",
            &vehicle.to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{vehicle}");
        assert_eq!(body["error"], "invalid_body");
        assert!(body["message"].as_str().unwrap().contains("Invalid request body"));
    }

    let router = app(TripFuelConvention::Per100Km);
    let (status, body) = send_raw(router, "/api/v1/trips", "{\"vehicle\":").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_body");
}
