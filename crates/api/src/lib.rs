//! Fuel Estimator API Server
//!
//! REST API for fuel consumption prediction and trip fuel estimates.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use feature_engine::{RawDescriptor, VehicleDescriptor};
use inference_engine::{PredictionOutcome, Predictor};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use trip_estimator::{
    LocationResolver, NominatimGeocoder, PlannedTrip, TripFuelConvention, TripPlanner,
};

pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;

pub use config::{AppConfig, LogFormat, LoggingConfig};
pub use error::ApiError;
pub use routes::predictions::PredictionResponse;
pub use routes::trips::{TripRequest, TripResponse};

/// Application state shared across handlers. Read-only after startup
/// apart from the request counters.
pub struct AppState {
    /// Encoder, scaler and model
    pub predictor: Predictor,
    /// Location resolution and fuel convention
    pub planner: TripPlanner,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    prediction_count: AtomicU64,
    trip_count: AtomicU64,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(predictor: Predictor, planner: TripPlanner) -> Self {
        Self {
            predictor,
            planner,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            prediction_count: AtomicU64::new(0),
            trip_count: AtomicU64::new(0),
            metrics: None,
        }
    }

    /// Expose the Prometheus recorder on `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Convert labels, then run the prediction pipeline
    pub fn predict(&self, raw: RawDescriptor) -> Result<PredictionOutcome, ApiError> {
        let descriptor = VehicleDescriptor::try_from(raw)?;
        let outcome = self.predictor.predict(&descriptor)?;

        self.prediction_count.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("fuel_predictions_total").increment(1);
        metrics::histogram!("fuel_prediction_latency_us").record(outcome.latency_us as f64);
        debug!(
            "Predicted {} L/100km for {:?}",
            outcome.consumption_l_per_100km, descriptor.vehicle_class
        );
        Ok(outcome)
    }

    /// Resolve locations and compute trip fuel
    pub async fn plan_trip(
        &self,
        rate_l_per_100km: f64,
        origin: &str,
        destination: &str,
    ) -> Result<PlannedTrip, ApiError> {
        let trip = self.planner.plan(rate_l_per_100km, origin, destination).await?;

        self.trip_count.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("fuel_trips_total").increment(1);
        Ok(trip)
    }

    pub fn prediction_count(&self) -> u64 {
        self.prediction_count.load(Ordering::Relaxed)
    }

    pub fn trip_count(&self) -> u64 {
        self.trip_count.load(Ordering::Relaxed)
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: String,
    pub geocoder_enabled: bool,
    pub fuel_convention: TripFuelConvention,
    pub prediction_count: u64,
    pub trip_count: u64,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/options", get(routes::options::get_options))
        .route("/api/v1/predictions", post(routes::predictions::create_prediction))
        .route("/api/v1/trips", post(routes::trips::create_trip))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: state.predictor.model_name().to_string(),
        geocoder_enabled: state.planner.has_geocoder(),
        fuel_convention: state.planner.convention(),
        prediction_count: state.prediction_count(),
        trip_count: state.trip_count(),
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| -> Box<dyn std::error::Error> { e })
}

/// Build the trip planner from configuration
pub fn build_planner(config: &AppConfig) -> Result<TripPlanner, ApiError> {
    let resolver = if config.geocoder.enabled {
        let geocoder = NominatimGeocoder::new(&config.geocoder.client_config())
            .map_err(|e| ApiError::Config(e.to_string()))?;
        LocationResolver::with_geocoder(Arc::new(geocoder))
    } else {
        LocationResolver::coordinates_only()
    };
    Ok(TripPlanner::new(resolver, config.trip.fuel_convention))
}

/// Load artifacts and run the server until it stops
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let predictor = Predictor::load(&config.artifacts.model_path, &config.artifacts.scaler_path)?;
    let planner = build_planner(&config)?;
    let metrics = PrometheusBuilder::new().install_recorder()?;

    let state = Arc::new(AppState::new(predictor, planner).with_metrics(metrics));
    let mut app = create_router(state);

    if config.rate_limit.enabled {
        let governor = rate_limit::create_governor_config(&config.rate_limit)?;
        app = app.layer(GovernorLayer { config: governor });
    }

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
