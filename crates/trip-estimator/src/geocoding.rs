//! Place Name Geocoding
//!
//! Resolves free text to coordinates via a Nominatim-compatible
//! `/search` endpoint. One request per lookup, no retries.

use crate::coordinate::Coordinate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from a geocoding lookup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    /// No place matched the query
    #[error("No location found for {0:?}")]
    NotFound(String),

    /// Service did not answer within the configured timeout
    #[error("Geocoding timed out after {0}ms")]
    Timeout(u64),

    /// Transport failure or non-success status
    #[error("Geocoding request failed: {0}")]
    Http(String),

    /// Body could not be interpreted
    #[error("Invalid geocoding response: {0}")]
    InvalidResponse(String),
}

/// Text to coordinate lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError>;
}

/// Geocoder connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Service root, e.g. `https://nominatim.openstreetmap.org`
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying User-Agent
    pub user_agent: String,
    pub timeout_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("fuel-estimator/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Nominatim HTTP client
pub struct NominatimGeocoder {
    client: reqwest::Client,
    search_url: String,
    timeout_ms: u64,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GeocodeError::Http(e.to_string()))?;

        Ok(Self {
            client,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            timeout_ms: config.timeout_ms,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> GeocodeError {
        if err.is_timeout() {
            GeocodeError::Timeout(self.timeout_ms)
        } else if err.is_decode() {
            GeocodeError::InvalidResponse(err.to_string())
        } else {
            GeocodeError::Http(err.to_string())
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        debug!("Geocoding {:?}", query);

        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Geocoder returned {} for {:?}", status, query);
            return Err(GeocodeError::Http(format!("status {status}")));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| self.map_error(e))?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;

        let parse = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|_| GeocodeError::InvalidResponse(format!("bad coordinate {value:?}")))
        };
        let coordinate = Coordinate::new(parse(&place.lat)?, parse(&place.lon)?)
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        debug!(
            "Geocoded {:?} to {} ({})",
            query,
            coordinate,
            place.display_name.as_deref().unwrap_or("unnamed")
        );
        Ok(coordinate)
    }
}
