//! Location Resolution

use crate::coordinate::Coordinate;
use crate::geocoding::Geocoder;
use crate::TripError;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Where a coordinate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Parsed,
    Geocoded,
}

/// A user-supplied location and the coordinate it resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub input: String,
    pub coordinate: Coordinate,
    pub source: LocationSource,
}

/// Turns `"lat, lon"` text or a place name into a coordinate
#[derive(Clone, Default)]
pub struct LocationResolver {
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl LocationResolver {
    /// Resolver that only accepts `"lat, lon"` input
    pub fn coordinates_only() -> Self {
        Self { geocoder: None }
    }

    /// Resolver that geocodes anything that is not a coordinate pair
    pub fn with_geocoder(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            geocoder: Some(geocoder),
        }
    }

    pub fn has_geocoder(&self) -> bool {
        self.geocoder.is_some()
    }

    pub async fn resolve(&self, input: &str) -> Result<ResolvedLocation, TripError> {
        let trimmed = input.trim();

        let parsed = trimmed.parse::<Coordinate>();
        let coordinate_err = match parsed {
            Ok(coordinate) => {
                return Ok(ResolvedLocation {
                    input: input.to_string(),
                    coordinate,
                    source: LocationSource::Parsed,
                })
            }
            Err(err) => err,
        };

        // Numeric pairs that fail range checks are not sent to the geocoder
        if trimmed.is_empty() || Coordinate::looks_like_pair(trimmed) {
            return Err(coordinate_err);
        }

        let Some(geocoder) = &self.geocoder else {
            return Err(coordinate_err);
        };

        let coordinate = geocoder.geocode(trimmed).await?;
        debug!("Resolved {:?} via geocoder", trimmed);
        Ok(ResolvedLocation {
            input: input.to_string(),
            coordinate,
            source: LocationSource::Geocoded,
        })
    }
}
