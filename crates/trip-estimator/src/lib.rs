//! Trip Estimation
//!
//! Resolves two locations, measures the geodesic distance between them
//! and converts a predicted consumption rate into total trip fuel.

mod coordinate;
mod fuel;
mod geocoding;
mod geodesic;
mod resolver;

pub use coordinate::Coordinate;
pub use fuel::{trip_fuel, TripEstimate, TripFuelConvention};
pub use geocoding::{GeocodeError, Geocoder, GeocoderConfig, NominatimGeocoder};
pub use geodesic::{geodesic_distance_km, haversine_distance_km};
pub use resolver::{LocationResolver, LocationSource, ResolvedLocation};

use thiserror::Error;
use tracing::info;

/// Errors while resolving locations or computing a trip
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripError {
    #[error("Invalid location {input:?}: {reason}")]
    InvalidCoordinate { input: String, reason: String },
    #[error("{axis} {value} is outside [-{limit}, {limit}]")]
    OutOfRange {
        axis: &'static str,
        value: f64,
        limit: f64,
    },
    #[error("Consumption rate must be finite, got {0}")]
    InvalidRate(f64),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// Resolved endpoints plus the fuel estimate
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTrip {
    pub origin: ResolvedLocation,
    pub destination: ResolvedLocation,
    pub estimate: TripEstimate,
}

/// Location resolution and fuel convention for trip requests
#[derive(Clone, Default)]
pub struct TripPlanner {
    resolver: LocationResolver,
    convention: TripFuelConvention,
}

impl TripPlanner {
    pub fn new(resolver: LocationResolver, convention: TripFuelConvention) -> Self {
        info!(
            "Trip planner: geocoder={}, convention={:?}",
            resolver.has_geocoder(),
            convention
        );
        Self {
            resolver,
            convention,
        }
    }

    pub fn convention(&self) -> TripFuelConvention {
        self.convention
    }

    /// True when place names can be resolved
    pub fn has_geocoder(&self) -> bool {
        self.resolver.has_geocoder()
    }

    /// Resolve both endpoints, then compute distance and fuel.
    ///
    /// The origin is resolved first; a failure there stops the request.
    pub async fn plan(
        &self,
        rate_l_per_100km: f64,
        origin: &str,
        destination: &str,
    ) -> Result<PlannedTrip, TripError> {
        let origin = self.resolver.resolve(origin).await?;
        let destination = self.resolver.resolve(destination).await?;
        let estimate = TripEstimate::compute(
            rate_l_per_100km,
            origin.coordinate,
            destination.coordinate,
            self.convention,
        )?;

        Ok(PlannedTrip {
            origin,
            destination,
            estimate,
        })
    }
}
