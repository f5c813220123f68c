//! Trip Fuel Calculation

use crate::coordinate::Coordinate;
use crate::geodesic::geodesic_distance_km;
use crate::TripError;
use serde::{Deserialize, Serialize};

/// How a per-100km rate is combined with a distance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripFuelConvention {
    /// `rate * km / 100`
    #[default]
    #[serde(rename = "per_100km")]
    Per100Km,
    /// `rate * km`, matching dashboards built on the legacy calculation
    RawProduct,
}

impl TripFuelConvention {
    pub fn total_fuel(self, rate_l_per_100km: f64, distance_km: f64) -> f64 {
        match self {
            TripFuelConvention::Per100Km => trip_fuel(rate_l_per_100km, distance_km),
            TripFuelConvention::RawProduct => rate_l_per_100km * distance_km,
        }
    }
}

/// Litres used over `distance_km` at `rate_l_per_100km`
pub fn trip_fuel(rate_l_per_100km: f64, distance_km: f64) -> f64 {
    rate_l_per_100km * distance_km / 100.0
}

/// Distance and fuel for one trip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripEstimate {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub distance_km: f64,
    pub rate_l_per_100km: f64,
    pub fuel_litres: f64,
    pub convention: TripFuelConvention,
}

impl TripEstimate {
    pub fn compute(
        rate_l_per_100km: f64,
        origin: Coordinate,
        destination: Coordinate,
        convention: TripFuelConvention,
    ) -> Result<Self, TripError> {
        if !rate_l_per_100km.is_finite() {
            return Err(TripError::InvalidRate(rate_l_per_100km));
        }

        let distance_km = geodesic_distance_km(origin, destination);
        Ok(Self {
            origin,
            destination,
            distance_km,
            rate_l_per_100km,
            fuel_litres: convention.total_fuel(rate_l_per_100km, distance_km),
            convention,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_fuel_formula() {
        assert_eq!(trip_fuel(8.0, 250.0), 20.0);
        assert_eq!(trip_fuel(8.0, 0.0), 0.0);
    }

    #[test]
    fn test_raw_product_is_hundred_times_larger() {
        let per_100 = TripFuelConvention::Per100Km.total_fuel(7.5, 420.0);
        let raw = TripFuelConvention::RawProduct.total_fuel(7.5, 420.0);
        assert!((raw - per_100 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_between_cities() {
        let sf = Coordinate::new(37.7749, -122.4194).unwrap();
        let la = Coordinate::new(34.0522, -118.2437).unwrap();

        let estimate = TripEstimate::compute(10.0, sf, la, TripFuelConvention::default()).unwrap();
        assert!((estimate.distance_km - 559.0).abs() < 5.0);
        assert!((estimate.fuel_litres - estimate.distance_km / 10.0).abs() < 1e-9);
        assert_eq!(estimate.convention, TripFuelConvention::Per100Km);
    }

    #[test]
    fn test_same_location_uses_no_fuel() {
        let here = Coordinate::new(48.8566, 2.3522).unwrap();
        let estimate =
            TripEstimate::compute(9.1, here, here, TripFuelConvention::RawProduct).unwrap();
        assert_eq!(estimate.distance_km, 0.0);
        assert_eq!(estimate.fuel_litres, 0.0);
    }

    #[test]
    fn test_rejects_non_finite_rate() {
        let here = Coordinate::new(0.0, 0.0).unwrap();
        assert!(matches!(
            TripEstimate::compute(f64::NAN, here, here, TripFuelConvention::Per100Km),
            Err(TripError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_convention_serde_names() {
        let json = serde_json::to_string(&TripFuelConvention::Per100Km).unwrap();
        assert_eq!(json, "\"per_100km\"");
        let parsed: TripFuelConvention = serde_json::from_str("\"raw_product\"").unwrap();
        assert_eq!(parsed, TripFuelConvention::RawProduct);
    }
}
