//! Geographic Coordinates

use crate::TripError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, checking |lat| <= 90 and |lon| <= 180
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, TripError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(TripError::OutOfRange {
                axis: "latitude",
                value: latitude,
                limit: 90.0,
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(TripError::OutOfRange {
                axis: "longitude",
                value: longitude,
                limit: 180.0,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// True when the text has the "lat, lon" shape, regardless of range
    pub fn looks_like_pair(input: &str) -> bool {
        let parts: Vec<&str> = input.split(',').collect();
        parts.len() == 2 && parts.iter().all(|p| p.trim().parse::<f64>().is_ok())
    }
}

impl FromStr for Coordinate {
    type Err = TripError;

    /// Parse `"lat, lon"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TripError::InvalidCoordinate {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(invalid("expected 'lat, lon'"));
        }

        let latitude: f64 = parts[0].parse().map_err(|_| invalid("latitude is not a number"))?;
        let longitude: f64 = parts[1].parse().map_err(|_| invalid("longitude is not a number"))?;

        Coordinate::new(latitude, longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        let c: Coordinate = "37.7749, -122.4194".parse().unwrap();
        assert_eq!(c.latitude, 37.7749);
        assert_eq!(c.longitude, -122.4194);

        let c: Coordinate = "  34.0522,-118.2437 ".parse().unwrap();
        assert_eq!(c.longitude, -118.2437);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for input in ["not-a-coordinate", "", "37.7", "1, 2, 3", "abc, 12", "12, "] {
            assert!(
                matches!(input.parse::<Coordinate>(), Err(TripError::InvalidCoordinate { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(
            "91, 0".parse::<Coordinate>(),
            Err(TripError::OutOfRange { axis: "latitude", .. })
        ));
        assert!(matches!(
            "0, -180.5".parse::<Coordinate>(),
            Err(TripError::OutOfRange { axis: "longitude", .. })
        ));
        assert!("NaN, 0".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_looks_like_pair() {
        assert!(Coordinate::looks_like_pair("95, 200"));
        assert!(!Coordinate::looks_like_pair("Paris, France"));
        assert!(!Coordinate::looks_like_pair("Berlin"));
    }

    #[test]
    fn test_display_round_trips() {
        let c = Coordinate::new(-33.8688, 151.2093).unwrap();
        assert_eq!(c.to_string().parse::<Coordinate>().unwrap(), c);
    }
}
