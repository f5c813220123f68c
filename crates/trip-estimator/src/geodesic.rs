//! Geodesic Distance on the WGS-84 Ellipsoid

use crate::coordinate::Coordinate;
use tracing::debug;

/// WGS-84 semi-major axis (m)
const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS-84 semi-minor axis (m)
const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// IUGG mean Earth radius (km)
const MEAN_EARTH_RADIUS_KM: f64 = 6_371.008_8;

const CONVERGENCE_THRESHOLD: f64 = 1e-12;
const MAX_ITERATIONS: usize = 200;

/// Ellipsoidal distance between two points in kilometres.
///
/// Uses Vincenty's inverse formula. Nearly antipodal points, where the
/// iteration does not converge, fall back to the great-circle distance.
/// There the true distance lies between the WGS-84 half meridian
/// (20003.93 km) and half equator (20037.51 km). The fallback gives
/// 20015.11 km for exact antipodes, within 0.1% of either.
pub fn geodesic_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    match vincenty_inverse_m(a, b) {
        Some(metres) => metres / 1000.0,
        None => {
            debug!("Vincenty did not converge for {} -> {}, using haversine", a, b);
            haversine_distance_km(a, b)
        }
    }
}

/// Great-circle distance on a sphere of mean Earth radius, in kilometres
pub fn haversine_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();
    let (cos_lat_a, cos_lat_b) = (a.latitude.to_radians().cos(), b.latitude.to_radians().cos());
    let h = (dlat / 2.0).sin().powi(2) + cos_lat_a * cos_lat_b * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    MEAN_EARTH_RADIUS_KM * c
}

fn vincenty_inverse_m(a: Coordinate, b: Coordinate) -> Option<f64> {
    let l = (b.longitude - a.longitude).to_radians();
    let u1 = ((1.0 - WGS84_F) * a.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * b.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        // coincident points
        if sin_sigma == 0.0 {
            return Some(0.0);
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line: cos_sq_alpha = 0
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));

        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - lambda_prev).abs() < CONVERGENCE_THRESHOLD {
            let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - WGS84_B.powi(2)) / WGS84_B.powi(2);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

            return Some(WGS84_B * big_a * (sigma - delta_sigma));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_san_francisco_to_los_angeles() {
        let sf = coord(37.7749, -122.4194);
        let la = coord(34.0522, -118.2437);
        let d = geodesic_distance_km(sf, la);
        assert!((d - 559.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn test_one_degree_of_equator() {
        // WGS-84: 2 * pi * a / 360
        let d = geodesic_distance_km(coord(0.0, 0.0), coord(0.0, 1.0));
        assert!((d - 111.319_49).abs() < 0.001, "got {d}");
    }

    #[test]
    fn test_meridian_quadrant() {
        let d = geodesic_distance_km(coord(0.0, 0.0), coord(90.0, 0.0));
        assert!((d - 10_001.965_7).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_antipodal_falls_back() {
        let d = geodesic_distance_km(coord(0.0, 0.0), coord(0.5, 179.7));
        assert!(d > 19_000.0 && d < 20_100.0, "got {d}");
    }

    #[test]
    fn test_antipodal_fallback_error_bound() {
        const HALF_MERIDIAN_KM: f64 = 20_003.931_5;
        for (a, b) in [
            (coord(0.0, 0.0), coord(0.0, 180.0)),
            (coord(89.9, 0.0), coord(-89.9, 180.0)),
        ] {
            let d = geodesic_distance_km(a, b);
            let relative = (d - HALF_MERIDIAN_KM).abs() / HALF_MERIDIAN_KM;
            assert!(relative < 1e-3, "got {d}");
        }
    }

    #[test]
    fn test_haversine_reference() {
        let d = haversine_distance_km(coord(0.0, 0.0), coord(0.0, 1.0));
        assert!((d - 111.195).abs() < 0.01);
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let a = coord(lat, lon);
            prop_assert_eq!(geodesic_distance_km(a, a), 0.0);
        }

        #[test]
        fn prop_distance_is_symmetric(
            lat1 in -89.0f64..89.0, lon1 in -179.0f64..179.0,
            lat2 in -89.0f64..89.0, lon2 in -179.0f64..179.0,
        ) {
            let a = coord(lat1, lon1);
            let b = coord(lat2, lon2);
            let ab = geodesic_distance_km(a, b);
            let ba = geodesic_distance_km(b, a);
            prop_assert!((ab - ba).abs() < 1e-3, "ab={} ba={}", ab, ba);
            prop_assert!(ab >= 0.0);
        }
    }
}
