use serde::{Deserialize, Serialize};

/// Mean earth radius used by the distance and destination formulas.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude. Used for cheap planar conversions.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Latitude/longitude in degrees. Ranges are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Great-circle (haversine) distance in kilometers.
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = to_radians(from.lat);
    let lat2 = to_radians(to.lat);
    let d_lat = to_radians(to.lat - from.lat);
    let d_lon = to_radians(to.lon - from.lon);

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Point reached by travelling `distance_km` from `origin` along the initial
/// `bearing_deg` (clockwise from north).
pub fn destination(origin: GeoPoint, distance_km: f64, bearing_deg: f64) -> GeoPoint {
    let lat1 = to_radians(origin.lat);
    let lon1 = to_radians(origin.lon);
    let bearing = to_radians(bearing_deg);
    let angular = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(to_degrees(lat2), to_degrees(lon2))
}

/// Degrees of longitude covered by one kilometer at `lat`.
pub fn degrees_per_km(lat: f64) -> f64 {
    1.0 / (KM_PER_DEGREE * to_radians(lat).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_one_degree_at_equator() {
        let d = distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_distance_is_zero_for_same_point() {
        let p = GeoPoint::new(48.85, 2.35);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn test_destination_due_east_at_equator() {
        let p = destination(GeoPoint::new(0.0, 0.0), 111.0, 90.0);
        assert!(p.lat.abs() < 1e-9);
        assert!((p.lon - 1.0).abs() < 0.01, "got {}", p.lon);
    }

    #[test]
    fn test_destination_then_distance_matches() {
        let origin = GeoPoint::new(45.0, 7.0);
        let p = destination(origin, 250.0, 33.0);
        assert!((distance_km(origin, p) - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_degree_conversion() {
        assert!((to_radians(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((to_degrees(std::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-12);
    }
}
