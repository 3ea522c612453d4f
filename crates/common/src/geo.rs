//! Planar distance approximation for nearby queries.
//!
//! The discovery, blind-date and story queries all treat one degree of
//! latitude or longitude as 111 km and apply Euclidean distance on raw
//! degree deltas. This is deliberately NOT the Haversine great-circle
//! formula: accuracy degrades at high latitudes and long distances, but the
//! approximation is part of the documented query semantics and is kept for
//! behavioral parity.

/// Kilometers per degree of latitude/longitude under the planar model.
pub const KM_PER_DEGREE: f64 = 111.0;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Approximate distance between two positions in kilometers.
#[must_use]
pub fn planar_distance_km(a: Position, b: Position) -> f64 {
    let dlat = a.latitude - b.latitude;
    let dlng = a.longitude - b.longitude;
    (dlat * dlat + dlng * dlng).sqrt() * KM_PER_DEGREE
}

/// Whether `point` lies within `radius_km` of `center` under the planar
/// approximation.
#[must_use]
pub fn within_radius(center: Position, point: Position, radius_km: f64) -> bool {
    planar_distance_km(center, point) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = Position::new(51.5, -0.1);
        assert_eq!(planar_distance_km(p, p), 0.0);
    }

    #[test]
    fn test_one_degree_is_111_km() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(1.0, 0.0);
        assert!((planar_distance_km(a, b) - 111.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearby_inclusion_and_exclusion() {
        // A user at the origin with a 10 km radius should see a point at
        // (0.05, 0) (~5.55 km) but not one at (1, 0) (~111 km).
        let center = Position::new(0.0, 0.0);
        assert!(within_radius(center, Position::new(0.05, 0.0), 10.0));
        assert!(!within_radius(center, Position::new(1.0, 0.0), 10.0));
    }

    #[test]
    fn test_diagonal_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((planar_distance_km(a, b) - 555.0).abs() < 1e-9);
    }
}
