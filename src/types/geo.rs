//! Geographic point model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidCoordinate {
    #[error("Latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// A location on the Earth's surface, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting NaN/infinite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinate::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Build a point, clamping into range. Non-finite values become 0.
    pub fn clamped(latitude: f64, longitude: f64) -> Self {
        let fix = |v: f64, limit: f64| if v.is_finite() { v.clamp(-limit, limit) } else { 0.0 };
        Self {
            latitude: fix(latitude, 90.0),
            longitude: fix(longitude, 180.0),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// `[lat, lon]` pair in the order map widgets expect.
    pub fn to_lat_lon(self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        let p = GeoPoint::new(32.0, -97.0).unwrap();
        assert_eq!(p.latitude(), 32.0);
        assert_eq!(p.longitude(), -97.0);
        assert_eq!(p.to_lat_lon(), [32.0, -97.0]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            GeoPoint::new(91.0, 0.0),
            Err(InvalidCoordinate::Latitude(91.0))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.5),
            Err(InvalidCoordinate::Longitude(-180.5))
        );
    }

    #[test]
    fn test_clamped() {
        let p = GeoPoint::clamped(95.0, -200.0);
        assert_eq!(p.to_lat_lon(), [90.0, -180.0]);
        assert_eq!(GeoPoint::clamped(f64::NAN, 10.0).to_lat_lon(), [0.0, 10.0]);
    }

    #[test]
    fn test_rejects_nan() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }
}
