//! Distance Engine
//!
//! Great-circle distance on a spherical Earth (haversine) and a linear-scan
//! nearest-reference search.
//!
//! ## Formula
//!
//! ```text
//! d = 2R · asin( sqrt( sin²(Δφ/2) + cos φa · cos φb · sin²(Δλ/2) ) )
//! ```
//!
//! with φ latitude, λ longitude (radians) and R = 6371 km.

use serde::Serialize;
use thiserror::Error;

use crate::types::GeoPoint;

/// Mean Earth radius used by the haversine formula (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DistanceError {
    /// No reference points to measure against. Never reported as a
    /// zero distance.
    #[error("Reference set is empty: no well sites to measure against")]
    EmptyReferenceSet,
}

/// Result of a nearest-reference search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Nearest {
    pub distance_km: f64,
    pub index: usize,
}

/// Haversine great-circle distance between two points, in kilometres.
pub fn great_circle_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude().to_radians();
    let lat_b = b.latitude().to_radians();
    let d_lat = lat_b - lat_a;
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Minimum distance from `query` to any point in `refs`, with its index.
///
/// Ties keep the first index encountered.
pub fn nearest_distance(query: GeoPoint, refs: &[GeoPoint]) -> Result<Nearest, DistanceError> {
    let mut refs_iter = refs.iter().enumerate();
    let (_, first) = refs_iter.next().ok_or(DistanceError::EmptyReferenceSet)?;

    let mut best = Nearest {
        distance_km: great_circle_distance_km(query, *first),
        index: 0,
    };

    for (index, point) in refs_iter {
        let d = great_circle_distance_km(query, *point);
        if d < best.distance_km {
            best = Nearest { distance_km: d, index };
        }
    }

    Ok(best)
}
