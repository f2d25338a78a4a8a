//! Well-site and earthquake records.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A hydraulic-fracturing well site from the reference tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellSite {
    /// Sequential id across all concatenated well tables
    pub id: usize,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// An earthquake row as read from the input table, before validation.
///
/// Every field that can be missing or unparseable in the source is optional;
/// the joiner decides what survives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEarthquakeRow {
    pub id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub magnitude: Option<f64>,
    pub place: String,
    pub state: Option<String>,
    /// Distance column already present in pre-joined files
    pub prejoined_distance_km: Option<f64>,
}

/// An earthquake annotated with the distance to its nearest well site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeEvent {
    pub id: String,
    pub location: GeoPoint,
    /// Missing magnitudes are kept as `None` and skipped by charts
    pub magnitude: Option<f64>,
    pub place: String,
    /// Two-letter state code
    pub state: String,
    pub nearest_site_distance_km: f64,
    /// Index into the well-site table; `None` when the distance was pre-joined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_site_index: Option<usize>,
}

/// Per-state view over a set of events. Built per request, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateAggregate<'a> {
    pub state: String,
    pub count: usize,
    pub events: Vec<&'a EarthquakeEvent>,
}

impl<'a> StateAggregate<'a> {
    pub fn new(state: impl Into<String>, events: Vec<&'a EarthquakeEvent>) -> Self {
        Self {
            state: state.into(),
            count: events.len(),
            events,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
