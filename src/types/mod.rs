//! Shared data structures for the earthquake / well-site dashboard
//!
//! - `GeoPoint`: validated latitude/longitude value
//! - `WellSite`: read-only reference table entry
//! - `RawEarthquakeRow`: un-validated ingestion row
//! - `EarthquakeEvent`: joined event carrying its nearest-site distance
//! - `StateAggregate`: per-state derived view

mod geo;
mod records;

pub use geo::*;
pub use records::*;
