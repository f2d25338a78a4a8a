//! quakefrac: Earthquakes & Fracking in the US
//!
//! Joins US earthquake events to the nearest hydraulic-fracturing well site
//! and serves an interactive dashboard over the result.
//!
//! ## Architecture
//!
//! - **Distance Engine** (`distance`): haversine great-circle distance and
//!   nearest-site search
//! - **Dataset Joiner** (`join`): attaches the nearest-site distance to each
//!   earthquake, dropping malformed rows
//! - **Aggregation** (`aggregation`): per-state counts, filters, histogram
//!   bins and the distance/magnitude correlation
//! - **Selection Controller** (`selection`): dropdown state to chart payloads
//! - **Views** (`map`, `charts`): serializable map and chart models
//! - **Ingestion** (`ingest`, `dataset`): table fetching, cp1252 CSV parsing
//!   and the load-once dataset
//! - **API** (`api`): axum routes and the embedded dashboard page

pub mod aggregation;
pub mod api;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod distance;
pub mod ingest;
pub mod join;
pub mod map;
pub mod selection;
pub mod synthetic;
pub mod types;

// Re-export configuration
pub use config::DashboardConfig;

// Re-export core types
pub use types::{EarthquakeEvent, GeoPoint, InvalidCoordinate, RawEarthquakeRow, StateAggregate, WellSite};

// Re-export the distance engine and joiner
pub use distance::{great_circle_distance_km, nearest_distance, DistanceError, Nearest};
pub use join::{join_nearest_site, join_nearest_site_parallel, JoinSummary, MalformedRow};

// Re-export aggregation and selection
pub use aggregation::{count_by_state, filter_by_state, AggregationError};
pub use selection::{on_state_selected, Selection};

// Re-export loading
pub use dataset::{Dataset, DatasetError};
pub use ingest::DataLoadError;
