//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8050";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "quakefrac.toml";

/// Environment variable holding an explicit config path.
pub const CONFIG_ENV_VAR: &str = "QUAKEFRAC_CONFIG";

/// Environment variable overriding `server.addr`.
pub const SERVER_ADDR_ENV_VAR: &str = "QUAKEFRAC_SERVER_ADDR";

// ============================================================================
// Data Sources
// ============================================================================

const DATA_BASE_URL: &str =
    "https://raw.githubusercontent.com/MelanieChida/EarthquakesAndFracking/main/src";

/// FracTracker national well tables, concatenated in this order.
pub fn well_site_sources() -> Vec<String> {
    [
        "FracTrackerNationalWells_Part1.csv",
        "FracTrackerNationalWells_Part2.csv",
        "FracTrackerNationalWells_Part3-TX.csv",
    ]
    .iter()
    .map(|file| format!("{DATA_BASE_URL}/{file}"))
    .collect()
}

/// Earthquake table (2023 events, annotated with state).
pub fn earthquake_source() -> String {
    format!("{DATA_BASE_URL}/earthquake_with_distance.csv")
}

/// Per-request timeout for remote tables (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// Join
// ============================================================================

/// Below this many earthquake rows the join stays single-threaded.
pub const MIN_PARALLEL_ROWS: usize = 1_024;

// ============================================================================
// Map
// ============================================================================

/// Initial map center (south Texas).
pub const MAP_CENTER_LATITUDE: f64 = 28.8283;
pub const MAP_CENTER_LONGITUDE: f64 = -98.5795;

/// Initial map zoom level.
pub const MAP_ZOOM_START: u8 = 5;

/// Highest zoom level accepted by the tile layer.
pub const MAP_MAX_ZOOM: u8 = 18;

/// Continental US bounding box `(south, west, north, east)`.
pub const US_BOUNDS: (f64, f64, f64, f64) = (24.396308, -125.0, 49.384358, -66.934570);

/// Marker popup width (px).
pub const POPUP_MAX_WIDTH: u32 = 300;

/// Overview inset placement.
pub const MINIMAP_POSITION: &str = "bottomright";

/// US state outlines drawn under the markers.
pub const BOUNDARY_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/PublicaMundi/MappingAPI/master/data/geojson/us-states.json";

// ============================================================================
// Charts
// ============================================================================

/// State selected when the dashboard opens.
pub const DEFAULT_STATE: &str = "TX";

/// Magnitude histogram bin width.
pub const HISTOGRAM_BIN_WIDTH: f64 = 0.1;

/// Radial offset of every pie slice (fraction of radius).
pub const PIE_PULL: f64 = 0.1;

/// Minimum events with a magnitude before a correlation is reported.
pub const MIN_CORRELATION_SAMPLES: usize = 10;

// ============================================================================
// Synthetic Data
// ============================================================================

/// Default RNG seed for the synthetic dataset.
pub const SYNTHETIC_SEED: u64 = 2023;

/// Synthetic well sites generated per state cluster.
pub const SYNTHETIC_SITES_PER_STATE: usize = 40;

/// Synthetic earthquakes generated per state cluster.
pub const SYNTHETIC_EVENTS_PER_STATE: usize = 60;
