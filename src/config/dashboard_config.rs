//! Dashboard Configuration - data sources, join strategy, map and chart settings
//!
//! Each struct implements `Default` with the values the dashboard ships with,
//! so a missing config file behaves exactly like an empty one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `DashboardConfig::load()` which searches:
/// 1. `$QUAKEFRAC_CONFIG` env var
/// 2. `./quakefrac.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Input tables
    #[serde(default)]
    pub data: DataConfig,

    /// Nearest-site join strategy
    #[serde(default)]
    pub join: JoinConfig,

    /// Map view
    #[serde(default)]
    pub map: MapConfig,

    /// Pie / scatter / histogram settings
    #[serde(default)]
    pub charts: ChartsConfig,
}

impl DashboardConfig {
    /// Load configuration using the standard search order:
    /// 1. `$QUAKEFRAC_CONFIG` environment variable
    /// 2. `./quakefrac.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", defaults::CONFIG_FILE_NAME);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::CONFIG_FILE_NAME);
                }
            }
        }

        info!("No {} found — using built-in defaults", defaults::CONFIG_FILE_NAME);
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are reported as warnings; parse and validation failures
    /// are errors.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Apply `QUAKEFRAC_SERVER_ADDR` if set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var(defaults::SERVER_ADDR_ENV_VAR) {
            if !addr.trim().is_empty() {
                self.server.addr = addr.trim().to_string();
            }
        }
    }

    /// Validate settings for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        // Data
        if self.data.well_sites.is_empty() {
            errors.push("data.well_sites must list at least one source".to_string());
        }
        if self.data.well_sites.iter().any(|s| s.trim().is_empty()) {
            errors.push("data.well_sites contains an empty source".to_string());
        }
        if self.data.earthquakes.trim().is_empty() {
            errors.push("data.earthquakes must not be empty".to_string());
        }
        if self.data.http_timeout_secs == 0 {
            errors.push("data.http_timeout_secs must be > 0".to_string());
        }

        // Map
        let m = &self.map;
        if m.zoom_start > defaults::MAP_MAX_ZOOM {
            errors.push(format!(
                "map.zoom_start ({}) must be <= {}",
                m.zoom_start,
                defaults::MAP_MAX_ZOOM
            ));
        }
        let b = &m.bounds;
        if !(-90.0..=90.0).contains(&b.south) || !(-90.0..=90.0).contains(&b.north) {
            errors.push("map.bounds latitudes must be within [-90, 90]".to_string());
        }
        if !(-180.0..=180.0).contains(&b.west) || !(-180.0..=180.0).contains(&b.east) {
            errors.push("map.bounds longitudes must be within [-180, 180]".to_string());
        }
        if b.south >= b.north {
            errors.push(format!(
                "map.bounds.south ({}) must be less than north ({})",
                b.south, b.north
            ));
        }
        if b.west >= b.east {
            errors.push(format!(
                "map.bounds.west ({}) must be less than east ({})",
                b.west, b.east
            ));
        }
        if !b.contains(m.center_latitude, m.center_longitude) {
            errors.push(format!(
                "map center ({}, {}) lies outside map.bounds",
                m.center_latitude, m.center_longitude
            ));
        }

        // Charts
        let c = &self.charts;
        if !c.histogram_bin_width.is_finite() || c.histogram_bin_width <= 0.0 {
            errors.push(format!(
                "charts.histogram_bin_width must be > 0, got {}",
                c.histogram_bin_width
            ));
        }
        if !(0.0..=1.0).contains(&c.pie_pull) {
            errors.push(format!("charts.pie_pull must be within [0, 1], got {}", c.pie_pull));
        }
        if c.default_state.trim().is_empty() {
            errors.push("charts.default_state must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Config Error
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8050"
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Data
// ============================================================================

/// Where `nearest_site_distance_km` comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// Haversine join against the well-site tables
    #[default]
    Compute,
    /// Trust the `min_site_distances` column of the earthquake table
    Prejoined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Well-site tables (local paths or http(s) URLs), concatenated in order
    #[serde(default = "defaults::well_site_sources")]
    pub well_sites: Vec<String>,

    /// Earthquake table (local path or http(s) URL)
    #[serde(default = "defaults::earthquake_source")]
    pub earthquakes: String,

    #[serde(default)]
    pub distance_mode: DistanceMode,

    /// Timeout for each remote table fetch
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_http_timeout_secs() -> u64 {
    defaults::HTTP_TIMEOUT_SECS
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            well_sites: defaults::well_site_sources(),
            earthquakes: defaults::earthquake_source(),
            distance_mode: DistanceMode::default(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

// ============================================================================
// Join
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinConfig {
    /// Spread the join across a rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Row count below which the join stays single-threaded
    #[serde(default = "default_min_parallel_rows")]
    pub min_parallel_rows: usize,
}

fn default_true() -> bool {
    true
}

fn default_min_parallel_rows() -> usize {
    defaults::MIN_PARALLEL_ROWS
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_rows: default_min_parallel_rows(),
        }
    }
}

// ============================================================================
// Map
// ============================================================================

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl MapBounds {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        let (south, west, north, east) = defaults::US_BOUNDS;
        Self { south, west, north, east }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,

    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,

    #[serde(default = "default_zoom_start")]
    pub zoom_start: u8,

    /// Panning limit of the map view
    #[serde(default)]
    pub bounds: MapBounds,

    /// Group nearby markers into clusters
    #[serde(default = "default_true")]
    pub cluster_markers: bool,

    /// Overview inset corner ("bottomright", "topleft", ...)
    #[serde(default = "default_minimap_position")]
    pub minimap_position: String,

    #[serde(default = "default_true")]
    pub minimap_toggle: bool,

    #[serde(default = "default_popup_max_width")]
    pub popup_max_width: u32,

    /// GeoJSON layer with state outlines; empty disables it
    #[serde(default = "default_boundary_geojson_url")]
    pub boundary_geojson_url: String,
}

fn default_center_latitude() -> f64 {
    defaults::MAP_CENTER_LATITUDE
}

fn default_center_longitude() -> f64 {
    defaults::MAP_CENTER_LONGITUDE
}

fn default_zoom_start() -> u8 {
    defaults::MAP_ZOOM_START
}

fn default_minimap_position() -> String {
    defaults::MINIMAP_POSITION.to_string()
}

fn default_popup_max_width() -> u32 {
    defaults::POPUP_MAX_WIDTH
}

fn default_boundary_geojson_url() -> String {
    defaults::BOUNDARY_GEOJSON_URL.to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            zoom_start: default_zoom_start(),
            bounds: MapBounds::default(),
            cluster_markers: true,
            minimap_position: default_minimap_position(),
            minimap_toggle: true,
            popup_max_width: default_popup_max_width(),
            boundary_geojson_url: default_boundary_geojson_url(),
        }
    }
}

// ============================================================================
// Charts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Dropdown selection on first load
    #[serde(default = "default_state")]
    pub default_state: String,

    #[serde(default = "default_histogram_bin_width")]
    pub histogram_bin_width: f64,

    /// Slice separation of the pie chart
    #[serde(default = "default_pie_pull")]
    pub pie_pull: f64,

    #[serde(default = "default_min_correlation_samples")]
    pub min_correlation_samples: usize,
}

fn default_state() -> String {
    defaults::DEFAULT_STATE.to_string()
}

fn default_histogram_bin_width() -> f64 {
    defaults::HISTOGRAM_BIN_WIDTH
}

fn default_pie_pull() -> f64 {
    defaults::PIE_PULL
}

fn default_min_correlation_samples() -> usize {
    defaults::MIN_CORRELATION_SAMPLES
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            default_state: default_state(),
            histogram_bin_width: default_histogram_bin_width(),
            pie_pull: default_pie_pull(),
            min_correlation_samples: default_min_correlation_samples(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.well_sites.len(), 3);
        assert_eq!(config.charts.default_state, "TX");
        assert_eq!(config.map.zoom_start, 5);
    }

    #[test]
    fn test_empty_document_equals_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [charts]
            default_state = "OK"

            [data]
            distance_mode = "prejoined"
            "#,
        )
        .unwrap();
        assert_eq!(config.charts.default_state, "OK");
        assert_eq!(config.charts.histogram_bin_width, defaults::HISTOGRAM_BIN_WIDTH);
        assert_eq!(config.data.distance_mode, DistanceMode::Prejoined);
        assert_eq!(config.data.well_sites, defaults::well_site_sources());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = DashboardConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = DashboardConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_bin_width_fails() {
        let err = DashboardConfig::from_toml_str("[charts]\nhistogram_bin_width = 0.0\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.contains("histogram_bin_width")));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_center_outside_bounds_fails() {
        let mut config = DashboardConfig::default();
        config.map.center_latitude = 60.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_no_well_sources_fails() {
        let mut config = DashboardConfig::default();
        config.data.well_sites.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(matches!(
            DashboardConfig::from_toml_str("[charts\n"),
            Err(ConfigError::Parse(_, _))
        ));
    }
}
