//! Dashboard Configuration Module
//!
//! Data sources, join strategy, map view and chart settings loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `--config` CLI flag (path to TOML file)
//! 2. `QUAKEFRAC_CONFIG` environment variable
//! 3. `quakefrac.toml` in the current working directory
//! 4. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! config::init(DashboardConfig::load());
//! let bin_width = config::get().charts.histogram_bin_width;
//! ```

mod dashboard_config;
pub mod defaults;
pub mod validation;

pub use dashboard_config::*;

use std::sync::OnceLock;

/// Global configuration, initialized once at startup.
static DASHBOARD_CONFIG: OnceLock<DashboardConfig> = OnceLock::new();

/// Initialize the global configuration. Later calls are ignored with a warning.
pub fn init(config: DashboardConfig) {
    if DASHBOARD_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global configuration.
///
/// Panics if `init()` has not been called: a missing config is a startup bug.
pub fn get() -> &'static DashboardConfig {
    DASHBOARD_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}
