//! API route handlers
//!
//! Request handling for the dashboard endpoints:
//! - Dataset health, state list, raw events and active configuration
//! - Map view, pie chart and per-state selection charts

mod dataset;
mod views;

pub use dataset::*;
pub use views::*;

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::dataset::Dataset;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers. Everything behind it is read-only.
#[derive(Clone)]
pub struct DashboardState {
    /// Joined dataset loaded at startup
    pub dataset: Arc<Dataset>,
    /// Active configuration
    pub config: Arc<DashboardConfig>,
}

impl DashboardState {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            config: Arc::new(config),
        }
    }

    /// The requested state, or the configured default when absent or blank.
    pub(crate) fn state_or_default(&self, state: Option<&str>) -> String {
        match state.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => self.config.charts.default_state.clone(),
        }
    }
}
