//! API route definitions
//!
//! - /api/v1/health - Dataset summary
//! - /api/v1/states - Dropdown options and default state
//! - /api/v1/map - Clustered marker layer
//! - /api/v1/charts/pie - Earthquakes per state
//! - /api/v1/selection - Scatter, histogram and correlation for one state
//! - /api/v1/earthquakes - Joined events
//! - /api/v1/config - Active configuration

use axum::{routing::get, Router};

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/states", get(handlers::get_states))
        .route("/map", get(handlers::get_map))
        .route("/charts/pie", get(handlers::get_pie_chart))
        .route("/selection", get(handlers::get_selection))
        .route("/selection/:state", get(handlers::get_selection_for))
        .route("/earthquakes", get(handlers::get_earthquakes))
        .route("/config", get(handlers::get_config))
        .with_state(state)
}

/// Liveness endpoint at root level
pub fn legacy_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::legacy_health_check))
        .with_state(state)
}
