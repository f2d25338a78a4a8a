//! Dataset health, state list, raw events and configuration endpoints

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::DashboardState;
use crate::aggregation::filter_by_state;
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::dataset::DatasetSummary;
use crate::types::EarthquakeEvent;

/// Upper bound on `limit` for the raw event listing.
const MAX_EVENT_LIMIT: usize = 100_000;

// ============================================================================
// Health
// ============================================================================

/// Liveness response for `/health`
#[derive(Debug, Serialize)]
pub struct LegacyHealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health - Liveness probe
pub async fn legacy_health_check() -> Json<LegacyHealthResponse> {
    Json(LegacyHealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/v1/health - Dataset summary
pub async fn get_health(State(state): State<DashboardState>) -> Response {
    let summary: DatasetSummary = state.dataset.summary();
    ApiResponse::ok(summary)
}

// ============================================================================
// States
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatesResponse {
    /// Dropdown options, sorted
    pub states: Vec<String>,
    pub default_state: String,
}

/// GET /api/v1/states - Dropdown options
pub async fn get_states(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(StatesResponse {
        states: state.dataset.states.to_vec(),
        default_state: state.config.charts.default_state.clone(),
    })
}

// ============================================================================
// Earthquakes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EarthquakeQuery {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct EarthquakesResponse<'a> {
    /// Matching events before `limit` was applied
    pub total: usize,
    pub events: Vec<&'a EarthquakeEvent>,
}

/// GET /api/v1/earthquakes?state=TX&limit=100 - Joined events
///
/// Without `state` every event is listed; an unknown state lists nothing.
pub async fn get_earthquakes(
    State(state): State<DashboardState>,
    Query(q): Query<EarthquakeQuery>,
) -> Response {
    let limit = q.limit.unwrap_or(MAX_EVENT_LIMIT);
    if limit == 0 || limit > MAX_EVENT_LIMIT {
        return ApiErrorResponse::bad_request(format!(
            "limit must be between 1 and {MAX_EVENT_LIMIT}"
        ));
    }

    let events = &state.dataset.events;
    let matching: Vec<&EarthquakeEvent> = match q.state.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => filter_by_state(events, code),
        _ => events.iter().collect(),
    };
    let total = matching.len();
    ApiResponse::ok(EarthquakesResponse {
        total,
        events: matching.into_iter().take(limit).collect(),
    })
}

// ============================================================================
// Configuration
// ============================================================================

/// GET /api/v1/config - Active dashboard configuration
pub async fn get_config(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(&*state.config)
}
