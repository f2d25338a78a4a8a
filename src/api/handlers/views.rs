//! Map, pie chart and selection endpoints

use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::DashboardState;
use crate::aggregation::Correlation;
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::charts::{HistogramChart, PieChart, ScatterChart};
use crate::map::MapView;
use crate::selection::{on_state_selected, selection_charts};

/// GET /api/v1/map - Marker layer and view settings
pub async fn get_map(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(MapView::build(&state.dataset.events, &state.config.map))
}

/// GET /api/v1/charts/pie - Share of earthquakes per state
pub async fn get_pie_chart(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(PieChart::from_events(
        &state.dataset.events,
        state.config.charts.pie_pull,
    ))
}

#[derive(Debug, Deserialize)]
pub struct SelectionQuery {
    #[serde(default)]
    pub state: Option<String>,
}

/// Everything the dashboard redraws when the dropdown changes.
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub state: String,
    pub count: usize,
    /// Whether `state` appears in the dataset at all
    pub known_state: bool,
    pub scatter: ScatterChart,
    pub histogram: HistogramChart,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<Correlation>,
}

fn selection_response(state: &DashboardState, requested: &str) -> Response {
    let selection = on_state_selected(requested, &state.dataset.events);
    let charts = match selection_charts(&selection, &state.config.charts) {
        Ok(charts) => charts,
        Err(e) => {
            error!(state = %selection.state, error = %e, "Failed to build selection charts");
            return ApiErrorResponse::internal(e.to_string());
        }
    };
    debug!(state = %selection.state, count = selection.aggregate.count, "Selection");

    ApiResponse::ok(SelectionResponse {
        known_state: state.dataset.has_state(&selection.state),
        state: selection.state,
        count: selection.aggregate.count,
        scatter: charts.scatter,
        histogram: charts.histogram,
        correlation: charts.correlation,
    })
}

/// GET /api/v1/selection?state=TX - Charts for the selected state
///
/// A missing or blank `state` selects the configured default.
pub async fn get_selection(
    State(state): State<DashboardState>,
    Query(q): Query<SelectionQuery>,
) -> Response {
    let requested = state.state_or_default(q.state.as_deref());
    selection_response(&state, &requested)
}

/// GET /api/v1/selection/:state
pub async fn get_selection_for(
    State(state): State<DashboardState>,
    Path(code): Path<String>,
) -> Response {
    selection_response(&state, &code)
}
