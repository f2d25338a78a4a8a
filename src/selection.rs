//! Selection Controller
//!
//! Maps a dropdown selection to the events and chart payloads to display.
//! Pure: the same state and events always give the same result, and an
//! unknown state is an empty selection rather than an error.

use serde::Serialize;

use crate::aggregation::{distance_magnitude_correlation, filter_by_state, AggregationError, Correlation};
use crate::charts::{HistogramChart, ScatterChart};
use crate::config::ChartsConfig;
use crate::types::{EarthquakeEvent, StateAggregate};

/// Events of the selected state and their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection<'a> {
    pub state: String,
    pub subset: Vec<&'a EarthquakeEvent>,
    pub aggregate: StateAggregate<'a>,
}

impl Selection<'_> {
    pub fn is_empty(&self) -> bool {
        self.subset.is_empty()
    }
}

/// Chart payloads recomputed on every selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionCharts {
    pub scatter: ScatterChart,
    pub histogram: HistogramChart,
    pub correlation: Option<Correlation>,
}

/// Select the events of `state`.
pub fn on_state_selected<'a>(state: &str, events: &'a [EarthquakeEvent]) -> Selection<'a> {
    let state = state.trim();
    let subset = filter_by_state(events, state);
    Selection {
        state: state.to_string(),
        aggregate: StateAggregate::new(state, subset.clone()),
        subset,
    }
}

/// Scatter plot, histogram and correlation for a selection.
pub fn selection_charts(
    selection: &Selection<'_>,
    charts: &ChartsConfig,
) -> Result<SelectionCharts, AggregationError> {
    let events = selection.subset.iter().copied();
    Ok(SelectionCharts {
        scatter: ScatterChart::for_state(&selection.state, events.clone()),
        histogram: HistogramChart::for_state(
            &selection.state,
            events.clone(),
            charts.histogram_bin_width,
        )?,
        correlation: distance_magnitude_correlation(events, charts.min_correlation_samples),
    })
}
