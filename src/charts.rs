//! Chart view models
//!
//! Serializable descriptions of the pie, scatter and histogram charts. The
//! dashboard page hands these to the charting widget as-is.

use serde::Serialize;

use crate::aggregation::{
    magnitude_histogram_bins, scatter_series, state_counts_by_frequency, AggregationError,
    HistogramBin, ScatterPoint,
};
use crate::types::EarthquakeEvent;

pub const PIE_TITLE: &str = "Proportion of Earthquakes by State";
pub const DISTANCE_AXIS_LABEL: &str = "Distance to Nearest Fracking Site (km)";
pub const MAGNITUDE_AXIS_LABEL: &str = "Earthquake Magnitude";
pub const HISTOGRAM_X_LABEL: &str = "Magnitude";
pub const HISTOGRAM_Y_LABEL: &str = "Frequency";

/// Horizontally centered chart title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTitle {
    pub text: String,
    pub x: f64,
    pub xanchor: &'static str,
}

impl ChartTitle {
    pub fn centered(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: 0.5,
            xanchor: "center",
        }
    }
}

// ============================================================================
// Pie
// ============================================================================

/// Share of earthquakes per state. Static for the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: ChartTitle,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    /// Radial slice offset, one entry per slice
    pub pull: Vec<f64>,
    pub text_info: &'static str,
    pub text_position: &'static str,
    pub show_legend: bool,
}

impl PieChart {
    pub fn from_events(events: &[EarthquakeEvent], pull: f64) -> Self {
        let (labels, values): (Vec<_>, Vec<_>) = state_counts_by_frequency(events).into_iter().unzip();
        Self {
            title: ChartTitle::centered(PIE_TITLE),
            pull: vec![pull; labels.len()],
            labels,
            values,
            text_info: "percent+label",
            text_position: "inside",
            show_legend: true,
        }
    }
}

// ============================================================================
// Scatter
// ============================================================================

/// Magnitude vs nearest-site distance for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: ChartTitle,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<ScatterPoint>,
    /// No points to draw (unknown state or no magnitudes)
    pub empty: bool,
}

impl ScatterChart {
    pub fn for_state<'a, I>(state: &str, events: I) -> Self
    where
        I: IntoIterator<Item = &'a EarthquakeEvent>,
    {
        let points = scatter_series(events);
        Self {
            title: ChartTitle::centered(format!("Earthquake Magnitude vs Distance ({state})")),
            x_label: DISTANCE_AXIS_LABEL,
            y_label: MAGNITUDE_AXIS_LABEL,
            empty: points.is_empty(),
            points,
        }
    }
}

// ============================================================================
// Histogram
// ============================================================================

/// Magnitude distribution for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramChart {
    pub title: ChartTitle,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
    pub empty: bool,
}

impl HistogramChart {
    pub fn for_state<'a, I>(state: &str, events: I, bin_width: f64) -> Result<Self, AggregationError>
    where
        I: IntoIterator<Item = &'a EarthquakeEvent>,
    {
        let bins = magnitude_histogram_bins(events, bin_width)?;
        Ok(Self {
            title: ChartTitle::centered(format!("Earthquake Magnitudes in {state}")),
            x_label: HISTOGRAM_X_LABEL,
            y_label: HISTOGRAM_Y_LABEL,
            bin_width,
            empty: bins.is_empty(),
            bins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeoPoint;

    fn event(state: &str, magnitude: f64) -> EarthquakeEvent {
        EarthquakeEvent {
            id: String::new(),
            location: GeoPoint::new(35.0, -97.0).unwrap(),
            magnitude: Some(magnitude),
            place: String::new(),
            state: state.to_string(),
            nearest_site_distance_km: 5.0,
            nearest_site_index: Some(0),
        }
    }

    #[test]
    fn test_pie_chart() {
        let events = vec![event("OK", 2.0), event("TX", 3.0), event("TX", 2.5)];
        let pie = PieChart::from_events(&events, 0.1);
        assert_eq!(pie.labels, vec!["TX", "OK"]);
        assert_eq!(pie.values, vec![2, 1]);
        assert_eq!(pie.pull, vec![0.1, 0.1]);
        assert_eq!(pie.title.text, PIE_TITLE);
        assert_eq!(pie.title.x, 0.5);
        assert_eq!(pie.text_info, "percent+label");
    }

    #[test]
    fn test_scatter_labels() {
        let events = vec![event("TX", 3.0)];
        let chart = ScatterChart::for_state("TX", &events);
        assert_eq!(chart.title.text, "Earthquake Magnitude vs Distance (TX)");
        assert_eq!(chart.x_label, DISTANCE_AXIS_LABEL);
        assert_eq!(chart.y_label, MAGNITUDE_AXIS_LABEL);
        assert!(!chart.empty);
    }

    #[test]
    fn test_histogram_labels() {
        let events = vec![event("TX", 3.0), event("TX", 3.3)];
        let chart = HistogramChart::for_state("TX", &events, 0.2).unwrap();
        assert_eq!(chart.title.text, "Earthquake Magnitudes in TX");
        assert_eq!(chart.x_label, "Magnitude");
        assert_eq!(chart.y_label, "Frequency");
        assert_eq!(chart.bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_empty_charts_are_flagged() {
        let none: Vec<EarthquakeEvent> = Vec::new();
        assert!(ScatterChart::for_state("ZZ", &none).empty);
        assert!(HistogramChart::for_state("ZZ", &none, 0.1).unwrap().empty);
    }
}
