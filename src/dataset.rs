//! Load-once application dataset.
//!
//! Built at startup from the configured tables (or the synthetic generator)
//! and shared read-only with every request handler.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::aggregation::distinct_states;
use crate::config::{DashboardConfig, DistanceMode, JoinConfig};
use crate::distance::DistanceError;
use crate::ingest::{load_tables, DataLoadError, LoadedTables, TableFetcher};
use crate::join::{attach_prejoined_distances_reported, join_with, JoinSummary};
use crate::synthetic::{self, SyntheticOptions};
use crate::types::{EarthquakeEvent, WellSite};

/// Startup failure. Either variant aborts the process.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Load(#[from] DataLoadError),

    #[error("cannot join earthquakes: {0}")]
    Join(#[from] DistanceError),
}

/// Joined earthquakes plus the reference well sites.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub sites: Arc<[WellSite]>,
    pub events: Arc<[EarthquakeEvent]>,
    /// Distinct state codes of `events`, sorted
    pub states: Arc<[String]>,
    pub summary: JoinSummary,
    pub distance_mode: DistanceMode,
    pub loaded_at: DateTime<Utc>,
}

/// Counts reported by the health endpoint and the `check` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub sites: usize,
    pub events: usize,
    pub states: usize,
    pub distance_mode: DistanceMode,
    pub join: JoinSummary,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Join raw tables into a dataset.
    ///
    /// An empty site table is an error even in pre-joined mode: the distances
    /// would have no reference to mean anything against.
    pub fn build(
        tables: LoadedTables,
        mode: DistanceMode,
        join: &JoinConfig,
    ) -> Result<Self, DatasetError> {
        let LoadedTables { sites, rows } = tables;
        let (events, summary) = match mode {
            DistanceMode::Compute => join_with(&rows, &sites, join)?,
            DistanceMode::Prejoined => {
                if sites.is_empty() {
                    return Err(DistanceError::EmptyReferenceSet.into());
                }
                attach_prejoined_distances_reported(&rows)
            }
        };

        let states = distinct_states(&events);
        info!(
            sites = sites.len(),
            events = events.len(),
            dropped = summary.dropped,
            states = states.len(),
            mode = ?mode,
            "Dataset ready"
        );

        Ok(Self {
            sites: sites.into(),
            events: events.into(),
            states: states.into(),
            summary,
            distance_mode: mode,
            loaded_at: Utc::now(),
        })
    }

    /// Fetch the configured tables and join them.
    pub async fn load(
        config: &DashboardConfig,
        fetcher: &dyn TableFetcher,
    ) -> Result<Self, DatasetError> {
        let tables = load_tables(&config.data, fetcher).await?;
        Self::build(tables, config.data.distance_mode, &config.join)
    }

    /// Generate and join a synthetic dataset.
    pub fn synthetic(options: &SyntheticOptions, join: &JoinConfig) -> Result<Self, DatasetError> {
        info!(seed = options.seed, "Generating synthetic dataset");
        Self::build(synthetic::generate(options), DistanceMode::Compute, join)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            sites: self.sites.len(),
            events: self.events.len(),
            states: self.states.len(),
            distance_mode: self.distance_mode,
            join: self.summary.clone(),
            loaded_at: self.loaded_at,
        }
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeoPoint, RawEarthquakeRow};

    fn site(lat: f64, lon: f64) -> WellSite {
        WellSite {
            id: 0,
            location: GeoPoint::new(lat, lon).unwrap(),
            operator: None,
            state: None,
        }
    }

    fn row(state: Option<&str>, distance: Option<f64>) -> RawEarthquakeRow {
        RawEarthquakeRow {
            id: "q".into(),
            latitude: Some(32.0),
            longitude: Some(-97.0),
            magnitude: Some(3.0),
            place: "A".into(),
            state: state.map(str::to_string),
            prejoined_distance_km: distance,
        }
    }

    #[test]
    fn test_build_compute() {
        let tables = LoadedTables {
            sites: vec![site(32.01, -97.01)],
            rows: vec![row(Some("TX"), None), row(None, None), row(Some("OK"), None)],
        };
        let ds = Dataset::build(tables, DistanceMode::Compute, &JoinConfig::default()).unwrap();
        assert_eq!(ds.events.len(), 2);
        assert_eq!(&*ds.states, &["OK".to_string(), "TX".to_string()]);
        assert_eq!(ds.summary.dropped, 1);
        assert!(ds.has_state("TX"));
        assert!(!ds.has_state("ZZ"));
        assert!(ds.events[0].nearest_site_distance_km < 2.0);
    }

    #[test]
    fn test_build_without_sites_fails() {
        let tables = LoadedTables {
            sites: Vec::new(),
            rows: vec![row(Some("TX"), Some(1.0))],
        };
        for mode in [DistanceMode::Compute, DistanceMode::Prejoined] {
            let err = Dataset::build(tables.clone(), mode, &JoinConfig::default()).unwrap_err();
            assert!(matches!(err, DatasetError::Join(DistanceError::EmptyReferenceSet)));
        }
    }

    #[test]
    fn test_build_prejoined_uses_distance_column() {
        let tables = LoadedTables {
            sites: vec![site(10.0, 10.0)],
            rows: vec![row(Some("TX"), Some(12.5)), row(Some("TX"), None)],
        };
        let ds = Dataset::build(tables, DistanceMode::Prejoined, &JoinConfig::default()).unwrap();
        assert_eq!(ds.events.len(), 1);
        assert_eq!(ds.events[0].nearest_site_distance_km, 12.5);
        assert_eq!(ds.summary().join.dropped, 1);
    }

    #[test]
    fn test_synthetic_dataset() {
        let options = SyntheticOptions {
            seed: 1,
            sites_per_play: 4,
            events_per_play: 6,
            drop_state_every: None,
        };
        let ds = Dataset::synthetic(&options, &JoinConfig::default()).unwrap();
        let summary = ds.summary();
        assert_eq!(summary.events, summary.join.input_rows);
        assert!(ds.has_state("TX"));
        assert!(ds.events.iter().all(|e| e.nearest_site_distance_km >= 0.0));
    }
}
