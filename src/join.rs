//! Dataset Joiner
//!
//! Turns raw earthquake rows into [`EarthquakeEvent`]s carrying the distance
//! to the nearest well site.
//!
//! Rows missing a usable latitude, longitude or state are dropped (counted and
//! logged, never coerced to zero). Surviving rows keep their input order in
//! both the sequential and the parallel path, and both paths produce the same
//! output.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::JoinConfig;
use crate::distance::{nearest_distance, DistanceError};
use crate::types::{EarthquakeEvent, GeoPoint, InvalidCoordinate, RawEarthquakeRow, WellSite};

/// Why a row was excluded from the joined dataset.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MalformedRow {
    #[error("missing latitude")]
    MissingLatitude,

    #[error("missing longitude")]
    MissingLongitude,

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] InvalidCoordinate),

    #[error("missing state")]
    MissingState,

    #[error("missing pre-joined distance")]
    MissingDistance,

    #[error("invalid pre-joined distance {0}")]
    InvalidDistance(f64),
}

impl MalformedRow {
    /// Stable key used in [`JoinSummary::dropped_by_reason`].
    pub fn kind(&self) -> &'static str {
        match self {
            MalformedRow::MissingLatitude => "missing_latitude",
            MalformedRow::MissingLongitude => "missing_longitude",
            MalformedRow::InvalidCoordinate(_) => "invalid_coordinate",
            MalformedRow::MissingState => "missing_state",
            MalformedRow::MissingDistance => "missing_distance",
            MalformedRow::InvalidDistance(_) => "invalid_distance",
        }
    }
}

/// Bookkeeping for one join run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinSummary {
    pub input_rows: usize,
    pub joined: usize,
    pub dropped: usize,
    pub dropped_by_reason: BTreeMap<String, usize>,
}

type RowOutcome = Result<EarthquakeEvent, MalformedRow>;

// ============================================================================
// Row validation
// ============================================================================

fn validate_row(row: &RawEarthquakeRow) -> Result<(GeoPoint, String), MalformedRow> {
    let latitude = row.latitude.ok_or(MalformedRow::MissingLatitude)?;
    let longitude = row.longitude.ok_or(MalformedRow::MissingLongitude)?;
    let location = GeoPoint::new(latitude, longitude)?;

    let state = row
        .state
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(MalformedRow::MissingState)?;

    Ok((location, state.to_string()))
}

fn to_event(
    row: &RawEarthquakeRow,
    location: GeoPoint,
    state: String,
    distance_km: f64,
    nearest_site_index: Option<usize>,
) -> EarthquakeEvent {
    EarthquakeEvent {
        id: row.id.clone(),
        location,
        magnitude: row.magnitude,
        place: row.place.clone(),
        state,
        nearest_site_distance_km: distance_km,
        nearest_site_index,
    }
}

/// Join one row. The outer `Result` is fatal, the inner one drops the row.
fn join_row(row: &RawEarthquakeRow, site_points: &[GeoPoint]) -> Result<RowOutcome, DistanceError> {
    let (location, state) = match validate_row(row) {
        Ok(v) => v,
        Err(e) => return Ok(Err(e)),
    };
    let nearest = nearest_distance(location, site_points)?;
    Ok(Ok(to_event(row, location, state, nearest.distance_km, Some(nearest.index))))
}

fn site_points(sites: &[WellSite]) -> Result<Vec<GeoPoint>, DistanceError> {
    if sites.is_empty() {
        return Err(DistanceError::EmptyReferenceSet);
    }
    Ok(sites.iter().map(|s| s.location).collect())
}

/// Split outcomes into events and a summary, logging every drop.
fn collect_outcomes(
    rows: &[RawEarthquakeRow],
    outcomes: Vec<RowOutcome>,
) -> (Vec<EarthquakeEvent>, JoinSummary) {
    let mut summary = JoinSummary {
        input_rows: rows.len(),
        ..JoinSummary::default()
    };
    let mut events = Vec::with_capacity(outcomes.len());

    for (row, outcome) in rows.iter().zip(outcomes) {
        match outcome {
            Ok(event) => events.push(event),
            Err(reason) => {
                debug!(row = %row.id, %reason, "Dropping malformed earthquake row");
                *summary
                    .dropped_by_reason
                    .entry(reason.kind().to_string())
                    .or_insert(0) += 1;
                summary.dropped += 1;
            }
        }
    }
    summary.joined = events.len();

    if summary.dropped > 0 {
        warn!(
            dropped = summary.dropped,
            input = summary.input_rows,
            reasons = ?summary.dropped_by_reason,
            "Excluded malformed earthquake rows"
        );
    }

    (events, summary)
}

// ============================================================================
// Public API
// ============================================================================

/// Attach the nearest-site distance to every valid row (single thread).
pub fn join_nearest_site(
    rows: &[RawEarthquakeRow],
    sites: &[WellSite],
) -> Result<Vec<EarthquakeEvent>, DistanceError> {
    join_nearest_site_reported(rows, sites).map(|(events, _)| events)
}

/// Same as [`join_nearest_site`], also returning the [`JoinSummary`].
pub fn join_nearest_site_reported(
    rows: &[RawEarthquakeRow],
    sites: &[WellSite],
) -> Result<(Vec<EarthquakeEvent>, JoinSummary), DistanceError> {
    let points = site_points(sites)?;
    let outcomes = rows
        .iter()
        .map(|row| join_row(row, &points))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collect_outcomes(rows, outcomes))
}

/// Parallel join over a rayon pool.
///
/// Workers share a read-only slice of site points; the indexed collect keeps
/// input order, so the output is identical to [`join_nearest_site`].
pub fn join_nearest_site_parallel(
    rows: &[RawEarthquakeRow],
    sites: &[WellSite],
) -> Result<Vec<EarthquakeEvent>, DistanceError> {
    join_nearest_site_parallel_reported(rows, sites).map(|(events, _)| events)
}

pub fn join_nearest_site_parallel_reported(
    rows: &[RawEarthquakeRow],
    sites: &[WellSite],
) -> Result<(Vec<EarthquakeEvent>, JoinSummary), DistanceError> {
    let points = site_points(sites)?;
    let outcomes = rows
        .par_iter()
        .map(|row| join_row(row, &points))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collect_outcomes(rows, outcomes))
}

/// Join using the configured strategy.
pub fn join_with(
    rows: &[RawEarthquakeRow],
    sites: &[WellSite],
    config: &JoinConfig,
) -> Result<(Vec<EarthquakeEvent>, JoinSummary), DistanceError> {
    let parallel = config.parallel && rows.len() >= config.min_parallel_rows;
    info!(
        rows = rows.len(),
        sites = sites.len(),
        parallel,
        "Joining earthquakes to nearest well site"
    );
    if parallel {
        join_nearest_site_parallel_reported(rows, sites)
    } else {
        join_nearest_site_reported(rows, sites)
    }
}

/// Build events from a file whose distance column was computed elsewhere.
pub fn attach_prejoined_distances(rows: &[RawEarthquakeRow]) -> Vec<EarthquakeEvent> {
    attach_prejoined_distances_reported(rows).0
}

pub fn attach_prejoined_distances_reported(
    rows: &[RawEarthquakeRow],
) -> (Vec<EarthquakeEvent>, JoinSummary) {
    let outcomes = rows
        .iter()
        .map(|row| {
            let (location, state) = validate_row(row)?;
            let distance = row.prejoined_distance_km.ok_or(MalformedRow::MissingDistance)?;
            if !distance.is_finite() || distance < 0.0 {
                return Err(MalformedRow::InvalidDistance(distance));
            }
            Ok(to_event(row, location, state, distance, None))
        })
        .collect();
    collect_outcomes(rows, outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, lat: Option<f64>, lon: Option<f64>, state: Option<&str>) -> RawEarthquakeRow {
        RawEarthquakeRow {
            id: id.to_string(),
            latitude: lat,
            longitude: lon,
            magnitude: Some(2.5),
            place: format!("place {id}"),
            state: state.map(String::from),
            prejoined_distance_km: None,
        }
    }

    fn site(id: usize, lat: f64, lon: f64) -> WellSite {
        WellSite {
            id,
            location: GeoPoint::new(lat, lon).unwrap(),
            operator: None,
            state: None,
        }
    }

    #[test]
    fn test_empty_sites_is_fatal() {
        let rows = vec![row("a", Some(32.0), Some(-97.0), Some("TX"))];
        assert_eq!(
            join_nearest_site(&rows, &[]),
            Err(DistanceError::EmptyReferenceSet)
        );
        assert_eq!(
            join_nearest_site_parallel(&rows, &[]),
            Err(DistanceError::EmptyReferenceSet)
        );
    }

    #[test]
    fn test_empty_sites_fails_even_without_rows() {
        assert!(join_nearest_site(&[], &[]).is_err());
    }

    #[test]
    fn test_end_to_end_fixture() {
        let rows = vec![
            RawEarthquakeRow {
                id: "A".into(),
                latitude: Some(32.0),
                longitude: Some(-97.0),
                magnitude: Some(3.2),
                place: "A".into(),
                state: Some("TX".into()),
                prejoined_distance_km: None,
            },
            RawEarthquakeRow {
                id: "B".into(),
                latitude: Some(40.0),
                longitude: Some(-75.0),
                magnitude: Some(2.1),
                place: "B".into(),
                state: Some("PA".into()),
                prejoined_distance_km: None,
            },
        ];
        let sites = vec![site(0, 32.01, -97.01)];

        let events = join_nearest_site(&rows, &sites).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].nearest_site_distance_km > 0.0);
        assert!(events[0].nearest_site_distance_km < 2.0);
        assert!(events[1].nearest_site_distance_km > 2000.0);
        assert_eq!(events[0].nearest_site_index, Some(0));
    }

    #[test]
    fn test_malformed_rows_are_dropped_in_order() {
        let rows = vec![
            row("1", Some(32.0), Some(-97.0), Some("TX")),
            row("2", None, Some(-97.0), Some("TX")),
            row("3", Some(35.0), Some(-98.0), Some("OK")),
            row("4", Some(35.0), None, Some("OK")),
            row("5", Some(35.0), Some(-98.0), None),
            row("6", Some(35.0), Some(-98.0), Some("   ")),
            row("7", Some(135.0), Some(-98.0), Some("OK")),
            row("8", Some(40.0), Some(-80.0), Some("PA")),
        ];
        let sites = vec![site(0, 33.0, -97.0)];

        let (events, summary) = join_nearest_site_reported(&rows, &sites).unwrap();
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "8"]);
        assert_eq!(summary.input_rows, 8);
        assert_eq!(summary.joined, 3);
        assert_eq!(summary.dropped, 5);
        assert_eq!(summary.dropped_by_reason["missing_latitude"], 1);
        assert_eq!(summary.dropped_by_reason["missing_longitude"], 1);
        assert_eq!(summary.dropped_by_reason["missing_state"], 2);
        assert_eq!(summary.dropped_by_reason["invalid_coordinate"], 1);
    }

    #[test]
    fn test_output_length_equals_input_when_all_valid() {
        let rows: Vec<_> = (0..20)
            .map(|i| row(&i.to_string(), Some(30.0 + i as f64 * 0.1), Some(-97.0), Some("TX")))
            .collect();
        let sites = vec![site(0, 31.0, -97.0)];
        let events = join_nearest_site(&rows, &sites).unwrap();
        assert_eq!(events.len(), rows.len());
    }

    #[test]
    fn test_state_is_trimmed() {
        let rows = vec![row("1", Some(32.0), Some(-97.0), Some(" TX "))];
        let sites = vec![site(0, 32.0, -97.0)];
        let events = join_nearest_site(&rows, &sites).unwrap();
        assert_eq!(events[0].state, "TX");
        assert_eq!(events[0].nearest_site_distance_km, 0.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rows: Vec<_> = (0..500)
            .map(|i| {
                let lat = 26.0 + (i % 23) as f64 * 0.9;
                let lon = -120.0 + (i % 41) as f64 * 1.3;
                let state = if i % 17 == 0 { None } else { Some("TX") };
                row(&i.to_string(), Some(lat), Some(lon), state)
            })
            .collect();
        let sites: Vec<_> = (0..50)
            .map(|i| site(i, 27.0 + (i % 7) as f64 * 2.5, -118.0 + (i % 11) as f64 * 4.0))
            .collect();

        let (seq, seq_summary) = join_nearest_site_reported(&rows, &sites).unwrap();
        let (par, par_summary) = join_nearest_site_parallel_reported(&rows, &sites).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq_summary, par_summary);
    }

    #[test]
    fn test_join_with_respects_threshold() {
        let rows = vec![row("1", Some(32.0), Some(-97.0), Some("TX"))];
        let sites = vec![site(0, 32.5, -97.0)];
        let config = JoinConfig {
            parallel: true,
            min_parallel_rows: 10,
        };
        let (events, summary) = join_with(&rows, &sites, &config).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(summary.joined, 1);
    }

    #[test]
    fn test_prejoined_distances() {
        let mut good = row("1", Some(32.0), Some(-97.0), Some("TX"));
        good.prejoined_distance_km = Some(4.25);
        let missing = row("2", Some(32.0), Some(-97.0), Some("TX"));
        let mut negative = row("3", Some(32.0), Some(-97.0), Some("TX"));
        negative.prejoined_distance_km = Some(-1.0);

        let (events, summary) = attach_prejoined_distances_reported(&[good, missing, negative]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].nearest_site_distance_km, 4.25);
        assert_eq!(events[0].nearest_site_index, None);
        assert_eq!(summary.dropped_by_reason["missing_distance"], 1);
        assert_eq!(summary.dropped_by_reason["invalid_distance"], 1);
    }
}
