//! Column mapping from parsed CSV tables to typed records.

use tracing::{debug, warn};

use super::csv::{field, numeric_field, CsvTable};
use super::DataLoadError;
use crate::types::{GeoPoint, RawEarthquakeRow, WellSite};

const LATITUDE: &[&str] = &["latitude", "lat"];
const LONGITUDE: &[&str] = &["longitude", "lon", "long"];
const STATE: &[&str] = &["state"];
const OPERATOR: &[&str] = &["operator", "operator_name"];
const ID: &[&str] = &["id"];
const MAGNITUDE: &[&str] = &["mag", "magnitude"];
const PLACE: &[&str] = &["place"];
const DISTANCE: &[&str] = &["min_site_distances", "min_site_distance"];

fn require(
    table: &CsvTable,
    candidates: &[&str],
    column: &'static str,
    source_name: &str,
) -> Result<usize, DataLoadError> {
    table
        .column_index(candidates)
        .ok_or_else(|| DataLoadError::MissingColumn {
            source_name: source_name.to_string(),
            column,
        })
}

/// Map a well-site table onto [`WellSite`] records.
///
/// Ids continue from `first_id` so several tables can be concatenated.
/// Rows without a valid coordinate cannot serve as a reference point and
/// are skipped.
pub fn parse_well_sites(
    table: &CsvTable,
    source_name: &str,
    first_id: usize,
) -> Result<Vec<WellSite>, DataLoadError> {
    let lat = require(table, LATITUDE, "latitude", source_name)?;
    let lon = require(table, LONGITUDE, "longitude", source_name)?;
    let operator = table.column_index(OPERATOR);
    let state = table.column_index(STATE);

    let mut sites = Vec::with_capacity(table.len());
    let mut skipped = 0usize;
    for row in &table.rows {
        let location = match (numeric_field(row, Some(lat)), numeric_field(row, Some(lon))) {
            (Some(la), Some(lo)) => GeoPoint::new(la, lo).ok(),
            _ => None,
        };
        let Some(location) = location else {
            skipped += 1;
            continue;
        };
        sites.push(WellSite {
            id: first_id + sites.len(),
            location,
            operator: field(row, operator).map(str::to_string),
            state: field(row, state).map(str::to_string),
        });
    }

    if skipped > 0 {
        warn!(source = source_name, skipped, "Skipped well sites without a valid coordinate");
    }
    debug!(source = source_name, sites = sites.len(), "Parsed well-site table");
    Ok(sites)
}

/// Map an earthquake table onto raw rows; validation happens in the join.
///
/// `require_distance` demands the pre-joined distance column.
pub fn parse_earthquake_rows(
    table: &CsvTable,
    source_name: &str,
    require_distance: bool,
) -> Result<Vec<RawEarthquakeRow>, DataLoadError> {
    let lat = require(table, LATITUDE, "latitude", source_name)?;
    let lon = require(table, LONGITUDE, "longitude", source_name)?;
    let state = require(table, STATE, "state", source_name)?;
    let distance = if require_distance {
        Some(require(table, DISTANCE, "min_site_distances", source_name)?)
    } else {
        table.column_index(DISTANCE)
    };
    let id = table.column_index(ID);
    let magnitude = table.column_index(MAGNITUDE);
    let place = table.column_index(PLACE);

    let rows: Vec<RawEarthquakeRow> = table
        .rows
        .iter()
        .enumerate()
        .map(|(n, row)| RawEarthquakeRow {
            id: field(row, id).map_or_else(|| n.to_string(), str::to_string),
            latitude: numeric_field(row, Some(lat)),
            longitude: numeric_field(row, Some(lon)),
            magnitude: numeric_field(row, magnitude),
            place: field(row, place).unwrap_or_default().to_string(),
            state: field(row, Some(state)).map(str::to_string),
            prejoined_distance_km: numeric_field(row, distance),
        })
        .collect();

    debug!(source = source_name, rows = rows.len(), "Parsed earthquake table");
    Ok(rows)
}
