//! Synthetic well-site and earthquake tables.
//!
//! Produces a reproducible dataset clustered around real US shale plays, for
//! running the dashboard offline and for tests. Earthquakes are scattered
//! around the well clusters with magnitudes that fall off slowly with distance
//! from the cluster center, so the per-state scatter plots show a trend.

use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::ingest::LoadedTables;
use crate::types::{GeoPoint, RawEarthquakeRow, WellSite};

/// A shale play: state code, display name, nearby town, cluster center.
struct Play {
    state: &'static str,
    state_name: &'static str,
    town: &'static str,
    center: (f64, f64),
    /// Spread of the well cluster (degrees)
    spread: f64,
}

const PLAYS: &[Play] = &[
    Play { state: "TX", state_name: "Texas", town: "Pecos", center: (31.42, -103.49), spread: 0.9 },
    Play { state: "TX", state_name: "Texas", town: "Karnes City", center: (28.88, -97.90), spread: 0.6 },
    Play { state: "OK", state_name: "Oklahoma", town: "Pawnee", center: (36.34, -96.80), spread: 0.8 },
    Play { state: "KS", state_name: "Kansas", town: "Harper", center: (37.29, -98.03), spread: 0.5 },
    Play { state: "PA", state_name: "Pennsylvania", town: "Towanda", center: (41.77, -76.44), spread: 0.6 },
    Play { state: "ND", state_name: "North Dakota", town: "Watford City", center: (47.80, -103.28), spread: 0.7 },
    Play { state: "CO", state_name: "Colorado", town: "Greeley", center: (40.42, -104.71), spread: 0.4 },
    Play { state: "NM", state_name: "New Mexico", town: "Carlsbad", center: (32.42, -104.23), spread: 0.5 },
];

const DIRECTIONS: &[&str] = &["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

const OPERATORS: &[&str] = &[
    "Permian Resources",
    "Prairie Ridge Energy",
    "Keystone Gas",
    "Bakken Basin Operating",
    "Front Range Oil",
];

/// Generator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticOptions {
    pub seed: u64,
    pub sites_per_play: usize,
    pub events_per_play: usize,
    /// Every n-th earthquake row loses its state, exercising the row filter
    pub drop_state_every: Option<usize>,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        use crate::config::defaults;
        Self {
            seed: defaults::SYNTHETIC_SEED,
            sites_per_play: defaults::SYNTHETIC_SITES_PER_STATE,
            events_per_play: defaults::SYNTHETIC_EVENTS_PER_STATE,
            drop_state_every: Some(50),
        }
    }
}

fn normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std_dev * z
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Generate well sites and raw earthquake rows.
pub fn generate(options: &SyntheticOptions) -> LoadedTables {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut sites = Vec::with_capacity(PLAYS.len() * options.sites_per_play);
    let mut rows = Vec::with_capacity(PLAYS.len() * options.events_per_play);

    for play in PLAYS {
        let (lat0, lon0) = play.center;

        for _ in 0..options.sites_per_play {
            let lat = round_to(normal(&mut rng, lat0, play.spread), 5);
            let lon = round_to(normal(&mut rng, lon0, play.spread), 5);
            sites.push(WellSite {
                id: sites.len(),
                location: GeoPoint::clamped(lat, lon),
                operator: OPERATORS.choose(&mut rng).map(|s| s.to_string()),
                state: Some(play.state.to_string()),
            });
        }

        for _ in 0..options.events_per_play {
            // Wider than the well cluster so some events sit far from any site.
            let lat = round_to(normal(&mut rng, lat0, play.spread * 1.8), 4);
            let lon = round_to(normal(&mut rng, lon0, play.spread * 1.8), 4);
            let offset_deg = ((lat - lat0).powi(2) + (lon - lon0).powi(2)).sqrt();
            let magnitude = (normal(&mut rng, 3.0, 0.45) - 0.35 * offset_deg).clamp(1.0, 6.5);

            let n = rows.len();
            let state = match options.drop_state_every {
                Some(every) if every > 0 && (n + 1) % every == 0 => None,
                _ => Some(play.state.to_string()),
            };
            let km = rng.gen_range(1..40);
            let direction = DIRECTIONS.choose(&mut rng).copied().unwrap_or("N");
            rows.push(RawEarthquakeRow {
                id: format!("syn{n:05}"),
                latitude: Some(lat),
                longitude: Some(lon),
                magnitude: Some(round_to(magnitude, 1)),
                place: format!("{km} km {direction} of {}, {}", play.town, play.state_name),
                state,
                prejoined_distance_km: None,
            });
        }
    }

    LoadedTables { sites, rows }
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn opt_str(value: Option<&str>) -> String {
    value.map(csv_field).unwrap_or_default()
}

fn opt_num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Well sites as CSV with a `latitude,longitude,operator,state` header.
pub fn sites_to_csv(sites: &[WellSite]) -> String {
    let mut out = String::from("latitude,longitude,operator,state\n");
    for site in sites {
        out.push_str(&format!(
            "{},{},{},{}\n",
            site.location.latitude(),
            site.location.longitude(),
            opt_str(site.operator.as_deref()),
            opt_str(site.state.as_deref()),
        ));
    }
    out
}

/// Earthquake rows as CSV with an `id,latitude,longitude,mag,place,state` header.
///
/// A `min_site_distances` column is written when any row carries one.
pub fn rows_to_csv(rows: &[RawEarthquakeRow]) -> String {
    let with_distance = rows.iter().any(|r| r.prejoined_distance_km.is_some());
    let mut out = String::from("id,latitude,longitude,mag,place,state");
    if with_distance {
        out.push_str(",min_site_distances");
    }
    out.push('\n');

    for row in rows {
        let mut fields = vec![
            csv_field(&row.id),
            opt_num(row.latitude),
            opt_num(row.longitude),
            opt_num(row.magnitude),
            csv_field(&row.place),
            opt_str(row.state.as_deref()),
        ];
        if with_distance {
            fields.push(opt_num(row.prejoined_distance_km));
        }
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}
