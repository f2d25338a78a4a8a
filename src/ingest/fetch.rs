//! Table sources and the startup loader.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::csv::CsvTable;
use super::encoding::decode_cp1252;
use super::tables::{parse_earthquake_rows, parse_well_sites};
use super::DataLoadError;
use crate::config::{DataConfig, DistanceMode};
use crate::types::{RawEarthquakeRow, WellSite};

/// Where a table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Local(PathBuf),
    Remote(String),
}

impl TableSource {
    /// `http://` and `https://` locations are remote, anything else is a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Remote(location.to_string())
        } else {
            Self::Local(PathBuf::from(location))
        }
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// Retrieves the raw bytes of a table.
#[async_trait]
pub trait TableFetcher: Send + Sync {
    async fn fetch(&self, source: &TableSource) -> Result<Vec<u8>, DataLoadError>;
}

/// Reads local files with `tokio::fs` and remote tables with `reqwest`.
#[derive(Clone)]
pub struct SourceFetcher {
    http: reqwest::Client,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self, DataLoadError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DataLoadError::HttpClient)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl TableFetcher for SourceFetcher {
    async fn fetch(&self, source: &TableSource) -> Result<Vec<u8>, DataLoadError> {
        match source {
            TableSource::Local(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|error| DataLoadError::Io {
                        source_name: source.to_string(),
                        error,
                    })
            }
            TableSource::Remote(url) => {
                let http_err = |error| DataLoadError::Http {
                    source_name: source.to_string(),
                    error,
                };
                let resp = self.http.get(url).send().await.map_err(http_err)?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(DataLoadError::HttpStatus {
                        source_name: source.to_string(),
                        status,
                    });
                }
                let body = resp.bytes().await.map_err(http_err)?;
                Ok(body.to_vec())
            }
        }
    }
}

/// Fetch, decode and parse one table.
async fn fetch_table(
    fetcher: &dyn TableFetcher,
    source: &TableSource,
) -> Result<CsvTable, DataLoadError> {
    let bytes = fetcher.fetch(source).await?;
    let text = decode_cp1252(&bytes).map_err(|error| DataLoadError::Encoding {
        source_name: source.to_string(),
        error,
    })?;
    CsvTable::parse(&text).ok_or_else(|| DataLoadError::EmptyTable {
        source_name: source.to_string(),
    })
}

/// Everything read from the configured sources, before the join.
#[derive(Debug, Clone, Default)]
pub struct LoadedTables {
    /// All well-site tables concatenated in configuration order
    pub sites: Vec<WellSite>,
    pub rows: Vec<RawEarthquakeRow>,
}

/// Load every configured table. Any failure aborts the whole load.
pub async fn load_tables(
    config: &DataConfig,
    fetcher: &dyn TableFetcher,
) -> Result<LoadedTables, DataLoadError> {
    if config.well_sites.is_empty() {
        return Err(DataLoadError::NoSiteSources);
    }

    let mut sites = Vec::new();
    for location in &config.well_sites {
        let source = TableSource::parse(location);
        let table = fetch_table(fetcher, &source).await?;
        let parsed = parse_well_sites(&table, &source.to_string(), sites.len())?;
        info!(source = %source, sites = parsed.len(), "Loaded well-site table");
        sites.extend(parsed);
    }

    let source = TableSource::parse(&config.earthquakes);
    let table = fetch_table(fetcher, &source).await?;
    let require_distance = config.distance_mode == DistanceMode::Prejoined;
    let rows = parse_earthquake_rows(&table, &source.to_string(), require_distance)?;
    info!(source = %source, rows = rows.len(), "Loaded earthquake table");

    Ok(LoadedTables { sites, rows })
}
