//! Table ingestion
//!
//! Fetches the well-site and earthquake tables (local files or HTTP URLs),
//! decodes them as Windows-1252, parses the CSV and maps the columns onto
//! [`WellSite`](crate::types::WellSite) and
//! [`RawEarthquakeRow`](crate::types::RawEarthquakeRow) records.

pub mod csv;
pub mod encoding;
pub mod fetch;
pub mod tables;

use thiserror::Error;

pub use encoding::{decode_cp1252, InvalidCp1252Byte};
pub use fetch::{load_tables, LoadedTables, SourceFetcher, TableFetcher, TableSource};
pub use tables::{parse_earthquake_rows, parse_well_sites};

/// Failure to obtain or read an input table. Fatal at startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to fetch {source_name}: {error}")]
    Http {
        source_name: String,
        #[source]
        error: reqwest::Error,
    },

    #[error("{source_name} returned HTTP {status}")]
    HttpStatus {
        source_name: String,
        status: reqwest::StatusCode,
    },

    #[error("{source_name} is not valid cp1252: {error}")]
    Encoding {
        source_name: String,
        #[source]
        error: InvalidCp1252Byte,
    },

    #[error("{source_name} has no header row")]
    EmptyTable { source_name: String },

    #[error("{source_name} is missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("no well-site sources configured")]
    NoSiteSources,
}
