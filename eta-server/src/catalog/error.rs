//! Station catalog error types.

use std::path::PathBuf;

use crate::domain::{LineCode, StationCode};

/// Errors that can occur while loading the station catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not a JSON array of station rows
    #[error("catalog JSON parse error: {message}")]
    Json { message: String },

    /// A row failed validation
    #[error("invalid catalog row {index}: {reason}")]
    InvalidRow { index: usize, reason: String },

    /// The same (line, station) pair appears twice
    #[error("duplicate catalog entry for line {line} station {station}")]
    DuplicateRecord { line: LineCode, station: StationCode },
}

/// A station code that has no rows in the catalog.
///
/// Station codes passed to the catalog are expected to come from the catalog
/// itself, so this indicates a caller bug or a stale client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("station {0} not found in catalog")]
pub struct StationNotFound(pub StationCode);
