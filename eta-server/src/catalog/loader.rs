//! Loading the station catalog from its JSON file.
//!
//! The file is a flat array of rows in the `mtr_location.json` format:
//!
//! ```json
//! [{ "line": "TWL", "line_name": "Tsuen Wan Line", "sta": "TST",
//!    "sta_name": "Tsim Sha Tsui", "latitude": 22.2975, "longitude": 114.1722 }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, LineCode, StationCode};

use super::error::CatalogError;
use super::table::{StationCatalog, StationRecord};

/// One row of the catalog file, as written on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationRow {
    pub line: String,
    pub line_name: String,
    pub sta: String,
    pub sta_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&StationRecord> for StationRow {
    fn from(record: &StationRecord) -> Self {
        Self {
            line: record.line.to_string(),
            line_name: record.line_name.clone(),
            sta: record.station.to_string(),
            sta_name: record.station_name.clone(),
            latitude: record.coordinate.latitude(),
            longitude: record.coordinate.longitude(),
        }
    }
}

impl StationCatalog {
    /// Load and validate a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            rows = catalog.len(),
            stations = catalog.station_count(),
            "loaded station catalog"
        );
        Ok(catalog)
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let rows: Vec<StationRow> = serde_json::from_str(json).map_err(|e| CatalogError::Json {
            message: e.to_string(),
        })?;
        Self::from_rows(rows)
    }

    /// Convert raw rows into a catalog, failing on the first invalid row.
    pub fn from_rows(rows: Vec<StationRow>) -> Result<Self, CatalogError> {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| convert_row(index, row))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(records)
    }
}

fn convert_row(index: usize, row: StationRow) -> Result<StationRecord, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidRow { index, reason };

    let line = LineCode::parse(&row.line).map_err(|e| invalid(e.to_string()))?;
    let station = StationCode::parse(&row.sta).map_err(|e| invalid(e.to_string()))?;
    let coordinate =
        Coordinate::new(row.latitude, row.longitude).map_err(|e| invalid(e.to_string()))?;

    Ok(StationRecord {
        line,
        line_name: row.line_name,
        station,
        station_name: row.sta_name,
        coordinate,
    })
}
