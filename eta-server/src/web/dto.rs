//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::catalog::{NearestStation, StationRecord};
use crate::domain::{ArrivalRecord, LineCode, StationCode};

/// Query for the station nearest a position.
///
/// Kept as strings so an unparsable coordinate gets the same "no station"
/// answer as an out-of-range one.
#[derive(Debug, Deserialize)]
pub struct NearestRequest {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl NearestRequest {
    pub fn position(&self) -> Option<(f64, f64)> {
        let lat = self.lat.as_deref()?.trim().parse().ok()?;
        let lon = self.lon.as_deref()?.trim().parse().ok()?;
        Some((lat, lon))
    }
}

#[derive(Debug, Serialize)]
pub struct NearestResponse {
    /// `null` when no station could be resolved.
    pub station: Option<StationCode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl NearestResponse {
    pub fn none() -> Self {
        Self {
            station: None,
            station_name: None,
            distance_km: None,
        }
    }
}

impl From<NearestStation<'_>> for NearestResponse {
    fn from(nearest: NearestStation<'_>) -> Self {
        Self {
            station: Some(nearest.record.station),
            station_name: Some(nearest.record.station_name.clone()),
            distance_km: Some(nearest.distance_km),
        }
    }
}

/// One row of the catalog, as served to map front-ends.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub line: LineCode,
    pub line_name: String,
    pub station: StationCode,
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&StationRecord> for StationResult {
    fn from(record: &StationRecord) -> Self {
        Self {
            line: record.line,
            line_name: record.line_name.clone(),
            station: record.station,
            station_name: record.station_name.clone(),
            latitude: record.coordinate.latitude(),
            longitude: record.coordinate.longitude(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StationListResponse {
    pub stations: Vec<StationResult>,
}

#[derive(Debug, Serialize)]
pub struct LineResult {
    pub line: LineCode,
    pub line_name: String,
}

/// Lines serving a station.
#[derive(Debug, Serialize)]
pub struct StationLinesResponse {
    pub station: StationCode,
    pub station_name: String,
    pub lines: Vec<LineResult>,

    /// True when the client should offer a line picker.
    pub multi_line: bool,

    /// The line to show first.
    pub default_line: LineCode,
}

#[derive(Debug, Deserialize)]
pub struct ArrivalsRequest {
    pub line: String,
    pub sta: String,
}

/// Flat rendering of an [`ArrivalRecord`].
///
/// ETA fields are 0 when the matching destination is `null`.
#[derive(Debug, Serialize)]
pub struct ArrivalsResponse {
    pub station: StationCode,
    pub up_destination: Option<String>,
    pub up_eta_minutes: i64,
    pub down_destination: Option<String>,
    pub down_eta_minutes: i64,
}

impl From<&ArrivalRecord> for ArrivalsResponse {
    fn from(record: &ArrivalRecord) -> Self {
        Self {
            station: record.station,
            up_destination: record.up_destination().map(String::from),
            up_eta_minutes: record.up_eta_minutes(),
            down_destination: record.down_destination().map(String::from),
            down_eta_minutes: record.down_eta_minutes(),
        }
    }
}

/// Arrivals on one line of a station, or why they are missing.
#[derive(Debug, Serialize)]
pub struct LineArrivalsResult {
    pub line: LineCode,
    pub line_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrivals: Option<ArrivalsResponse>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StationArrivalsResponse {
    pub station: StationCode,
    pub station_name: String,
    pub lines: Vec<LineArrivalsResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
