//! In-memory station catalog and line lookup.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Coordinate, LineCode, StationCode};

use super::error::{CatalogError, StationNotFound};

/// One catalog row: a station as served by a single line.
///
/// A physical station served by several lines appears once per line, with
/// identical coordinates and station name. Identity is `(line, station)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    pub line: LineCode,
    pub line_name: String,
    pub station: StationCode,
    pub station_name: String,
    pub coordinate: Coordinate,
}

/// All stations of one line, in catalog order.
#[derive(Debug, Clone)]
pub struct LineGroup<'a> {
    pub line: LineCode,
    pub line_name: &'a str,
    pub stations: Vec<&'a StationRecord>,
}

/// Read-only station table, loaded once at startup.
///
/// Rows keep their file order; every lookup that returns several rows
/// returns them in that order.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    records: Vec<StationRecord>,
    /// Row indices per station code, ascending.
    by_station: HashMap<StationCode, Vec<usize>>,
}

impl StationCatalog {
    /// Build a catalog from validated records.
    ///
    /// Fails if the same `(line, station)` pair occurs more than once.
    pub fn new(records: Vec<StationRecord>) -> Result<Self, CatalogError> {
        let mut by_station: HashMap<StationCode, Vec<usize>> = HashMap::new();

        for (index, record) in records.iter().enumerate() {
            let rows = by_station.entry(record.station).or_default();
            if rows.iter().any(|&i| records[i].line == record.line) {
                return Err(CatalogError::DuplicateRecord {
                    line: record.line,
                    station: record.station,
                });
            }
            rows.push(index);
        }

        Ok(Self {
            records,
            by_station,
        })
    }

    /// Number of rows (not distinct stations).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All rows in catalog order.
    pub fn records(&self) -> &[StationRecord] {
        &self.records
    }

    /// Number of distinct station codes.
    pub fn station_count(&self) -> usize {
        self.by_station.len()
    }

    /// Look up the row for a station on a specific line.
    pub fn get(&self, line: &LineCode, station: &StationCode) -> Option<&StationRecord> {
        self.rows_for_station(station).find(|r| &r.line == line)
    }

    /// All rows for a station, one per serving line.
    pub fn rows_for_station<'a>(
        &'a self,
        station: &StationCode,
    ) -> impl Iterator<Item = &'a StationRecord> + 'a {
        self.by_station
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.records[i])
    }

    pub fn contains_station(&self, station: &StationCode) -> bool {
        self.by_station.contains_key(station)
    }

    /// Human-readable name of a station, taken from its first row.
    pub fn station_name(&self, station: &StationCode) -> Option<&str> {
        self.rows_for_station(station)
            .next()
            .map(|r| r.station_name.as_str())
    }

    pub fn station_coordinate(&self, station: &StationCode) -> Option<Coordinate> {
        self.rows_for_station(station).next().map(|r| r.coordinate)
    }

    /// Human-readable name of a line.
    pub fn line_name(&self, line: &LineCode) -> Option<&str> {
        self.records
            .iter()
            .find(|r| &r.line == line)
            .map(|r| r.line_name.as_str())
    }

    /// Lines serving a station, in catalog order.
    ///
    /// Never empty on success. A station with no rows is reported as
    /// [`StationNotFound`] rather than an empty list.
    pub fn lines_for_station(&self, station: &StationCode) -> Result<Vec<LineCode>, StationNotFound> {
        let lines: Vec<LineCode> = self.rows_for_station(station).map(|r| r.line).collect();
        if lines.is_empty() {
            return Err(StationNotFound(*station));
        }
        Ok(lines)
    }

    /// True if more than one line serves the station. Unknown stations are
    /// not multi-line.
    pub fn is_multi_line(&self, station: &StationCode) -> bool {
        self.by_station
            .get(station)
            .is_some_and(|rows| rows.len() > 1)
    }

    /// Group rows by line, lines in order of first appearance.
    pub fn by_line(&self) -> Vec<LineGroup<'_>> {
        let mut groups: Vec<LineGroup<'_>> = Vec::new();
        let mut positions: HashMap<LineCode, usize> = HashMap::new();

        for record in &self.records {
            let pos = *positions.entry(record.line).or_insert_with(|| {
                groups.push(LineGroup {
                    line: record.line,
                    line_name: &record.line_name,
                    stations: Vec::new(),
                });
                groups.len() - 1
            });
            groups[pos].stations.push(record);
        }

        groups
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn record(line: &str, station: &str, name: &str, lat: f64, lon: f64) -> StationRecord {
        StationRecord {
            line: LineCode::parse(line).unwrap(),
            line_name: format!("{line} Line"),
            station: StationCode::parse(station).unwrap(),
            station_name: name.to_string(),
            coordinate: Coordinate::new(lat, lon).unwrap(),
        }
    }

    /// A small slice of the Kowloon / Island network with two interchanges.
    pub fn sample_catalog() -> StationCatalog {
        StationCatalog::new(vec![
            record("TWL", "TST", "Tsim Sha Tsui", 22.2975, 114.1722),
            record("EAL", "TST", "Tsim Sha Tsui", 22.2975, 114.1722),
            record("TWL", "JOR", "Jordan", 22.3049, 114.1717),
            record("TWL", "ADM", "Admiralty", 22.2790, 114.1648),
            record("ISL", "ADM", "Admiralty", 22.2790, 114.1648),
            record("EAL", "ADM", "Admiralty", 22.2790, 114.1648),
            record("TWL", "CEN", "Central", 22.2820, 114.1588),
            record("EAL", "HUH", "Hung Hom", 22.3030, 114.1817),
        ])
        .unwrap()
    }
}
