//! Nearest-station resolution.
//!
//! A linear scan over the catalog. The catalog is a few hundred rows, so
//! there is no spatial index.

use std::collections::HashSet;

use crate::domain::{Coordinate, StationCode, distance_km};

use super::table::{StationCatalog, StationRecord};

/// A station together with its distance from the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestStation<'a> {
    pub record: &'a StationRecord,
    pub distance_km: f64,
}

/// Find the row closest to `point`.
///
/// Only a strictly smaller distance replaces the current best, so the first
/// row in iteration order wins ties. Rows of the same physical station share
/// coordinates and therefore never displace each other. Returns `None` for
/// an empty slice.
pub fn nearest<'a>(point: &Coordinate, records: &'a [StationRecord]) -> Option<NearestStation<'a>> {
    let mut best: Option<NearestStation<'a>> = None;

    for record in records {
        let distance = distance_km(point, &record.coordinate);
        if best.is_none_or(|b| distance < b.distance_km) {
            best = Some(NearestStation {
                record,
                distance_km: distance,
            });
        }
    }

    best
}

impl StationCatalog {
    /// The catalog row closest to `point`, or `None` for an empty catalog.
    pub fn nearest(&self, point: &Coordinate) -> Option<NearestStation<'_>> {
        nearest(point, self.records())
    }

    /// Resolve raw latitude/longitude to the nearest station code.
    ///
    /// Invalid input (NaN, out of range) degrades to `None` instead of an
    /// error, as does an empty catalog.
    pub fn resolve_nearest(&self, latitude: f64, longitude: f64) -> Option<StationCode> {
        let point = match Coordinate::new(latitude, longitude) {
            Ok(point) => point,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid position");
                return None;
            }
        };

        self.nearest(&point).map(|n| n.record.station)
    }

    /// Up to `limit` distinct stations ordered by distance from `point`.
    ///
    /// Each physical station appears once, represented by its first catalog
    /// row. Equal distances keep catalog order.
    pub fn nearby(&self, point: &Coordinate, limit: usize) -> Vec<NearestStation<'_>> {
        let mut seen = HashSet::new();
        let mut stations: Vec<NearestStation<'_>> = self
            .records()
            .iter()
            .filter(|r| seen.insert(r.station))
            .map(|record| NearestStation {
                record,
                distance_km: distance_km(point, &record.coordinate),
            })
            .collect();

        // Stable sort preserves catalog order for ties
        stations.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        stations.truncate(limit);
        stations
    }
}

#[cfg(test)]
mod tests {
    use super::super::table::test_support::{record, sample_catalog};
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn empty_catalog_has_no_nearest() {
        let catalog = StationCatalog::default();
        assert!(catalog.nearest(&coord(22.3, 114.17)).is_none());
        assert_eq!(catalog.resolve_nearest(22.3, 114.17), None);
        assert!(nearest(&coord(0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn single_station_always_wins() {
        let records = vec![record("TWL", "TST", "Tsim Sha Tsui", 22.2975, 114.1722)];
        for (lat, lon) in [(22.3, 114.17), (-33.86, 151.2), (51.5, -0.12), (90.0, 0.0)] {
            let found = nearest(&coord(lat, lon), &records).unwrap();
            assert_eq!(found.record.station.as_str(), "TST");
        }
    }

    #[test]
    fn picks_closest_station() {
        let catalog = sample_catalog();

        // Standing on Nathan Road near Jordan
        let found = catalog.nearest(&coord(22.3045, 114.1718)).unwrap();
        assert_eq!(found.record.station.as_str(), "JOR");

        // Near Central pier
        let code = catalog.resolve_nearest(22.2830, 114.1580).unwrap();
        assert_eq!(code.as_str(), "CEN");
    }

    #[test]
    fn multi_line_station_resolves_to_first_row() {
        let catalog = sample_catalog();
        let found = catalog.nearest(&coord(22.2976, 114.1722)).unwrap();
        assert_eq!(found.record.station.as_str(), "TST");
        assert_eq!(found.record.line.as_str(), "TWL");
    }

    #[test]
    fn first_row_wins_exact_tie() {
        let records = vec![
            record("TWL", "AAA", "First", 22.0, 114.0),
            record("TWL", "BBB", "Second", 22.0, 114.0),
        ];
        let found = nearest(&coord(22.1, 114.1), &records).unwrap();
        assert_eq!(found.record.station.as_str(), "AAA");
    }

    #[test]
    fn invalid_input_resolves_to_none() {
        let catalog = sample_catalog();
        assert_eq!(catalog.resolve_nearest(f64::NAN, 114.17), None);
        assert_eq!(catalog.resolve_nearest(22.3, f64::NAN), None);
        assert_eq!(catalog.resolve_nearest(200.0, 114.17), None);
    }

    #[test]
    fn nearby_deduplicates_and_sorts() {
        let catalog = sample_catalog();
        let found = catalog.nearby(&coord(22.2976, 114.1722), 10);

        let codes: Vec<&str> = found.iter().map(|n| n.record.station.as_str()).collect();
        assert_eq!(codes.len(), catalog.station_count());
        assert_eq!(codes[0], "TST");
        assert_eq!(codes.iter().filter(|c| **c == "TST").count(), 1);
        assert_eq!(codes.iter().filter(|c| **c == "ADM").count(), 1);

        for pair in found.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
    }

    #[test]
    fn nearby_respects_limit() {
        let catalog = sample_catalog();
        assert_eq!(catalog.nearby(&coord(22.3, 114.17), 2).len(), 2);
        assert!(catalog.nearby(&coord(22.3, 114.17), 0).is_empty());
    }
}
