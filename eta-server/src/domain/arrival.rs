//! Normalized arrival estimates for a station.

use serde::Serialize;

use super::StationCode;

/// The next train in one direction of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionArrival {
    /// Human-readable name of the train's destination station.
    pub destination: String,
    /// Whole minutes until arrival, relative to the server's clock.
    /// May be zero or negative for a train that is already at the platform.
    pub eta_minutes: i64,
}

/// Next arrivals at a station for one line, one entry per direction.
///
/// A direction is `None` when no service runs that way (or its destination
/// could not be named). The destination and its ETA are always present or
/// absent together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalRecord {
    pub station: StationCode,
    pub up: Option<DirectionArrival>,
    pub down: Option<DirectionArrival>,
}

impl ArrivalRecord {
    /// A record with both directions cleared.
    pub fn empty(station: StationCode) -> Self {
        Self {
            station,
            up: None,
            down: None,
        }
    }

    pub fn up_destination(&self) -> Option<&str> {
        self.up.as_ref().map(|a| a.destination.as_str())
    }

    /// Minutes until the next up train; 0 when there is none.
    pub fn up_eta_minutes(&self) -> i64 {
        self.up.as_ref().map_or(0, |a| a.eta_minutes)
    }

    pub fn down_destination(&self) -> Option<&str> {
        self.down.as_ref().map(|a| a.destination.as_str())
    }

    /// Minutes until the next down train; 0 when there is none.
    pub fn down_eta_minutes(&self) -> i64 {
        self.down.as_ref().map_or(0, |a| a.eta_minutes)
    }

    /// True when neither direction has a scheduled service.
    pub fn has_no_service(&self) -> bool {
        self.up.is_none() && self.down.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station() -> StationCode {
        StationCode::parse("TST").unwrap()
    }

    #[test]
    fn empty_record_has_cleared_fields() {
        let record = ArrivalRecord::empty(station());
        assert!(record.has_no_service());
        assert_eq!(record.up_destination(), None);
        assert_eq!(record.up_eta_minutes(), 0);
        assert_eq!(record.down_destination(), None);
        assert_eq!(record.down_eta_minutes(), 0);
    }

    #[test]
    fn accessors_read_populated_direction() {
        let record = ArrivalRecord {
            up: Some(DirectionArrival {
                destination: "Tsuen Wan".into(),
                eta_minutes: 4,
            }),
            ..ArrivalRecord::empty(station())
        };

        assert!(!record.has_no_service());
        assert_eq!(record.up_destination(), Some("Tsuen Wan"));
        assert_eq!(record.up_eta_minutes(), 4);
        assert_eq!(record.down_destination(), None);
    }
}
