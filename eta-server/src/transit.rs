//! The operations a presentation layer calls: find the nearest station,
//! list the lines serving it, and fetch arrival estimates.

use std::sync::Arc;

use futures::future::join_all;

use crate::catalog::{LinePolicy, StationCatalog, StationNotFound};
use crate::domain::{ArrivalRecord, LineCode, StationCode};
use crate::schedule::{ScheduleError, ScheduleSource, normalize};

/// Arrival estimates for one of a station's lines.
#[derive(Debug)]
pub struct LineArrivals {
    pub line: LineCode,
    pub result: Result<ArrivalRecord, ScheduleError>,
}

/// Station lookup and arrival estimates over a catalog and a schedule source.
pub struct Transit<S> {
    catalog: Arc<StationCatalog>,
    source: S,
    policy: LinePolicy,
}

impl<S: ScheduleSource> Transit<S> {
    pub fn new(catalog: Arc<StationCatalog>, source: S) -> Self {
        Self {
            catalog,
            source,
            policy: LinePolicy::default(),
        }
    }

    /// Override how the initial line of a multi-line station is chosen.
    pub fn with_policy(mut self, policy: LinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> &LinePolicy {
        &self.policy
    }

    /// Nearest station to a raw position. Invalid positions and an empty
    /// catalog yield `None`.
    pub fn resolve_nearest(&self, latitude: f64, longitude: f64) -> Option<StationCode> {
        self.catalog.resolve_nearest(latitude, longitude)
    }

    /// Lines serving a station, in catalog order.
    pub fn lines_for_station(&self, station: &StationCode) -> Result<Vec<LineCode>, StationNotFound> {
        self.catalog.lines_for_station(station)
    }

    pub fn is_multi_line(&self, station: &StationCode) -> bool {
        self.catalog.is_multi_line(station)
    }

    /// The line to fetch first for a station, per the configured policy.
    pub fn default_line(&self, station: &StationCode) -> Result<LineCode, StationNotFound> {
        let lines = self.lines_for_station(station)?;
        self.policy
            .choose(&lines)
            .ok_or(StationNotFound(*station))
    }

    /// Fetch and normalize the next arrivals for `station` on `line`.
    ///
    /// Fails only when the schedule is unavailable or unparsable; a station
    /// with no trains in either direction is a successful, empty record.
    pub async fn fetch_arrivals(
        &self,
        line: &LineCode,
        station: &StationCode,
    ) -> Result<ArrivalRecord, ScheduleError> {
        let body = self.source.fetch_raw(line, station).await.inspect_err(|e| {
            tracing::warn!(%line, %station, error = %e, "schedule fetch failed");
        })?;

        let record = normalize(&body, line, station, &self.catalog).inspect_err(|e| {
            tracing::warn!(%line, %station, error = %e, "schedule response rejected");
        })?;

        tracing::debug!(
            %line,
            %station,
            up = ?record.up_destination(),
            down = ?record.down_destination(),
            "arrivals fetched"
        );
        Ok(record)
    }

    /// Fetch arrivals for every line serving a station, concurrently.
    ///
    /// Results are in catalog line order; a failure on one line does not
    /// affect the others.
    pub async fn fetch_arrivals_for_station(
        &self,
        station: &StationCode,
    ) -> Result<Vec<LineArrivals>, StationNotFound> {
        let lines = self.lines_for_station(station)?;

        let results = join_all(lines.iter().map(|line| self.fetch_arrivals(line, station))).await;

        Ok(lines
            .into_iter()
            .zip(results)
            .map(|(line, result)| LineArrivals { line, result })
            .collect())
    }
}
