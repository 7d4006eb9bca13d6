//! Abstraction over where raw schedule bodies come from.

use std::future::Future;

use crate::domain::{LineCode, StationCode};

use super::client::ScheduleClient;
use super::error::ScheduleError;
use super::mock::MockScheduleClient;

/// A source of raw Next Train response bodies.
pub trait ScheduleSource: Send + Sync {
    /// Fetch the unparsed response body for `station` on `line`.
    fn fetch_raw(
        &self,
        line: &LineCode,
        station: &StationCode,
    ) -> impl Future<Output = Result<String, ScheduleError>> + Send;
}

impl ScheduleSource for ScheduleClient {
    async fn fetch_raw(
        &self,
        line: &LineCode,
        station: &StationCode,
    ) -> Result<String, ScheduleError> {
        self.get_schedule(line, station).await
    }
}

impl ScheduleSource for MockScheduleClient {
    async fn fetch_raw(
        &self,
        line: &LineCode,
        station: &StationCode,
    ) -> Result<String, ScheduleError> {
        self.get_schedule(line, station).await
    }
}

/// Runtime choice between the live API and canned responses.
#[derive(Clone)]
pub enum ScheduleBackend {
    Live(ScheduleClient),
    Mock(MockScheduleClient),
}

impl ScheduleBackend {
    pub fn name(&self) -> &'static str {
        match self {
            ScheduleBackend::Live(_) => "live",
            ScheduleBackend::Mock(_) => "mock",
        }
    }
}

impl ScheduleSource for ScheduleBackend {
    async fn fetch_raw(
        &self,
        line: &LineCode,
        station: &StationCode,
    ) -> Result<String, ScheduleError> {
        match self {
            ScheduleBackend::Live(client) => client.get_schedule(line, station).await,
            ScheduleBackend::Mock(client) => client.get_schedule(line, station).await,
        }
    }
}
