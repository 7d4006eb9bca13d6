//! Next Train HTTP client.
//!
//! Fetches raw schedule bodies from the MTR Next Train API. Normalization
//! happens separately in [`super::convert`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::domain::{LineCode, StationCode};

use super::error::ScheduleError;

/// Default endpoint of the MTR Next Train API.
pub const DEFAULT_SCHEDULE_URL: &str = "https://rt.data.gov.hk/v1/transport/mtr/getSchedule.php";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the schedule client.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Endpoint URL; `line` and `sta` are appended as query parameters
    pub url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ScheduleConfig {
    /// Create a config pointing at the public endpoint.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_SCHEDULE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom endpoint URL (for testing).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Next Train API client.
///
/// Uses a semaphore to bound concurrent requests when several lines are
/// fetched at once.
#[derive(Debug, Clone)]
pub struct ScheduleClient {
    http: reqwest::Client,
    url: String,
    semaphore: Arc<Semaphore>,
}

impl ScheduleClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ScheduleConfig) -> Result<Self, ScheduleError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch the raw schedule body for a station on a line.
    ///
    /// Any non-2xx status is reported as [`ScheduleError::Status`]; the body
    /// is returned unparsed.
    pub async fn get_schedule(
        &self,
        line: &LineCode,
        station: &StationCode,
    ) -> Result<String, ScheduleError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ScheduleError::Status {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        tracing::debug!(%line, %station, "requesting schedule");

        let response = self
            .http
            .get(&self.url)
            .query(&[("line", line.as_str()), ("sta", station.as_str())])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScheduleError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}
