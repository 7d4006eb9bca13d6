//! Server configuration, read once from the environment at start-up.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;

use crate::catalog::LinePolicy;
use crate::domain::LineCode;
use crate::schedule::{DEFAULT_SCHEDULE_URL, ScheduleConfig};

/// Default location of the bundled station catalog.
pub const DEFAULT_CATALOG_PATH: &str = "data/mtr_location.json";

const DEFAULT_LISTEN_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

/// A configuration variable that was set but could not be used.
#[derive(Debug, thiserror::Error)]
#[error("invalid value {value:?} for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Station catalog JSON file.
    pub catalog_path: PathBuf,

    /// Next Train endpoint.
    pub schedule_url: String,

    /// Serve canned responses from this directory instead of calling the API.
    pub mock_schedules: Option<PathBuf>,

    pub listen_addr: SocketAddr,

    /// Schedule request timeout (seconds).
    pub timeout_secs: u64,

    /// Maximum concurrent schedule requests.
    pub max_concurrent: usize,

    /// Lines to prefer when a station is served by several.
    pub preferred_lines: Vec<LineCode>,

    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let schedule = ScheduleConfig::default();
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            schedule_url: DEFAULT_SCHEDULE_URL.to_string(),
            mock_schedules: None,
            listen_addr: SocketAddr::from(DEFAULT_LISTEN_ADDR),
            timeout_secs: schedule.timeout_secs,
            max_concurrent: schedule.max_concurrent,
            preferred_lines: Vec::new(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Read `ETA_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from any variable lookup. Unset or blank variables keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get("ETA_CATALOG_PATH") {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(url) = get("ETA_SCHEDULE_URL") {
            config.schedule_url = url;
        }
        if let Some(dir) = get("ETA_MOCK_SCHEDULES") {
            config.mock_schedules = Some(PathBuf::from(dir));
        }
        if let Some(addr) = get("ETA_LISTEN_ADDR") {
            config.listen_addr = parse_value("ETA_LISTEN_ADDR", &addr)?;
        }
        if let Some(secs) = get("ETA_TIMEOUT_SECS") {
            config.timeout_secs = parse_value("ETA_TIMEOUT_SECS", &secs)?;
        }
        if let Some(n) = get("ETA_MAX_CONCURRENT") {
            config.max_concurrent = parse_value("ETA_MAX_CONCURRENT", &n)?;
            if config.max_concurrent == 0 {
                return Err(ConfigError {
                    var: "ETA_MAX_CONCURRENT",
                    value: n,
                    reason: "must be at least 1".into(),
                });
            }
        }
        if let Some(lines) = get("ETA_PREFERRED_LINES") {
            config.preferred_lines = split_list(&lines)
                .map(|code| {
                    LineCode::parse(code).map_err(|e| ConfigError {
                        var: "ETA_PREFERRED_LINES",
                        value: code.to_string(),
                        reason: e.to_string(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }
        if let Some(origins) = get("ETA_CORS_ORIGINS") {
            config.cors_origins = split_list(&origins)
                .map(|origin| {
                    origin.parse::<HeaderValue>().map_err(|_| ConfigError {
                        var: "ETA_CORS_ORIGINS",
                        value: origin.to_string(),
                        reason: "not a valid header value".into(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }

        Ok(config)
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = path.into();
        self
    }

    pub fn with_mock_schedules(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mock_schedules = Some(dir.into());
        self
    }

    pub fn with_preferred_lines(mut self, lines: Vec<LineCode>) -> Self {
        self.preferred_lines = lines;
        self
    }

    /// Settings for the live schedule client.
    pub fn schedule_config(&self) -> ScheduleConfig {
        ScheduleConfig::new()
            .with_url(&self.schedule_url)
            .with_max_concurrent(self.max_concurrent)
            .with_timeout(self.timeout_secs)
    }

    pub fn line_policy(&self) -> LinePolicy {
        if self.preferred_lines.is_empty() {
            LinePolicy::FirstInCatalog
        } else {
            LinePolicy::Prefer(self.preferred_lines.clone())
        }
    }
}

fn parse_value<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}
