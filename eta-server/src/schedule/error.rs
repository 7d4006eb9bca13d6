//! Schedule fetch error types.

/// Errors from fetching or interpreting a schedule.
///
/// Variants fall into two kinds: the schedule is *unavailable* (transport
/// failure or non-2xx status) or it arrived but could not be *parsed*.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("schedule unavailable: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("schedule unavailable: API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not the expected JSON shape
    #[error("schedule parse error: {message}")]
    Parse {
        message: String,
        body: Option<String>,
    },
}

impl ScheduleError {
    /// Build a parse error, keeping a prefix of the body for diagnostics.
    pub fn parse(message: impl Into<String>, body: Option<&str>) -> Self {
        ScheduleError::Parse {
            message: message.into(),
            body: body.map(|b| b.chars().take(500).collect()),
        }
    }

    /// Network failure or non-2xx response.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ScheduleError::Http(_) | ScheduleError::Status { .. })
    }

    /// Malformed or unexpected response body.
    pub fn is_parse(&self) -> bool {
        matches!(self, ScheduleError::Parse { .. })
    }
}
