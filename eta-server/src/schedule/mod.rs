//! MTR Next Train schedule client and normalizer.
//!
//! Key characteristics of the Next Train API:
//! - One request per (line, station) pair: `?line=TWL&sta=TST`
//! - The payload's `data` map holds a single entry under a "{LINE}-{STA}" key
//! - `UP`/`DOWN` arrays are omitted, not sent empty, when nothing runs
//! - Times are "YYYY-MM-DD HH:MM:SS" in Hong Kong local time
//! - Failures can arrive as HTTP 200 with `status: 0` and no `data`

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{DEFAULT_SCHEDULE_URL, ScheduleClient, ScheduleConfig};
pub use convert::{convert_response, eta_minutes, normalize, parse_timestamp};
pub use error::ScheduleError;
pub use mock::MockScheduleClient;
pub use source::{ScheduleBackend, ScheduleSource};
pub use types::{Leg, ScheduleResponse, StationSchedule};
