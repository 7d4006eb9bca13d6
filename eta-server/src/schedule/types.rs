//! Next Train API response DTOs.
//!
//! These map directly to the JSON returned by `getSchedule.php`. Direction
//! arrays are omitted entirely (not sent empty) when no trains run that way,
//! so they are `Option`.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level response envelope.
///
/// On failure the API still answers 200 with `status: 0`, a `message`, and
/// no `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleResponse {
    /// 1 on success, 0 when the API has no data to return.
    pub status: Option<i32>,

    pub message: Option<String>,

    /// "Y" when the line is reporting a delay.
    #[serde(rename = "isdelay")]
    pub is_delay: Option<String>,

    pub sys_time: Option<String>,

    pub curr_time: Option<String>,

    /// Keyed by "{LINE}-{STA}", holding a single entry.
    pub data: Option<BTreeMap<String, StationSchedule>>,
}

/// Schedule for one station on one line.
#[derive(Debug, Clone, Deserialize)]
pub struct StationSchedule {
    /// Trains in the UP direction, soonest first.
    #[serde(rename = "UP")]
    pub up: Option<Vec<Leg>>,

    /// Trains in the DOWN direction, soonest first.
    #[serde(rename = "DOWN")]
    pub down: Option<Vec<Leg>>,

    /// Server time the estimates were computed against ("YYYY-MM-DD HH:MM:SS").
    /// Only needed when a direction has a leg.
    pub curr_time: Option<String>,

    /// Time the upstream system produced the data.
    pub sys_time: Option<String>,
}

/// A single upcoming train.
#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    /// Destination station code.
    pub dest: String,

    /// Expected arrival time ("YYYY-MM-DD HH:MM:SS").
    pub time: String,

    /// Platform number.
    pub plat: Option<String>,

    /// Position in the direction's list, "1" for the next train.
    pub seq: Option<String>,

    /// Minutes to arrival as computed by the API.
    pub ttnt: Option<String>,

    /// "Y" if the estimate is valid.
    pub valid: Option<String>,

    pub source: Option<String>,

    /// Route variant, e.g. "RAC" for Racecourse on the East Rail Line.
    pub route: Option<String>,
}
