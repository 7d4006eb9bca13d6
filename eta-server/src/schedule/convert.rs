//! Conversion from Next Train DTOs to [`ArrivalRecord`].
//!
//! ETAs are always computed against the server's `curr_time`, never the
//! local clock, so a skewed client clock cannot distort them.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::catalog::StationCatalog;
use crate::domain::{ArrivalRecord, DirectionArrival, LineCode, StationCode};

use super::error::ScheduleError;
use super::types::{Leg, ScheduleResponse, StationSchedule};

/// Timestamps without an offset are Hong Kong time (UTC+8).
const HONG_KONG_OFFSET_SECS: i32 = 8 * 60 * 60;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a raw response body into an arrival record for `station`.
pub fn normalize(
    body: &str,
    line: &LineCode,
    station: &StationCode,
    catalog: &StationCatalog,
) -> Result<ArrivalRecord, ScheduleError> {
    let response: ScheduleResponse =
        serde_json::from_str(body).map_err(|e| ScheduleError::parse(e.to_string(), Some(body)))?;

    convert_response(&response, line, station, catalog)
}

/// Convert a deserialized response into an arrival record.
pub fn convert_response(
    response: &ScheduleResponse,
    line: &LineCode,
    station: &StationCode,
    catalog: &StationCatalog,
) -> Result<ArrivalRecord, ScheduleError> {
    let schedule = select_schedule(response, line, station)?;

    if response.is_delay.as_deref() == Some("Y") {
        tracing::info!(%line, %station, "line is reporting delays");
    }

    let now = schedule.curr_time.as_deref();

    Ok(ArrivalRecord {
        station: *station,
        up: convert_direction(schedule.up.as_deref(), now, catalog)?,
        down: convert_direction(schedule.down.as_deref(), now, catalog)?,
    })
}

/// Pick the station's schedule out of `data`.
///
/// The map normally holds exactly one entry keyed "{LINE}-{STA}". The key is
/// preferred when present, but any single entry is accepted.
fn select_schedule<'a>(
    response: &'a ScheduleResponse,
    line: &LineCode,
    station: &StationCode,
) -> Result<&'a StationSchedule, ScheduleError> {
    let data = response.data.as_ref().ok_or_else(|| {
        let reason = response.message.as_deref().unwrap_or("no message");
        ScheduleError::parse(format!("response has no data ({reason})"), None)
    })?;

    let key = format!("{line}-{station}");
    data.get(&key)
        .or_else(|| data.values().next())
        .ok_or_else(|| ScheduleError::parse("response data is empty", None))
}

/// Take the soonest leg of a direction, if any.
///
/// The server's `curr_time` is only read once a leg exists. A leg whose
/// destination cannot be named from the catalog leaves the direction empty,
/// keeping destination and ETA together.
fn convert_direction(
    legs: Option<&[Leg]>,
    now: Option<&str>,
    catalog: &StationCatalog,
) -> Result<Option<DirectionArrival>, ScheduleError> {
    let Some(leg) = legs.and_then(|legs| legs.first()) else {
        return Ok(None);
    };

    let now = now
        .ok_or_else(|| ScheduleError::parse("schedule has legs but no curr_time", None))
        .and_then(parse_timestamp)?;
    let arrival = parse_timestamp(&leg.time)?;

    let destination = StationCode::parse(&leg.dest)
        .ok()
        .and_then(|code| catalog.station_name(&code));

    let Some(destination) = destination else {
        tracing::warn!(dest = %leg.dest, "destination not in catalog, skipping direction");
        return Ok(None);
    };

    Ok(Some(DirectionArrival {
        destination: destination.to_string(),
        eta_minutes: eta_minutes(arrival, now),
    }))
}

/// Parse an API timestamp.
///
/// Accepts "YYYY-MM-DD HH:MM:SS" (taken as Hong Kong time) or RFC 3339.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, ScheduleError> {
    let invalid = || ScheduleError::parse(format!("invalid timestamp: {s:?}"), None);

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
        return FixedOffset::east_opt(HONG_KONG_OFFSET_SECS)
            .and_then(|tz| naive.and_local_timezone(tz).single())
            .ok_or_else(invalid);
    }

    DateTime::parse_from_rfc3339(s).map_err(|_| invalid())
}

/// Whole minutes from `now` until `arrival`, rounding halves up.
pub fn eta_minutes(arrival: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> i64 {
    let millis = (arrival - now).num_milliseconds();
    (millis as f64 / 60_000.0 + 0.5).floor() as i64
}
