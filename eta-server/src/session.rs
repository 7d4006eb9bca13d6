//! Station-selection session state.
//!
//! A presentation layer keeps one [`Session`] per user. Each transition
//! consumes the session and returns the next one, so there are no ad hoc
//! mutable flags. Every fetch started by a transition is identified by a
//! [`FetchTicket`]; only the most recently issued ticket can complete the
//! session, which makes a slow, superseded fetch harmless.

use crate::catalog::{LinePolicy, StationNotFound};
use crate::domain::{ArrivalRecord, LineCode, StationCode};
use crate::schedule::ScheduleError;

/// The station and line currently being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub station: StationCode,
    pub line: LineCode,
}

/// Permission to complete the session with the result of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    pub selection: Selection,
}

/// Why the last fetch failed, kept in a cloneable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    StationNotFound(StationCode),
    Unavailable(String),
    Parse(String),
}

impl From<&ScheduleError> for FetchFailure {
    fn from(err: &ScheduleError) -> Self {
        if err.is_parse() {
            FetchFailure::Parse(err.to_string())
        } else {
            FetchFailure::Unavailable(err.to_string())
        }
    }
}

impl From<ScheduleError> for FetchFailure {
    fn from(err: ScheduleError) -> Self {
        FetchFailure::from(&err)
    }
}

impl From<StationNotFound> for FetchFailure {
    fn from(err: StationNotFound) -> Self {
        FetchFailure::StationNotFound(err.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready(ArrivalRecord),
    Failed(FetchFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Sequence number of the most recently issued ticket.
    seq: u64,
    selection: Option<Selection>,
    /// Lines serving the selected station, catalog order.
    lines: Vec<LineCode>,
    phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            seq: 0,
            selection: None,
            lines: Vec::new(),
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Lines the user can choose between for the selected station.
    pub fn lines(&self) -> &[LineCode] {
        &self.lines
    }

    /// True if the selected station needs a line picker.
    pub fn is_multi_line(&self) -> bool {
        self.lines.len() > 1
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// The arrival record, once ready.
    pub fn arrival(&self) -> Option<&ArrivalRecord> {
        match &self.phase {
            Phase::Ready(record) => Some(record),
            _ => None,
        }
    }

    /// Select a station, given its serving lines from the catalog.
    ///
    /// The initial line comes from `policy`. An empty `lines` list means the
    /// station is not in the catalog: the session fails without a ticket.
    pub fn select_station(
        self,
        station: StationCode,
        lines: Vec<LineCode>,
        policy: &LinePolicy,
    ) -> (Self, Option<FetchTicket>) {
        let Some(line) = policy.choose(&lines) else {
            let next = Self {
                seq: self.seq + 1,
                selection: None,
                lines: Vec::new(),
                phase: Phase::Failed(FetchFailure::StationNotFound(station)),
            };
            return (next, None);
        };

        let next = Self {
            lines,
            ..self
        };
        next.start(Selection { station, line })
    }

    /// Switch the selected station to another of its lines.
    ///
    /// Ignored (no ticket) when nothing is selected or the line does not
    /// serve the station.
    pub fn switch_line(self, line: LineCode) -> (Self, Option<FetchTicket>) {
        match self.selection {
            Some(selection) if self.lines.contains(&line) => self.start(Selection {
                line,
                ..selection
            }),
            _ => {
                tracing::debug!(%line, "ignoring switch to a line not serving the station");
                (self, None)
            }
        }
    }

    /// Re-fetch the current selection, e.g. after a failure.
    pub fn refresh(self) -> (Self, Option<FetchTicket>) {
        match self.selection {
            Some(selection) => self.start(selection),
            None => (self, None),
        }
    }

    /// Apply the outcome of a fetch.
    ///
    /// Results for any ticket other than the latest are discarded, so a
    /// slower fetch for an earlier selection never overwrites a newer one.
    pub fn resolve(
        self,
        ticket: FetchTicket,
        result: Result<ArrivalRecord, FetchFailure>,
    ) -> Self {
        if ticket.seq != self.seq || self.selection != Some(ticket.selection) {
            tracing::debug!(
                ticket = ticket.seq,
                current = self.seq,
                "discarding superseded fetch result"
            );
            return self;
        }

        let phase = match result {
            Ok(record) => Phase::Ready(record),
            Err(failure) => Phase::Failed(failure),
        };
        Self { phase, ..self }
    }

    fn start(self, selection: Selection) -> (Self, Option<FetchTicket>) {
        let seq = self.seq + 1;
        let next = Self {
            seq,
            selection: Some(selection),
            phase: Phase::Loading,
            ..self
        };
        (next, Some(FetchTicket { seq, selection }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DirectionArrival;

    fn sta(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn line(s: &str) -> LineCode {
        LineCode::parse(s).unwrap()
    }

    fn record(station: &str) -> ArrivalRecord {
        ArrivalRecord::empty(sta(station))
    }

    #[test]
    fn starts_idle() {
        let session = Session::new();
        assert_eq!(session.phase(), &Phase::Idle);
        assert!(session.selection().is_none());
        assert!(session.arrival().is_none());
    }

    #[test]
    fn select_then_ready() {
        let (session, ticket) = Session::new().select_station(
            sta("TST"),
            vec![line("TWL"), line("EAL")],
            &LinePolicy::default(),
        );
        let ticket = ticket.unwrap();

        assert!(session.is_loading());
        assert!(session.is_multi_line());
        assert_eq!(ticket.selection.line, line("TWL"));

        let session = session.resolve(ticket, Ok(record("TST")));
        assert_eq!(session.arrival(), Some(&record("TST")));
    }

    #[test]
    fn select_then_failed() {
        let (session, ticket) =
            Session::new().select_station(sta("JOR"), vec![line("TWL")], &LinePolicy::default());
        assert!(!session.is_multi_line());

        let session = session.resolve(
            ticket.unwrap(),
            Err(FetchFailure::Unavailable("timeout".into())),
        );
        assert_eq!(
            session.phase(),
            &Phase::Failed(FetchFailure::Unavailable("timeout".into()))
        );
    }

    #[test]
    fn unknown_station_fails_without_ticket() {
        let (session, ticket) =
            Session::new().select_station(sta("XYZ"), Vec::new(), &LinePolicy::default());
        assert!(ticket.is_none());
        assert_eq!(
            session.phase(),
            &Phase::Failed(FetchFailure::StationNotFound(sta("XYZ")))
        );
    }

    #[test]
    fn slower_earlier_fetch_cannot_overwrite_newer_result() {
        let (session, first) = Session::new().select_station(
            sta("TST"),
            vec![line("TWL"), line("EAL")],
            &LinePolicy::default(),
        );
        let (session, second) = session.switch_line(line("EAL"));
        let (first, second) = (first.unwrap(), second.unwrap());

        // Newer fetch completes first
        let newer = ArrivalRecord {
            up: Some(DirectionArrival {
                destination: "Lo Wu".into(),
                eta_minutes: 3,
            }),
            ..record("TST")
        };
        let session = session.resolve(second, Ok(newer.clone()));

        // The older one arrives late and is dropped
        let session = session.resolve(first, Err(FetchFailure::Parse("late".into())));
        assert_eq!(session.arrival(), Some(&newer));
        assert_eq!(session.selection().unwrap().line, line("EAL"));
    }

    #[test]
    fn stale_result_while_loading_is_ignored() {
        let lines = vec![line("TWL"), line("EAL")];
        let (session, first) =
            Session::new().select_station(sta("TST"), lines, &LinePolicy::default());
        let (session, _second) = session.switch_line(line("EAL"));

        let session = session.resolve(first.unwrap(), Ok(record("TST")));
        assert!(session.is_loading());
    }

    #[test]
    fn new_station_supersedes_previous_station() {
        let (session, tst) = Session::new().select_station(
            sta("TST"),
            vec![line("TWL")],
            &LinePolicy::default(),
        );
        let (session, cen) =
            session.select_station(sta("CEN"), vec![line("TWL"), line("ISL")], &LinePolicy::default());

        let session = session.resolve(tst.unwrap(), Ok(record("TST")));
        assert!(session.is_loading());

        let session = session.resolve(cen.unwrap(), Ok(record("CEN")));
        assert_eq!(session.arrival().unwrap().station, sta("CEN"));
        assert_eq!(session.lines(), &[line("TWL"), line("ISL")]);
    }

    #[test]
    fn switch_to_line_not_serving_station_is_ignored() {
        let (session, _) = Session::new().select_station(
            sta("TST"),
            vec![line("TWL"), line("EAL")],
            &LinePolicy::default(),
        );
        let before = session.clone();
        let (session, ticket) = session.switch_line(line("KTL"));
        assert!(ticket.is_none());
        assert_eq!(session, before);
    }

    #[test]
    fn switch_without_selection_is_ignored() {
        let (session, ticket) = Session::new().switch_line(line("TWL"));
        assert!(ticket.is_none());
        assert_eq!(session.phase(), &Phase::Idle);
    }

    #[test]
    fn refresh_after_failure_reloads() {
        let (session, ticket) =
            Session::new().select_station(sta("TST"), vec![line("TWL")], &LinePolicy::default());
        let session = session.resolve(
            ticket.unwrap(),
            Err(FetchFailure::Unavailable("down".into())),
        );

        let (session, retry) = session.refresh();
        let retry = retry.unwrap();
        assert!(session.is_loading());
        assert_eq!(retry.selection.station, sta("TST"));

        let session = session.resolve(retry, Ok(record("TST")));
        assert!(session.arrival().is_some());
    }

    #[test]
    fn preferred_line_policy_picks_initial_line() {
        let policy = LinePolicy::Prefer(vec![line("EAL")]);
        let (_, ticket) =
            Session::new().select_station(sta("TST"), vec![line("TWL"), line("EAL")], &policy);
        assert_eq!(ticket.unwrap().selection.line, line("EAL"));
    }

    #[test]
    fn failure_from_schedule_error() {
        let err = ScheduleError::parse("missing data", None);
        assert!(matches!(FetchFailure::from(&err), FetchFailure::Parse(_)));

        let err = ScheduleError::Status {
            status: 500,
            message: "boom".into(),
        };
        assert!(matches!(FetchFailure::from(err), FetchFailure::Unavailable(_)));
    }
}
