//! Station code type.

use std::fmt;

use serde::{Serialize, Serializer};

use super::code::{code_str, parse_code};

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid 3-letter MTR station code (e.g. "TST" for Tsim Sha Tsui).
///
/// Station codes are always 3 uppercase ASCII letters. This type guarantees
/// that any `StationCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use eta_server::domain::StationCode;
///
/// let tst = StationCode::parse("TST").unwrap();
/// assert_eq!(tst.as_str(), "TST");
///
/// // Lowercase is rejected by the strict parser
/// assert!(StationCode::parse("tst").is_err());
///
/// // ...but accepted once normalized
/// assert_eq!(StationCode::parse_normalized(" tst ").unwrap(), tst);
///
/// // Wrong length is rejected
/// assert!(StationCode::parse("TS").is_err());
/// assert!(StationCode::parse("TSTT").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode([u8; 3]);

impl StationCode {
    /// Parse a station code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        parse_code(s)
            .map(StationCode)
            .map_err(|reason| InvalidStationCode { reason })
    }

    /// Parse user input, trimming whitespace and upper-casing first.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        code_str(&self.0)
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
