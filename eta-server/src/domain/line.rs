//! Transit line code type.

use std::fmt;

use serde::{Serialize, Serializer};

use super::code::{code_str, parse_code};

/// Error returned when parsing an invalid line code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line code: {reason}")]
pub struct InvalidLineCode {
    reason: &'static str,
}

/// A valid 3-letter MTR line code (e.g. "TWL" for Tsuen Wan Line, "EAL" for
/// East Rail Line).
///
/// ```
/// use eta_server::domain::LineCode;
///
/// let twl = LineCode::parse("TWL").unwrap();
/// assert_eq!(twl.to_string(), "TWL");
/// assert!(LineCode::parse("twl").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineCode([u8; 3]);

impl LineCode {
    /// Parse a line code. The input must be exactly 3 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidLineCode> {
        parse_code(s)
            .map(LineCode)
            .map_err(|reason| InvalidLineCode { reason })
    }

    /// Parse user input, trimming whitespace and upper-casing first.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidLineCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        code_str(&self.0)
    }
}

impl fmt::Debug for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineCode({})", self.as_str())
    }
}

impl fmt::Display for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LineCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
