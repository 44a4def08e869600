//! Station identifier type.

use std::fmt;

use serde::{Serialize, Serializer};

/// Maximum number of digits accepted in a station id.
const MAX_DIGITS: usize = 9;

/// Error returned when parsing an invalid station id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// An FMI ground station identifier (fmisid).
///
/// Station ids are short runs of ASCII digits, e.g. `101885`. This type
/// guarantees that any `StationId` value is valid by construction, so it
/// can be sent to the feed and used as a cache key without re-checking.
///
/// # Examples
///
/// ```
/// use snow_server::domain::StationId;
///
/// let id = StationId::parse("101885").unwrap();
/// assert_eq!(id.as_str(), "101885");
///
/// // Surrounding whitespace is trimmed
/// assert_eq!(StationId::parse(" 101885 ").unwrap(), id);
///
/// // Non-digits are rejected
/// assert!(StationId::parse("custom").is_err());
/// assert!(StationId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

impl StationId {
    /// Parse a station id from a string.
    ///
    /// Leading and trailing whitespace is ignored. The remainder must be
    /// between 1 and 9 ASCII digits.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_DIGITS {
            return Err(InvalidStationId {
                reason: "must be at most 9 digits",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationId {
                reason: "must contain only ASCII digits 0-9",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Returns the station id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
