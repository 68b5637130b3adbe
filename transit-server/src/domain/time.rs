//! Time-of-day handling for simulated arrivals.
//!
//! Simulations work in fractional minutes past midnight. Output tables show
//! those instants as "HH:MM:SS" strings, truncating (not rounding) to the
//! whole second, and the wait simulation reads them back in the same form.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minutes in a day; the latest representable clock time (24:00:00).
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Relative distance, in machine epsilons, within which a value counts as an
/// exact whole second.
const WHOLE_SECOND_ULPS: f64 = 4.0;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// An instant within one service day, in minutes past midnight.
///
/// The value is always finite and within `[0, 1440]`.
///
/// # Examples
///
/// ```
/// use transit_server::domain::ClockTime;
///
/// let t = ClockTime::from_minutes(367.5).unwrap();
/// assert_eq!(t.to_string(), "06:07:30");
///
/// let back = ClockTime::parse_hhmmss("06:07:30").unwrap();
/// assert_eq!(back.minutes(), 367.5);
/// ```
#[derive(Clone, Copy)]
pub struct ClockTime(f64);

impl ClockTime {
    /// Create a clock time from minutes past midnight.
    pub fn from_minutes(minutes: f64) -> Result<Self, TimeError> {
        if !minutes.is_finite() {
            return Err(TimeError::new("minutes must be finite"));
        }
        if !(0.0..=MINUTES_PER_DAY).contains(&minutes) {
            return Err(TimeError::new("minutes must be within 0-1440"));
        }
        Ok(Self(minutes))
    }

    /// Parse a time from "HH:MM:SS" format.
    ///
    /// "24:00:00" is accepted as the end of the day.
    ///
    /// ```
    /// use transit_server::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmmss("00:00:00").is_ok());
    /// assert!(ClockTime::parse_hhmmss("23:59:59").is_ok());
    /// assert!(ClockTime::parse_hhmmss("24:00:00").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmmss("24:00:01").is_err());
    /// assert!(ClockTime::parse_hhmmss("12:60:00").is_err());
    /// assert!(ClockTime::parse_hhmmss("1200:00").is_err());
    /// ```
    pub fn parse_hhmmss(s: &str) -> Result<Self, TimeError> {
        if s.len() != 8 {
            return Err(TimeError::new("expected HH:MM:SS format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' || bytes[5] != b':' {
            return Err(TimeError::new("expected colons at positions 2 and 5"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let second = parse_two_digits(&bytes[6..8])
            .ok_or_else(|| TimeError::new("invalid second digits"))?;

        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }
        if hour > 24 || (hour == 24 && (minute > 0 || second > 0)) {
            return Err(TimeError::new("time must not exceed 24:00:00"));
        }

        Ok(Self::from_whole_seconds(hour * 3600 + minute * 60 + second))
    }

    /// Minutes past midnight.
    pub fn minutes(&self) -> f64 {
        self.0
    }

    fn from_whole_seconds(seconds: u32) -> Self {
        Self(f64::from(seconds) / 60.0)
    }

    /// Whole seconds past midnight, truncated.
    ///
    /// Values built from whole seconds carry a few ulps of error from the
    /// `/ 60` round trip; only those snap to the nearest second, so
    /// "06:40:59" never reads back as 06:40:58. Everything else truncates.
    fn whole_seconds(&self) -> u32 {
        let seconds = self.0 * 60.0;
        let nearest = seconds.round();
        if (nearest - seconds).abs() <= nearest * WHOLE_SECOND_ULPS * f64::EPSILON {
            nearest as u32
        } else {
            seconds.floor() as u32
        }
    }

    /// Returns (hours, minutes, seconds), each truncated.
    pub fn hms(&self) -> (u32, u32, u32) {
        let total = self.whole_seconds();
        (total / 3600, (total / 60) % 60, total % 60)
    }

    /// Drop the sub-second part, giving the instant its "HH:MM:SS" string
    /// denotes.
    pub fn truncate_to_second(&self) -> Self {
        Self::from_whole_seconds(self.whole_seconds())
    }
}

impl PartialEq for ClockTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ClockTime {}

impl Ord for ClockTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for ClockTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({self} = {}min)", self.0)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ClockTime::parse_hhmmss(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Round to two decimal places, the precision of every minute value in the
/// output tables.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
