//! Time-of-day values carried by stop arrival and departure fields.
//!
//! Accepted input is `H:MM`, `HH:MM` or `HH:MM:SS` with hours in 0-23 and
//! minutes/seconds in 0-59. Values are always rendered back as `HH:MM:SS`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Wall-clock time of day, ordered by hour, then minute, then second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StopTime {
    hour: u8,
    minute: u8,
    second: u8,
}

/// Input that is not a valid `HH:MM[:SS]` time of day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormatError {
    pub value: String,
}

impl fmt::Display for TimeFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid time (HH:MM or HH:MM:SS)", self.value)
    }
}

impl std::error::Error for TimeFormatError {}

impl StopTime {
    pub fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        (hour <= 23 && minute <= 59 && second <= 59).then_some(Self {
            hour,
            minute,
            second,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }
}

fn parse_component(part: &str, min_len: usize, max: u8) -> Option<u8> {
    if part.len() < min_len || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse::<u8>().ok().filter(|v| *v <= max)
}

impl FromStr for StopTime {
    type Err = TimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TimeFormatError {
            value: s.to_string(),
        };

        let mut parts = s.split(':');
        let hour = parts.next().and_then(|p| parse_component(p, 1, 23));
        let minute = parts.next().and_then(|p| parse_component(p, 2, 59));
        let second = match parts.next() {
            Some(p) => parse_component(p, 2, 59),
            None => Some(0),
        };
        if parts.next().is_some() {
            return Err(err());
        }

        match (hour, minute, second) {
            (Some(hour), Some(minute), Some(second)) => Ok(Self {
                hour,
                minute,
                second,
            }),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for StopTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Compare two `HH:MM[:SS]` strings component-wise, absent seconds as 0.
pub fn compare_times(a: &str, b: &str) -> Result<Ordering, TimeFormatError> {
    Ok(a.parse::<StopTime>()?.cmp(&b.parse::<StopTime>()?))
}

/// A point in a multi-day journey: days after the train's start, then clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScheduledInstant {
    pub day_offset: i32,
    pub time: StopTime,
}

impl fmt::Display for ScheduledInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.day_offset {
            0 => write!(f, "{}", self.time),
            1 => write!(f, "{} (+1 day)", self.time),
            n => write!(f, "{} (+{} days)", self.time, n),
        }
    }
}
