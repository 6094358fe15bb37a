//! Time-point text forms.
//!
//! All three chain time types share one text shape,
//! `YYYY-MM-DDTHH:MM:SS.mmm` (no zone suffix; a trailing `Z` is accepted on
//! input). They differ in wire resolution: `time_point` is microseconds
//! since the Unix epoch, `time_point_sec` whole seconds, and
//! `block_timestamp_type` half-second slots since 2000-01-01T00:00:00 UTC.

use crate::error::CodecError;
use chrono::{DateTime, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Unix milliseconds of the block-timestamp epoch (2000-01-01T00:00:00 UTC).
const BLOCK_EPOCH_MS: i64 = 946_684_800_000;
/// Milliseconds per block-timestamp slot.
const BLOCK_INTERVAL_MS: i64 = 500;

const TEXT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

fn parse_datetime(s: &str, expected: &'static str) -> Result<NaiveDateTime, CodecError> {
    let trimmed = s.strip_suffix('Z').unwrap_or(s);
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map_err(|_| {
        CodecError::Expected {
            expected,
            got: s.to_string(),
        }
    })
}

fn format_millis(ms: i64) -> Result<String, CodecError> {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.naive_utc().format(TEXT_FORMAT).to_string())
        .ok_or(CodecError::OutOfRange {
            ty: "time_point".into(),
            value: ms.to_string(),
        })
}

/// Microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePoint(pub i64);

impl TimePoint {
    /// Text form at millisecond resolution; sub-millisecond bits truncate.
    /// Fails only for values outside the representable calendar range.
    pub fn to_text(self) -> Result<String, CodecError> {
        format_millis(self.0.div_euclid(1000))
    }
}

impl FromStr for TimePoint {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dt = parse_datetime(s, "time point")?;
        Ok(TimePoint(dt.and_utc().timestamp_micros()))
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Whole seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePointSec(pub u32);

impl FromStr for TimePointSec {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dt = parse_datetime(s, "time point sec")?;
        let secs = dt.and_utc().timestamp();
        u32::try_from(secs)
            .map(TimePointSec)
            .map_err(|_| CodecError::OutOfRange {
                ty: "time_point_sec".into(),
                value: s.to_string(),
            })
    }
}

impl TimePointSec {
    pub fn to_text(self) -> Result<String, CodecError> {
        format_millis(self.0 as i64 * 1000)
    }
}

impl fmt::Display for TimePointSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Half-second slots since 2000-01-01T00:00:00 UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockTimestamp(pub u32);

impl FromStr for BlockTimestamp {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dt = parse_datetime(s, "block timestamp")?;
        let ms = dt.and_utc().timestamp_millis();
        let slot = (ms - BLOCK_EPOCH_MS).div_euclid(BLOCK_INTERVAL_MS);
        u32::try_from(slot)
            .map(BlockTimestamp)
            .map_err(|_| CodecError::OutOfRange {
                ty: "block_timestamp_type".into(),
                value: s.to_string(),
            })
    }
}

impl BlockTimestamp {
    pub fn to_text(self) -> Result<String, CodecError> {
        format_millis(BLOCK_EPOCH_MS + self.0 as i64 * BLOCK_INTERVAL_MS)
    }
}

impl fmt::Display for BlockTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}
