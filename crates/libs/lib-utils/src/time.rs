//! # Time Utilities
//!
//! Utilities for time conversion using chrono. Quote timestamps travel over the
//! wire as Unix epoch milliseconds.

use chrono::{DateTime, TimeZone, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix epoch milliseconds back to a UTC datetime.
pub fn millis_to_utc(millis: i64) -> Result<DateTime<Utc>, Error> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(Error::OutOfRange(millis))
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    OutOfRange(i64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
