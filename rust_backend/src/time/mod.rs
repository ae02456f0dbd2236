//! Timestamp conversion and display formatting.
//!
//! Raw first-touch timestamps are integer microseconds since the Unix epoch.
//! This module turns them into calendar timestamps and renders the display
//! date and time strings.

pub mod micros;

#[cfg(test)]
mod micros_tests;

pub use micros::{
    datetime_to_micros, format_date, format_time, micros_to_datetime, offset_from_minutes,
    parse_timestamp_micros, utc_offset, DATE_FORMAT, MICROS_PER_SECOND, TIME_FORMAT,
};
