use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::core::domain::FieldValue;

/// Microseconds in one second.
pub const MICROS_PER_SECOND: i64 = 1_000_000;

/// Display pattern for dates, e.g. `Jan 3, 2022`.
pub const DATE_FORMAT: &str = "%b %-d, %Y";

/// Display pattern for 24-hour wall-clock times, e.g. `14:05:09`.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Convert a microsecond Unix timestamp to a UTC calendar timestamp
///
/// Sub-second precision is kept. Returns `None` when the value falls outside
/// the representable calendar range.
///
/// # Example
/// ```
/// use users_clean::time::micros_to_datetime;
/// let dt = micros_to_datetime(1_500_000).unwrap();
/// assert_eq!(dt.timestamp(), 1);
/// assert_eq!(dt.timestamp_subsec_micros(), 500_000);
/// ```
pub fn micros_to_datetime(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
}

/// Convert a UTC calendar timestamp back to microseconds since the epoch
pub fn datetime_to_micros(datetime: &DateTime<Utc>) -> i64 {
    datetime.timestamp_micros()
}

/// Interpret a raw cell as an integer microsecond timestamp
///
/// Integers pass through. Numeric text and integral floats are accepted
/// since upstream engines commonly widen or stringify integer columns.
/// Anything else is rejected with a short reason.
///
/// # Returns
/// * `Ok(i64)` - microseconds since the Unix epoch
/// * `Err(String)` - why the value is not a timestamp
pub fn parse_timestamp_micros(value: &FieldValue) -> Result<i64, String> {
    match value {
        FieldValue::Int(micros) => Ok(*micros),
        FieldValue::Float(micros) => float_to_micros(*micros),
        FieldValue::Text(text) => {
            let trimmed = text.trim();
            if let Ok(micros) = trimmed.parse::<i64>() {
                return Ok(micros);
            }
            match trimmed.parse::<f64>() {
                Ok(micros) => float_to_micros(micros),
                Err(_) => Err("not numeric".to_string()),
            }
        }
        FieldValue::Bool(_) => Err("boolean is not a timestamp".to_string()),
        FieldValue::Json(_) => Err("structured value is not a timestamp".to_string()),
    }
}

fn float_to_micros(micros: f64) -> Result<i64, String> {
    if !micros.is_finite() {
        return Err("not a finite number".to_string());
    }
    if micros.fract() != 0.0 {
        return Err("not a whole number of microseconds".to_string());
    }
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if micros < i64::MIN as f64 || micros >= i64::MAX as f64 {
        return Err("out of range".to_string());
    }
    Ok(micros as i64)
}

/// Format a timestamp as a display date (`MMM d, yyyy`) in the given offset
pub fn format_date(datetime: &DateTime<Utc>, offset: &FixedOffset) -> String {
    datetime.with_timezone(offset).format(DATE_FORMAT).to_string()
}

/// Format a timestamp as a 24-hour display time (`HH:mm:ss`) in the given offset
pub fn format_time(datetime: &DateTime<Utc>, offset: &FixedOffset) -> String {
    datetime.with_timezone(offset).format(TIME_FORMAT).to_string()
}

/// Build a fixed offset from whole minutes east of UTC
///
/// Returns `None` when the offset is a day or more away from UTC.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}

/// The UTC offset as a `FixedOffset`.
pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}
