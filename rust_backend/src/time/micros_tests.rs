use chrono::{Datelike, Timelike};

use super::micros::*;
use crate::core::domain::FieldValue;

#[test]
fn test_micros_to_datetime_epoch_plus_one_second() {
    let dt = micros_to_datetime(1_000_000).unwrap();
    assert_eq!(dt.year(), 1970);
    assert_eq!(dt.month(), 1);
    assert_eq!(dt.day(), 1);
    assert_eq!(dt.second(), 1);
}

#[test]
fn test_micros_round_trip_keeps_subsecond_precision() {
    let micros = 1_641_211_509_123_456;
    let dt = micros_to_datetime(micros).unwrap();
    assert_eq!(datetime_to_micros(&dt), micros);
}

#[test]
fn test_micros_out_of_range() {
    assert!(micros_to_datetime(i64::MAX).is_none());
    assert!(micros_to_datetime(i64::MIN).is_none());
}

#[test]
fn test_format_date_and_time() {
    // 2022-01-03T14:05:09Z
    let dt = micros_to_datetime(1_641_218_709 * MICROS_PER_SECOND).unwrap();
    assert_eq!(format_date(&dt, &utc_offset()), "Jan 3, 2022");
    assert_eq!(format_time(&dt, &utc_offset()), "14:05:09");
}

#[test]
fn test_format_with_offset_crosses_midnight() {
    // 2022-01-03T23:30:00Z is 01:30 on Jan 4 at UTC+2
    let dt = micros_to_datetime(1_641_252_600 * MICROS_PER_SECOND).unwrap();
    let offset = offset_from_minutes(120).unwrap();
    assert_eq!(format_date(&dt, &offset), "Jan 4, 2022");
    assert_eq!(format_time(&dt, &offset), "01:30:00");
}

#[test]
fn test_offset_from_minutes_bounds() {
    assert!(offset_from_minutes(-720).is_some());
    assert!(offset_from_minutes(24 * 60).is_none());
    assert!(offset_from_minutes(i32::MAX).is_none());
}

#[test]
fn test_parse_timestamp_accepts_numeric_forms() {
    assert_eq!(parse_timestamp_micros(&FieldValue::Int(42)), Ok(42));
    assert_eq!(parse_timestamp_micros(&FieldValue::Float(1_000_000.0)), Ok(1_000_000));
    assert_eq!(parse_timestamp_micros(&FieldValue::Text(" 1000000 ".into())), Ok(1_000_000));
    assert_eq!(parse_timestamp_micros(&FieldValue::Text("1.5e6".into())), Ok(1_500_000));
}

#[test]
fn test_parse_timestamp_rejects_garbage() {
    assert!(parse_timestamp_micros(&FieldValue::Text("yesterday".into())).is_err());
    assert!(parse_timestamp_micros(&FieldValue::Bool(true)).is_err());
    assert!(parse_timestamp_micros(&FieldValue::Float(1.5)).is_err());
    assert!(parse_timestamp_micros(&FieldValue::Float(f64::NAN)).is_err());
    assert!(parse_timestamp_micros(&FieldValue::Float(1e30)).is_err());
    assert!(parse_timestamp_micros(&FieldValue::Json(serde_json::json!([1]))).is_err());
}
