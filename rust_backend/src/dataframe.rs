//! Polars `DataFrame` conversion for record sets.
//!
//! Enabled with the `dataframe` feature. Raw frames are read column by
//! column; missing columns read as all-null. Clean frames carry all eight
//! cleaned columns, with `first_touch` as a microsecond `Datetime`.

use polars::prelude::*;

use crate::core::domain::{CleanRecord, FieldValue, RawRecord};

fn string_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let Ok(column) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };
    let casted = column.cast(&DataType::String)?;
    let values = casted.str()?;
    Ok(values.into_iter().map(|v| v.map(str::to_string)).collect())
}

fn field_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<FieldValue>>> {
    let Ok(column) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };
    let dtype = column.dtype();

    if dtype.is_bool() {
        Ok(column.bool()?.into_iter().map(|v| v.map(FieldValue::Bool)).collect())
    } else if dtype.is_integer() {
        let casted = column.cast(&DataType::Int64)?;
        let values = casted.i64()?;
        Ok(values.into_iter().map(|v| v.map(FieldValue::Int)).collect())
    } else if dtype.is_float() {
        let casted = column.cast(&DataType::Float64)?;
        let values = casted.f64()?;
        Ok(values.into_iter().map(|v| v.map(FieldValue::Float)).collect())
    } else {
        Ok(string_column(df, name)?
            .into_iter()
            .map(|v| v.map(FieldValue::Text))
            .collect())
    }
}

/// Read raw records from a frame with `user_id`, `user_first_touch_timestamp`,
/// `email` and `updated` columns
pub fn raw_records_from_dataframe(df: &DataFrame) -> PolarsResult<Vec<RawRecord>> {
    let user_ids = string_column(df, "user_id")?;
    let timestamps = field_column(df, "user_first_touch_timestamp")?;
    let emails = string_column(df, "email")?;
    let updated = field_column(df, "updated")?;

    Ok(user_ids
        .into_iter()
        .zip(timestamps)
        .zip(emails)
        .zip(updated)
        .map(|(((user_id, user_first_touch_timestamp), email), updated)| RawRecord {
            user_id,
            user_first_touch_timestamp,
            email,
            updated,
        })
        .collect())
}

/// Build a frame with the cleaned columns
///
/// `updated` is rendered as text since its upstream type is not fixed.
pub fn clean_records_to_dataframe(records: &[CleanRecord]) -> PolarsResult<DataFrame> {
    let user_ids: Vec<&str> = records.iter().map(|r| r.user_id.as_str()).collect();
    let timestamps: Vec<i64> = records.iter().map(|r| r.user_first_touch_timestamp).collect();
    let emails: Vec<Option<&str>> = records.iter().map(|r| r.email.as_deref()).collect();
    let updated: Vec<Option<String>> = records
        .iter()
        .map(|r| r.updated.as_ref().map(|v| v.to_string()))
        .collect();
    let first_touch: Vec<i64> = records
        .iter()
        .map(|r| r.first_touch.timestamp_micros())
        .collect();
    let dates: Vec<&str> = records.iter().map(|r| r.first_touch_date.as_str()).collect();
    let times: Vec<&str> = records.iter().map(|r| r.first_touch_time.as_str()).collect();
    let domains: Vec<Option<&str>> = records.iter().map(|r| r.email_domain.as_deref()).collect();

    let first_touch = Series::new("first_touch".into(), first_touch)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;

    DataFrame::new(vec![
        Series::new("user_id".into(), user_ids).into(),
        Series::new("user_first_touch_timestamp".into(), timestamps).into(),
        Series::new("email".into(), emails).into(),
        Series::new("updated".into(), updated).into(),
        first_touch.into(),
        Series::new("first_touch_date".into(), dates).into(),
        Series::new("first_touch_time".into(), times).into(),
        Series::new("email_domain".into(), domains).into(),
    ])
}
