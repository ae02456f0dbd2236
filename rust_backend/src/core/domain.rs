//! Domain models for raw and cleaned user records.
//!
//! This module provides the data structures that flow through the cleaning
//! pipeline: the loosely-typed [`RawRecord`] read from upstream storage, the
//! [`CleanRecord`] produced after deduplication and enrichment, and the
//! [`FieldValue`] cell used for columns whose type is not fixed upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A loosely-typed cell value.
///
/// Upstream tables do not guarantee the type of the `updated` marker or even
/// of the first-touch timestamp, so both are carried as `FieldValue` until
/// the pipeline interprets them. Objects and arrays are kept as
/// [`FieldValue::Json`].
///
/// `FieldValue` has a total order so that collision policies can pick a
/// maximum or minimum: booleans sort before numbers, numbers before text,
/// text before JSON. Integers and floats compare exactly by numeric value;
/// an integer sorts just below a float of the same value. JSON values
/// compare by their compact encoding.
///
/// # Examples
///
/// ```
/// use users_clean::core::domain::FieldValue;
///
/// assert!(FieldValue::Int(2) > FieldValue::Float(1.5));
/// assert!(FieldValue::Text("a".into()) > FieldValue::Int(100));
/// assert!(FieldValue::Int(3) < FieldValue::Float(3.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Json(serde_json::Value),
}

impl FieldValue {
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Int(_) | FieldValue::Float(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::Json(_) => 3,
        }
    }

    /// Returns a short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Text(_) => "text",
            FieldValue::Json(_) => "json",
        }
    }
}

// 2^63 as f64; every finite float in [-2^63, 2^63) truncates to an i64 exactly
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// Exact comparison of an integer with a float, ties broken as `Int < Float`
fn cmp_int_float(int: i64, float: f64) -> Ordering {
    if float.is_nan() {
        // total_cmp places NaN beyond the infinities, keeping its sign
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= TWO_POW_63 {
        return Ordering::Less;
    }
    if float < -TWO_POW_63 {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => {
            if float - whole < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        unequal => unequal,
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
            (FieldValue::Int(a), FieldValue::Float(b)) => cmp_int_float(*a, *b),
            (FieldValue::Float(a), FieldValue::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Json(a), FieldValue::Json(b)) => a.to_string().cmp(&b.to_string()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// A user record as it arrives from upstream storage.
///
/// Every field may be null and nothing is unique. Field names match the
/// upstream column names so records deserialize directly from JSON rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_first_touch_timestamp: Option<FieldValue>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub updated: Option<FieldValue>,
}

impl RawRecord {
    /// Creates a raw record with an integer microsecond timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use users_clean::core::domain::RawRecord;
    ///
    /// let record = RawRecord::new(Some("u1"), Some(1_000_000), Some("a@x.com"), None);
    /// assert_eq!(record.user_id.as_deref(), Some("u1"));
    /// ```
    pub fn new(
        user_id: Option<&str>,
        user_first_touch_timestamp: Option<i64>,
        email: Option<&str>,
        updated: Option<FieldValue>,
    ) -> Self {
        Self {
            user_id: user_id.map(str::to_string),
            user_first_touch_timestamp: user_first_touch_timestamp.map(FieldValue::Int),
            email: email.map(str::to_string),
            updated,
        }
    }

    /// True if every field is null.
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.user_first_touch_timestamp.is_none()
            && self.email.is_none()
            && self.updated.is_none()
    }
}

/// A deduplicated, enriched user record.
///
/// `(user_id, user_first_touch_timestamp)` is unique across a cleaned set.
/// `first_touch` is always UTC; the display strings may be rendered in a
/// configured fixed offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub user_id: String,
    pub user_first_touch_timestamp: i64,
    pub email: Option<String>,
    pub updated: Option<FieldValue>,
    pub first_touch: DateTime<Utc>,
    pub first_touch_date: String,
    pub first_touch_time: String,
    pub email_domain: Option<String>,
}

impl CleanRecord {
    /// The dedup key of this record.
    pub fn key(&self) -> (&str, i64) {
        (&self.user_id, self.user_first_touch_timestamp)
    }
}

impl From<&CleanRecord> for RawRecord {
    fn from(record: &CleanRecord) -> Self {
        Self {
            user_id: Some(record.user_id.clone()),
            user_first_touch_timestamp: Some(FieldValue::Int(record.user_first_touch_timestamp)),
            email: record.email.clone(),
            updated: record.updated.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_ordering_across_types() {
        let mut values = vec![
            FieldValue::Text("b".into()),
            FieldValue::Float(2.5),
            FieldValue::Bool(true),
            FieldValue::Int(2),
            FieldValue::Text("a".into()),
            FieldValue::Bool(false),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                FieldValue::Bool(false),
                FieldValue::Bool(true),
                FieldValue::Int(2),
                FieldValue::Float(2.5),
                FieldValue::Text("a".into()),
                FieldValue::Text("b".into()),
            ]
        );
    }

    #[test]
    fn test_field_value_deserializes_untagged() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"[true, 7, 1.5, "x"]"#).unwrap();
        assert_eq!(values[0].type_name(), "bool");
        assert_eq!(values[1].type_name(), "int");
        assert_eq!(values[2].type_name(), "float");
        assert_eq!(values[3].type_name(), "text");
    }

    #[test]
    fn test_int_and_float_of_same_value_are_distinct() {
        let int = FieldValue::Int(1);
        let float = FieldValue::Float(1.0);
        assert_ne!(int, float);
        assert!(int < float);
        assert_eq!(std::cmp::max(int.clone(), float.clone()).type_name(), "float");
        assert_eq!(std::cmp::max(float, int).type_name(), "float");
    }

    #[test]
    fn test_int_float_comparison_is_exact() {
        let below = FieldValue::Int(1 << 53);
        let above = FieldValue::Int((1 << 53) + 1);
        let float = FieldValue::Float(9_007_199_254_740_992.0);

        assert!(below < float);
        assert!(float < above);
        assert!(FieldValue::Int(i64::MAX) < FieldValue::Float(9.3e18));
        assert!(FieldValue::Int(i64::MIN) > FieldValue::Float(f64::NEG_INFINITY));
        assert!(FieldValue::Int(-1) > FieldValue::Float(-1.5));
        assert!(FieldValue::Int(-2) < FieldValue::Float(-1.5));
        assert!(FieldValue::Int(0) < FieldValue::Float(f64::NAN));
    }

    #[test]
    fn test_non_scalar_values_are_kept_as_json() {
        let record: RawRecord =
            serde_json::from_str(r#"{"user_id": "u1", "updated": {"by": "etl", "at": 3}}"#).unwrap();
        let updated = record.updated.unwrap();
        assert_eq!(updated.type_name(), "json");
        assert!(updated.to_string().contains(r#""by":"etl""#));
        assert!(updated > FieldValue::Text("zzz".into()));

        let list: FieldValue = serde_json::from_str("[1, 2]").unwrap();
        let other: FieldValue = serde_json::from_str("[1, 3]").unwrap();
        assert!(list < other);
        assert_eq!(serde_json::to_string(&list).unwrap(), "[1,2]");
    }

    #[test]
    fn test_raw_record_missing_fields_are_null() {
        let record: RawRecord = serde_json::from_str(r#"{"user_id": "u1"}"#).unwrap();
        assert_eq!(record.user_id.as_deref(), Some("u1"));
        assert!(record.user_first_touch_timestamp.is_none());
        assert!(record.email.is_none());
        assert!(record.updated.is_none());
        assert!(!record.is_empty());
        assert!(RawRecord::default().is_empty());
    }

    #[test]
    fn test_clean_record_projects_back_to_raw() {
        let clean = CleanRecord {
            user_id: "u1".into(),
            user_first_touch_timestamp: 42,
            email: Some("a@x.com".into()),
            updated: Some(FieldValue::Int(1)),
            first_touch: DateTime::from_timestamp_micros(42).unwrap(),
            first_touch_date: "Jan 1, 1970".into(),
            first_touch_time: "00:00:00".into(),
            email_domain: Some("x.com".into()),
        };
        let raw = RawRecord::from(&clean);
        assert_eq!(raw, RawRecord::new(Some("u1"), Some(42), Some("a@x.com"), Some(FieldValue::Int(1))));
        assert_eq!(clean.key(), ("u1", 42));
    }
}
