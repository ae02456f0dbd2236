//! Null and distinct-value profiling of record sets.
//!
//! Counts follow null-skipping aggregate semantics: distinct counts ignore
//! nulls, and a multi-column distinct count skips rows where any of the
//! columns is null.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::domain::{CleanRecord, RawRecord};
use crate::time::parse_timestamp_micros;

/// Null count per raw column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNulls {
    pub user_id: usize,
    pub user_first_touch_timestamp: usize,
    pub email: usize,
    pub updated: usize,
}

/// Profile of a record set before or after cleaning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordProfile {
    pub total_rows: usize,
    pub null_counts: ColumnNulls,
    /// Rows where every column is null
    pub empty_rows: usize,
    /// Distinct rows, comparing all four raw columns
    pub distinct_rows: usize,
    pub distinct_user_ids: usize,
    pub distinct_emails: usize,
    /// Distinct non-null `(user_id, user_first_touch_timestamp)` pairs, timestamps read as microseconds
    pub distinct_keys: usize,
}

impl RecordProfile {
    /// Profile a raw record set
    ///
    /// # Examples
    ///
    /// ```
    /// use users_clean::core::domain::RawRecord;
    /// use users_clean::preprocessing::RecordProfile;
    ///
    /// let raw = vec![
    ///     RawRecord::new(Some("u1"), Some(1), Some("a@x.com"), None),
    ///     RawRecord::new(Some("u1"), Some(1), Some("a@x.com"), None),
    ///     RawRecord::default(),
    /// ];
    /// let profile = RecordProfile::from_raw(&raw);
    /// assert_eq!(profile.total_rows, 3);
    /// assert_eq!(profile.distinct_rows, 2);
    /// assert_eq!(profile.null_counts.user_id, 1);
    /// assert_eq!(profile.distinct_keys, 1);
    /// ```
    pub fn from_raw(records: &[RawRecord]) -> Self {
        Self::from_rows(records.iter())
    }

    /// Profile a cleaned record set through its raw projection
    pub fn from_clean(records: &[CleanRecord]) -> Self {
        let projected: Vec<RawRecord> = records.iter().map(RawRecord::from).collect();
        Self::from_rows(projected.iter())
    }

    fn from_rows<'a>(rows: impl Iterator<Item = &'a RawRecord>) -> Self {
        let mut profile = RecordProfile::default();
        let mut distinct_rows = BTreeSet::new();
        let mut user_ids = BTreeSet::new();
        let mut emails = BTreeSet::new();
        let mut keys = BTreeSet::new();

        for row in rows {
            profile.total_rows += 1;
            if row.user_id.is_none() {
                profile.null_counts.user_id += 1;
            }
            if row.user_first_touch_timestamp.is_none() {
                profile.null_counts.user_first_touch_timestamp += 1;
            }
            if row.email.is_none() {
                profile.null_counts.email += 1;
            }
            if row.updated.is_none() {
                profile.null_counts.updated += 1;
            }
            if row.is_empty() {
                profile.empty_rows += 1;
            }

            distinct_rows.insert(row);
            if let Some(id) = row.user_id.as_deref() {
                user_ids.insert(id);
            }
            if let Some(email) = row.email.as_deref() {
                emails.insert(email);
            }
            if let (Some(id), Some(ts)) = (row.user_id.as_deref(), row.user_first_touch_timestamp.as_ref()) {
                // Keyed the way the pipeline reads timestamps; unreadable cells stay raw
                keys.insert((id, parse_timestamp_micros(ts).map_err(|_| ts)));
            }
        }

        profile.distinct_rows = distinct_rows.len();
        profile.distinct_user_ids = user_ids.len();
        profile.distinct_emails = emails.len();
        profile.distinct_keys = keys.len();
        profile
    }
}
