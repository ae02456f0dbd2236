use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::domain::{FieldValue, RawRecord};
use crate::core::error::{CleaningError, CleaningResult};
use crate::time::parse_timestamp_micros;

/// Rule for choosing one value when collapsed duplicates disagree on a field.
///
/// Nulls never beat a non-null value under any policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Largest non-null value (lexicographic for text, numeric for numbers)
    #[default]
    Max,
    /// Smallest non-null value
    Min,
    /// First non-null value in input order
    First,
    /// Last non-null value in input order
    Last,
}

impl CollisionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionPolicy::Max => "max",
            CollisionPolicy::Min => "min",
            CollisionPolicy::First => "first",
            CollisionPolicy::Last => "last",
        }
    }

    /// Fold one more observed value into the value kept so far.
    ///
    /// # Examples
    ///
    /// ```
    /// use users_clean::transformations::CollisionPolicy;
    ///
    /// let kept = CollisionPolicy::Max.resolve(None, Some(&"a@x.com"));
    /// assert_eq!(kept, Some("a@x.com"));
    ///
    /// let kept = CollisionPolicy::Max.resolve(kept, None);
    /// assert_eq!(kept, Some("a@x.com"));
    ///
    /// let kept = CollisionPolicy::Min.resolve(Some("b"), Some(&"a"));
    /// assert_eq!(kept, Some("a"));
    /// ```
    pub fn resolve<T: Ord + Clone>(&self, kept: Option<T>, incoming: Option<&T>) -> Option<T> {
        let Some(incoming) = incoming else {
            return kept;
        };
        match (self, kept) {
            (_, None) => Some(incoming.clone()),
            (CollisionPolicy::Max, Some(current)) => Some(std::cmp::max(current, incoming.clone())),
            (CollisionPolicy::Min, Some(current)) => Some(std::cmp::min(current, incoming.clone())),
            (CollisionPolicy::First, Some(current)) => Some(current),
            (CollisionPolicy::Last, Some(_)) => Some(incoming.clone()),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "max" => Ok(CollisionPolicy::Max),
            "min" => Ok(CollisionPolicy::Min),
            "first" => Ok(CollisionPolicy::First),
            "last" => Ok(CollisionPolicy::Last),
            other => Err(format!(
                "Invalid collision policy: {}. Must be 'max', 'min', 'first', or 'last'",
                other
            )),
        }
    }
}

/// Per-field collision policies applied while collapsing duplicates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionPolicies {
    #[serde(default)]
    pub email: CollisionPolicy,
    #[serde(default)]
    pub updated: CollisionPolicy,
}

/// One surviving row per dedup key, before enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedRecord {
    pub user_id: String,
    pub user_first_touch_timestamp: i64,
    pub email: Option<String>,
    pub updated: Option<FieldValue>,
}

/// Output of [`collapse_duplicates`]
#[derive(Debug, Clone, Default)]
pub struct Collapsed {
    /// Sorted by `(user_id, user_first_touch_timestamp)`
    pub records: Vec<CollapsedRecord>,
    pub dropped_null_timestamps: usize,
    pub duplicates_collapsed: usize,
}

/// Keep only records that carry a `user_id`
pub fn filter_null_user_ids(records: &[RawRecord]) -> Vec<&RawRecord> {
    records.iter().filter(|r| r.user_id.is_some()).collect()
}

/// Group records by `(user_id, user_first_touch_timestamp)` and collapse each group
///
/// Records without a `user_id` are skipped. Records with a `user_id` but no
/// timestamp are dropped and counted, or rejected when
/// `reject_null_timestamps` is set. A timestamp that cannot be read as
/// integer microseconds fails the whole call.
pub fn collapse_duplicates<'a, I>(
    records: I,
    policies: &CollisionPolicies,
    reject_null_timestamps: bool,
) -> CleaningResult<Collapsed>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut groups: BTreeMap<(String, i64), CollapsedRecord> = BTreeMap::new();
    let mut dropped_null_timestamps = 0;
    let mut duplicates_collapsed = 0;

    for record in records {
        let Some(user_id) = record.user_id.as_deref() else {
            continue;
        };

        let micros = match &record.user_first_touch_timestamp {
            Some(raw) => parse_timestamp_micros(raw)
                .map_err(|reason| CleaningError::invalid_timestamp(user_id, raw, reason))?,
            None if reject_null_timestamps => {
                return Err(CleaningError::invalid_timestamp(user_id, "null", "missing timestamp"));
            }
            None => {
                log::debug!("Dropping record for user '{}' with null timestamp", user_id);
                dropped_null_timestamps += 1;
                continue;
            }
        };

        match groups.entry((user_id.to_string(), micros)) {
            Entry::Occupied(mut entry) => {
                duplicates_collapsed += 1;
                let group = entry.get_mut();
                group.email = policies.email.resolve(group.email.take(), record.email.as_ref());
                group.updated = policies
                    .updated
                    .resolve(group.updated.take(), record.updated.as_ref());
            }
            Entry::Vacant(entry) => {
                entry.insert(CollapsedRecord {
                    user_id: user_id.to_string(),
                    user_first_touch_timestamp: micros,
                    email: record.email.clone(),
                    updated: record.updated.clone(),
                });
            }
        }
    }

    Ok(Collapsed {
        records: groups.into_values().collect(),
        dropped_null_timestamps,
        duplicates_collapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: Option<&str>, ts: Option<i64>, email: Option<&str>, updated: Option<i64>) -> RawRecord {
        RawRecord::new(id, ts, email, updated.map(FieldValue::Int))
    }

    #[test]
    fn test_filter_null_user_ids() {
        let records = vec![
            rec(Some("u1"), Some(1), None, None),
            rec(None, None, None, None),
            rec(None, Some(5), Some("x@y.z"), None),
        ];
        let kept = filter_null_user_ids(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_collapse_prefers_non_null_max() {
        let records = vec![
            rec(Some("u1"), Some(1_000_000), Some("a@x.com"), Some(1)),
            rec(Some("u1"), Some(1_000_000), None, Some(1)),
            rec(Some("u1"), Some(1_000_000), Some("b@x.com"), None),
        ];
        let collapsed = collapse_duplicates(&records, &CollisionPolicies::default(), false).unwrap();
        assert_eq!(collapsed.records.len(), 1);
        assert_eq!(collapsed.duplicates_collapsed, 2);
        let row = &collapsed.records[0];
        assert_eq!(row.email.as_deref(), Some("b@x.com"));
        assert_eq!(row.updated, Some(FieldValue::Int(1)));
    }

    #[test]
    fn test_collapse_first_and_last_policies() {
        let records = vec![
            rec(Some("u1"), Some(7), None, Some(3)),
            rec(Some("u1"), Some(7), Some("z@x.com"), Some(1)),
            rec(Some("u1"), Some(7), Some("a@x.com"), Some(2)),
        ];
        let policies = CollisionPolicies {
            email: CollisionPolicy::First,
            updated: CollisionPolicy::Last,
        };
        let collapsed = collapse_duplicates(&records, &policies, false).unwrap();
        let row = &collapsed.records[0];
        assert_eq!(row.email.as_deref(), Some("z@x.com"));
        assert_eq!(row.updated, Some(FieldValue::Int(2)));
    }

    #[test]
    fn test_distinct_timestamps_stay_separate_and_sorted() {
        let records = vec![
            rec(Some("u2"), Some(5), None, None),
            rec(Some("u1"), Some(9), None, None),
            rec(Some("u1"), Some(3), None, None),
        ];
        let collapsed = collapse_duplicates(&records, &CollisionPolicies::default(), false).unwrap();
        let keys: Vec<(&str, i64)> = collapsed
            .records
            .iter()
            .map(|r| (r.user_id.as_str(), r.user_first_touch_timestamp))
            .collect();
        assert_eq!(keys, vec![("u1", 3), ("u1", 9), ("u2", 5)]);
        assert_eq!(collapsed.duplicates_collapsed, 0);
    }

    #[test]
    fn test_null_timestamp_dropped_or_rejected() {
        let records = vec![rec(Some("u1"), None, None, None), rec(Some("u2"), Some(1), None, None)];

        let collapsed = collapse_duplicates(&records, &CollisionPolicies::default(), false).unwrap();
        assert_eq!(collapsed.records.len(), 1);
        assert_eq!(collapsed.dropped_null_timestamps, 1);

        let err = collapse_duplicates(&records, &CollisionPolicies::default(), true).unwrap_err();
        assert!(matches!(err, CleaningError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_malformed_timestamp_fails() {
        let records = vec![RawRecord {
            user_id: Some("u1".into()),
            user_first_touch_timestamp: Some(FieldValue::Text("not-a-number".into())),
            email: None,
            updated: None,
        }];
        match collapse_duplicates(&records, &CollisionPolicies::default(), false) {
            Err(CleaningError::InvalidTimestamp { user_id, value, .. }) => {
                assert_eq!(user_id, "u1");
                assert_eq!(value, "not-a-number");
            }
            other => panic!("expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_collision_policy_from_str() {
        assert_eq!("MAX".parse::<CollisionPolicy>(), Ok(CollisionPolicy::Max));
        assert_eq!(" last ".parse::<CollisionPolicy>(), Ok(CollisionPolicy::Last));
        assert!("newest".parse::<CollisionPolicy>().is_err());
        assert_eq!(CollisionPolicy::Min.to_string(), "min");
    }
}
