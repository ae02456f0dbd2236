//! Validation of cleaned user records.
//!
//! This module checks the properties a cleaned record set is expected to
//! have: unique dedup keys, one row per user, and at most one user per email
//! address. It reports violations as errors and softer data-quality findings
//! as warnings.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::domain::CleanRecord;

/// Validation result with categorized issues and statistics.
///
/// Errors make `is_valid` false, while warnings are informational.
///
/// # Examples
///
/// ```
/// use users_clean::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_warning("3 records have no email".to_string());
/// assert!(result.is_valid);
///
/// result.add_error("Duplicate key".to_string());
/// assert!(!result.is_valid);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
///
/// # Fields
///
/// * `total_records` - Number of cleaned records validated
/// * `duplicate_keys` - Records whose `(user_id, timestamp)` key was already seen
/// * `max_rows_per_user_id` - Largest number of rows sharing one `user_id`
/// * `max_user_ids_per_email` - Largest number of distinct users sharing one email
/// * `missing_emails` - Records without an email
/// * `missing_email_domains` - Records with an email but no extractable domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_records: usize,
    pub duplicate_keys: usize,
    pub max_rows_per_user_id: usize,
    pub max_user_ids_per_email: usize,
    pub missing_emails: usize,
    pub missing_email_domains: usize,
}

impl ValidationResult {
    /// Creates a new validation result with valid status and empty issue lists.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds an error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Adds a warning without invalidating the result.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest number of rows sharing a single `user_id`
///
/// A value of 0 means the set is empty; 1 means every user appears once.
pub fn max_rows_per_user_id(records: &[CleanRecord]) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.user_id.as_str()).or_insert(0) += 1;
    }
    counts.into_values().max().unwrap_or(0)
}

/// Largest number of distinct `user_id`s sharing a single non-null email
///
/// Records without an email are ignored.
pub fn max_user_ids_per_email(records: &[CleanRecord]) -> usize {
    let mut ids_by_email: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for record in records {
        if let Some(email) = record.email.as_deref() {
            ids_by_email
                .entry(email)
                .or_default()
                .insert(record.user_id.as_str());
        }
    }
    ids_by_email
        .into_values()
        .map(|ids| ids.len())
        .max()
        .unwrap_or(0)
}

/// Validator for cleaned user records.
///
/// # Examples
///
/// ```
/// use users_clean::preprocessing::validator::RecordValidator;
///
/// let result = RecordValidator::validate(&[]);
/// assert!(result.is_valid);
/// assert_eq!(result.stats.total_records, 0);
/// ```
pub struct RecordValidator;

impl RecordValidator {
    /// Validates a cleaned record set.
    ///
    /// Errors:
    /// - duplicate `(user_id, user_first_touch_timestamp)` keys
    /// - a `user_id` with more than one row
    /// - an email shared by more than one `user_id`
    ///
    /// Warnings:
    /// - records without an email
    /// - emails without a domain
    pub fn validate(records: &[CleanRecord]) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.stats.total_records = records.len();

        Self::check_duplicate_keys(records, &mut result);
        Self::check_user_uniqueness(records, &mut result);
        Self::check_email_ownership(records, &mut result);
        Self::check_emails(records, &mut result);

        result
    }

    fn check_duplicate_keys(records: &[CleanRecord], result: &mut ValidationResult) {
        let mut seen = BTreeSet::new();
        let duplicates = records.iter().filter(|r| !seen.insert(r.key())).count();
        result.stats.duplicate_keys = duplicates;
        if duplicates > 0 {
            result.add_error(format!(
                "{} records repeat an existing (user_id, user_first_touch_timestamp) key",
                duplicates
            ));
        }
    }

    fn check_user_uniqueness(records: &[CleanRecord], result: &mut ValidationResult) {
        let max_rows = max_rows_per_user_id(records);
        result.stats.max_rows_per_user_id = max_rows;
        if max_rows > 1 {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for record in records {
                *counts.entry(record.user_id.as_str()).or_insert(0) += 1;
            }
            let repeated: Vec<&str> = counts
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .map(|(id, _)| id)
                .collect();
            result.add_error(format!(
                "{} user_id values appear in more than one row (max {}): {}",
                repeated.len(),
                max_rows,
                preview(&repeated)
            ));
        }
    }

    fn check_email_ownership(records: &[CleanRecord], result: &mut ValidationResult) {
        let max_ids = max_user_ids_per_email(records);
        result.stats.max_user_ids_per_email = max_ids;
        if max_ids > 1 {
            let mut ids_by_email: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
            for record in records {
                if let Some(email) = record.email.as_deref() {
                    ids_by_email.entry(email).or_default().insert(record.user_id.as_str());
                }
            }
            let shared: Vec<&str> = ids_by_email
                .into_iter()
                .filter(|(_, ids)| ids.len() > 1)
                .map(|(email, _)| email)
                .collect();
            result.add_error(format!(
                "{} emails map to more than one user_id (max {}): {}",
                shared.len(),
                max_ids,
                preview(&shared)
            ));
        }
    }

    fn check_emails(records: &[CleanRecord], result: &mut ValidationResult) {
        let missing = records.iter().filter(|r| r.email.is_none()).count();
        let without_domain = records
            .iter()
            .filter(|r| r.email.is_some() && r.email_domain.is_none())
            .count();

        result.stats.missing_emails = missing;
        result.stats.missing_email_domains = without_domain;

        if missing > 0 {
            result.add_warning(format!("{} records have no email", missing));
        }
        if without_domain > 0 {
            result.add_warning(format!(
                "{} records have an email without a domain",
                without_domain
            ));
        }
    }
}

fn preview(values: &[&str]) -> String {
    const LIMIT: usize = 5;
    let shown = values.iter().take(LIMIT).copied().collect::<Vec<_>>().join(", ");
    if values.len() > LIMIT {
        format!("{}, ...", shown)
    } else {
        shown
    }
}
