use serde::{Deserialize, Serialize};

use crate::core::domain::{CleanRecord, RawRecord};
use crate::core::error::{CleaningError, CleaningResult};
use crate::preprocessing::enricher::RecordEnricher;
use crate::preprocessing::validator::{RecordValidator, ValidationResult};
use crate::transformations::{collapse_duplicates, filter_null_user_ids, CollisionPolicies};

/// Counts collected during one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStats {
    pub input_rows: usize,
    pub dropped_null_user_ids: usize,
    pub dropped_null_timestamps: usize,
    pub duplicates_collapsed: usize,
    pub output_rows: usize,
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    /// Sorted by `(user_id, user_first_touch_timestamp)`
    pub records: Vec<CleanRecord>,
    pub validation: ValidationResult,
    pub stats: CleaningStats,
}

/// Configuration for the cleaning pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningConfig {
    pub policies: CollisionPolicies,
    /// Fail with `EmptyInput` when no raw records are supplied
    pub reject_empty_input: bool,
    /// Fail instead of dropping rows that have a `user_id` but no timestamp
    pub reject_null_timestamps: bool,
    /// Offset, in minutes east of UTC, for the display date and time
    pub utc_offset_minutes: i32,
    pub validate: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            policies: CollisionPolicies::default(),
            reject_empty_input: true,
            reject_null_timestamps: false,
            utc_offset_minutes: 0,
            validate: true,
        }
    }
}

/// Main cleaning pipeline
pub struct CleaningPipeline {
    config: CleaningConfig,
    enricher: RecordEnricher,
}

impl CleaningPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: CleaningConfig::default(),
            enricher: RecordEnricher::new(),
        }
    }

    /// Create a pipeline with custom configuration
    ///
    /// Fails with `Configuration` when the UTC offset is out of range.
    pub fn with_config(config: CleaningConfig) -> CleaningResult<Self> {
        let enricher = RecordEnricher::with_utc_offset_minutes(config.utc_offset_minutes)?;
        Ok(Self { config, enricher })
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a raw record set
    ///
    /// # Arguments
    /// * `records` - Raw records in input order
    ///
    /// # Returns
    /// `CleaningOutcome` with the cleaned records, validation info and counts.
    /// Nothing is returned on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use users_clean::core::domain::{FieldValue, RawRecord};
    /// use users_clean::preprocessing::CleaningPipeline;
    ///
    /// let raw = vec![
    ///     RawRecord::new(Some("u1"), Some(1_000_000), Some("a@x.com"), Some(FieldValue::Int(1))),
    ///     RawRecord::new(Some("u1"), Some(1_000_000), None, Some(FieldValue::Int(1))),
    ///     RawRecord::default(),
    /// ];
    ///
    /// let outcome = CleaningPipeline::new().clean(&raw).unwrap();
    /// assert_eq!(outcome.records.len(), 1);
    /// assert_eq!(outcome.records[0].email_domain.as_deref(), Some("x.com"));
    /// assert_eq!(outcome.stats.dropped_null_user_ids, 1);
    /// ```
    pub fn clean(&self, records: &[RawRecord]) -> CleaningResult<CleaningOutcome> {
        if records.is_empty() && self.config.reject_empty_input {
            return Err(CleaningError::EmptyInput);
        }

        // Step 1: Drop rows without a dedup key
        let with_ids = filter_null_user_ids(records);
        let dropped_null_user_ids = records.len() - with_ids.len();

        // Step 2: Collapse duplicates
        let collapsed = collapse_duplicates(
            with_ids,
            &self.config.policies,
            self.config.reject_null_timestamps,
        )?;

        // Steps 3 and 4: Derive timestamp and display fields
        let cleaned = self.enricher.enrich_records(collapsed.records)?;

        let validation = if self.config.validate {
            RecordValidator::validate(&cleaned)
        } else {
            ValidationResult::new()
        };

        let stats = CleaningStats {
            input_rows: records.len(),
            dropped_null_user_ids,
            dropped_null_timestamps: collapsed.dropped_null_timestamps,
            duplicates_collapsed: collapsed.duplicates_collapsed,
            output_rows: cleaned.len(),
        };

        log::debug!(
            "Cleaned {} raw rows into {} records ({} without user_id, {} without timestamp, {} duplicates)",
            stats.input_rows,
            stats.output_rows,
            stats.dropped_null_user_ids,
            stats.dropped_null_timestamps,
            stats.duplicates_collapsed
        );
        if !validation.is_valid {
            log::warn!("Cleaned records failed validation: {:?}", validation.errors);
        }

        Ok(CleaningOutcome {
            records: cleaned,
            validation,
            stats,
        })
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to clean records with the default configuration
pub fn clean_records(records: &[RawRecord]) -> CleaningResult<Vec<CleanRecord>> {
    CleaningPipeline::new().clean(records).map(|outcome| outcome.records)
}
