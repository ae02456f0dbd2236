use chrono::FixedOffset;

use crate::core::domain::CleanRecord;
use crate::core::error::{CleaningError, CleaningResult};
use crate::time::{format_date, format_time, micros_to_datetime, offset_from_minutes, utc_offset};
use crate::transformations::CollapsedRecord;

/// Extract the part of an email address after the first `@`
///
/// Returns `None` when there is no `@` or nothing follows it.
///
/// # Examples
///
/// ```
/// use users_clean::preprocessing::extract_email_domain;
///
/// assert_eq!(extract_email_domain("bob@sub.example.com"), Some("sub.example.com"));
/// assert_eq!(extract_email_domain("noatsign"), None);
/// ```
pub fn extract_email_domain(email: &str) -> Option<&str> {
    email
        .split_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}

/// Enricher deriving calendar and display fields for collapsed records
pub struct RecordEnricher {
    offset: FixedOffset,
}

impl RecordEnricher {
    /// Create an enricher rendering display fields in UTC
    pub fn new() -> Self {
        Self {
            offset: utc_offset(),
        }
    }

    /// Create an enricher rendering display fields in a fixed offset
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Create an enricher from an offset in minutes east of UTC
    pub fn with_utc_offset_minutes(minutes: i32) -> CleaningResult<Self> {
        let offset = offset_from_minutes(minutes).ok_or_else(|| {
            CleaningError::Configuration(format!(
                "UTC offset of {} minutes is out of range",
                minutes
            ))
        })?;
        Ok(Self::with_offset(offset))
    }

    /// Offset used for the display date and time
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Derive `first_touch`, the display strings and `email_domain` for one record
    pub fn enrich_record(&self, record: CollapsedRecord) -> CleaningResult<CleanRecord> {
        let micros = record.user_first_touch_timestamp;
        let first_touch = micros_to_datetime(micros).ok_or_else(|| {
            CleaningError::invalid_timestamp(&record.user_id, micros, "out of range")
        })?;
        let email_domain = record
            .email
            .as_deref()
            .and_then(extract_email_domain)
            .map(str::to_string);

        Ok(CleanRecord {
            first_touch_date: format_date(&first_touch, &self.offset),
            first_touch_time: format_time(&first_touch, &self.offset),
            first_touch,
            email_domain,
            user_id: record.user_id,
            user_first_touch_timestamp: micros,
            email: record.email,
            updated: record.updated,
        })
    }

    /// Enrich every record, failing on the first out-of-range timestamp
    pub fn enrich_records(&self, records: Vec<CollapsedRecord>) -> CleaningResult<Vec<CleanRecord>> {
        records
            .into_iter()
            .map(|record| self.enrich_record(record))
            .collect()
    }
}

impl Default for RecordEnricher {
    fn default() -> Self {
        Self::new()
    }
}
