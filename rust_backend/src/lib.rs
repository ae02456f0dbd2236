//! Deterministic cleaning of raw user records.
//!
//! The pipeline drops rows without a `user_id`, collapses duplicates on
//! `(user_id, user_first_touch_timestamp)`, converts the microsecond
//! timestamp to a calendar timestamp and derives display date, display time
//! and email domain columns.
//!
//! # Example
//!
//! ```
//! use users_clean::core::domain::RawRecord;
//! use users_clean::preprocessing::CleaningPipeline;
//!
//! let raw = vec![
//!     RawRecord::new(Some("u1"), Some(1_000_000), Some("a@x.com"), None),
//!     RawRecord::new(Some("u1"), Some(1_000_000), None, None),
//! ];
//! let outcome = CleaningPipeline::new().clean(&raw).unwrap();
//! assert_eq!(outcome.records[0].first_touch_date, "Jan 1, 1970");
//! ```

pub mod checksum;
pub mod config;
pub mod core;
pub mod io;
pub mod preprocessing;
pub mod time;
pub mod transformations;

#[cfg(feature = "dataframe")]
pub mod dataframe;

pub use crate::core::domain::{CleanRecord, FieldValue, RawRecord};
pub use crate::core::error::{CleaningError, CleaningResult};
pub use crate::preprocessing::{clean_records, CleaningConfig, CleaningOutcome, CleaningPipeline};
