//! Core domain models and errors for user record cleaning.
//!
//! This module defines the record types shared by every pipeline stage and
//! the error taxonomy the pipeline reports.

pub mod domain;
pub mod error;

pub use domain::{CleanRecord, FieldValue, RawRecord};
pub use error::{CleaningError, CleaningResult};
