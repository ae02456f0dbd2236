//! Record-level cleaning transformations.
//!
//! This module provides the null filter and the group-and-collapse step that
//! turns a raw record set into one row per `(user_id, first-touch timestamp)`
//! pair, resolving conflicting fields with a [`CollisionPolicy`].
//!
//! # Example
//!
//! ```
//! use users_clean::core::domain::RawRecord;
//! use users_clean::transformations::{collapse_duplicates, filter_null_user_ids, CollisionPolicies};
//!
//! let raw = vec![
//!     RawRecord::new(Some("u1"), Some(1_000_000), Some("a@x.com"), None),
//!     RawRecord::new(Some("u1"), Some(1_000_000), None, None),
//!     RawRecord::default(),
//! ];
//! let kept = filter_null_user_ids(&raw);
//! let collapsed = collapse_duplicates(kept, &CollisionPolicies::default(), false).unwrap();
//! assert_eq!(collapsed.records.len(), 1);
//! ```

pub mod cleaning;

pub use cleaning::{
    collapse_duplicates, filter_null_user_ids, Collapsed, CollapsedRecord, CollisionPolicies,
    CollisionPolicy,
};
