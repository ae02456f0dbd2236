pub mod enricher;
pub mod pipeline;
pub mod profile;
pub mod validator;

pub use enricher::{extract_email_domain, RecordEnricher};
pub use pipeline::{clean_records, CleaningConfig, CleaningOutcome, CleaningPipeline, CleaningStats};
pub use profile::{ColumnNulls, RecordProfile};
pub use validator::{
    max_rows_per_user_id, max_user_ids_per_email, RecordValidator, ValidationResult,
    ValidationStats,
};
