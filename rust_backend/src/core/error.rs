//! Error types for the cleaning pipeline.

/// Result type for cleaning operations
pub type CleaningResult<T> = Result<T, CleaningError>;

/// Error type for cleaning operations
#[derive(Debug, thiserror::Error)]
pub enum CleaningError {
    #[error("Invalid timestamp for user '{user_id}': {value} ({reason})")]
    InvalidTimestamp {
        user_id: String,
        value: String,
        reason: String,
    },

    #[error("Empty input: no raw records were supplied")]
    EmptyInput,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CleaningError {
    pub(crate) fn invalid_timestamp(
        user_id: &str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        CleaningError::InvalidTimestamp {
            user_id: user_id.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_timestamp_message() {
        let err = CleaningError::invalid_timestamp("u1", "abc", "not numeric");
        assert_eq!(
            err.to_string(),
            "Invalid timestamp for user 'u1': abc (not numeric)"
        );
    }

    #[test]
    fn test_empty_input_message() {
        assert!(CleaningError::EmptyInput.to_string().contains("no raw records"));
    }
}
