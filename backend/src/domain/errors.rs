use shared::InvalidRangeError;
use thiserror::Error;

use crate::storage::DuplicateEntry;

/// Failures a domain service can report to its caller
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<anyhow::Error> for DomainError {
    /// Unique-constraint collisions become conflicts, everything else is a
    /// storage failure
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DuplicateEntry>() {
            Ok(duplicate) => DomainError::Conflict(duplicate.0),
            Err(err) => DomainError::Storage(err),
        }
    }
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }
}

/// Reject percentages outside 0..=100
pub fn validate_percentage(value: f64, field: &str) -> DomainResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(DomainError::validation(format!(
            "{} must be between 0 and 100",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_percentage_bounds() {
        assert!(validate_percentage(0.0, "target_percentage").is_ok());
        assert!(validate_percentage(100.0, "target_percentage").is_ok());
        assert!(validate_percentage(-0.5, "target_percentage").is_err());
        assert!(validate_percentage(100.1, "target_percentage").is_err());
        assert!(validate_percentage(f64::NAN, "target_percentage").is_err());
    }

    #[test]
    fn test_duplicate_entry_becomes_conflict() {
        let err: DomainError = anyhow::Error::new(DuplicateEntry("Email already registered".into())).into();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Email already registered"));

        let err: DomainError = anyhow::anyhow!("disk I/O error").into();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[test]
    fn test_range_error_keeps_its_message() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let err: DomainError = InvalidRangeError::EndBeforeStart { start, end }.into();
        assert!(matches!(err, DomainError::InvalidRange(_)));
        assert!(err.to_string().contains("2024-05-01"));
    }
}
