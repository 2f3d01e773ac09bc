//! Error types for form validation.

use std::fmt;

use thiserror::Error;

/// A single rule a submitted field broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field name as the form shows it.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a violation for `field`.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors raised before any remote call is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more fields broke the form rules.
    #[error("invalid doctor data: {}", join(.violations))]
    Invalid {
        /// Every broken rule, in field order.
        violations: Vec<Violation>,
    },

    /// A status string that is not one of the known wire names.
    #[error("unknown doctor status: {0}")]
    UnknownStatus(String),
}

impl ValidationError {
    /// Returns the violations carried by this error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Invalid { violations } => violations,
            Self::UnknownStatus(_) => &[],
        }
    }

    /// Returns true if `field` is among the violations.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations().iter().any(|v| v.field == field)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for validation.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid() {
        let err = ValidationError::Invalid {
            violations: vec![
                Violation::new("name", "Name must be at least 2 characters."),
                Violation::new("rating", "Ratings must be between 0 and 5."),
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid doctor data: name: Name must be at least 2 characters.; rating: Ratings must be between 0 and 5."
        );
        assert!(err.has_field("rating"));
        assert!(!err.has_field("email"));
    }

    #[test]
    fn test_error_display_unknown_status() {
        let err = ValidationError::UnknownStatus("sabbatical".to_string());
        assert_eq!(err.to_string(), "unknown doctor status: sabbatical");
        assert!(err.violations().is_empty());
    }
}
