//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the log filter parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GrouteConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::GrouteConfig;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("logging.filter must not be empty")]
    EmptyLogFilter,

    #[error("logging.filter {filter:?} is invalid: {reason}")]
    InvalidLogFilter { filter: String, reason: String },
}

pub fn validate_config(config: &GrouteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let filter = config.logging.filter.trim();
    if filter.is_empty() {
        errors.push(ValidationError::EmptyLogFilter);
    } else if let Err(e) = EnvFilter::try_new(filter) {
        errors.push(ValidationError::InvalidLogFilter {
            filter: filter.to_string(),
            reason: e.to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&GrouteConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_filters() {
        let mut config = GrouteConfig::default();
        config.logging.filter = "   ".into();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::EmptyLogFilter]
        );

        config.logging.filter = "groute=notalevel".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidLogFilter { .. }));
    }
}
