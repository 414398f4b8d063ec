//! Error types for HTML extraction.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParsingError {
    #[error("input is not valid UTF-8: {reason}")]
    InvalidEncoding { reason: String },

    #[error("invalid CSS selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("required field '{field}' not found in document")]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("URL resolution failed for '{url}': {reason}")]
    UrlResolutionFailed { url: String, reason: String },
}

impl ParsingError {
    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(|s| s.to_string()),
        }
    }

    /// Whether the caller can degrade to a default instead of aborting.
    /// Field-level gaps are always absorbed; encoding and selector
    /// problems are not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::RequiredFieldMissing { .. } => true,
            Self::UrlResolutionFailed { .. } => true,
            Self::InvalidEncoding { .. } => false,
            Self::InvalidSelector { .. } => false,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
