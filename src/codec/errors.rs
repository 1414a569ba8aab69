//! # Codec Errors

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while converting between column text and native values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid {type_name} value: '{text}'")]
    InvalidNumber { type_name: &'static str, text: String },

    #[error("value '{text}' out of range for {type_name}")]
    OutOfRange { type_name: &'static str, text: String },

    #[error("malformed text literal: {0}")]
    InvalidLiteral(String),
}

impl CodecError {
    pub(crate) fn invalid_number(type_name: &'static str, text: &str) -> Self {
        CodecError::InvalidNumber {
            type_name,
            text: text.to_string(),
        }
    }

    pub(crate) fn out_of_range(type_name: &'static str, text: &str) -> Self {
        CodecError::OutOfRange {
            type_name,
            text: text.to_string(),
        }
    }
}
