//! # Layout Errors

use thiserror::Error;

use crate::codec::CodecError;

/// Result type for field access
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Field access failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("field index {index} out of range for row of {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("field {index} holds {actual}, requested {expected}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: CodecError,
    },
}
