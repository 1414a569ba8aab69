//! # Store Errors

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
///
/// Engine messages are carried verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open store '{}': {message}", path.display())]
    Open { path: PathBuf, message: String },

    #[error("SQL execution failed: {message}")]
    Execution { sql: String, message: String },

    #[error("table '{table}' returned {actual} columns, schema declares {expected}")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("invalid config: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn execution(sql: &str, message: impl Into<String>) -> Self {
        StoreError::Execution {
            sql: sql.to_string(),
            message: message.into(),
        }
    }

    /// The statement that failed, if any
    pub fn sql(&self) -> Option<&str> {
        match self {
            StoreError::Execution { sql, .. } => Some(sql),
            _ => None,
        }
    }

    /// Whether the error is an invariant violation rather than an engine
    /// or input failure
    pub fn is_fatal(&self) -> bool {
        match self {
            StoreError::ColumnCountMismatch { .. } => true,
            StoreError::Schema(e) => e.is_fatal(),
            _ => false,
        }
    }
}
