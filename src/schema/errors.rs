//! Schema error types
//!
//! Error codes:
//! - TABLEMAP_TABLE_NAME_REQUIRED (REJECT)
//! - TABLEMAP_NO_COLUMNS (REJECT)
//! - TABLEMAP_DUPLICATE_COLUMN (REJECT)
//! - TABLEMAP_FIELD_ACCESS (REJECT)
//! - TABLEMAP_SHAPE_CONFLICT (FATAL)

use std::fmt;

use crate::layout::{FieldLayout, LayoutError};

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The request is rejected; the registry is unchanged
    Reject,
    /// A registry invariant would be violated; never retried
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Build called without a table name
    TableNameRequired,
    /// Build called without any column
    NoColumns,
    /// Two columns share a name
    DuplicateColumn,
    /// A field could not be read or written by index
    FieldAccess,
    /// Table name already committed with a different row shape
    ShapeConflict,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::TableNameRequired => "TABLEMAP_TABLE_NAME_REQUIRED",
            SchemaErrorCode::NoColumns => "TABLEMAP_NO_COLUMNS",
            SchemaErrorCode::DuplicateColumn => "TABLEMAP_DUPLICATE_COLUMN",
            SchemaErrorCode::FieldAccess => "TABLEMAP_FIELD_ACCESS",
            SchemaErrorCode::ShapeConflict => "TABLEMAP_SHAPE_CONFLICT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::ShapeConflict => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    table_name: Option<String>,
    source: Option<LayoutError>,
}

impl SchemaError {
    /// Create a table name required error
    pub fn table_name_required() -> Self {
        Self {
            code: SchemaErrorCode::TableNameRequired,
            message: "a table name must be set before build".into(),
            table_name: None,
            source: None,
        }
    }

    /// Create a no columns error
    pub fn no_columns(table_name: impl Into<String>) -> Self {
        let table = table_name.into();
        Self {
            code: SchemaErrorCode::NoColumns,
            message: format!("table '{}' declares no columns", table),
            table_name: Some(table),
            source: None,
        }
    }

    /// Create a duplicate column error
    pub fn duplicate_column(table_name: impl Into<String>, column: &str) -> Self {
        let table = table_name.into();
        Self {
            code: SchemaErrorCode::DuplicateColumn,
            message: format!("table '{}' declares column '{}' more than once", table, column),
            table_name: Some(table),
            source: None,
        }
    }

    /// Create a field access error
    pub fn field_access(table_name: impl Into<String>, source: LayoutError) -> Self {
        let table = table_name.into();
        Self {
            code: SchemaErrorCode::FieldAccess,
            message: format!("table '{}': {}", table, source),
            table_name: Some(table),
            source: Some(source),
        }
    }

    /// Create a shape conflict error (FATAL)
    pub fn shape_conflict(
        table_name: impl Into<String>,
        existing: &FieldLayout,
        requested: &FieldLayout,
    ) -> Self {
        let table = table_name.into();
        Self {
            code: SchemaErrorCode::ShapeConflict,
            message: format!(
                "table name already exists with a different row shape: '{}' is {}, requested {}",
                table, existing, requested
            ),
            table_name: Some(table),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the table name if applicable
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
