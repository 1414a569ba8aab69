//! Observable events
//!
//! Events are explicit and typed; each one carries its default severity.

use std::fmt;

use super::logger::{Logger, Severity};

/// Events emitted by the mapping layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Schema registry
    /// A freshly derived schema was committed
    SchemaRegistered,
    /// A builder reused an already committed schema
    SchemaCacheHit,
    /// A builder derived a schema but another builder committed first
    SchemaRaceLost,
    /// A builder's row shape differs from the committed one
    SchemaShapeConflict,

    // Store
    /// A generated statement is about to run
    StoreExecute,
    /// The engine rejected a statement
    StoreExecuteFailed,
    /// A batch insert committed
    StoreBatchCommitted,
    /// A batch insert was rolled back
    StoreBatchRolledBack,
    /// A query returned rows that do not fit the schema
    StoreShapeMismatch,
}

impl Event {
    /// Returns the event name as logged
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemaCacheHit => "SCHEMA_CACHE_HIT",
            Event::SchemaRaceLost => "SCHEMA_RACE_LOST",
            Event::SchemaShapeConflict => "SCHEMA_SHAPE_CONFLICT",
            Event::StoreExecute => "STORE_EXECUTE",
            Event::StoreExecuteFailed => "STORE_EXECUTE_FAILED",
            Event::StoreBatchCommitted => "STORE_BATCH_COMMITTED",
            Event::StoreBatchRolledBack => "STORE_BATCH_ROLLED_BACK",
            Event::StoreShapeMismatch => "STORE_SHAPE_MISMATCH",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreExecute | Event::SchemaCacheHit => Severity::Trace,
            Event::SchemaRegistered | Event::StoreBatchCommitted => Severity::Info,
            Event::SchemaRaceLost | Event::StoreBatchRolledBack => Severity::Warn,
            Event::StoreExecuteFailed => Severity::Error,
            Event::SchemaShapeConflict | Event::StoreShapeMismatch => Severity::Fatal,
        }
    }

    /// Logs the event with `fields`
    pub fn emit(self, fields: &[(&str, &str)]) {
        Logger::log(self.severity(), self.as_str(), fields);
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
