//! Observability
//!
//! Structured JSON logging for schema derivation and store operations.
//!
//! # Usage
//!
//! ```
//! use tablemap::observability::{Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Info);
//! Event::SchemaRegistered.emit(&[("table", "people")]);
//! Logger::info("CUSTOM_EVENT", &[("rows", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{LogSink, Logger, Severity};
