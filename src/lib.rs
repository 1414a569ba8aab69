//! tablemap - typed record to SQLite table mapping
//!
//! A record type declares its table once; the first declaration per table
//! name derives the column list and SQL templates and commits them to a
//! shared registry. Rows are written and read back through generated SQL.
//!
//! - [`codec`]: value to SQL literal encoding and column text decoding
//! - [`layout`]: field layout and typed field accessors
//! - [`schema`]: schema derivation and the table registry
//! - [`store`]: SQLite persistence
//! - [`observability`]: structured logging

pub mod codec;
pub mod layout;
pub mod observability;
pub mod schema;
pub mod store;

pub use codec::SqlType;
pub use layout::Field;
pub use schema::{Record, SchemaBuilder, TableRegistry, TableSchema};
pub use store::{Store, StoreConfig, StoreError};
