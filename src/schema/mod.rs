//! Schema derivation
//!
//! A record type describes its table once through [`SchemaBuilder`]. The
//! first build for a table name derives the column list, the
//! `CREATE TABLE` statement and the insert template, and commits them to a
//! [`TableRegistry`]. Every later build for that name reuses the committed
//! [`TableInfo`].
//!
//! # Invariants
//!
//! - At most one [`TableInfo`] is committed per table name
//! - Every schema bound to a table name has the committed row shape;
//!   anything else fails with `TABLEMAP_SHAPE_CONFLICT`
//! - Committed metadata is never updated

mod builder;
mod errors;
mod record;
mod registry;
mod table;
mod template;
mod types;

pub use builder::SchemaBuilder;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use record::Record;
pub use registry::TableRegistry;
pub use table::{BoundRecord, TableSchema};
pub use template::{
    create_table_sql, drop_table_sql, quote_identifier, select_all_sql, InsertTemplate, BEGIN,
    COMMIT, ROLLBACK, SYNCHRONOUS_OFF,
};
pub use types::{ColumnDescriptor, TableInfo};
