//! Store
//!
//! Persists record types through their schemas: table creation, single and
//! batch inserts, full-table reads.
//!
//! # Usage
//!
//! ```no_run
//! use tablemap::field;
//! use tablemap::schema::{Record, SchemaBuilder};
//! use tablemap::store::Store;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     id: i32,
//!     name: String,
//! }
//!
//! impl Record for Person {
//!     fn define(builder: SchemaBuilder<'_, Self>) -> SchemaBuilder<'_, Self> {
//!         builder
//!             .table_name("Person")
//!             .column("id", field!(Self, id))
//!             .column("name", field!(Self, name))
//!     }
//! }
//!
//! let store = Store::open("people.db");
//! store.ensure_table::<Person>()?;
//! store.insert(&Person { id: 1, name: "Alice".into() })?;
//! let people: Vec<Person> = store.select_all()?;
//! # Ok::<(), tablemap::store::StoreError>(())
//! ```

mod adapter;
mod config;
mod engine;
mod errors;

pub use adapter::Store;
pub use config::StoreConfig;
pub use engine::{Engine, EngineConnection, RowCallback, SqliteConnection, SqliteEngine};
pub use errors::{StoreError, StoreResult};
