//! Fluent schema builder
//!
//! ```
//! use tablemap::field;
//! use tablemap::schema::{SchemaBuilder, TableRegistry};
//!
//! #[derive(Default)]
//! struct Person {
//!     id: i32,
//!     name: String,
//! }
//!
//! let registry = TableRegistry::new();
//! let schema = SchemaBuilder::<Person>::new(&registry)
//!     .table_name("Person")
//!     .column("id", field!(Person, id))
//!     .column("name", field!(Person, name))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     schema.create_table_sql(),
//!     "CREATE TABLE IF NOT EXISTS \"Person\"( id INT, name TEXT );"
//! );
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use crate::codec::SqlType;
use crate::layout::{Field, FieldAccessor, FieldLayout, RecordLayout};
use crate::observability::Event;

use super::errors::{SchemaError, SchemaResult};
use super::registry::TableRegistry;
use super::table::TableSchema;
use super::types::TableInfo;

/// Accumulates the columns of record type `R`.
///
/// Once [`SchemaBuilder::table_name`] finds the table already registered,
/// the committed metadata is authoritative: column names passed afterwards
/// are ignored, and only the accessors are kept to bind the caller's record.
pub struct SchemaBuilder<'a, R> {
    registry: &'a TableRegistry,
    table_name: Option<String>,
    cached: Option<Arc<TableInfo>>,
    column_names: Vec<String>,
    accessors: Vec<Box<dyn FieldAccessor<R>>>,
}

impl<'a, R: 'static> SchemaBuilder<'a, R> {
    pub fn new(registry: &'a TableRegistry) -> Self {
        Self {
            registry,
            table_name: None,
            cached: None,
            column_names: Vec::new(),
            accessors: Vec::new(),
        }
    }

    /// Sets the table name and consults the registry for it
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.cached = self.registry.lookup(&name);
        self.table_name = Some(name);
        self
    }

    /// Appends a column backed by `field`
    pub fn column<T: SqlType>(mut self, name: impl Into<String>, field: Field<R, T>) -> Self {
        if self.cached.is_none() {
            self.column_names.push(name.into());
        }
        self.accessors.push(Box::new(field));
        self
    }

    /// Whether the table name hit an already committed schema
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Resolves the schema, deriving and registering it if needed
    pub fn build(self) -> SchemaResult<TableSchema<R>> {
        let table_name = self.table_name.ok_or_else(SchemaError::table_name_required)?;
        let record = RecordLayout::new(self.accessors);

        let info = match self.cached {
            Some(info) => {
                Event::SchemaCacheHit.emit(&[("table", table_name.as_str())]);
                info
            }
            None => {
                validate_columns(&table_name, &self.column_names)?;
                let derived = TableInfo::derive(
                    table_name.clone(),
                    self.column_names,
                    record.layout().clone(),
                );
                let (info, committed) = self.registry.register_or_get(derived);
                if !committed {
                    Event::SchemaRaceLost.emit(&[("table", table_name.as_str())]);
                }
                info
            }
        };

        check_shape(&info, record.layout())?;
        Ok(TableSchema::new(info, record))
    }
}

fn validate_columns(table_name: &str, column_names: &[String]) -> SchemaResult<()> {
    if column_names.is_empty() {
        return Err(SchemaError::no_columns(table_name));
    }
    let mut seen = HashSet::with_capacity(column_names.len());
    for name in column_names {
        if !seen.insert(name.as_str()) {
            return Err(SchemaError::duplicate_column(table_name, name));
        }
    }
    Ok(())
}

fn check_shape(info: &TableInfo, requested: &FieldLayout) -> SchemaResult<()> {
    if info.layout() == requested {
        return Ok(());
    }
    let existing = info.layout().to_string();
    let wanted = requested.to_string();
    Event::SchemaShapeConflict.emit(&[
        ("existing", existing.as_str()),
        ("requested", wanted.as_str()),
        ("table", info.table_name()),
    ]);
    Err(SchemaError::shape_conflict(info.table_name(), info.layout(), requested))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::schema::SchemaErrorCode;

    #[derive(Debug, Default)]
    struct MyCustomType {
        id: i32,
        name: String,
    }

    #[derive(Debug, Default)]
    struct Other {
        id: i64,
    }

    fn build(registry: &TableRegistry) -> SchemaResult<TableSchema<MyCustomType>> {
        SchemaBuilder::new(registry)
            .table_name("MyCustomType")
            .column("id", field!(MyCustomType, id))
            .column("name", field!(MyCustomType, name))
            .build()
    }

    #[test]
    fn test_build_sql() {
        let registry = TableRegistry::new();
        let schema = build(&registry).unwrap();
        let record = MyCustomType {
            id: 111,
            name: "myname".into(),
        };

        assert_eq!(
            schema.create_table_sql(),
            "CREATE TABLE IF NOT EXISTS \"MyCustomType\"( id INT, name TEXT );"
        );
        assert_eq!(
            schema.insert_sql(&record),
            "INSERT INTO \"MyCustomType\" ( id, name ) VALUES( 111, 'myname' );"
        );
    }

    #[test]
    fn test_second_build_reuses_committed_schema() {
        let registry = TableRegistry::new();
        let first = build(&registry).unwrap();

        let builder = SchemaBuilder::<MyCustomType>::new(&registry).table_name("MyCustomType");
        assert!(builder.is_cached());

        // names are ignored once cached
        let second = builder
            .column("renamed", field!(MyCustomType, id))
            .column("other", field!(MyCustomType, name))
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(first.info(), second.info()));
        assert_eq!(second.column_names(), vec!["id", "name"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_different_shape_same_name_conflicts() {
        let registry = TableRegistry::new();
        build(&registry).unwrap();

        let err = SchemaBuilder::<Other>::new(&registry)
            .table_name("MyCustomType")
            .column("id", field!(Other, id))
            .build()
            .unwrap_err();

        assert_eq!(err.code(), SchemaErrorCode::ShapeConflict);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_losing_a_race_to_a_different_shape_conflicts() {
        let registry = TableRegistry::new();

        let pending = SchemaBuilder::<MyCustomType>::new(&registry)
            .table_name("R")
            .column("id", field!(MyCustomType, id))
            .column("name", field!(MyCustomType, name));
        assert!(!pending.is_cached());

        // another builder commits first with other field types
        SchemaBuilder::<Other>::new(&registry)
            .table_name("R")
            .column("id", field!(Other, id))
            .build()
            .unwrap();

        let err = pending.build().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ShapeConflict);
        assert_eq!(err.table_name(), Some("R"));

        let committed = registry.lookup("R").unwrap();
        assert_eq!(committed.column_names(), vec!["id"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_losing_a_race_with_same_shape_rebinds() {
        let registry = TableRegistry::new();

        let pending = SchemaBuilder::<MyCustomType>::new(&registry)
            .table_name("MyCustomType")
            .column("id", field!(MyCustomType, id))
            .column("name", field!(MyCustomType, name));
        assert!(!pending.is_cached());

        let winner = build(&registry).unwrap();
        let loser = pending.build().unwrap();

        assert!(Arc::ptr_eq(winner.info(), loser.info()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_table_name() {
        let registry = TableRegistry::new();
        let err = SchemaBuilder::<Other>::new(&registry)
            .column("id", field!(Other, id))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::TableNameRequired);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_no_columns() {
        let registry = TableRegistry::new();
        let err = SchemaBuilder::<Other>::new(&registry)
            .table_name("empty")
            .build()
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::NoColumns);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_column() {
        let registry = TableRegistry::new();
        let err = SchemaBuilder::<MyCustomType>::new(&registry)
            .table_name("dup")
            .column("id", field!(MyCustomType, id))
            .column("id", field!(MyCustomType, name))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DuplicateColumn);
        assert!(!registry.contains("dup"));
    }

    #[test]
    fn test_distinct_registries_are_isolated() {
        let a = TableRegistry::new();
        let b = TableRegistry::new();
        build(&a).unwrap();

        assert!(b.is_empty());
        let err = SchemaBuilder::<Other>::new(&a)
            .table_name("MyCustomType")
            .column("id", field!(Other, id))
            .build();
        assert!(err.is_err());

        SchemaBuilder::<Other>::new(&b)
            .table_name("MyCustomType")
            .column("id", field!(Other, id))
            .build()
            .unwrap();
    }
}
