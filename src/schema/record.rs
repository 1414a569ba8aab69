//! Record types with a declared table mapping

use super::builder::SchemaBuilder;
use super::errors::SchemaResult;
use super::registry::TableRegistry;
use super::table::TableSchema;

/// A record type that knows how to describe its table.
///
/// ```
/// use tablemap::field;
/// use tablemap::schema::{Record, SchemaBuilder, TableRegistry};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     id: i32,
///     name: String,
///     height: f64,
/// }
///
/// impl Record for Person {
///     fn define(builder: SchemaBuilder<'_, Self>) -> SchemaBuilder<'_, Self> {
///         builder
///             .table_name("Person")
///             .column("id", field!(Self, id))
///             .column("name", field!(Self, name))
///             .column("height", field!(Self, height))
///     }
/// }
///
/// let registry = TableRegistry::new();
/// let schema = Person::schema(&registry).unwrap();
/// assert_eq!(schema.column_names(), vec!["id", "name", "height"]);
/// ```
pub trait Record: Default + 'static {
    /// Declares the table name and columns on `builder`
    fn define(builder: SchemaBuilder<'_, Self>) -> SchemaBuilder<'_, Self>;

    /// Resolves this type's schema against `registry`
    fn schema(registry: &TableRegistry) -> SchemaResult<TableSchema<Self>> {
        Self::define(SchemaBuilder::new(registry)).build()
    }
}
