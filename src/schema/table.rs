//! A table schema bound to a record type

use std::fmt;
use std::sync::Arc;

use crate::layout::RecordLayout;

use super::errors::{SchemaError, SchemaResult};
use super::types::{ColumnDescriptor, TableInfo};

/// Committed table metadata plus the accessor table of record type `R`.
///
/// Every schema built for the same table name shares one [`TableInfo`].
pub struct TableSchema<R> {
    info: Arc<TableInfo>,
    record: RecordLayout<R>,
}

impl<R: 'static> TableSchema<R> {
    pub(crate) fn new(info: Arc<TableInfo>, record: RecordLayout<R>) -> Self {
        Self { info, record }
    }

    /// Shared metadata as committed in the registry
    pub fn info(&self) -> &Arc<TableInfo> {
        &self.info
    }

    pub fn record_layout(&self) -> &RecordLayout<R> {
        &self.record
    }

    pub fn table_name(&self) -> &str {
        self.info.table_name()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.info.columns()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.info.column_names()
    }

    pub fn column_count(&self) -> usize {
        self.info.column_count()
    }

    pub fn create_table_sql(&self) -> &str {
        self.info.create_table_sql()
    }

    pub fn drop_table_sql(&self) -> String {
        self.info.drop_table_sql()
    }

    pub fn select_all_sql(&self) -> String {
        self.info.select_all_sql()
    }

    /// Single-row insert statement for the current values of `record`
    pub fn insert_sql(&self, record: &R) -> String {
        self.info.insert_template().render(self.record.encode_all(record))
    }

    /// Writes `text` into the column named `column`.
    ///
    /// Columns are matched by linear scan. An unknown name is not an error:
    /// the record is left untouched and `Ok(false)` is returned.
    pub fn set_field_by_name(
        &self,
        record: &mut R,
        column: &str,
        text: &str,
    ) -> SchemaResult<bool> {
        match self.info.column_index(column) {
            Some(index) => self.set_field_by_index(record, index, text).map(|_| true),
            None => Ok(false),
        }
    }

    /// Writes `text` into column `index`
    pub fn set_field_by_index(&self, record: &mut R, index: usize, text: &str) -> SchemaResult<()> {
        self.record
            .set_from_column_text(record, index, text)
            .map_err(|e| SchemaError::field_access(self.table_name(), e))
    }

    /// Typed reference to column `index` of `record`
    pub fn get_field_ref<'r, T: 'static>(
        &self,
        record: &'r R,
        index: usize,
    ) -> SchemaResult<&'r T> {
        self.record
            .get_field_ref(record, index)
            .map_err(|e| SchemaError::field_access(self.table_name(), e))
    }

    /// Typed mutable reference to column `index` of `record`
    pub fn get_field_mut<'r, T: 'static>(
        &self,
        record: &'r mut R,
        index: usize,
    ) -> SchemaResult<&'r mut T> {
        let table_name = self.info.table_name();
        self.record
            .get_field_mut(record, index)
            .map_err(|e| SchemaError::field_access(table_name, e))
    }

    /// Binds the schema to one record for the duration of the borrow
    pub fn bind<'s>(&'s self, record: &'s mut R) -> BoundRecord<'s, R> {
        BoundRecord { schema: self, record }
    }
}

/// Schemas are equal when they share table name, columns and DDL.
impl<R> PartialEq for TableSchema<R> {
    fn eq(&self, other: &Self) -> bool {
        self.info.table_name() == other.info.table_name()
            && self.info.columns() == other.info.columns()
            && self.info.create_table_sql() == other.info.create_table_sql()
    }
}

impl<R> fmt::Debug for TableSchema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSchema")
            .field("info", &self.info)
            .field("record", &self.record)
            .finish()
    }
}

/// A schema bound to one caller-owned record
pub struct BoundRecord<'s, R> {
    schema: &'s TableSchema<R>,
    record: &'s mut R,
}

impl<'s, R: 'static> BoundRecord<'s, R> {
    pub fn schema(&self) -> &TableSchema<R> {
        self.schema
    }

    pub fn record(&self) -> &R {
        &*self.record
    }

    pub fn record_mut(&mut self) -> &mut R {
        &mut *self.record
    }

    pub fn insert_sql(&self) -> String {
        self.schema.insert_sql(&*self.record)
    }

    pub fn set_field_by_name(&mut self, column: &str, text: &str) -> SchemaResult<bool> {
        self.schema.set_field_by_name(&mut *self.record, column, text)
    }

    pub fn set_field_by_index(&mut self, index: usize, text: &str) -> SchemaResult<()> {
        self.schema.set_field_by_index(&mut *self.record, index, text)
    }
}
