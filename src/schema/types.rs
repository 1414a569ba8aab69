//! Derived table metadata

use crate::codec::StorageType;
use crate::layout::FieldLayout;

use super::template::{self, InsertTemplate};

/// One column of a table, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    name: String,
    storage_type: StorageType,
    field_index: usize,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, storage_type: StorageType, field_index: usize) -> Self {
        Self {
            name: name.into(),
            storage_type,
            field_index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    /// Position of the column in the row shape
    pub fn field_index(&self) -> usize {
        self.field_index
    }
}

/// Everything derived once per table name.
///
/// Owned by the registry and shared read-only with every schema bound to
/// the same table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    table_name: String,
    columns: Vec<ColumnDescriptor>,
    create_table_sql: String,
    insert_template: InsertTemplate,
    layout: FieldLayout,
}

impl TableInfo {
    /// Derives the metadata for `column_names` over the row shape `layout`.
    ///
    /// `column_names` and `layout` must have the same length.
    pub fn derive(
        table_name: impl Into<String>,
        column_names: Vec<String>,
        layout: FieldLayout,
    ) -> Self {
        let table_name = table_name.into();
        let columns: Vec<ColumnDescriptor> = column_names
            .into_iter()
            .zip(layout.fields())
            .enumerate()
            .map(|(i, (name, field))| ColumnDescriptor::new(name, field.storage_type(), i))
            .collect();

        Self {
            create_table_sql: template::create_table_sql(&table_name, &columns),
            insert_template: InsertTemplate::new(&table_name, &columns),
            table_name,
            columns,
            layout,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the column named `name` (linear scan)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn create_table_sql(&self) -> &str {
        &self.create_table_sql
    }

    pub fn drop_table_sql(&self) -> String {
        template::drop_table_sql(&self.table_name)
    }

    pub fn select_all_sql(&self) -> String {
        template::select_all_sql(&self.table_name)
    }

    pub fn insert_template(&self) -> &InsertTemplate {
        &self.insert_template
    }

    /// Row shape identity of the table
    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }
}
