//! SQL text generation
//!
//! Statement text is bit-exact:
//!
//! ```text
//! CREATE TABLE IF NOT EXISTS "<table>"( <col> <TAG>, ... );
//! DROP TABLE IF EXISTS "<table>";
//! INSERT INTO "<table>" ( <col>, ... ) VALUES( <val>, ... );
//! SELECT * FROM "<table>";
//! ```

use super::types::ColumnDescriptor;

/// Disables synchronous durability for the current connection
pub const SYNCHRONOUS_OFF: &str = "PRAGMA synchronous = OFF;";

pub const BEGIN: &str = "BEGIN;";

pub const COMMIT: &str = "COMMIT;";

pub const ROLLBACK: &str = "ROLLBACK;";

/// Double-quotes a table name, doubling embedded double quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn create_table_sql(table_name: &str, columns: &[ColumnDescriptor]) -> String {
    let specs: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {}", c.name(), c.storage_type()))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {}( {} );",
        quote_identifier(table_name),
        specs.join(", ")
    )
}

pub fn drop_table_sql(table_name: &str) -> String {
    format!("DROP TABLE IF EXISTS {};", quote_identifier(table_name))
}

pub fn select_all_sql(table_name: &str) -> String {
    format!("SELECT * FROM {};", quote_identifier(table_name))
}

/// Insert statement template bound to one table.
///
/// The table and column list are rendered once at schema derivation; each
/// call to [`InsertTemplate::render`] only appends the value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertTemplate {
    head: String,
    column_count: usize,
}

impl InsertTemplate {
    pub fn new(table_name: &str, columns: &[ColumnDescriptor]) -> Self {
        let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
        Self {
            head: format!(
                "INSERT INTO {} ( {} ) VALUES( ",
                quote_identifier(table_name),
                names.join(", ")
            ),
            column_count: columns.len(),
        }
    }

    /// Number of values a rendered statement expects
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Renders the statement for already encoded values in column order
    pub fn render<I, S>(&self, values: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sql = self.head.clone();
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(value.as_ref());
        }
        sql.push_str(" );");
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::StorageType;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", StorageType::Integer, 0),
            ColumnDescriptor::new("name", StorageType::Text, 1),
        ]
    }

    #[test]
    fn test_create_table_sql() {
        assert_eq!(
            create_table_sql("T", &columns()),
            "CREATE TABLE IF NOT EXISTS \"T\"( id INT, name TEXT );"
        );
    }

    #[test]
    fn test_drop_and_select_sql() {
        assert_eq!(drop_table_sql("T"), "DROP TABLE IF EXISTS \"T\";");
        assert_eq!(select_all_sql("T"), "SELECT * FROM \"T\";");
    }

    #[test]
    fn test_insert_template_render() {
        let template = InsertTemplate::new("MyCustomType", &columns());
        assert_eq!(template.column_count(), 2);
        assert_eq!(
            template.render(["111", "'myname'"]),
            "INSERT INTO \"MyCustomType\" ( id, name ) VALUES( 111, 'myname' );"
        );
    }

    #[test]
    fn test_identifier_quotes_are_doubled() {
        assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
        assert_eq!(drop_table_sql("a\"b"), "DROP TABLE IF EXISTS \"a\"\"b\";");
    }
}
