//! Store adapter
//!
//! Runs generated SQL for record types against one database file. Every
//! operation opens its own connection and closes it on return, success or
//! failure.
//!
//! The bound schema of each record type is built once per store and reused
//! while the registry still holds the same committed table.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::observability::Event;
use crate::schema::{Record, TableRegistry, TableSchema, BEGIN, COMMIT, ROLLBACK, SYNCHRONOUS_OFF};

use super::config::StoreConfig;
use super::engine::{Engine, EngineConnection, SqliteEngine};
use super::errors::{StoreError, StoreResult};

type SchemaCache = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

/// Record persistence over one database file
pub struct Store<E: Engine = SqliteEngine> {
    config: StoreConfig,
    engine: E,
    registry: Arc<TableRegistry>,
    schemas: SchemaCache,
}

impl Store<SqliteEngine> {
    /// SQLite store at `path` with a private registry and default settings
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::from_config(StoreConfig::new(path))
    }

    /// SQLite store configured by `config`. Applies `log_level` to the
    /// process logger.
    pub fn from_config(config: StoreConfig) -> Self {
        config.apply_logging();
        let mut engine = SqliteEngine::new();
        if let Some(timeout) = config.busy_timeout() {
            engine = engine.with_busy_timeout(timeout);
        }
        Self::with_engine(config, engine)
    }
}

impl<E: Engine> Store<E> {
    pub fn with_engine(config: StoreConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            registry: TableRegistry::shared(),
            schemas: SchemaCache::default(),
        }
    }

    /// Replaces the registry, so several stores can share derived schemas
    pub fn with_registry(mut self, registry: Arc<TableRegistry>) -> Self {
        self.registry = registry;
        self.schemas = SchemaCache::default();
        self
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn registry(&self) -> &Arc<TableRegistry> {
        &self.registry
    }

    /// Schema of `R` as resolved against this store's registry
    pub fn schema<R: Record>(&self) -> StoreResult<Arc<TableSchema<R>>> {
        if let Some(schema) = self.cached_schema::<R>() {
            return Ok(schema);
        }

        let schema = Arc::new(R::schema(&self.registry)?);
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<R>(), Arc::clone(&schema) as Arc<dyn Any + Send + Sync>);
        Ok(schema)
    }

    fn cached_schema<R: Record>(&self) -> Option<Arc<TableSchema<R>>> {
        let cached = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<R>())
            .cloned()?;
        let schema = cached.downcast::<TableSchema<R>>().ok()?;

        // stale once the registry was cleared or the table re-registered
        let committed = self.registry.lookup(schema.table_name())?;
        Arc::ptr_eq(&committed, schema.info()).then_some(schema)
    }

    /// Creates the table for `R` if it does not exist
    pub fn ensure_table<R: Record>(&self) -> StoreResult<()> {
        let schema = self.schema::<R>()?;
        let mut conn = self.connect()?;
        execute(&mut conn, schema.create_table_sql())
    }

    /// Drops the table for `R` if it exists
    pub fn drop_table<R: Record>(&self) -> StoreResult<()> {
        let schema = self.schema::<R>()?;
        let mut conn = self.connect()?;
        execute(&mut conn, &schema.drop_table_sql())
    }

    /// Inserts one row
    pub fn insert<R: Record>(&self, row: &R) -> StoreResult<()> {
        let schema = self.schema::<R>()?;
        let mut conn = self.connect()?;
        execute(&mut conn, &schema.insert_sql(row))
    }

    /// Inserts `rows` in order inside one transaction.
    ///
    /// With `fast_mode` the connection runs with `synchronous = OFF`. If any
    /// insert fails the transaction is rolled back and no row is committed.
    pub fn insert_many<R: Record>(&self, rows: &[R], fast_mode: bool) -> StoreResult<()> {
        let schema = self.schema::<R>()?;
        let mut conn = self.connect()?;

        // synchronous cannot change inside a transaction
        if fast_mode {
            execute(&mut conn, SYNCHRONOUS_OFF)?;
        }
        execute(&mut conn, BEGIN)?;

        let result = rows
            .iter()
            .try_for_each(|row| execute(&mut conn, &schema.insert_sql(row)))
            .and_then(|_| execute(&mut conn, COMMIT));

        let count = rows.len().to_string();
        match result {
            Ok(()) => {
                Event::StoreBatchCommitted.emit(&[
                    ("rows", count.as_str()),
                    ("table", schema.table_name()),
                ]);
                Ok(())
            }
            Err(e) => {
                // rollback failure is secondary to the insert failure
                let _ = execute(&mut conn, ROLLBACK);
                Event::StoreBatchRolledBack.emit(&[
                    ("rows", count.as_str()),
                    ("table", schema.table_name()),
                ]);
                Err(e)
            }
        }
    }

    /// Inserts `rows` using the configured `fast_bulk_insert` mode
    pub fn insert_batch<R: Record>(&self, rows: &[R]) -> StoreResult<()> {
        self.insert_many(rows, self.config.fast_bulk_insert)
    }

    /// Reads every row of `R`'s table in engine order.
    ///
    /// Each row starts as `R::default()`; NULL columns keep the default.
    pub fn select_all<R: Record>(&self) -> StoreResult<Vec<R>> {
        let schema = self.schema::<R>()?;
        let sql = schema.select_all_sql();
        let mut conn = self.connect()?;

        Event::StoreExecute.emit(&[("sql", sql.as_str())]);
        let mut rows = Vec::new();
        let result = conn.query(&sql, &mut |_names, values| {
            rows.push(read_row::<R>(&schema, values)?);
            Ok(())
        });
        if let Err(e) = &result {
            report_failure(&sql, e);
        }
        result?;

        Ok(rows)
    }

    fn connect(&self) -> StoreResult<E::Connection> {
        self.engine.open(&self.config.path)
    }
}

fn read_row<R: Record>(schema: &TableSchema<R>, values: &[Option<String>]) -> StoreResult<R> {
    if values.len() != schema.column_count() {
        let expected = schema.column_count().to_string();
        let actual = values.len().to_string();
        Event::StoreShapeMismatch.emit(&[
            ("actual", actual.as_str()),
            ("expected", expected.as_str()),
            ("table", schema.table_name()),
        ]);
        return Err(StoreError::ColumnCountMismatch {
            table: schema.table_name().to_string(),
            expected: schema.column_count(),
            actual: values.len(),
        });
    }

    let mut row = R::default();
    for (index, value) in values.iter().enumerate() {
        if let Some(text) = value {
            schema.set_field_by_index(&mut row, index, text)?;
        }
    }
    Ok(row)
}

fn execute<C: EngineConnection>(conn: &mut C, sql: &str) -> StoreResult<()> {
    Event::StoreExecute.emit(&[("sql", sql)]);
    conn.execute_batch(sql).inspect_err(|e| report_failure(sql, e))
}

fn report_failure(sql: &str, error: &StoreError) {
    // shape mismatches already reported themselves
    if let StoreError::Execution { message, .. } = error {
        Event::StoreExecuteFailed.emit(&[("error", message.as_str()), ("sql", sql)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::schema::SchemaBuilder;
    use crate::store::engine::RowCallback;
    use std::sync::Mutex;

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        id: i32,
        name: String,
        height: f64,
    }

    impl Record for Person {
        fn define(builder: SchemaBuilder<'_, Self>) -> SchemaBuilder<'_, Self> {
            builder
                .table_name("Person")
                .column("id", field!(Self, id))
                .column("name", field!(Self, name))
                .column("height", field!(Self, height))
        }
    }

    /// Records statements instead of running them; fails any statement
    /// containing `fail_on`
    #[derive(Default)]
    struct RecordingEngine {
        log: Arc<Mutex<Vec<String>>>,
        fail_on: Option<String>,
        rows: Vec<Vec<Option<String>>>,
    }

    struct RecordingConnection {
        log: Arc<Mutex<Vec<String>>>,
        fail_on: Option<String>,
        rows: Vec<Vec<Option<String>>>,
    }

    impl Engine for RecordingEngine {
        type Connection = RecordingConnection;

        fn open(&self, _path: &Path) -> StoreResult<RecordingConnection> {
            Ok(RecordingConnection {
                log: Arc::clone(&self.log),
                fail_on: self.fail_on.clone(),
                rows: self.rows.clone(),
            })
        }
    }

    impl EngineConnection for RecordingConnection {
        fn execute_batch(&mut self, sql: &str) -> StoreResult<()> {
            self.log.lock().unwrap().push(sql.to_string());
            match &self.fail_on {
                Some(needle) if sql.contains(needle.as_str()) => {
                    Err(StoreError::execution(sql, "constraint failed"))
                }
                _ => Ok(()),
            }
        }

        fn query(&mut self, sql: &str, on_row: &mut RowCallback<'_>) -> StoreResult<()> {
            self.log.lock().unwrap().push(sql.to_string());
            let names = vec!["id".to_string(), "name".to_string(), "height".to_string()];
            for row in &self.rows {
                on_row(&names, row)?;
            }
            Ok(())
        }
    }

    fn store(engine: RecordingEngine) -> Store<RecordingEngine> {
        Store::with_engine(StoreConfig::new("unused.db"), engine)
    }

    fn person(id: i32, name: &str, height: f64) -> Person {
        Person {
            id,
            name: name.into(),
            height,
        }
    }

    #[test]
    fn test_fast_batch_statement_order() {
        let engine = RecordingEngine::default();
        let log = Arc::clone(&engine.log);
        let store = store(engine);

        store
            .insert_many(&[person(1, "Alice", 1.7), person(2, "Bob", 1.8)], true)
            .unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log[0], "PRAGMA synchronous = OFF;");
        assert_eq!(log[1], "BEGIN;");
        assert_eq!(
            log[2],
            "INSERT INTO \"Person\" ( id, name, height ) VALUES( 1, 'Alice', 1.700000 );"
        );
        assert!(log[3].contains("'Bob'"));
        assert_eq!(log[4], "COMMIT;");
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn test_batch_without_fast_mode_skips_pragma() {
        let engine = RecordingEngine::default();
        let log = Arc::clone(&engine.log);
        store(engine).insert_many(&[person(1, "Alice", 1.7)], false).unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.first().map(String::as_str), Some("BEGIN;"));
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let engine = RecordingEngine {
            fail_on: Some("'Bob'".into()),
            ..Default::default()
        };
        let log = Arc::clone(&engine.log);
        let store = store(engine);

        let rows = [person(1, "Alice", 1.7), person(2, "Bob", 1.8), person(3, "Charlie", 1.9)];
        let err = store.insert_many(&rows, false).unwrap_err();
        assert!(matches!(err, StoreError::Execution { .. }));

        let log = log.lock().unwrap();
        assert_eq!(log.last().map(String::as_str), Some("ROLLBACK;"));
        assert!(!log.iter().any(|s| s == "COMMIT;"));
        assert!(!log.iter().any(|s| s.contains("'Charlie'")));
    }

    #[test]
    fn test_select_maps_rows_and_nulls() {
        let engine = RecordingEngine {
            rows: vec![
                vec![Some("1".into()), Some("Alice".into()), Some("1.7".into())],
                vec![Some("2".into()), None, None],
            ],
            ..Default::default()
        };
        let rows: Vec<Person> = store(engine).select_all().unwrap();

        assert_eq!(rows, vec![person(1, "Alice", 1.7), person(2, "", 0.0)]);
    }

    #[test]
    fn test_select_column_count_mismatch() {
        let engine = RecordingEngine {
            rows: vec![vec![Some("1".into()), Some("Alice".into())]],
            ..Default::default()
        };
        let err = store(engine).select_all::<Person>().unwrap_err();

        match err {
            StoreError::ColumnCountMismatch {
                table,
                expected,
                actual,
            } => {
                assert_eq!(table, "Person");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_select_decode_failure() {
        let engine = RecordingEngine {
            rows: vec![vec![Some("abc".into()), Some("x".into()), Some("1".into())]],
            ..Default::default()
        };
        let err = store(engine).select_all::<Person>().unwrap_err();
        assert!(matches!(err, StoreError::Schema(_)));
    }

    #[test]
    fn test_schema_is_built_once_per_type() {
        let store = store(RecordingEngine::default());

        let first = store.schema::<Person>().unwrap();
        let second = store.schema::<Person>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        store.insert(&person(1, "Alice", 1.7)).unwrap();
        assert!(Arc::ptr_eq(&first, &store.schema::<Person>().unwrap()));
    }

    #[test]
    fn test_cleared_registry_rebuilds_schema() {
        let store = store(RecordingEngine::default());
        let first = store.schema::<Person>().unwrap();

        store.registry().clear();
        let second = store.schema::<Person>().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(store.registry().contains("Person"));
        assert!(Arc::ptr_eq(
            second.info(),
            &store.registry().lookup("Person").unwrap()
        ));
    }

    #[test]
    fn test_stores_share_registry() {
        let shared = TableRegistry::shared();
        let a = store(RecordingEngine::default()).with_registry(Arc::clone(&shared));
        let b = store(RecordingEngine::default()).with_registry(Arc::clone(&shared));

        let sa = a.schema::<Person>().unwrap();
        let sb = b.schema::<Person>().unwrap();
        assert!(Arc::ptr_eq(sa.info(), sb.info()));
        assert_eq!(shared.table_names(), vec!["Person".to_string()]);
    }
}
