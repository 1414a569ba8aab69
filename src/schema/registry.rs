//! Table registry
//!
//! Process-wide cache of `table name -> TableInfo`.
//!
//! - Lookups take the shared lock and may run concurrently
//! - Registration takes the exclusive lock and re-checks presence before
//!   committing, so at most one schema is ever committed per table name
//! - Entries are append-only; the only removal is [`TableRegistry::clear`]
//!
//! Derivation happens outside the critical section. Two builders racing on
//! a new table name both derive; one commits and the other re-binds to the
//! committed entry.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::observability::Event;

use super::types::TableInfo;

/// Registry of derived table schemas
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: RwLock<HashMap<String, Arc<TableInfo>>>,
}

impl TableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry ready to be shared between stores
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Gets the committed schema for `table_name`
    pub fn lookup(&self, table_name: &str) -> Option<Arc<TableInfo>> {
        // Entries are inserted whole, so a poisoned map is still consistent.
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(table_name)
            .cloned()
    }

    /// Commits `info` unless its table name is already present.
    ///
    /// Returns false without touching the registry when the name exists.
    pub fn register(&self, info: TableInfo) -> bool {
        self.register_or_get(info).1
    }

    /// Commits `info` unless its table name is already present, and returns
    /// the committed entry together with whether `info` became it.
    pub fn register_or_get(&self, info: TableInfo) -> (Arc<TableInfo>, bool) {
        if let Some(existing) = self.lookup(info.table_name()) {
            return (existing, false);
        }

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = tables.get(info.table_name()) {
            return (Arc::clone(existing), false);
        }

        let column_count = info.column_count().to_string();
        let info = Arc::new(info);
        tables.insert(info.table_name().to_string(), Arc::clone(&info));
        drop(tables);

        Event::SchemaRegistered.emit(&[
            ("columns", column_count.as_str()),
            ("table", info.table_name()),
        ]);
        (info, true)
    }

    /// Checks if a table name is registered
    pub fn contains(&self, table_name: &str) -> bool {
        self.lookup(table_name).is_some()
    }

    /// Returns registered table names in sorted order
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Returns the number of registered tables
    pub fn len(&self) -> usize {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every registered schema.
    ///
    /// Schemas already handed out stay valid. Meant for isolating tests that
    /// share one registry.
    pub fn clear(&self) {
        self.tables.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
