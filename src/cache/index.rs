//! Table Index Module
//!
//! Inverted index from table name to the cache keys that read it.

use std::collections::{HashMap, HashSet};

// == Table Index ==
/// Maps each referenced table to the set of keys depending on it.
///
/// Rows are dropped as soon as their key set empties, so the index only ever
/// holds tables that some live entry references.
#[derive(Debug, Default)]
pub struct TableIndex {
    rows: HashMap<String, HashSet<String>>,
}

impl TableIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `key` depends on every table in `tables`.
    pub fn add(&mut self, key: &str, tables: &[String]) {
        for table in tables {
            self.rows
                .entry(table.clone())
                .or_default()
                .insert(key.to_string());
        }
    }

    /// Removes `key` from the rows of `tables`, dropping rows that empty.
    pub fn remove(&mut self, key: &str, tables: &[String]) {
        for table in tables {
            if let Some(keys) = self.rows.get_mut(table) {
                keys.remove(key);
                if keys.is_empty() {
                    self.rows.remove(table);
                }
            }
        }
    }

    /// Union of the key sets of `tables`.
    pub fn keys_for<S: AsRef<str>>(&self, tables: &[S]) -> HashSet<String> {
        let mut keys = HashSet::new();
        for table in tables {
            if let Some(row) = self.rows.get(table.as_ref()) {
                keys.extend(row.iter().cloned());
            }
        }
        keys
    }

    /// Keys depending on a single table, if any.
    pub fn row(&self, table: &str) -> Option<&HashSet<String>> {
        self.rows.get(table)
    }

    /// Iterates `(table, keys)` rows in arbitrary order.
    pub fn rows(&self) -> impl Iterator<Item = (&String, &HashSet<String>)> {
        self.rows.iter()
    }

    /// Number of tables currently indexed.
    pub fn table_count(&self) -> usize {
        self.rows.len()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
