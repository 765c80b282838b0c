//! Key-value backends the transaction repository persists into.

use rusqlite::{Connection, OptionalExtension};
#[cfg(test)]
use std::collections::HashMap;

use crate::error::Result;

/// A string key-value store. The repository writes its whole state under one key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores values in the `key_value` table of an SQLite database.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// The connection must already have the `key_value` table, see
    /// [`crate::db::connection::establish_connection`].
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM key_value WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO key_value (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }
}

/// In-memory backend, used for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: HashMap<String, String>,
    fail_writes: bool,
}

#[cfg(test)]
impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    /// Makes every later `set` fail with an I/O error.
    pub fn fail_writes(&mut self) {
        self.fail_writes = true;
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::other("memory store is read-only").into());
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
