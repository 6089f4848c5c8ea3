//! Session store backed by a redb file, surviving process restarts.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde_json::Value;
use tracing::debug;

use crate::SessionStore;

const SESSION_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("session");

/// Persistent session storage
#[derive(Clone)]
pub struct RedbSessionStore {
    db: Arc<Database>,
}

impl RedbSessionStore {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(SESSION_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Open (or create) the session database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Arc::new(Database::create(path.as_ref())?);
        Self::new(db)
    }
}

impl SessionStore for RedbSessionStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSION_TABLE)?;

        if let Some(data) = table.get(key)? {
            Ok(Some(serde_json::from_slice(data.value())?))
        } else {
            Ok(None)
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let bytes = serde_json::to_vec(&value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSION_TABLE)?;
            table.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(SESSION_TABLE)?;
            let mut keys = Vec::new();
            for item in table.iter()? {
                let (key, _) = item?;
                keys.push(key.value().to_string());
            }
            for key in &keys {
                table.remove(key.as_str())?;
            }
            keys.len()
        };
        write_txn.commit()?;
        debug!(removed, "Session cleared");
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSION_TABLE)?;

        let mut keys = Vec::new();
        for item in table.iter()? {
            let (key, _) = item?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }
}
