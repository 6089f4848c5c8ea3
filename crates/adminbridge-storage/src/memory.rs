//! In-memory session store.

use std::collections::BTreeMap;

use anyhow::Result;
use parking_lot::RwLock;
use serde_json::Value;

use crate::SessionStore;

/// Session store that lives for the process only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let store = MemorySessionStore::new();
        store.set(keys::TOKEN, json!("abc")).unwrap();

        assert_eq!(store.get(keys::TOKEN).unwrap(), Some(json!("abc")));
        assert!(store.contains(keys::TOKEN).unwrap());
        assert_eq!(store.get(keys::USER_INFO).unwrap(), None);
    }

    #[test]
    fn test_clear_drops_every_key() {
        let store = MemorySessionStore::new();
        for key in keys::ALL {
            store.set(key, json!({ "k": key })).unwrap();
        }
        assert_eq!(store.len(), keys::ALL.len());

        store.clear().unwrap();

        assert!(store.is_empty());
        for key in keys::ALL {
            assert!(!store.contains(key).unwrap());
        }
    }
}
