//! Typed access to the injected session store.
//!
//! [`Session`] is the only handle components hold on the persisted session.
//! Stores that keep in-memory copies of session data bind themselves here so
//! that every clear, whoever triggers it, also empties them.

use std::sync::{Arc, Weak};

use adminbridge_storage::{SessionStore, keys};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Anything holding in-memory state derived from the session.
pub trait SessionBound: Send + Sync {
    fn name(&self) -> &'static str;

    /// Drop in-memory state back to its empty initial value.
    fn reset(&self);
}

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    bound: Arc<Mutex<Vec<Weak<dyn SessionBound>>>>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            bound: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Register a component to be reset whenever the session is cleared.
    pub fn bind(&self, component: Arc<dyn SessionBound>) {
        let mut bound = self.bound.lock();
        bound.retain(|weak| weak.strong_count() > 0);
        bound.push(Arc::downgrade(&component));
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.read_string(keys::TOKEN)
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        self.read_string(keys::REFRESH_TOKEN)
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.set(keys::TOKEN, Value::String(token.to_string()))
    }

    pub fn set_refresh_token(&self, token: &str) -> Result<()> {
        self.set(keys::REFRESH_TOKEN, Value::String(token.to_string()))
    }

    /// The one and only authentication signal.
    pub fn is_authenticated(&self) -> bool {
        match self.token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                false
            }
        }
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        self.store.contains(key).map_err(ClientError::storage)
    }

    /// Read and deserialize a value. A value that no longer deserializes is
    /// treated as absent so the owning store refetches it.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.store.get(key).map_err(ClientError::storage)? else {
            return Ok(None);
        };

        match serde_json::from_value(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable session value");
                Ok(None)
            }
        }
    }

    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value)
    }

    /// Clear every key and reset every bound component.
    pub fn clear(&self) -> Result<()> {
        let result = self.store.clear().map_err(ClientError::storage);

        let bound: Vec<Arc<dyn SessionBound>> = {
            let mut bound = self.bound.lock();
            bound.retain(|weak| weak.strong_count() > 0);
            bound.iter().filter_map(Weak::upgrade).collect()
        };
        for component in bound {
            component.reset();
            debug!(component = component.name(), "Reset after session clear");
        }

        result
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.store.set(key, value).map_err(ClientError::storage)
    }

    fn read_string(&self, key: &str) -> Result<Option<String>> {
        let value = self.store.get(key).map_err(ClientError::storage)?;
        Ok(value
            .as_ref()
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("bound", &self.bound.lock().len())
            .finish_non_exhaustive()
    }
}
