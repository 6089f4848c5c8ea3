//! Cache-backed stores: populate once per session, read many.
//!
//! A store is a persisted session key plus an in-memory copy. The session is
//! authoritative: once the key is gone, the in-memory copy is gone too, no
//! matter which path cleared it.

pub mod lookup;
pub mod profile;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::Result;
use crate::session::Session;

pub use lookup::{LookupDictionary, LookupDictionaryStore};
pub use profile::{UserProfile, UserProfileStore};

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T>>>;

/// Collapses concurrent fetches for the same key into one.
///
/// Every caller awaits a clone of the same shared future; the entry is
/// removed once it settles, so a failed fetch is retried by the next caller.
pub struct SingleFlight<T: Clone> {
    pending: Mutex<HashMap<String, SharedFetch<T>>>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub async fn run<F>(&self, key: &str, start: F) -> Result<T>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T>>,
    {
        let fetch = {
            let mut pending = self.pending.lock();
            match pending.get(key) {
                Some(existing) => {
                    debug!(key, "Joining in-flight fetch");
                    existing.clone()
                }
                None => {
                    let fetch = start().shared();
                    pending.insert(key.to_string(), fetch.clone());
                    fetch
                }
            }
        };

        let result = fetch.clone().await;

        let mut pending = self.pending.lock();
        if pending
            .get(key)
            .is_some_and(|current| current.ptr_eq(&fetch))
        {
            pending.remove(key);
        }
        result
    }

    pub fn in_flight(&self) -> usize {
        self.pending.lock().len()
    }

    /// Forget pending fetches. Callers already waiting still get their result.
    pub fn forget(&self) {
        self.pending.lock().clear();
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

pub type Loader<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// One session key with an in-memory mirror and a single-flight loader.
pub struct SessionCache<T: Clone> {
    key: &'static str,
    session: Session,
    memory: RwLock<Option<T>>,
    generation: Arc<AtomicU64>,
    flight: SingleFlight<T>,
    loader: Loader<T>,
}

impl<T> SessionCache<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(key: &'static str, session: Session, loader: Loader<T>) -> Self {
        Self {
            key,
            session,
            memory: RwLock::new(None),
            generation: Arc::new(AtomicU64::new(0)),
            flight: SingleFlight::new(),
            loader,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Cached value, from memory or the session. Never fetches.
    pub fn get(&self) -> Result<Option<T>> {
        if !self.session.contains(self.key)? {
            *self.memory.write() = None;
            return Ok(None);
        }

        if let Some(value) = self.memory.read().clone() {
            return Ok(Some(value));
        }

        let value: Option<T> = self.session.read(self.key)?;
        if let Some(value) = &value {
            *self.memory.write() = Some(value.clone());
        }
        Ok(value)
    }

    /// Cached value, fetching it at most once per session when absent.
    pub async fn ensure(&self) -> Result<T> {
        if let Some(value) = self.get()? {
            return Ok(value);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let value = self
            .flight
            .run(self.key, || self.persisting_fetch(generation))
            .await?;

        if self.generation.load(Ordering::SeqCst) == generation {
            *self.memory.write() = Some(value.clone());
        }
        Ok(value)
    }

    /// Replace the cached value in memory and in the session.
    pub fn replace(&self, value: T) -> Result<()> {
        self.session.write(self.key, &value)?;
        *self.memory.write() = Some(value);
        Ok(())
    }

    /// Drop the in-memory copy and detach any fetch still running, so its
    /// result is not written into a session that was cleared meanwhile.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.memory.write() = None;
        self.flight.forget();
    }

    fn persisting_fetch(&self, generation: u64) -> BoxFuture<'static, Result<T>> {
        let loader = Arc::clone(&self.loader);
        let session = self.session.clone();
        let current = Arc::clone(&self.generation);
        let key = self.key;

        async move {
            let value = loader().await?;
            if current.load(Ordering::SeqCst) == generation {
                session.write(key, &value)?;
                info!(key, "Populated session cache");
            } else {
                debug!(key, "Session cleared during fetch, result not persisted");
            }
            Ok(value)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use adminbridge_storage::MemorySessionStore;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn counting_loader(calls: Arc<AtomicUsize>, gate: Arc<Notify>) -> Loader<Vec<String>> {
        Arc::new(move || {
            let calls = calls.clone();
            let gate = gate.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok(vec!["a".to_string(), "b".to_string()])
            }
            .boxed()
        })
    }

    fn session() -> Session {
        Session::new(Arc::new(MemorySessionStore::new()))
    }

    #[tokio::test]
    async fn test_concurrent_ensure_fetches_once() {
        let session = session();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        let cache = Arc::new(SessionCache::new(
            "lookupDict",
            session.clone(),
            counting_loader(calls.clone(), gate.clone()),
        ));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.ensure().await })
            })
            .collect();

        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        gate.notify_one();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), vec!["a", "b"]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(session.contains("lookupDict").unwrap());

        cache.ensure().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_hit_skips_loader() {
        let session = session();
        session.write("lookupDict", &vec!["cached".to_string()]).unwrap();
        let loader: Loader<Vec<String>> =
            Arc::new(|| async { Err(ClientError::Config("must not load".into())) }.boxed());
        let cache = SessionCache::new("lookupDict", session, loader);

        assert_eq!(cache.ensure().await.unwrap(), vec!["cached"]);
    }

    #[tokio::test]
    async fn test_cleared_session_hides_memory_copy() {
        let session = session();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        gate.notify_one();
        let cache = SessionCache::new(
            "lookupDict",
            session.clone(),
            counting_loader(calls.clone(), gate),
        );

        cache.ensure().await.unwrap();
        assert!(cache.get().unwrap().is_some());

        session.store().clear().unwrap();
        assert!(cache.get().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried() {
        let session = session();
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let loader: Loader<u32> = Arc::new(move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(ClientError::Unclassified {
                        message: "boom".into(),
                        code: None,
                        status: Some(500),
                    })
                } else {
                    Ok(7)
                }
            }
            .boxed()
        });
        let cache = SessionCache::new("counter", session, loader);

        assert!(cache.ensure().await.is_err());
        assert_eq!(cache.ensure().await.unwrap(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reset_during_fetch_does_not_persist() {
        let session = session();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        let cache = Arc::new(SessionCache::new(
            "lookupDict",
            session.clone(),
            counting_loader(calls.clone(), gate.clone()),
        ));

        let pending = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.ensure().await })
        };
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        cache.reset();
        gate.notify_one();

        assert!(pending.await.unwrap().is_ok());
        assert!(!session.contains("lookupDict").unwrap());
        assert!(cache.get().unwrap().is_none());
    }
}
