//! Re-authentication gate.
//!
//! When several in-flight calls hit an expired session at once, only the
//! first one raises the confirmation prompt; the rest return immediately and
//! let that prompt decide for everybody. The gate is a single-slot watch
//! channel, acquired before the prompt is shown and released by a scope guard
//! on every exit path of the prompt task, panics included.

use std::sync::Arc;

use async_trait::async_trait;
use scopeguard::ScopeGuard;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::session::Session;

/// The two ways a re-authentication prompt can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    Confirmed,
    Cancelled,
}

/// Shows the "session expired, sign in again?" confirmation.
#[async_trait]
pub trait ReauthPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> PromptOutcome;
}

/// Moves the user to the unauthenticated entry point.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

type GatePermit = ScopeGuard<Arc<GuardInner>, fn(Arc<GuardInner>)>;

struct GuardInner {
    gate: watch::Sender<bool>,
    session: Session,
    prompt: Arc<dyn ReauthPrompt>,
    navigator: Arc<dyn Navigator>,
    login_entry: String,
    message: String,
}

impl GuardInner {
    fn try_acquire(self: &Arc<Self>) -> Option<GatePermit> {
        let acquired = self.gate.send_if_modified(|active| {
            if *active {
                false
            } else {
                *active = true;
                true
            }
        });

        acquired.then(|| scopeguard::guard(self.clone(), release_gate as fn(Arc<GuardInner>)))
    }

    async fn resolve(&self) -> PromptOutcome {
        let outcome = self.prompt.confirm(&self.message).await;

        // A cancelled prompt cannot keep a dead credential either.
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session after expiry");
        }

        if outcome == PromptOutcome::Confirmed {
            self.navigator.navigate(&self.login_entry);
        }

        info!(?outcome, "Re-authentication prompt resolved");
        outcome
    }
}

fn release_gate(inner: Arc<GuardInner>) {
    inner.gate.send_replace(false);
    debug!("Re-authentication gate released");
}

/// Process-wide single-flight gate for the re-authentication prompt.
#[derive(Clone)]
pub struct SessionGuard {
    inner: Arc<GuardInner>,
}

impl SessionGuard {
    pub fn new(
        session: Session,
        prompt: Arc<dyn ReauthPrompt>,
        navigator: Arc<dyn Navigator>,
        login_entry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let (gate, _) = watch::channel(false);
        Self {
            inner: Arc::new(GuardInner {
                gate,
                session,
                prompt,
                navigator,
                login_entry: login_entry.into(),
                message: message.into(),
            }),
        }
    }

    /// Whether a prompt is currently on screen.
    pub fn is_active(&self) -> bool {
        *self.inner.gate.borrow()
    }

    /// React to an expired session.
    ///
    /// Returns `None` when a prompt is already showing. Otherwise the gate is
    /// held from this call until the returned task finishes.
    pub fn on_session_expired(&self) -> Option<JoinHandle<PromptOutcome>> {
        let Some(permit) = self.inner.try_acquire() else {
            debug!("Re-authentication prompt already active");
            return None;
        };

        info!("Session expired, asking for re-authentication");
        Some(tokio::spawn(async move {
            let inner = Arc::clone(&*permit);
            let outcome = inner.resolve().await;
            drop(permit);
            outcome
        }))
    }

    /// Wait until no prompt is showing.
    pub async fn wait_idle(&self) {
        let mut rx = self.inner.gate.subscribe();
        let _ = rx.wait_for(|active| !*active).await;
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("active", &self.is_active())
            .field("login_entry", &self.inner.login_entry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminbridge_storage::MemorySessionStore;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct ScriptedPrompt {
        shown: AtomicUsize,
        release: Notify,
        outcome: PromptOutcome,
    }

    impl ScriptedPrompt {
        fn new(outcome: PromptOutcome) -> Arc<Self> {
            Arc::new(Self {
                shown: AtomicUsize::new(0),
                release: Notify::new(),
                outcome,
            })
        }
    }

    #[async_trait]
    impl ReauthPrompt for ScriptedPrompt {
        async fn confirm(&self, _message: &str) -> PromptOutcome {
            self.shown.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            self.outcome
        }
    }

    struct PanickingPrompt;

    #[async_trait]
    impl ReauthPrompt for PanickingPrompt {
        async fn confirm(&self, _message: &str) -> PromptOutcome {
            panic!("prompt crashed");
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        targets: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, target: &str) {
            self.targets.lock().push(target.to_string());
        }
    }

    fn setup(
        prompt: Arc<dyn ReauthPrompt>,
    ) -> (SessionGuard, Session, Arc<RecordingNavigator>) {
        let session = Session::new(Arc::new(MemorySessionStore::new()));
        session.set_token("expired").unwrap();
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = SessionGuard::new(
            session.clone(),
            prompt,
            navigator.clone(),
            "/login",
            "Session expired",
        );
        (guard, session, navigator)
    }

    #[tokio::test]
    async fn test_only_one_prompt_at_a_time() {
        let prompt = ScriptedPrompt::new(PromptOutcome::Confirmed);
        let (guard, session, navigator) = setup(prompt.clone());

        let first = guard.on_session_expired();
        assert!(first.is_some());
        assert!(guard.is_active());
        assert!(guard.on_session_expired().is_none());
        assert!(guard.on_session_expired().is_none());

        while prompt.shown.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        prompt.release.notify_one();

        assert_eq!(first.unwrap().await.unwrap(), PromptOutcome::Confirmed);
        guard.wait_idle().await;

        assert!(!guard.is_active());
        assert_eq!(prompt.shown.load(Ordering::SeqCst), 1);
        assert!(!session.is_authenticated());
        assert_eq!(*navigator.targets.lock(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn test_cancel_still_clears_session() {
        let prompt = ScriptedPrompt::new(PromptOutcome::Cancelled);
        let (guard, session, navigator) = setup(prompt.clone());

        let handle = guard.on_session_expired().unwrap();
        prompt.release.notify_one();

        assert_eq!(handle.await.unwrap(), PromptOutcome::Cancelled);
        assert!(!guard.is_active());
        assert!(!session.is_authenticated());
        assert!(navigator.targets.lock().is_empty());
    }

    #[tokio::test]
    async fn test_gate_reopens_for_next_expiry() {
        let prompt = ScriptedPrompt::new(PromptOutcome::Cancelled);
        let (guard, _session, _) = setup(prompt.clone());

        let handle = guard.on_session_expired().unwrap();
        prompt.release.notify_one();
        handle.await.unwrap();

        let handle = guard.on_session_expired();
        assert!(handle.is_some());
        prompt.release.notify_one();
        handle.unwrap().await.unwrap();
        assert_eq!(prompt.shown.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_panicking_prompt_releases_gate() {
        let (guard, _session, _) = setup(Arc::new(PanickingPrompt));

        let handle = guard.on_session_expired().unwrap();
        assert!(handle.await.is_err());

        assert!(!guard.is_active());
        assert!(guard.on_session_expired().is_some());
    }
}
