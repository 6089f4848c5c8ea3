pub mod api;
pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod guard;
mod http_client;
pub mod normalize;
pub mod query;
pub mod request;
pub mod session;
pub mod stores;
pub mod transport;

pub use api::{AuthApi, DictApi};
pub use auth::{AuthSessionManager, AuthState, Credentials, RouteEntry, RouteTable};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ErrorKind, NetworkErrorKind, Result};
pub use guard::{Navigator, PromptOutcome, ReauthPrompt, SessionGuard};
pub use normalize::{NormalizedResponse, is_success};
pub use request::{ApiRequest, MultipartField, RequestBody, ResponseType};
pub use reqwest::Method;
pub use session::{Session, SessionBound};
pub use stores::{LookupDictionary, LookupDictionaryStore, UserProfile, UserProfileStore};

use std::sync::Arc;

use adminbridge_storage::SessionStore;
use tracing::info;

/// Every session-layer component wired against one session store.
///
/// Front ends build one of these per process and share it.
pub struct AdminBridge {
    pub config: ClientConfig,
    pub session: Session,
    pub client: ApiClient,
    pub guard: SessionGuard,
    pub profile: Arc<UserProfileStore>,
    pub lookup: Arc<LookupDictionaryStore>,
    pub routes: Arc<RouteTable>,
    pub auth: AuthSessionManager,
}

impl AdminBridge {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
        prompt: Arc<dyn ReauthPrompt>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let session = Session::new(store);
        let guard = SessionGuard::new(
            session.clone(),
            prompt,
            navigator,
            config.login_entry.clone(),
            config.reauth_message.clone(),
        );
        let client = ApiClient::new(&config, session.clone(), guard.clone())?;

        let profile = UserProfileStore::new(client.clone(), session.clone(), &config);
        let lookup = LookupDictionaryStore::new(client.clone(), session.clone());
        let routes = RouteTable::new(client.clone(), session.clone());
        let auth = AuthSessionManager::new(
            client.clone(),
            session.clone(),
            profile.clone(),
            routes.clone(),
        );

        info!(base_url = %config.base_url, "AdminBridge client initialized");

        Ok(Self {
            config,
            session,
            client,
            guard,
            profile,
            lookup,
            routes,
            auth,
        })
    }

    pub fn state(&self) -> AuthState {
        self.auth.state()
    }
}
