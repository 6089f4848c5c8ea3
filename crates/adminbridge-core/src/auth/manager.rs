//! Authentication Session Manager
//!
//! Owns the login and logout sequences. The authenticated state itself lives
//! in the session (token presence); this type only drives the transitions.

use std::sync::Arc;

use tracing::{info, warn};

use super::routes::RouteTable;
use super::types::{AuthState, Credentials, TokenPair};
use crate::api::AuthApi;
use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::stores::{UserProfile, UserProfileStore};

pub struct AuthSessionManager {
    client: ApiClient,
    session: Session,
    profile: Arc<UserProfileStore>,
    routes: Arc<RouteTable>,
}

impl AuthSessionManager {
    pub fn new(
        client: ApiClient,
        session: Session,
        profile: Arc<UserProfileStore>,
        routes: Arc<RouteTable>,
    ) -> Self {
        Self {
            client,
            session,
            profile,
            routes,
        }
    }

    pub fn state(&self) -> AuthState {
        if self.session.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    /// Exchange credentials for a token, then hydrate the profile and the
    /// route table. Any failure after the token is stored leaves the session
    /// empty again.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile> {
        let response = self.client.invoke(AuthApi::login(credentials)?).await?;
        let tokens = TokenPair::from_payload(&response.data)?;

        // Whatever the previous session cached belongs to someone else.
        self.session.clear()?;

        match self.establish(&tokens).await {
            Ok(profile) => {
                info!(username = %credentials.username, "Login succeeded");
                Ok(profile)
            }
            Err(e) => {
                warn!(error = %e, "Login incomplete, rolling back session");
                if let Err(clear_err) = self.session.clear() {
                    warn!(error = %clear_err, "Failed to roll back session");
                }
                Err(e)
            }
        }
    }

    async fn establish(&self, tokens: &TokenPair) -> Result<UserProfile> {
        self.store_tokens(tokens)?;
        let profile = self.profile.ensure().await?;
        self.routes.rebuild(&profile).await?;
        Ok(profile)
    }

    /// Invalidate the token remotely (best-effort) and clear everything local.
    pub async fn logout(&self) -> Result<()> {
        if self.session.is_authenticated()
            && let Err(e) = self.client.invoke(AuthApi::logout()).await
        {
            warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }

        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Exchange the stored refresh token for a new token pair.
    pub async fn refresh(&self) -> Result<()> {
        let refresh_token = self.session.refresh_token()?.ok_or_else(|| {
            ClientError::SessionExpired {
                message: "No refresh token in session".to_string(),
                code: None,
                status: None,
            }
        })?;

        let response = self
            .client
            .invoke(AuthApi::refresh(&refresh_token))
            .await?;
        let mut tokens = TokenPair::from_payload(&response.data)?;
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token);
        }

        self.store_tokens(&tokens)?;
        info!("Access token refreshed");
        Ok(())
    }

    pub fn profile(&self) -> &Arc<UserProfileStore> {
        &self.profile
    }

    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    fn store_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.session.set_token(&tokens.access_token)?;
        if let Some(refresh_token) = &tokens.refresh_token {
            self.session.set_refresh_token(refresh_token)?;
        }
        Ok(())
    }
}
