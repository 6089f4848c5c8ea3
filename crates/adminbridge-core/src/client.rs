//! The request pipeline every call site goes through.
//!
//! `invoke` sends the request, classifies the outcome and normalizes the
//! envelope. Expired sessions are handed to the [`SessionGuard`] before the
//! error is returned; the caller never waits for the prompt.

use bytes::Bytes;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::classify::{declared_failure, http_failure, transport_failure};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::guard::SessionGuard;
use crate::normalize::{Envelope, NormalizedResponse, normalize_envelope};
use crate::request::{ApiRequest, ResponseType};
use crate::session::Session;
use crate::transport::Transport;

#[derive(Clone)]
pub struct ApiClient {
    transport: Transport,
    guard: SessionGuard,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Session, guard: SessionGuard) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config, session)?,
            guard,
        })
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Send a JSON request and return the normalized envelope.
    pub async fn invoke(&self, request: ApiRequest) -> Result<NormalizedResponse> {
        if request.response_type == ResponseType::Bytes {
            return Err(ClientError::InvalidFormat(
                "Binary responses must go through invoke_bytes".to_string(),
            ));
        }

        let result = self.execute(&request).await;
        result.map_err(|err| self.intercept(&request, err))
    }

    /// Send a request and return the raw body. The envelope is not inspected.
    pub async fn invoke_bytes(&self, request: ApiRequest) -> Result<Bytes> {
        let result = self.fetch(&request).await.and_then(|(status, body)| {
            if status.is_success() {
                Ok(body)
            } else {
                Err(status_failure(status, &body))
            }
        });
        result.map_err(|err| self.intercept(&request, err))
    }

    async fn execute(&self, request: &ApiRequest) -> Result<NormalizedResponse> {
        let (status, body) = self.fetch(request).await?;

        if !status.is_success() {
            return Err(status_failure(status, &body));
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(NormalizedResponse::empty());
        }

        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            ClientError::InvalidFormat(format!("Response is not valid JSON: {}", e))
        })?;

        match normalize_envelope(value) {
            Envelope::Success(response) => Ok(response),
            Envelope::Failure { code, body } => Err(declared_failure(code, &body, status.as_u16())),
        }
    }

    async fn fetch(&self, request: &ApiRequest) -> Result<(StatusCode, Bytes)> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| transport_failure(&e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| transport_failure(&e))?;
        debug!(url = %request.url, status = status.as_u16(), bytes = body.len(), "Response received");
        Ok((status, body))
    }

    fn intercept(&self, request: &ApiRequest, err: ClientError) -> ClientError {
        if err.is_session_expired() {
            if request.skip_reauth {
                debug!(url = %request.url, "Session expired on a call that skips re-authentication");
            } else {
                let _ = self.guard.on_session_expired();
            }
        } else {
            warn!(url = %request.url, kind = ?err.kind(), error = %err, "Request failed");
        }
        err
    }
}

fn status_failure(status: StatusCode, body: &Bytes) -> ClientError {
    let parsed = serde_json::from_slice::<Value>(body).ok();
    http_failure(status.as_u16(), status.canonical_reason(), parsed.as_ref())
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.transport.base_url())
            .field("guard", &self.guard)
            .finish()
    }
}
