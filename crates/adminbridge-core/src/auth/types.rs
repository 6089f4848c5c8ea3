//! Core types for the authentication session

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Authentication state, derived from the session token and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}

/// Login form.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_key: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            captcha: None,
            captcha_key: None,
        }
    }

    pub fn with_captcha(mut self, captcha: impl Into<String>, key: impl Into<String>) -> Self {
        self.captcha = Some(captcha.into());
        self.captcha_key = Some(key.into());
        self
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("captcha", &self.captcha)
            .finish()
    }
}

/// Token pair issued by login and refresh.
#[derive(Clone, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// New contract sends `access_token`, the legacy one `token`.
    pub fn from_payload(data: &Value) -> Result<Self> {
        let access_token = ["access_token", "token"]
            .iter()
            .find_map(|field| {
                data.get(*field)
                    .and_then(Value::as_str)
                    .filter(|token| !token.is_empty())
            })
            .ok_or_else(|| {
                ClientError::InvalidFormat("Login response carries no token".to_string())
            })?
            .to_string();

        let refresh_token = data
            .get("refresh_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Ok(Self {
            access_token,
            refresh_token,
        })
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_from_either_field() {
        let pair = TokenPair::from_payload(&json!({
            "access_token": "new",
            "token": "old",
            "refresh_token": "r"
        }))
        .unwrap();
        assert_eq!(pair.access_token, "new");
        assert_eq!(pair.refresh_token.as_deref(), Some("r"));

        let legacy = TokenPair::from_payload(&json!({ "token": "old" })).unwrap();
        assert_eq!(legacy.access_token, "old");
        assert!(legacy.refresh_token.is_none());
    }

    #[test]
    fn test_empty_access_token_falls_back_to_legacy_field() {
        let pair = TokenPair::from_payload(&json!({ "access_token": "", "token": "legacy" }))
            .unwrap();
        assert_eq!(pair.access_token, "legacy");

        let err = TokenPair::from_payload(&json!({ "access_token": "", "token": "" }))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_token_is_invalid() {
        let err = TokenPair::from_payload(&json!({ "expires_in": 3600 })).unwrap_err();
        assert!(matches!(err, ClientError::InvalidFormat(_)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", Credentials::new("admin", "hunter22"));
        assert!(!rendered.contains("hunter22"));
    }
}
