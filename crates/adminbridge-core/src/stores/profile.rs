//! Current user profile.

use std::sync::Arc;

use adminbridge_storage::keys;
use chrono::Utc;
use futures::FutureExt;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::AuthApi;
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::session::{Session, SessionBound};
use crate::stores::{Loader, SessionCache};

/// Profile snapshot as persisted under `userInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<String>,
    #[serde(rename = "authBtnList", default)]
    pub auth_btn_list: Vec<String>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Capture time on this client, epoch millis.
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    pub user_type: Option<i64>,
    #[serde(default)]
    pub login_time: String,
    #[serde(rename = "lastLoginTime", default)]
    pub last_login_time: String,
}

/// `/auth/userinfo` payload. Every field is optional; the server has
/// shipped both integer and string ids.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteUserInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub user_type: Option<i64>,
    #[serde(default)]
    pub roles: Vec<Value>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub last_login_time: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

/// Rewrites server-relative asset paths into absolute URLs.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    base: String,
    prefixes: Vec<String>,
}

impl AssetResolver {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base: config.asset_base().to_string(),
            prefixes: config.relative_asset_prefixes.clone(),
        }
    }

    pub fn resolve(&self, path: &str) -> String {
        if self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str())) {
            format!("{}{}", self.base, path)
        } else {
            path.to_string()
        }
    }
}

impl UserProfile {
    pub fn from_remote(remote: RemoteUserInfo, assets: &AssetResolver, captured_at: i64) -> Self {
        let last_login = remote.last_login_time.unwrap_or_default();
        Self {
            id: remote.id,
            auth_btn_list: remote.permissions,
            avatar: remote
                .avatar
                .filter(|avatar| !avatar.is_empty())
                .map(|avatar| assets.resolve(&avatar))
                .unwrap_or_default(),
            roles: remote
                .roles
                .into_iter()
                .filter_map(|role| match role {
                    Value::String(name) => Some(name),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
            time: captured_at,
            username: remote.username.unwrap_or_default(),
            nickname: remote.nickname.unwrap_or_default(),
            user_type: remote.user_type,
            login_time: last_login.clone(),
            last_login_time: last_login,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.auth_btn_list.iter().any(|p| p == permission)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

pub struct UserProfileStore {
    cache: SessionCache<UserProfile>,
}

impl UserProfileStore {
    /// Create the store and bind it to the session's clear path.
    pub fn new(client: ApiClient, session: Session, config: &ClientConfig) -> Arc<Self> {
        let assets = AssetResolver::from_config(config);
        let loader: Loader<UserProfile> = Arc::new(move || {
            let client = client.clone();
            let assets = assets.clone();
            async move {
                let response = client.invoke(AuthApi::userinfo()).await?;
                let remote: RemoteUserInfo = response.data_as()?;
                Ok(UserProfile::from_remote(
                    remote,
                    &assets,
                    Utc::now().timestamp_millis(),
                ))
            }
            .boxed()
        });

        let store = Arc::new(Self {
            cache: SessionCache::new(keys::USER_INFO, session.clone(), loader),
        });
        session.bind(store.clone());
        store
    }

    pub async fn ensure(&self) -> Result<UserProfile> {
        self.cache.ensure().await
    }

    pub fn get(&self) -> Result<Option<UserProfile>> {
        self.cache.get()
    }

    pub fn update(&self, profile: UserProfile) -> Result<()> {
        self.cache.replace(profile)
    }
}

impl SessionBound for UserProfileStore {
    fn name(&self) -> &'static str {
        "user_profile"
    }

    fn reset(&self) {
        self.cache.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assets() -> AssetResolver {
        AssetResolver::from_config(
            &ClientConfig::new("https://api.example.com/").with_asset_base_url("https://cdn.example.com/"),
        )
    }

    #[test]
    fn test_maps_remote_fields() {
        let remote: RemoteUserInfo = serde_json::from_value(json!({
            "id": 7,
            "username": "admin",
            "nickname": "Administrator",
            "avatar": "/static/avatar/7.png",
            "user_type": 1,
            "roles": ["admin", "auditor"],
            "permissions": ["system:user:add"],
            "last_login_time": "2026-01-30 10:00:00"
        }))
        .unwrap();

        let profile = UserProfile::from_remote(remote, &assets(), 1_700_000_000_000);

        assert_eq!(profile.id.as_deref(), Some("7"));
        assert_eq!(profile.avatar, "https://cdn.example.com/static/avatar/7.png");
        assert_eq!(profile.roles, vec!["admin", "auditor"]);
        assert!(profile.has_permission("system:user:add"));
        assert_eq!(profile.login_time, "2026-01-30 10:00:00");
        assert_eq!(profile.time, 1_700_000_000_000);
    }

    #[test]
    fn test_absolute_avatar_untouched() {
        let remote = RemoteUserInfo {
            avatar: Some("https://gravatar.example/x.png".to_string()),
            ..Default::default()
        };
        let profile = UserProfile::from_remote(remote, &assets(), 0);
        assert_eq!(profile.avatar, "https://gravatar.example/x.png");
    }

    #[test]
    fn test_persisted_shape_uses_session_field_names() {
        let profile = UserProfile {
            auth_btn_list: vec!["a".to_string()],
            last_login_time: "t".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&profile).unwrap();

        assert_eq!(value["authBtnList"], json!(["a"]));
        assert_eq!(value["lastLoginTime"], json!("t"));
        assert!(value.get("auth_btn_list").is_none());
    }
}
