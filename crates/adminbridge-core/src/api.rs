//! Endpoint declarations the core calls itself.
//!
//! Everything else is declared by callers and goes through
//! [`ApiClient::invoke`](crate::client::ApiClient::invoke) the same way.

use serde_json::json;

use crate::auth::Credentials;
use crate::error::Result;
use crate::request::ApiRequest;

pub struct AuthApi;

impl AuthApi {
    pub const LOGIN: &'static str = "/v1/system/auth/login";
    pub const LOGOUT: &'static str = "/v1/system/auth/logout";
    pub const REFRESH: &'static str = "/v1/system/auth/refresh";
    pub const USERINFO: &'static str = "/v1/system/auth/userinfo";
    pub const MENUS: &'static str = "/v1/system/auth/menus";

    /// A 401 here means bad credentials, not an expired session.
    pub fn login(credentials: &Credentials) -> Result<ApiRequest> {
        Ok(ApiRequest::post(Self::LOGIN)
            .with_body(credentials)?
            .skip_reauth())
    }

    pub fn logout() -> ApiRequest {
        ApiRequest::post(Self::LOGOUT).skip_reauth()
    }

    pub fn refresh(refresh_token: &str) -> ApiRequest {
        ApiRequest::post(Self::REFRESH)
            .with_json(json!({ "refresh_token": refresh_token }))
            .skip_reauth()
    }

    pub fn userinfo() -> ApiRequest {
        ApiRequest::get(Self::USERINFO)
    }

    pub fn menus() -> ApiRequest {
        ApiRequest::get(Self::MENUS)
    }
}

pub struct DictApi;

impl DictApi {
    pub const TYPE_LIST_ALL: &'static str = "/v1/system/dict/type/list/all";

    pub fn type_list_all() -> ApiRequest {
        ApiRequest::get(Self::TYPE_LIST_ALL)
    }
}
