//! HTTP transport.
//!
//! Resolves request URLs against the configured base, attaches the session
//! credential under both header conventions and dispatches through reqwest.
//! No caching and no retries; failures are returned as-is.

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http_client::build_http_client;
use crate::query::to_query_pairs;
use crate::request::{ApiRequest, RequestBody};
use crate::session::Session;

/// Header carrying the bare token for the legacy backend.
pub const LEGACY_TOKEN_HEADER: &str = "token";

#[derive(Clone)]
pub struct Transport {
    client: Client,
    base_url: String,
    session: Session,
}

impl Transport {
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: build_http_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through, everything else is joined onto the base.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// Headers for the current session: bearer for the new contract and the
    /// bare `token` header for the legacy one, both at once.
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let token = match self.session.token() {
            Ok(Some(token)) => token,
            Ok(None) => return headers,
            Err(e) => {
                warn!(error = %e, "Failed to read session token, sending request anonymously");
                return headers;
            }
        };

        match (
            HeaderValue::from_str(&format!("Bearer {}", token)),
            HeaderValue::from_str(&token),
        ) {
            (Ok(bearer), Ok(bare)) => {
                headers.insert(header::AUTHORIZATION, bearer);
                headers.insert(HeaderName::from_static(LEGACY_TOKEN_HEADER), bare);
            }
            _ => warn!("Session token is not a valid header value, skipping credentials"),
        }
        headers
    }

    pub async fn send(&self, request: &ApiRequest) -> std::result::Result<Response, reqwest::Error> {
        let url = self.resolve_url(&request.url);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(self.auth_headers());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(params) = &request.params {
            builder = builder.query(&to_query_pairs(params));
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(fields) => {
                let mut form = Form::new();
                for field in fields {
                    let mut part = Part::bytes(field.data.to_vec());
                    if let Some(file_name) = &field.file_name {
                        part = part.file_name(file_name.clone());
                    }
                    if let Some(content_type) = &field.content_type {
                        part = part.mime_str(content_type)?;
                    }
                    form = form.part(field.name.clone(), part);
                }
                builder.multipart(form)
            }
        };

        debug!(method = %request.method, url = %url, "Dispatching request");
        builder.send().await
    }
}
