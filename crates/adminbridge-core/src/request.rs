//! Request description consumed by the transport.

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// How the response body should be handed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseType {
    /// JSON envelope, normalized.
    #[default]
    Json,
    /// Raw bytes (file downloads), not normalized.
    Bytes,
}

/// One part of a multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl MultipartField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: Bytes::from(value.into()),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<MultipartField>),
}

/// A single call issued by a per-resource declaration.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL, or an absolute URL.
    pub url: String,
    pub params: Option<Value>,
    pub body: RequestBody,
    pub headers: Vec<(String, String)>,
    pub response_type: ResponseType,
    /// Do not raise the re-authentication prompt if this call expires.
    pub skip_reauth: bool,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: None,
            body: RequestBody::Empty,
            headers: Vec::new(),
            response_type: ResponseType::Json,
            skip_reauth: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Serialize any payload as the JSON body.
    pub fn with_body<T: Serialize>(self, body: &T) -> serde_json::Result<Self> {
        Ok(self.with_json(serde_json::to_value(body)?))
    }

    pub fn with_multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn skip_reauth(mut self) -> Self {
        self.skip_reauth = true;
        self
    }
}
