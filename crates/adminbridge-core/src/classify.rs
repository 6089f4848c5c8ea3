//! Failure classification.
//!
//! Turns transport errors, non-2xx responses and declared envelope failures
//! into [`ClientError`] variants. Expiry detection lives here; acting on it is
//! the session guard's job.

use serde_json::Value;

use crate::error::{ClientError, NetworkErrorKind};

/// Embedded business codes that mean the credential is no longer valid.
pub const SESSION_EXPIRED_CODES: &[i64] = &[11000, 401];

/// HTTP status that always means the credential is no longer valid.
pub const SESSION_EXPIRED_STATUS: u16 = 401;

const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

pub fn is_session_expired_code(code: i64) -> bool {
    SESSION_EXPIRED_CODES.contains(&code)
}

/// Pick the best human-readable message from an error body.
///
/// Priority: `detail`, then `message`, then `msg`. A `detail` array (request
/// validation errors) is flattened into one line from each entry's `msg`.
pub fn extract_message(body: &Value) -> Option<String> {
    if let Some(detail) = body.get("detail") {
        match detail {
            Value::String(text) if !text.trim().is_empty() => return Some(text.clone()),
            Value::Array(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .filter_map(|entry| match entry {
                        Value::String(text) => Some(text.clone()),
                        other => other
                            .get("msg")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                    .collect();
                if !parts.is_empty() {
                    return Some(parts.join("; "));
                }
            }
            _ => {}
        }
    }

    ["message", "msg"].iter().find_map(|field| {
        body.get(*field)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
    })
}

/// Classify a failure that produced no usable response.
pub fn transport_failure(err: &reqwest::Error) -> ClientError {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if err.is_timeout() || lowered.contains("timeout") || lowered.contains("timed out") {
        return ClientError::Network {
            kind: NetworkErrorKind::Timeout,
            message,
        };
    }

    if err.is_connect() || err.is_request() {
        return ClientError::Network {
            kind: NetworkErrorKind::ConnectionError,
            message,
        };
    }

    ClientError::Unclassified {
        message,
        code: None,
        status: err.status().map(|status| status.as_u16()),
    }
}

/// Classify a response whose HTTP status is outside 2xx.
pub fn http_failure(status: u16, status_text: Option<&str>, body: Option<&Value>) -> ClientError {
    let message = body
        .and_then(extract_message)
        .or_else(|| status_text.map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        SESSION_EXPIRED_STATUS => ClientError::SessionExpired {
            message,
            code: None,
            status: Some(status),
        },
        400..=499 => ClientError::Business {
            message,
            code: i64::from(status),
            status,
        },
        _ => ClientError::Unclassified {
            message,
            code: None,
            status: Some(status),
        },
    }
}

/// Classify an envelope whose embedded code is not a success sentinel.
///
/// The embedded code is authoritative even when the HTTP status was 200.
pub fn declared_failure(code: i64, body: &Value, status: u16) -> ClientError {
    let message = extract_message(body).unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());

    if is_session_expired_code(code) {
        ClientError::SessionExpired {
            message,
            code: Some(code),
            status: Some(status),
        }
    } else {
        ClientError::Business {
            message,
            code,
            status,
        }
    }
}
