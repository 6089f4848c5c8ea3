//! Error types for the request pipeline

use std::fmt;

use thiserror::Error;

/// Failure without any HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    Timeout,
    ConnectionError,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkErrorKind::Timeout => write!(f, "Network timeout"),
            NetworkErrorKind::ConnectionError => write!(f, "Network connection error"),
        }
    }
}

/// The four-way classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SessionExpired,
    BusinessError,
    NetworkError(NetworkErrorKind),
    Unclassified,
}

/// Client error types
///
/// Cloneable so one failed single-flight fetch can be handed to every waiter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Session expired: {message}")]
    SessionExpired {
        message: String,
        code: Option<i64>,
        status: Option<u16>,
    },

    #[error("{message}")]
    Business {
        message: String,
        code: i64,
        status: u16,
    },

    #[error("{kind}: {message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    #[error("{message}")]
    Unclassified {
        message: String,
        code: Option<i64>,
        status: Option<u16>,
    },

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn storage(err: impl fmt::Display) -> Self {
        ClientError::Storage(err.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::SessionExpired { .. } => ErrorKind::SessionExpired,
            ClientError::Business { .. } => ErrorKind::BusinessError,
            ClientError::Network { kind, .. } => ErrorKind::NetworkError(*kind),
            ClientError::Unclassified { .. }
            | ClientError::InvalidFormat(_)
            | ClientError::Config(_)
            | ClientError::Storage(_) => ErrorKind::Unclassified,
        }
    }

    /// Human-readable message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            ClientError::SessionExpired { message, .. }
            | ClientError::Business { message, .. }
            | ClientError::Network { message, .. }
            | ClientError::Unclassified { message, .. } => message,
            ClientError::InvalidFormat(message)
            | ClientError::Config(message)
            | ClientError::Storage(message) => message,
        }
    }

    /// Embedded business code, or the HTTP status for transport-level failures.
    pub fn code(&self) -> Option<i64> {
        match self {
            ClientError::SessionExpired { code, status, .. }
            | ClientError::Unclassified { code, status, .. } => {
                code.or(status.map(i64::from))
            }
            ClientError::Business { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// HTTP status of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::SessionExpired { status, .. }
            | ClientError::Unclassified { status, .. } => *status,
            ClientError::Business { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired { .. })
    }

    /// Whether the failure is handled locally through the re-auth prompt.
    pub fn is_recoverable(&self) -> bool {
        self.is_session_expired()
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network { .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidFormat(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
