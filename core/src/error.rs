//! Error types for the Rocket.Chat client.
//!
//! # Design
//! One enum covers every failure so callers can branch on the kind: a
//! rejected login is `Login`, a room-scoped 5xx is `NoSuchRoom`, and a
//! `{"status": "error"}` body on an otherwise normal response is `Api`.
//! Network and TLS setup failures are kept apart from server answers.

use thiserror::Error;

use crate::http::HttpMethod;

/// Errors returned by `Server`, `Session` and `Room` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport only speaks GET and POST.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(HttpMethod),

    /// The server answered with a status other than the one required.
    #[error("invalid HTTP response code: {status}")]
    HttpStatus { status: u16, body: String },

    /// The server rejected the credentials.
    #[error("login failed: {0}")]
    Login(String),

    /// The server failed a room-scoped request with a 5xx. This also covers
    /// genuine outages, which are indistinguishable here.
    #[error("no such room")]
    NoSuchRoom,

    /// The server replied with `"status": "error"`. `status` is the HTTP
    /// status of that reply; 401 means the token was not accepted.
    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The configured CA file could not be read or parsed.
    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// Check if this is a missing-room error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NoSuchRoom)
    }

    /// Check if this is an authentication error: a rejected login or an
    /// authenticated call the server answered with 401.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Login(_)) || matches!(self, ApiError::Api { status: 401, .. })
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
