//! Domain values parsed from Rocket.Chat JSON payloads.
//!
//! # Design
//! Every type here is an immutable snapshot: fields are private, built once
//! by serde and exposed through read-only accessors. Nothing holds a handle
//! back to the server; the `Room` handle in [`crate::room`] pairs a
//! `RoomData` with the session that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Server-issued credential pair sent as headers on authenticated calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    auth_token: String,
    user_id: String,
}

impl Token {
    pub fn new(auth_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            user_id: user_id.into(),
        }
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// `X-Auth-Token` and `X-User-Id` headers for this token.
    pub fn auth_headers(&self) -> Vec<(String, Option<String>)> {
        vec![
            (AUTH_TOKEN_HEADER.to_string(), Some(self.auth_token.clone())),
            (USER_ID_HEADER.to_string(), Some(self.user_id.clone())),
        ]
    }
}

/// API and server version reported by `/api/version`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Version {
    api: String,
    rocketchat: String,
}

impl Version {
    pub fn api(&self) -> &str {
        &self.api
    }

    pub fn rocketchat(&self) -> &str {
        &self.rocketchat
    }
}

/// Raw room fields as listed by `/api/publicRooms`.
///
/// Only `_id` and `ts` are required. Absent flags read as `false`, absent
/// counters as zero.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomData {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    usernames: Vec<String>,
    #[serde(rename = "ts")]
    created_timestamp: DateTime<Utc>,
    #[serde(rename = "lm", default)]
    updated_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(rename = "msgs", default)]
    message_count: u64,
    #[serde(rename = "default", default)]
    is_default: bool,
    #[serde(rename = "archived", default)]
    is_archived: bool,
}

impl RoomData {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    pub fn created_timestamp(&self) -> DateTime<Utc> {
        self.created_timestamp
    }

    pub fn updated_timestamp(&self) -> Option<DateTime<Utc>> {
        self.updated_timestamp
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn is_archived(&self) -> bool {
        self.is_archived
    }
}

/// A chat message. Only used as a parse target for now.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    id: String,
    #[serde(rename = "rid")]
    room_id: String,
    #[serde(rename = "message")]
    body: String,
    timestamp: DateTime<Utc>,
    user: String,
}

impl Message {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

/// Parse a response body as JSON.
pub(crate) fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Deserialize `value[key]` into `T`.
pub(crate) fn field<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Result<T> {
    let inner = value
        .get(key)
        .cloned()
        .ok_or_else(|| ApiError::DeserializationError(format!("missing field `{key}`")))?;
    serde_json::from_value(inner).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Returns the server's message when the body reports `"status": "error"`.
///
/// Rocket.Chat puts the text at the top level for some endpoints and under
/// `data.message` for unauthorized requests.
pub(crate) fn error_message(value: &Value) -> Option<String> {
    if value.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| value.pointer("/data/message").and_then(Value::as_str))
        .unwrap_or_default();
    Some(message.to_string())
}
