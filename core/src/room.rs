//! Room actions performed on behalf of a `Session`.
//!
//! A 5xx answer to any room-scoped request is reported as
//! `ApiError::NoSuchRoom`. Rocket.Chat answers an unknown room id with a
//! server error, so a genuine outage is reported the same way.

use std::fmt;
use std::ops::Deref;

use serde_json::json;

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::session::{check_reply, Session};
use crate::types::{Message, RoomData};

/// A chat room bound to the session that listed it.
///
/// Dereferences to [`RoomData`] for the room's fields.
#[derive(Clone)]
pub struct Room<'s> {
    session: &'s Session<'s>,
    data: RoomData,
}

impl<'s> Room<'s> {
    pub fn new(session: &'s Session<'s>, data: RoomData) -> Self {
        Self { session, data }
    }

    pub fn session(&self) -> &'s Session<'s> {
        self.session
    }

    pub fn data(&self) -> &RoomData {
        &self.data
    }

    pub fn join(&self) -> Result<()> {
        let request = self.build_join()?;
        self.parse_action(self.session.server().execute(&request)?)
    }

    pub fn leave(&self) -> Result<()> {
        let request = self.build_leave()?;
        self.parse_action(self.session.server().execute(&request)?)
    }

    /// Send `message` to the room.
    pub fn post(&self, message: &str) -> Result<()> {
        let request = self.build_post(message)?;
        self.parse_action(self.session.server().execute(&request)?)
    }

    /// Unread messages in the room. The server API for this is not wired up
    /// yet, so this always fails with `ApiError::NotImplemented`.
    pub fn unreads(&self) -> Result<Vec<Message>> {
        Err(ApiError::NotImplemented("unreads"))
    }

    pub fn build_join(&self) -> Result<HttpRequest> {
        self.session
            .authorized(HttpMethod::Get, &format!("/api/rooms/{}/join", self.data.id()))
    }

    pub fn build_leave(&self) -> Result<HttpRequest> {
        self.session
            .authorized(HttpMethod::Get, &format!("/api/rooms/{}/leave", self.data.id()))
    }

    pub fn build_post(&self, message: &str) -> Result<HttpRequest> {
        let body = serde_json::to_string(&json!({ "msg": message }))
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self
            .session
            .authorized(HttpMethod::Post, &format!("/api/rooms/{}/send", self.data.id()))?
            .header("Content-Type", Some("application/json".to_string()))
            .body(RequestBody::Raw(body)))
    }

    /// Shared response handling for `join`, `leave` and `post`.
    pub fn parse_action(&self, response: HttpResponse) -> Result<()> {
        if response.is_server_error() {
            tracing::warn!(room = self.data.id(), status = response.status, "room request failed");
            return Err(ApiError::NoSuchRoom);
        }
        check_reply(&response).map(|_| ())
    }
}

impl Deref for Room<'_> {
    type Target = RoomData;

    fn deref(&self) -> &RoomData {
        &self.data
    }
}

impl fmt::Debug for Room<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.data.id())
            .field("name", &self.data.name())
            .field("usernames", &self.data.usernames())
            .field("created_timestamp", &self.data.created_timestamp())
            .field("updated_timestamp", &self.data.updated_timestamp())
            .field("topic", &self.data.topic())
            .field("message_count", &self.data.message_count())
            .field("is_default", &self.data.is_default())
            .field("is_archived", &self.data.is_archived())
            .finish()
    }
}
