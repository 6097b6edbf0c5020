//! An authenticated context bound to a `Server`.

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::room::Room;
use crate::server::Server;
use crate::types::{self, RoomData, Token};

/// A logged-in session. The token never refreshes.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    server: &'a Server,
    token: Token,
}

impl<'a> Session<'a> {
    pub fn new(server: &'a Server, token: Token) -> Self {
        Self { server, token }
    }

    pub fn server(&self) -> &'a Server {
        self.server
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn logoff(&self) -> Result<()> {
        let request = self.build_logoff()?;
        self.parse_logoff(self.server.execute(&request)?)
    }

    /// Alias for [`Session::logoff`].
    pub fn logout(&self) -> Result<()> {
        self.logoff()
    }

    /// List public rooms in the order the server returns them.
    pub fn list_public_rooms(&self) -> Result<Vec<Room<'_>>> {
        let request = self.build_list_public_rooms()?;
        let rooms = self.parse_list_public_rooms(self.server.execute(&request)?)?;
        Ok(rooms.into_iter().map(|data| Room::new(self, data)).collect())
    }

    /// First public room whose name matches exactly. Fetches the full list on
    /// every call.
    pub fn find_room_by_name(&self, name: &str) -> Result<Option<Room<'_>>> {
        Ok(self
            .list_public_rooms()?
            .into_iter()
            .find(|room| room.name() == name))
    }

    pub fn build_logoff(&self) -> Result<HttpRequest> {
        self.authorized(HttpMethod::Post, "/api/logout")
    }

    pub fn build_list_public_rooms(&self) -> Result<HttpRequest> {
        self.authorized(HttpMethod::Get, "/api/publicRooms")
    }

    pub fn parse_logoff(&self, response: HttpResponse) -> Result<()> {
        check_reply(&response).map(|_| ())
    }

    pub fn parse_list_public_rooms(&self, response: HttpResponse) -> Result<Vec<RoomData>> {
        let json = check_reply(&response)?;
        types::field(&json, "rooms")
    }

    /// A request to `path` carrying this session's auth headers.
    pub(crate) fn authorized(&self, method: HttpMethod, path: &str) -> Result<HttpRequest> {
        Ok(HttpRequest::new(method, self.server.endpoint(path)?).headers(self.token.auth_headers()))
    }
}

/// Parse a `{"status": ...}` reply, failing with `ApiError::Api` when the
/// server reports an error.
pub(crate) fn check_reply(response: &HttpResponse) -> Result<serde_json::Value> {
    let json = types::parse_json(&response.body)?;
    if let Some(message) = types::error_message(&json) {
        tracing::warn!(status = response.status, %message, "server reported an error");
        return Err(ApiError::Api {
            status: response.status,
            message,
        });
    }
    Ok(json)
}
