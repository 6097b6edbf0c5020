//! In-process stand-in for the Rocket.Chat REST endpoints the client uses.
//!
//! One user, one public room, fixed credentials. Unauthenticated requests
//! get a 401 with an error body; room actions on an unknown id get a 500,
//! which is how Rocket.Chat answers them.

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const ROOM_ID: &str = "AAAAAAAAAAAAAAAAA";
pub const ROOM_NAME: &str = "room";
pub const AUTH_TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
pub const USER_ID: &str = "AAAAAAAAAAAAAAAAA";
pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "password";

#[derive(Deserialize)]
pub struct LoginForm {
    pub user: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SendMessage {
    pub msg: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/api/version", get(version))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/publicRooms", get(public_rooms))
        .route("/api/rooms/{id}/join", get(join_room))
        .route("/api/rooms/{id}/leave", get(leave_room))
        .route("/api/rooms/{id}/send", post(send_message))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers.get("x-auth-token").and_then(|v| v.to_str().ok()) == Some(AUTH_TOKEN)
        && headers.get("x-user-id").and_then(|v| v.to_str().ok()) == Some(USER_ID)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "status": "error",
            "data": { "message": "You must be logged in to do this." }
        })),
    )
        .into_response()
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error.").into_response()
}

fn success() -> Response {
    Json(json!({ "status": "success" })).into_response()
}

fn room_json() -> Value {
    json!({
        "_id": ROOM_ID,
        "name": ROOM_NAME,
        "t": "c",
        "usernames": ["user1", "user2"],
        "msgs": 100,
        "u": { "_id": USER_ID, "username": "user1" },
        "ts": "2016-01-01T00:00:00.000Z",
        "archived": false,
        "lm": "2016-01-01T00:00:00.000Z"
    })
}

async fn version() -> Json<Value> {
    Json(json!({
        "status": "success",
        "versions": { "api": "0.1", "rocketchat": "0.5" }
    }))
}

async fn login(Form(form): Form<LoginForm>) -> Response {
    if form.user == USERNAME && form.password == PASSWORD {
        Json(json!({
            "status": "success",
            "data": { "authToken": AUTH_TOKEN, "userId": USER_ID }
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": "error", "message": "Unauthorized" })),
        )
            .into_response()
    }
}

async fn logout(headers: HeaderMap) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "status": "success",
        "data": { "message": "You've been logged out!" }
    }))
    .into_response()
}

async fn public_rooms(headers: HeaderMap) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "status": "success", "rooms": [room_json()] })).into_response()
}

fn room_action(headers: &HeaderMap, id: &str) -> Response {
    if !is_authorized(headers) {
        return unauthorized();
    }
    if id != ROOM_ID {
        return server_error();
    }
    success()
}

async fn join_room(headers: HeaderMap, Path(id): Path<String>) -> Response {
    room_action(&headers, &id)
}

async fn leave_room(headers: HeaderMap, Path(id): Path<String>) -> Response {
    room_action(&headers, &id)
}

async fn send_message(headers: HeaderMap, Path(id): Path<String>, body: String) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if id != ROOM_ID || !is_json {
        return server_error();
    }
    match serde_json::from_str::<SendMessage>(&body) {
        Ok(message) => {
            tracing::info!(room = %id, msg = %message.msg, "message posted");
            success()
        }
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "message": "invalid message body" })),
        )
            .into_response(),
    }
}
