use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, AUTH_TOKEN, PASSWORD, ROOM_ID, USERNAME, USER_ID};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed(method: &str, uri: &str) -> http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Auth-Token", AUTH_TOKEN)
        .header("X-User-Id", USER_ID)
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

// --- version ---

#[tokio::test]
async fn version_reports_api_and_server() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/version").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["versions"]["api"], "0.1");
    assert_eq!(json["versions"]["rocketchat"], "0.5");
}

// --- login ---

#[tokio::test]
async fn login_with_valid_credentials() {
    let resp = app()
        .oneshot(form_request("/api/login", &format!("user={USERNAME}&password={PASSWORD}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["authToken"], AUTH_TOKEN);
    assert_eq!(json["data"]["userId"], USER_ID);
}

#[tokio::test]
async fn login_with_wrong_password() {
    let resp = app()
        .oneshot(form_request("/api/login", "user=user&password=passwordpassword"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Unauthorized");
}

// --- logout ---

#[tokio::test]
async fn logout_requires_auth_headers() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["message"], "You must be logged in to do this.");
}

#[tokio::test]
async fn logout_with_auth_headers() {
    let resp = app()
        .oneshot(authed("POST", "/api/logout").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "success");
}

// --- publicRooms ---

#[tokio::test]
async fn public_rooms_lists_one_room() {
    let resp = app()
        .oneshot(authed("GET", "/api/publicRooms").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let rooms = json["rooms"].as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["_id"], ROOM_ID);
}

// --- room actions ---

#[tokio::test]
async fn join_known_room() {
    let resp = app()
        .oneshot(authed("GET", &format!("/api/rooms/{ROOM_ID}/join")).body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn leave_unknown_room_is_server_error() {
    let resp = app()
        .oneshot(authed("GET", "/api/rooms/nope/leave").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body_bytes(resp).await[..], b"Server error.");
}

#[tokio::test]
async fn send_requires_json_content_type() {
    let resp = app()
        .oneshot(
            authed("POST", &format!("/api/rooms/{ROOM_ID}/send"))
                .body(r#"{"msg":"test"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn send_message_to_known_room() {
    let resp = app()
        .oneshot(
            authed("POST", &format!("/api/rooms/{ROOM_ID}/send"))
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"msg":"test"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "success");
}

#[tokio::test]
async fn room_action_without_auth_is_unauthorized() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri(format!("/api/rooms/{ROOM_ID}/join"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
