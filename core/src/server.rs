//! Entry point: a Rocket.Chat server address plus TLS settings.
//!
//! # Design
//! `Server` carries no mutable state. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; the plain methods (`version`, `login`)
//! run the round-trip in between through [`transport::execute`].

use url::Url;

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::session::Session;
use crate::transport::{self, TlsOptions};
use crate::types::{self, Token, Version};

/// A Rocket.Chat server.
#[derive(Debug, Clone)]
pub struct Server {
    base_url: Url,
    options: TlsOptions,
}

impl Server {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, TlsOptions::default())
    }

    pub fn with_options(base_url: &str, options: TlsOptions) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            options,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// TLS settings shared by every request issued for this server.
    pub fn request_options(&self) -> &TlsOptions {
        &self.options
    }

    /// Absolute URL for an API path. The path replaces any path on the base
    /// URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<String> {
        Ok(self.base_url.join(path)?.to_string())
    }

    pub(crate) fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        transport::execute(request, &self.options)
    }

    /// Fetch the API and server version.
    pub fn version(&self) -> Result<Version> {
        let request = self.build_version()?;
        self.parse_version(self.execute(&request)?)
    }

    /// Authenticate and return a session bound to this server.
    pub fn login(&self, username: &str, password: &str) -> Result<Session<'_>> {
        let request = self.build_login(username, password)?;
        let token = self.parse_login(self.execute(&request)?)?;
        tracing::debug!(user_id = token.user_id(), "logged in");
        Ok(Session::new(self, token))
    }

    pub fn build_version(&self) -> Result<HttpRequest> {
        Ok(HttpRequest::new(HttpMethod::Get, self.endpoint("/api/version")?))
    }

    pub fn build_login(&self, username: &str, password: &str) -> Result<HttpRequest> {
        let form = vec![
            ("user".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        Ok(HttpRequest::new(HttpMethod::Post, self.endpoint("/api/login")?).body(RequestBody::Form(form)))
    }

    pub fn parse_version(&self, response: HttpResponse) -> Result<Version> {
        if response.status != 200 {
            return Err(ApiError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }
        let json = types::parse_json(&response.body)?;
        types::field(&json, "versions")
    }

    /// Extract the token from a login response. The HTTP status is not
    /// consulted; the body's `status` field decides.
    pub fn parse_login(&self, response: HttpResponse) -> Result<Token> {
        let json = types::parse_json(&response.body)?;
        if let Some(message) = types::error_message(&json) {
            tracing::warn!(%message, "login rejected");
            return Err(ApiError::Login(message));
        }
        types::field(&json, "data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Server {
        Server::new("http://www.example.com/").unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_version_produces_correct_request() {
        let req = server().build_version().unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://www.example.com/api/version");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn build_login_sends_form_credentials() {
        let req = server().build_login("user", "password").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://www.example.com/api/login");
        assert_eq!(
            req.body,
            Some(RequestBody::Form(vec![
                ("user".to_string(), "user".to_string()),
                ("password".to_string(), "password".to_string()),
            ]))
        );
    }

    #[test]
    fn endpoint_path_is_absolute() {
        let server = Server::new("http://www.example.com/chat/").unwrap();
        let req = server.build_version().unwrap();
        assert_eq!(req.url, "http://www.example.com/api/version");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = Server::new("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn parse_version_success() {
        let body = r#"{"status":"success","versions":{"api":"0.1","rocketchat":"0.5"}}"#;
        let version = server().parse_version(response(200, body)).unwrap();
        assert_eq!(version.api(), "0.1");
        assert_eq!(version.rocketchat(), "0.5");
    }

    #[test]
    fn parse_version_wrong_status() {
        let err = server().parse_version(response(503, "unavailable")).unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn parse_version_bad_json() {
        let err = server().parse_version(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_login_success() {
        let body = r#"{"status":"success","data":{"authToken":"tok","userId":"uid"}}"#;
        let token = server().parse_login(response(200, body)).unwrap();
        assert_eq!(token, Token::new("tok", "uid"));
    }

    #[test]
    fn parse_login_rejected() {
        let body = r#"{"status":"error","message":"Unauthorized"}"#;
        let err = server().parse_login(response(401, body)).unwrap_err();
        assert!(matches!(err, ApiError::Login(ref m) if m == "Unauthorized"));
    }

    #[test]
    fn request_options_default_to_peer_verification() {
        let server = server();
        assert_eq!(server.request_options(), &TlsOptions::default());
    }
}
