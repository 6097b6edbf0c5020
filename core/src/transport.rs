//! Blocking execution of `HttpRequest` values.
//!
//! # Design
//! One ureq agent is built per call from the caller's `TlsOptions`, so every
//! request carries exactly the verification settings of the `Server` it was
//! issued for. The scheme is compared after URL parsing, so `HTTPS://` is
//! treated as secure. HTTP error statuses are returned as data; interpreting
//! them is the job of the `parse_*` methods.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use ureq::tls::{Certificate, PemItem, RootCerts, TlsConfig};
use ureq::{Agent, RequestBuilder};
use url::Url;

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Peer verification for `https` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMode {
    #[default]
    Peer,
    None,
}

/// TLS settings applied to every request issued through a `Server`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TlsOptions {
    #[serde(default)]
    pub verify_mode: VerifyMode,
    /// PEM bundle used as the only trusted roots when set.
    #[serde(default)]
    pub ca_file: Option<PathBuf>,
}

impl TlsOptions {
    pub fn verify_mode(mut self, mode: VerifyMode) -> Self {
        self.verify_mode = mode;
        self
    }

    pub fn ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_file = Some(path.into());
        self
    }
}

/// Execute `request` and return the raw response.
///
/// Only GET and POST are supported; anything else fails with
/// `ApiError::UnsupportedMethod` before the network is touched.
pub fn execute(request: &HttpRequest, tls: &TlsOptions) -> Result<HttpResponse> {
    if !matches!(request.method, HttpMethod::Get | HttpMethod::Post) {
        return Err(ApiError::UnsupportedMethod(request.method));
    }

    let agent = agent_for(&request.url, tls)?;
    let mut headers = present_headers(&request.headers);
    let body = request.body.as_ref().map(|body| match body {
        RequestBody::Form(pairs) => {
            if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("content-type")) {
                headers.push(("Content-Type", FORM_CONTENT_TYPE));
            }
            encode_form(pairs)
        }
        RequestBody::Raw(text) => text.clone(),
    });

    tracing::debug!(method = %request.method, url = %request.url, "sending request");

    let result = match (request.method, body) {
        (HttpMethod::Get, None) => with_headers(agent.get(&request.url), &headers).call(),
        (HttpMethod::Get, Some(body)) => with_headers(agent.get(&request.url), &headers)
            .force_send_body()
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => with_headers(agent.post(&request.url), &headers).send_empty(),
        (HttpMethod::Post, Some(body)) => {
            with_headers(agent.post(&request.url), &headers).send(body.as_bytes())
        }
        (method, _) => return Err(ApiError::UnsupportedMethod(method)),
    };
    let mut response = result?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response.body_mut().read_to_string()?;

    tracing::debug!(status, url = %request.url, "received response");

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

/// Encode key/value pairs as `application/x-www-form-urlencoded`.
pub fn encode_form(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Headers that carry a value; `None` entries are dropped.
fn present_headers(headers: &[(String, Option<String>)]) -> Vec<(&str, &str)> {
    headers
        .iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
        .collect()
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(&str, &str)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder
}

fn agent_for(url: &str, tls: &TlsOptions) -> Result<Agent> {
    let mut config = Agent::config_builder().http_status_as_error(false);
    if let Some(tls_config) = tls_config_for(url, tls)? {
        config = config.tls_config(tls_config);
    }
    Ok(config.build().new_agent())
}

/// TLS settings for `url`, or `None` when the scheme is not `https`.
fn tls_config_for(url: &str, tls: &TlsOptions) -> Result<Option<TlsConfig>> {
    if Url::parse(url)?.scheme() != "https" {
        return Ok(None);
    }
    let mut builder = TlsConfig::builder().disable_verification(tls.verify_mode == VerifyMode::None);
    if let Some(path) = &tls.ca_file {
        builder = builder.root_certs(RootCerts::new_with_certs(&load_ca_file(path)?));
    }
    Ok(Some(builder.build()))
}

fn load_ca_file(path: &Path) -> Result<Vec<Certificate<'static>>> {
    let pem = std::fs::read(path).map_err(|e| ApiError::Tls(format!("{}: {e}", path.display())))?;
    let certs = ureq::tls::parse_pem(&pem)
        .filter_map(|item| match item {
            Ok(PemItem::Certificate(cert)) => Some(Ok(cert.to_owned())),
            Ok(_) => None,
            Err(e) => Some(Err(ApiError::Tls(e.to_string()))),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if certs.is_empty() {
        return Err(ApiError::Tls(format!("{}: no certificates found", path.display())));
    }
    Ok(certs)
}
