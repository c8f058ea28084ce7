//! The Canvas client: configuration plus a transport.
//!
//! # Design
//! `CanvasClient` holds an explicit `ClientConfig` and a `Transport`; it has
//! no mutable state between calls. Endpoint methods (see `api`) configure a
//! `RequestBuilder` and submit it, or hand a GET to the page aggregator.
//! Requests are assembled as plain `HttpRequest` data first, so the auth
//! precondition is checked before anything reaches the transport.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::Params;
use crate::request::RequestBuilder;
use crate::transport::{Transport, UreqTransport};

/// Synchronous client for the Canvas REST API.
#[derive(Clone)]
pub struct CanvasClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl CanvasClient<UreqTransport> {
    /// Client using the blocking `ureq` transport.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self { config, transport }
    }
}

impl<T> fmt::Debug for CanvasClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasClient")
            .field("base_url", &self.config.base_url)
            .field("has_token", &self.config.token.is_some())
            .finish()
    }
}

impl<T: Transport> CanvasClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Join `path` onto the base URL with exactly one `/` between them.
    /// Absolute `http(s)://` paths are returned unchanged.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        join_url(&self.config.base_url, path)
    }

    pub fn request(&self, method: HttpMethod, path: impl Into<String>) -> RequestBuilder<'_, T> {
        RequestBuilder::new(self, method, path.into())
    }

    pub fn get(&self, path: impl Into<String>) -> RequestBuilder<'_, T> {
        self.request(HttpMethod::Get, path)
    }

    pub fn post(&self, path: impl Into<String>) -> RequestBuilder<'_, T> {
        self.request(HttpMethod::Post, path)
    }

    pub fn put(&self, path: impl Into<String>) -> RequestBuilder<'_, T> {
        self.request(HttpMethod::Put, path)
    }

    pub fn delete(&self, path: impl Into<String>) -> RequestBuilder<'_, T> {
        self.request(HttpMethod::Delete, path)
    }

    /// The `Authorization` header for the configured token.
    pub(crate) fn auth_header(&self) -> Result<(String, String), ApiError> {
        match self.config.token.as_deref() {
            Some(token) if !token.is_empty() => {
                Ok(("Authorization".to_string(), format!("Bearer {token}")))
            }
            _ => Err(ApiError::AuthMissing),
        }
    }

    /// Build an authorized GET for `url` with `params` encoded as the query.
    pub(crate) fn build_get(&self, url: &str, params: &Params) -> Result<HttpRequest, ApiError> {
        let auth = self.auth_header()?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: with_query(url, &params.to_pairs())?,
            headers: vec![auth],
            body: None,
        })
    }

    pub(crate) fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.execute(request)
    }
}

/// Join a base URL and a path with a single `/`.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return format!("{base}/");
    }
    format!("{base}/{path}")
}

/// Append url-encoded `pairs` to the query string of `url`.
pub fn with_query(url: &str, pairs: &[(String, String)]) -> Result<String, ApiError> {
    if pairs.is_empty() {
        return Ok(url.to_string());
    }
    let mut parsed = url::Url::parse(url)
        .map_err(|e| ApiError::InvalidArgument(format!("invalid URL {url}: {e}")))?;
    parsed.query_pairs_mut().extend_pairs(pairs);
    Ok(parsed.into())
}

/// Map non-success status codes to `ApiError::HttpStatus` and parse the body.
///
/// An empty 2xx body parses as `Value::Null`.
pub fn parse_json(response: HttpResponse) -> Result<Value, ApiError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

pub fn parse_as<R: DeserializeOwned>(response: HttpResponse) -> Result<R, ApiError> {
    let value = parse_json(response)?;
    serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        url: response.url.clone(),
        body: response.body.clone(),
    })
}
