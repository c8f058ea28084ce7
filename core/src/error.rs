//! Error types for the Canvas API client.
//!
//! # Design
//! Every operation returns `Result<_, ApiError>`. Non-2xx responses are not
//! swallowed into an error-shaped JSON document; they land in `HttpStatus`
//! with the status code, the requested URL and the raw body. Precondition
//! failures (`AuthMissing`, `InvalidLocalFile`, `InvalidArgument`) are raised
//! before any network I/O happens.

use thiserror::Error;

/// Errors returned by `CanvasClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No access token is configured, so no `Authorization` header can be sent.
    #[error("no access token configured")]
    AuthMissing,

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus { status: u16, url: String, body: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Network(String),

    #[error("invalid local file {path}: {reason}")]
    InvalidLocalFile { path: String, reason: String },

    /// Arguments rejected before contacting the server.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The response parsed as JSON but did not have the expected shape.
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status code, if the error came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_http_errors_only() {
        let err = ApiError::HttpStatus {
            status: 404,
            url: "http://localhost/api/v1/courses/1".to_string(),
            body: String::new(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(ApiError::AuthMissing.status(), None);
    }

    #[test]
    fn http_status_display_includes_url() {
        let err = ApiError::HttpStatus {
            status: 401,
            url: "http://localhost/api/v1/courses".to_string(),
            body: "unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 401 from http://localhost/api/v1/courses: unauthorized"
        );
    }
}
