//! Synchronous client for the Canvas LMS REST API.
//!
//! # Overview
//! `CanvasClient` turns each Canvas call into a plain `HttpRequest`, hands it
//! to a `Transport`, and parses the `HttpResponse` into JSON. The default
//! transport is a blocking `ureq` agent; tests swap in scripted transports.
//!
//! # Design
//! - Configuration is explicit: a `ClientConfig` value carries the base URL,
//!   the access token and the timeout. Nothing is global.
//! - Every call returns `Result<_, ApiError>`; non-2xx statuses become
//!   `ApiError::HttpStatus` with the response body attached.
//! - Paginated endpoints follow `Link: <...>; rel="next"` until exhausted and
//!   return the concatenated items.
//! - Endpoint wrappers live in `api`, one file per Canvas area, each adding
//!   methods to `CanvasClient`.

mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod markdown;
pub mod pagination;
pub mod params;
pub mod progress;
pub mod request;
pub mod schedule;
pub mod transport;
pub mod types;
pub mod upload;

pub use client::CanvasClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use markdown::convert_markdown;
pub use pagination::Pages;
pub use params::{FormEncode, ParamValue, Params};
pub use progress::Progress;
pub use request::RequestBuilder;
pub use transport::{Transport, UreqTransport};
pub use upload::{LocalFile, UploadOutcome};
