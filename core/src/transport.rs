//! Executing `HttpRequest` values.
//!
//! `Transport` is the only seam that performs I/O. `UreqTransport` is the
//! blocking implementation used by default; tests substitute scripted
//! transports that record requests and replay canned responses.

use std::time::Duration;

use tracing::debug;
use ureq::unversioned::multipart::{Form, Part};

use crate::error::ApiError;
use crate::http::{encode_form, HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, FORM_CONTENT_TYPE};

/// Executes one HTTP round-trip.
///
/// Non-2xx responses are returned as data, not as `Err`; status
/// interpretation belongs to the caller.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Delete => {
                let mut builder = self.agent.delete(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = if request.method == HttpMethod::Post {
                    self.agent.post(&request.url)
                } else {
                    self.agent.put(&request.url)
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(RequestBody::Form(pairs)) => {
                        let encoded = encode_form(pairs);
                        builder.content_type(FORM_CONTENT_TYPE).send(encoded.as_bytes())
                    }
                    Some(RequestBody::Multipart(form)) => builder.send(multipart_body(form)?),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| ApiError::Network(e.to_string()))?;

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
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!(status, url = %request.url, "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
            url: request.url.clone(),
        })
    }
}

/// Wire form for a multipart body; ureq picks the boundary and sets the
/// `Content-Type` header.
fn multipart_body(form: &MultipartForm) -> Result<Form<'_>, ApiError> {
    let file = Part::bytes(form.file.bytes.as_slice())
        .file_name(form.file.file_name.as_str())
        .mime_str(form.file.content_type.as_str())
        .map_err(|e| {
            ApiError::InvalidArgument(format!("content type {:?}: {e}", form.file.content_type))
        })?;
    let mut multipart = Form::new();
    for (name, value) in &form.fields {
        multipart = multipart.text(name.as_str(), value.as_str());
    }
    Ok(multipart.part(form.file.field.as_str(), file))
}
