//! Scripted transport shared by the request-shape tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use canvas_core::{ApiError, CanvasClient, ClientConfig, HttpRequest, HttpResponse, Transport};
use serde_json::Value;

pub const BASE_URL: &str = "http://canvas.test";

/// Records every request and answers from a queue of canned responses.
#[derive(Default)]
pub struct Recorder {
    responses: RefCell<VecDeque<HttpResponse>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

impl Recorder {
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn last(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().expect("no request recorded")
    }
}

impl Transport for Recorder {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::Network(format!("no response scripted for {}", request.url)))
    }
}

pub fn response(status: u16, body: &Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
        url: String::new(),
    }
}

pub fn ok(body: Value) -> HttpResponse {
    response(200, &body)
}

pub fn client(responses: Vec<HttpResponse>) -> CanvasClient<Recorder> {
    CanvasClient::with_transport(
        ClientConfig::new(BASE_URL).with_token("test-token"),
        Recorder::new(responses),
    )
}

/// Form fields of a request body, in order.
pub fn form(request: &HttpRequest) -> Vec<(String, String)> {
    request
        .body
        .as_ref()
        .and_then(|b| b.form_pairs())
        .map(<[_]>::to_vec)
        .unwrap_or_default()
}

/// All values sent under `key`.
pub fn values<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

/// Decoded query pairs of a request URL.
pub fn query(request: &HttpRequest) -> Vec<(String, String)> {
    url::Url::parse(&request.url)
        .expect("request URL parses")
        .query_pairs()
        .into_owned()
        .collect()
}

/// Request URL without its query string.
pub fn path(request: &HttpRequest) -> String {
    request.url.split('?').next().unwrap_or_default().to_string()
}
