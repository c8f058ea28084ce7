//! Page aggregation over `Link: <...>; rel="next"` continuation links.
//!
//! `Pages` fetches lazily: one request per `next()`. The first request
//! carries the caller's parameters; follow-up requests use the continuation
//! URL verbatim since the server already encodes the parameters into it.
//! There is no retry and no page bound; a failed page ends the iteration.

use serde_json::Value;
use tracing::debug;

use crate::client::{parse_json, CanvasClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::Params;
use crate::transport::Transport;

/// Lazy sequence of result pages.
pub struct Pages<'a, T> {
    client: &'a CanvasClient<T>,
    next: Option<HttpRequest>,
    fetched: usize,
}

impl<T: Transport> Iterator for Pages<'_, T> {
    type Item = Result<Vec<Value>, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        let request = self.next.take()?;
        Some(self.fetch(request))
    }
}

impl<T: Transport> Pages<'_, T> {
    /// Number of pages fetched so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    fn fetch(&mut self, request: HttpRequest) -> Result<Vec<Value>, ApiError> {
        let response = self.client.execute(&request)?;
        self.fetched += 1;
        let next_url = response.next_link();
        let items = match parse_json(response)? {
            Value::Array(items) => items,
            other => {
                return Err(ApiError::UnexpectedPayload(format!(
                    "page {} of {} is not a JSON array: {}",
                    self.fetched,
                    request.url,
                    kind_of(&other)
                )))
            }
        };

        if let Some(url) = next_url {
            debug!(%url, page = self.fetched + 1, "following next link");
            self.next = Some(HttpRequest {
                method: HttpMethod::Get,
                url,
                headers: request.headers,
                body: None,
            });
        }
        Ok(items)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<T: Transport> CanvasClient<T> {
    /// Start a lazy page sequence at `url` (absolute, or relative to the base
    /// URL). Fails fast with `AuthMissing` when no token is configured.
    pub fn pages(&self, url: &str, params: &Params) -> Result<Pages<'_, T>, ApiError> {
        let first = self.build_get(&self.url_for(url), params)?;
        Ok(Pages {
            client: self,
            next: Some(first),
            fetched: 0,
        })
    }

    /// Fetch every page and concatenate the items in server order.
    ///
    /// Not safe for unreliable networks: a failure on any page discards the
    /// pages already fetched and returns the error.
    pub fn get_all_pages(&self, url: &str, params: &Params) -> Result<Vec<Value>, ApiError> {
        let mut items = Vec::new();
        for page in self.pages(url, params)? {
            items.extend(page?);
        }
        Ok(items)
    }
}
