//! Per-call request builder.
//!
//! A `RequestBuilder` accumulates query parameters and form data for one
//! call. `add_*` follows the duplicate-key policy of `Params` (a repeated key
//! turns into a list), `set_*` overwrites, and `add_optional_*` ignores
//! absent or empty values.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::client::{parse_as, parse_json, with_query, CanvasClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, RequestBody};
use crate::params::{FormEncode, ParamValue, Params};
use crate::transport::Transport;

pub struct RequestBuilder<'a, T> {
    client: &'a CanvasClient<T>,
    method: HttpMethod,
    path: String,
    params: Params,
    data: Params,
}

impl<'a, T: Transport> RequestBuilder<'a, T> {
    pub(crate) fn new(client: &'a CanvasClient<T>, method: HttpMethod, path: String) -> Self {
        Self {
            client,
            method,
            path,
            params: Params::new(),
            data: Params::new(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn data(&self) -> &Params {
        &self.data
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn data_mut(&mut self) -> &mut Params {
        &mut self.data
    }

    pub fn add_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.add(key, value, false);
        self
    }

    pub fn set_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.add(key, value, true);
        self
    }

    pub fn add_optional_param<V: Into<ParamValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.params.add_optional(key, value, false);
        self
    }

    pub fn add_params(mut self, params: Params) -> Self {
        self.params.merge(params);
        self
    }

    pub fn add_data(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.data.add(key, value, false);
        self
    }

    pub fn set_data(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.data.add(key, value, true);
        self
    }

    pub fn add_optional_data<V: Into<ParamValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.data.add_optional(key, value, false);
        self
    }

    pub fn add_data_map(mut self, data: Params) -> Self {
        self.data.merge(data);
        self
    }

    /// Ordered append to the form data, never merging with earlier keys.
    pub fn push_data(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.data.push(key, value);
        self
    }

    /// Encode a structured options value into the form data.
    pub fn form(mut self, options: &impl FormEncode) -> Self {
        self.data.encode(options);
        self
    }

    /// Assemble the request without sending it.
    ///
    /// GET and DELETE carry no body, so any form data is appended to the
    /// query string after the parameters.
    pub fn build(&self) -> Result<HttpRequest, ApiError> {
        let auth = self.client.auth_header()?;
        let mut query = self.params.to_pairs();
        let body = match self.method {
            HttpMethod::Get | HttpMethod::Delete => {
                query.extend(self.data.to_pairs());
                None
            }
            HttpMethod::Post | HttpMethod::Put if self.data.is_empty() => None,
            HttpMethod::Post | HttpMethod::Put => Some(RequestBody::Form(self.data.to_pairs())),
        };
        Ok(HttpRequest {
            method: self.method,
            url: with_query(&self.client.url_for(&self.path), &query)?,
            headers: vec![auth],
            body,
        })
    }

    pub fn submit(self) -> Result<Value, ApiError> {
        let request = self.build()?;
        parse_json(self.client.execute(&request)?)
    }

    pub fn submit_as<R: DeserializeOwned>(self) -> Result<R, ApiError> {
        let request = self.build()?;
        parse_as(self.client.execute(&request)?)
    }

    /// Send as a paginated GET and concatenate every page.
    ///
    /// Form data joins the query parameters; a key set in both keeps every
    /// value.
    pub fn submit_paginated(self) -> Result<Vec<Value>, ApiError> {
        if self.method != HttpMethod::Get {
            return Err(ApiError::InvalidArgument(format!(
                "pagination requires GET, not {}",
                self.method.as_str()
            )));
        }
        let mut params = self.params;
        for (key, value) in self.data.iter() {
            params.add(key, value.clone(), false);
        }
        let url = self.client.url_for(&self.path);
        debug!(%url, "collecting all pages");
        self.client.get_all_pages(&url, &params)
    }
}
