//! Polling of asynchronous job progress (`/api/v1/progress/:id`, content
//! migrations, ...).

use std::thread;
use std::time::Duration;

use serde_json::Value;

use crate::client::{parse_json, CanvasClient};
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::params::Params;
use crate::transport::Transport;

/// Yields each progress document until `workflow_state` leaves
/// `queued`/`running`. The final document is yielded too.
pub struct Progress<'a, T> {
    client: &'a CanvasClient<T>,
    request: HttpRequest,
    interval: Option<Duration>,
    polled: bool,
    done: bool,
}

impl<T> Progress<'_, T> {
    /// Sleep this long between polls.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }
}

pub fn is_pending(state: &Value) -> bool {
    matches!(state["workflow_state"].as_str(), Some("queued" | "running"))
}

impl<T: Transport> Iterator for Progress<'_, T> {
    type Item = Result<Value, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let (true, Some(interval)) = (self.polled, self.interval) {
            thread::sleep(interval);
        }
        self.polled = true;

        let result = self.client.execute(&self.request).and_then(parse_json);
        match &result {
            Ok(state) if is_pending(state) => {}
            _ => self.done = true,
        }
        Some(result)
    }
}

impl<T: Transport> CanvasClient<T> {
    pub fn progress(&self, url: &str) -> Result<Progress<'_, T>, ApiError> {
        let request = self.build_get(&self.url_for(url), &Params::new())?;
        Ok(Progress {
            client: self,
            request,
            interval: None,
            polled: false,
            done: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpResponse;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct Script(RefCell<VecDeque<Value>>);

    impl Transport for Script {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            let body = self
                .0
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| ApiError::Network("exhausted".to_string()))?;
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: body.to_string(),
                url: request.url.clone(),
            })
        }
    }

    #[test]
    fn stops_after_terminal_state() {
        let script = Script(RefCell::new(
            vec![
                json!({"workflow_state": "queued"}),
                json!({"workflow_state": "running", "completion": 50}),
                json!({"workflow_state": "completed"}),
                json!({"workflow_state": "never fetched"}),
            ]
            .into(),
        ));
        let client = CanvasClient::with_transport(ClientConfig::new("http://lms.test").with_token("t"), script);
        let states: Vec<String> = client
            .progress("api/v1/progress/1")
            .unwrap()
            .map(|r| r.unwrap()["workflow_state"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(states, vec!["queued", "running", "completed"]);
        assert_eq!(client.transport().0.borrow().len(), 1);
    }

    #[test]
    fn error_ends_polling() {
        let client = CanvasClient::with_transport(
            ClientConfig::new("http://lms.test").with_token("t"),
            Script(RefCell::new(VecDeque::new())),
        );
        let results: Vec<_> = client.progress("api/v1/progress/1").unwrap().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
