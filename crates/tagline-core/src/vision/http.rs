//! JSON-over-HTTP plumbing shared by the hosted and local backends.

use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

use super::provider::CaptionResponse;
use crate::caption::composer::single_line;
use crate::error::{InferenceError, InferenceResult};

/// Longest a reachability check may take.
pub(crate) const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(5);

/// A reqwest client bound to one backend's label and request timeout.
pub(crate) struct JsonClient {
    client: reqwest::Client,
    backend: &'static str,
    timeout: Duration,
}

impl JsonClient {
    pub(crate) fn new(backend: &'static str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            backend,
            timeout,
        }
    }

    pub(crate) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }

    pub(crate) fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }

    /// Send with the request timeout and decode a successful JSON body.
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies all
    /// become [`InferenceError::Request`], tagged with the backend label.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> InferenceResult<T> {
        let resp = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.error(format!("request failed: {e}"), None))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(self.error(format!("HTTP {status}: {body}"), Some(status.as_u16())));
        }

        resp.json()
            .await
            .map_err(|e| self.error(format!("unreadable response: {e}"), None))
    }

    /// True when a GET to `url` answers 2xx within [`REACHABILITY_TIMEOUT`].
    pub(crate) async fn reachable(&self, url: &str) -> bool {
        matches!(
            self.get(url).timeout(REACHABILITY_TIMEOUT).send().await,
            Ok(resp) if resp.status().is_success()
        )
    }

    pub(crate) fn error(&self, message: String, status_code: Option<u16>) -> InferenceError {
        InferenceError::Request {
            message: format!("{}: {message}", self.backend),
            status_code,
        }
    }
}

/// Wrap raw model text into a response, folded onto one trimmed line.
pub(crate) fn finish(text: &str, model: String, started: Instant) -> CaptionResponse {
    CaptionResponse {
        text: single_line(text),
        model,
        latency_ms: started.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_tagged_with_backend() {
        let client = JsonClient::new("ollama", Duration::from_secs(1));
        let err = client.error("HTTP 404: model not found".to_string(), Some(404));
        assert_eq!(err.to_string(), "ollama: HTTP 404: model not found");
        assert!(matches!(
            err,
            InferenceError::Request {
                status_code: Some(404),
                ..
            }
        ));
    }

    #[test]
    fn finish_collapses_inner_whitespace() {
        let response = finish("a red bus\n on  a bridge\n", "llava".to_string(), Instant::now());
        assert_eq!(response.text, "a red bus on a bridge");
    }

    #[test]
    fn finish_trims_model_text() {
        let response = finish("  a red bus on a bridge\n", "llava".to_string(), Instant::now());
        assert_eq!(response.text, "a red bus on a bridge");
        assert_eq!(response.model, "llava");
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let client = JsonClient::new("ollama", Duration::from_secs(1));
        assert!(!client.reachable("http://127.0.0.1:9/api/tags").await);
    }
}
