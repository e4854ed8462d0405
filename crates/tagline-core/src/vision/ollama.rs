//! Local vision models served by Ollama (`llava`, `moondream`, ...).
//!
//! Uses the non-streaming `/api/generate` endpoint with the image attached
//! as raw base64. No authentication.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::http::{finish, JsonClient};
use super::provider::{CaptionRequest, CaptionResponse, VisionModel};
use crate::error::InferenceResult;

pub struct OllamaModel {
    endpoint: String,
    model: String,
    http: JsonClient,
}

impl OllamaModel {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            http: JsonClient::new("ollama", timeout),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    images: [&'a str; 1],
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

impl<'a> GenerateBody<'a> {
    fn new(model: &'a str, request: &'a CaptionRequest) -> Self {
        Self {
            model,
            prompt: &request.prompt,
            images: [request.image.data.as_str()],
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }
}

#[derive(Deserialize)]
struct GenerateReply {
    response: String,
}

#[async_trait]
impl VisionModel for OllamaModel {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        self.http.reachable(&self.url("/api/tags")).await
    }

    async fn caption(&self, request: &CaptionRequest) -> InferenceResult<CaptionResponse> {
        let started = Instant::now();
        let body = GenerateBody::new(&self.model, request);
        let reply: GenerateReply = self
            .http
            .send(self.http.post(&self.url("/api/generate")).json(&body))
            .await?;

        Ok(finish(&reply.response, self.model.clone(), started))
    }
}
