//! OpenAI Chat Completions backend. The image travels as a data URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::http::{finish, JsonClient};
use super::provider::{CaptionRequest, CaptionResponse, VisionModel};
use crate::error::InferenceResult;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiModel {
    api_key: String,
    model: String,
    http: JsonClient,
}

impl OpenAiModel {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: JsonClient::new("openai", timeout),
        }
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [UserTurn<'a>; 1],
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: [Part<'a>; 2],
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Part<'a> {
    ImageUrl { image_url: DataUrl },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct DataUrl {
    url: String,
}

impl<'a> CompletionBody<'a> {
    fn new(model: &'a str, request: &'a CaptionRequest) -> Self {
        Self {
            model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: [UserTurn {
                role: "user",
                content: [
                    Part::ImageUrl {
                        image_url: DataUrl {
                            url: request.image.data_url(),
                        },
                    },
                    Part::Text {
                        text: &request.prompt,
                    },
                ],
            }],
        }
    }
}

#[derive(Deserialize)]
struct Completion {
    model: String,
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl Completion {
    fn first_text(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

#[async_trait]
impl VisionModel for OpenAiModel {
    fn name(&self) -> &str {
        "openai"
    }

    /// Hosted; a key is the only precondition checked up front.
    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn caption(&self, request: &CaptionRequest) -> InferenceResult<CaptionResponse> {
        let started = Instant::now();
        let body = CompletionBody::new(&self.model, request);
        let completion: Completion = self
            .http
            .send(
                self.http
                    .post(COMPLETIONS_URL)
                    .bearer_auth(&self.api_key)
                    .json(&body),
            )
            .await?;

        let text = completion
            .first_text()
            .ok_or_else(|| self.http.error("no choices in response".to_string(), None))?;
        Ok(finish(text, completion.model.clone(), started))
    }
}
