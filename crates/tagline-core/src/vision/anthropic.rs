//! Anthropic Messages backend. The image goes in a base64 source block.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::http::{finish, JsonClient};
use super::provider::{CaptionRequest, CaptionResponse, VisionModel};
use crate::error::InferenceResult;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicModel {
    api_key: String,
    model: String,
    http: JsonClient,
}

impl AnthropicModel {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: JsonClient::new("anthropic", timeout),
        }
    }
}

#[derive(Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [UserTurn<'a>; 1],
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: [Block<'a>; 2],
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Block<'a> {
    Image { source: Base64Source<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct Base64Source<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

impl<'a> MessagesBody<'a> {
    fn new(model: &'a str, request: &'a CaptionRequest) -> Self {
        Self {
            model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: [UserTurn {
                role: "user",
                content: [
                    Block::Image {
                        source: Base64Source {
                            kind: "base64",
                            media_type: request.image.media_type,
                            data: &request.image.data,
                        },
                    },
                    Block::Text {
                        text: &request.prompt,
                    },
                ],
            }],
        }
    }
}

#[derive(Deserialize)]
struct MessagesReply {
    model: String,
    content: Vec<ReplyBlock>,
}

/// Non-text blocks carry no `text` field and are skipped.
#[derive(Deserialize)]
struct ReplyBlock {
    text: Option<String>,
}

impl MessagesReply {
    fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect()
    }
}

#[async_trait]
impl VisionModel for AnthropicModel {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn caption(&self, request: &CaptionRequest) -> InferenceResult<CaptionResponse> {
        let started = Instant::now();
        let body = MessagesBody::new(&self.model, request);
        let reply: MessagesReply = self
            .http
            .send(
                self.http
                    .post(MESSAGES_URL)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", API_VERSION)
                    .json(&body),
            )
            .await?;

        Ok(finish(&reply.joined_text(), reply.model, started))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::ImageInput;

    #[test]
    fn messages_body_shape() {
        let request = CaptionRequest::short_caption(ImageInput::jpeg(&[9, 9]));
        let json = serde_json::to_value(MessagesBody::new("claude-3-5-haiku-latest", &request))
            .unwrap();

        let content = &json["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image");
        assert_eq!(content[0]["source"]["type"], "base64");
        assert_eq!(content[0]["source"]["media_type"], "image/jpeg");
        assert_eq!(content[1]["type"], "text");
        assert_eq!(json["max_tokens"], 60);
    }

    #[test]
    fn reply_text_blocks_are_joined() {
        let reply: MessagesReply = serde_json::from_str(
            r#"{"model":"claude-3-5-haiku-20241022","content":[
                {"type":"text","text":"a stilt fisherman "},
                {"type":"text","text":"at sunset"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(reply.joined_text(), "a stilt fisherman at sunset");
    }
}
