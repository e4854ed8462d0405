//! The [`VisionModel`] seam and the factory that picks a backend.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::time::Duration;

use super::anthropic::AnthropicModel;
use super::ollama::OllamaModel;
use super::openai::OpenAiModel;
use crate::config::{HostedConfig, ModelConfig};
use crate::error::{InferenceError, InferenceResult};

/// Asks for the kind of short, literal caption an unconditional
/// image-captioning model produces.
pub const CAPTION_PROMPT: &str = "Write one short, literal caption for this image. \
     Describe only what is visible, in lowercase, under 20 words, without a trailing period.";

/// An image encoded for transport: base64 of a JPEG.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub data: String,
    pub media_type: &'static str,
}

impl ImageInput {
    pub fn jpeg(bytes: &[u8]) -> Self {
        Self {
            data: BASE64.encode(bytes),
            media_type: "image/jpeg",
        }
    }

    /// `data:` URL form, for APIs that take image URLs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// One caption call: image, instruction and sampling settings.
#[derive(Debug, Clone)]
pub struct CaptionRequest {
    pub image: ImageInput,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CaptionRequest {
    /// The request used for every dataset image.
    pub fn short_caption(image: ImageInput) -> Self {
        Self {
            image,
            prompt: CAPTION_PROMPT.to_string(),
            max_tokens: 60,
            temperature: 0.7,
        }
    }
}

/// What a backend returned for one image.
#[derive(Debug, Clone)]
pub struct CaptionResponse {
    /// Caption text on one line, whitespace-trimmed
    pub text: String,
    /// Model identifier as reported by the backend
    pub model: String,
    pub latency_ms: u64,
}

/// A model that turns an image into a short caption.
///
/// `async_trait` keeps the trait object-safe for `Box<dyn VisionModel>`.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Backend name for logs ("ollama", "openai", "anthropic").
    fn name(&self) -> &str;

    /// Cheap readiness check, run once before a dataset is processed.
    async fn is_available(&self) -> bool;

    async fn caption(&self, request: &CaptionRequest) -> InferenceResult<CaptionResponse>;
}

/// Resolve a config value that is either a literal or exactly `${VAR}`.
///
/// Anything else is taken verbatim, so keys containing `$` survive.
/// Returns `None` for an empty result or an unset variable.
pub fn resolve_env_var(value: &str) -> Option<String> {
    match value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
        Some(var) => std::env::var(var).ok(),
        None => Some(value.to_string()),
    }
    .filter(|v| !v.is_empty())
}

fn require_key(raw: &str, provider: &str, env_hint: &str) -> InferenceResult<String> {
    resolve_env_var(raw).ok_or_else(|| {
        InferenceError::Unavailable(format!(
            "{provider} API key not set. Set {env_hint} or model.{}.api_key.",
            provider.to_lowercase()
        ))
    })
}

fn model_name(model_override: Option<&str>, configured: &str) -> String {
    model_override.unwrap_or(configured).to_string()
}

/// Builds the configured [`VisionModel`].
pub struct VisionModelFactory;

impl VisionModelFactory {
    /// Build the backend named by `provider`.
    ///
    /// `model_override` replaces the model name from the provider's config
    /// table; `timeout` bounds every caption request.
    pub fn create(
        provider: &str,
        config: &ModelConfig,
        model_override: Option<&str>,
        timeout: Duration,
    ) -> InferenceResult<Box<dyn VisionModel>> {
        let model: Box<dyn VisionModel> = match provider {
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                let name = model_name(model_override, &cfg.model);
                Box::new(OllamaModel::new(&cfg.endpoint, &name, timeout))
            }
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_else(HostedConfig::openai);
                let key = require_key(&cfg.api_key, "OpenAI", "OPENAI_API_KEY")?;
                let name = model_name(model_override, &cfg.model);
                Box::new(OpenAiModel::new(&key, &name, timeout))
            }
            "anthropic" => {
                let cfg = config.anthropic.clone().unwrap_or_else(HostedConfig::anthropic);
                let key = require_key(&cfg.api_key, "Anthropic", "ANTHROPIC_API_KEY")?;
                let name = model_name(model_override, &cfg.model);
                Box::new(AnthropicModel::new(&key, &name, timeout))
            }
            other => {
                return Err(InferenceError::Unavailable(format!(
                    "Unknown model provider: {other} (expected ollama, openai or anthropic)"
                )))
            }
        };

        tracing::debug!("Built {} backend", model.name());
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OllamaConfig;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn jpeg_input_encodes_base64() {
        let input = ImageInput::jpeg(&[0xFF, 0xD8, 0xFF]);
        assert_eq!(input.data, "/9j/");
        assert_eq!(input.data_url(), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn short_caption_settings() {
        let request = CaptionRequest::short_caption(ImageInput::jpeg(&[1]));
        assert_eq!(request.prompt, CAPTION_PROMPT);
        assert_eq!(request.max_tokens, 60);
    }

    #[test]
    fn literal_and_missing_keys() {
        assert_eq!(resolve_env_var("sk-literal"), Some("sk-literal".to_string()));
        assert_eq!(resolve_env_var(""), None);
        assert_eq!(resolve_env_var("${TAGLINE_TEST_UNSET_VAR_XYZ}"), None);
    }

    #[test]
    fn dollar_signs_inside_literal_keys_kept() {
        assert_eq!(resolve_env_var("sk-a$b$c"), Some("sk-a$b$c".to_string()));
        assert_eq!(resolve_env_var("sk-${x}y"), Some("sk-${x}y".to_string()));
        assert_eq!(resolve_env_var("$HOME"), Some("$HOME".to_string()));
    }

    #[test]
    fn whole_reference_reads_environment() {
        std::env::set_var("TAGLINE_TEST_RESOLVE_KEY_7", "sk-from-env");
        assert_eq!(
            resolve_env_var("${TAGLINE_TEST_RESOLVE_KEY_7}"),
            Some("sk-from-env".to_string())
        );
    }

    #[test]
    fn ollama_needs_no_key_and_honours_override() {
        let config = ModelConfig {
            ollama: Some(OllamaConfig {
                model: "moondream".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let model = VisionModelFactory::create("ollama", &config, None, TIMEOUT).unwrap();
        assert_eq!(model.name(), "ollama");

        let model =
            VisionModelFactory::create("ollama", &config, Some("llava:13b"), TIMEOUT).unwrap();
        assert_eq!(model.name(), "ollama");
    }

    #[test]
    fn hosted_backend_with_literal_key() {
        let config = ModelConfig {
            openai: Some(HostedConfig {
                api_key: "sk-test".to_string(),
                ..HostedConfig::openai()
            }),
            ..Default::default()
        };
        let model = VisionModelFactory::create("openai", &config, Some("gpt-4o"), TIMEOUT).unwrap();
        assert_eq!(model.name(), "openai");
    }

    #[test]
    fn hosted_backend_without_key_is_unavailable() {
        let config = ModelConfig {
            anthropic: Some(HostedConfig {
                api_key: "${TAGLINE_TEST_UNSET_KEY_42}".to_string(),
                ..HostedConfig::anthropic()
            }),
            ..Default::default()
        };
        let err = VisionModelFactory::create("anthropic", &config, None, TIMEOUT)
            .err()
            .unwrap();
        assert!(matches!(err, InferenceError::Unavailable(_)));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn unknown_provider_is_unavailable() {
        let err = VisionModelFactory::create("blip", &ModelConfig::default(), None, TIMEOUT)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown model provider: blip"));
    }
}
