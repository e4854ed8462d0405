//! Config sections. Every field has a default, so any subset may be written.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Bare extensions (no dot), compared case-insensitively
    pub extensions: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            extensions: ["jpg", "jpeg", "png"].map(String::from).to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Model captions at or under this many characters are dropped.
    pub min_model_caption_chars: usize,

    /// Template-selection seed; absent means seeded from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            min_model_caption_chars: crate::caption::DEFAULT_MIN_MODEL_CAPTION_CHARS,
            seed: None,
        }
    }
}

/// Which vision backend supplies base captions, and how to reach it.
///
/// Backend tables are optional; an absent table means that backend's
/// built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// "ollama", "openai" or "anthropic"
    pub provider: String,

    /// Images are shrunk so neither side exceeds this before upload
    pub image_size: u32,

    /// Backup model name on the same provider, tried when the primary
    /// cannot be built or is not reachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama: Option<OllamaConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<HostedConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<HostedConfig>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            image_size: crate::caption::DEFAULT_MODEL_IMAGE_SIZE,
            fallback_model: None,
            ollama: None,
            openai: None,
            anthropic: None,
        }
    }
}

/// Guards applied before an image is handed to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_file_size_mb: u64,
    /// Largest accepted width or height, in pixels
    pub max_image_dimension: u32,
    /// Upper bound on one caption request
    pub model_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10_000,
            model_timeout_ms: 120_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// A local Ollama server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llava".to_string(),
        }
    }
}

/// Credentials and model for a hosted API (`[model.openai]`,
/// `[model.anthropic]`). Both keys are required in a written table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedConfig {
    /// A literal key or a `${VAR}` reference, expanded when the backend is built
    pub api_key: String,
    pub model: String,
}

impl HostedConfig {
    pub fn openai() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }

    pub fn anthropic() -> Self {
        Self {
            api_key: "${ANTHROPIC_API_KEY}".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
        }
    }
}
