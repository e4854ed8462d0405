//! Configuration management for Tagline.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section is optional; missing keys fall back to `Default`.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Tagline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset layout
    pub dataset: DatasetConfig,

    /// Caption composition
    pub caption: CaptionConfig,

    /// Vision model provider
    pub model: ModelConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.tagline.tagline/config.toml
    /// - Linux: ~/.config/tagline/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\tagline\config\config.toml
    ///
    /// Falls back to ~/.tagline/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tagline", "tagline")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".tagline").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.caption.min_model_caption_chars, 10);
        assert_eq!(config.model.provider, "ollama");
        assert_eq!(config.dataset.extensions, vec!["jpg", "jpeg", "png"]);
        assert!(config.caption.seed.is_none());
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[dataset]"));
        assert!(toml.contains("[caption]"));
        assert!(toml.contains("[model]"));
    }

    #[test]
    fn test_load_from_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[caption]").unwrap();
        writeln!(file, "seed = 7").unwrap();
        writeln!(file, "[model.ollama]").unwrap();
        writeln!(file, "endpoint = \"http://gpu-box:11434\"").unwrap();
        writeln!(file, "model = \"llava:13b\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.caption.seed, Some(7));
        assert_eq!(config.caption.min_model_caption_chars, 10);
        let ollama = config.model.ollama.unwrap();
        assert_eq!(ollama.model, "llava:13b");
    }

    #[test]
    fn test_load_from_reads_fallback_model() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[model]").unwrap();
        writeln!(file, "fallback_model = \"moondream\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.model.fallback_model.as_deref(), Some("moondream"));
        assert!(Config::default().model.fallback_model.is_none());
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]").unwrap();
        writeln!(file, "max_file_size_mb = 0").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[caption").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_expand_path_without_tilde_is_unchanged() {
        let path = Path::new("/data/images");
        assert_eq!(expand_path(path), PathBuf::from("/data/images"));
    }
}
