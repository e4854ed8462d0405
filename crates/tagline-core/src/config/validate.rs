//! Load-time checks on values serde alone cannot reject.

use crate::error::ConfigError;

use super::Config;

const LOG_FORMATS: [&str; 2] = ["pretty", "json"];
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

impl Config {
    /// Reject settings that would make every image fail or the run misbehave.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let extensions = &self.dataset.extensions;
        if extensions.is_empty() {
            return Err(invalid("dataset.extensions must list at least one extension"));
        }
        if let Some(bad) = extensions
            .iter()
            .find(|ext| ext.trim().is_empty() || ext.starts_with('.'))
        {
            return Err(invalid(format!(
                "dataset.extensions: {bad:?} is not a bare extension like \"jpg\""
            )));
        }

        let positive = [
            ("model.image_size", u64::from(self.model.image_size)),
            ("limits.max_file_size_mb", self.limits.max_file_size_mb),
            (
                "limits.max_image_dimension",
                u64::from(self.limits.max_image_dimension),
            ),
            ("limits.model_timeout_ms", self.limits.model_timeout_ms),
        ];
        if let Some((key, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(invalid(format!("{key} must be greater than zero")));
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(invalid(format!(
                "logging.format must be one of {LOG_FORMATS:?}, got {:?}",
                self.logging.format
            )));
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(invalid(format!(
                "logging.level must be one of {LOG_LEVELS:?}, got {:?}",
                self.logging.level
            )));
        }

        Ok(())
    }
}
