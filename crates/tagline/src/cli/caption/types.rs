//! CLI enum types for the caption command.

use clap::ValueEnum;

/// Supported vision model providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModelProvider {
    /// Local Ollama instance
    Ollama,
    /// OpenAI API
    Openai,
    /// Anthropic API
    Anthropic,
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelProvider::Ollama => write!(f, "ollama"),
            ModelProvider::Openai => write!(f, "openai"),
            ModelProvider::Anthropic => write!(f, "anthropic"),
        }
    }
}
