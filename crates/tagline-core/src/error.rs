//! Error types for the Tagline captioning pipeline.
//!
//! Only a handful of conditions are ever surfaced to the caller: a bad config
//! file or an unreadable dataset root. Everything that goes wrong per image is
//! an [`InferenceError`], which the composer downgrades to a fallback caption.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Tagline operations.
#[derive(Error, Debug)]
pub enum TaglineError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dataset discovery errors
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Vision model errors that escape the composer (provider construction)
    #[error("Model error: {0}")]
    Inference(#[from] InferenceError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors while listing the dataset tree.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The dataset root does not exist or is not a directory
    #[error("Dataset root not found: {0}")]
    RootNotFound(PathBuf),

    /// A directory could not be listed (permission denied, vanished, ...)
    #[error("Cannot read directory {path}: {message}")]
    Unreadable { path: PathBuf, message: String },
}

/// Failures of the vision model collaborator, including preparing its input.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Provider could not be constructed or is not reachable
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    /// Image could not be read or decoded for the model
    #[error("Cannot prepare {path} for the model: {message}")]
    Prepare { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// The provider request failed or returned an unusable response
    #[error("{message}")]
    Request {
        message: String,
        status_code: Option<u16>,
    },
}

/// Convenience type alias for Tagline results.
pub type Result<T> = std::result::Result<T, TaglineError>;

/// Convenience type alias for model-invocation results.
pub type InferenceResult<T> = std::result::Result<T, InferenceError>;
