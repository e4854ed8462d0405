//! Vision model integration for base captions.
//!
//! Provides a backend abstraction over local (Ollama) and hosted (OpenAI,
//! Anthropic) vision models. The composer holds at most one backend and
//! treats every error it returns as "no model caption".

pub(crate) mod anthropic;
mod http;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;

pub use provider::{
    CaptionRequest, CaptionResponse, ImageInput, VisionModel, VisionModelFactory, CAPTION_PROMPT,
};
