//! Caption composition.
//!
//! - **category**: folder label → category + subject
//! - **templates**: per-category description templates
//! - **composer**: template selection, model enrichment, fallback policy

pub mod category;
pub mod composer;
pub mod templates;

pub use category::{categorize, subject_of, DEFAULT_CATEGORY};
pub use composer::{Composer, DEFAULT_MIN_MODEL_CAPTION_CHARS, DEFAULT_MODEL_IMAGE_SIZE};
pub use templates::{render, templates};
