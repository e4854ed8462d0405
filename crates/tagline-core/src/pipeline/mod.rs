//! Dataset pipeline components.
//!
//! - **discovery**: Find subject folders and their images
//! - **prepare**: Validate, decode and downscale images for the model
//! - **sidecar**: Write caption files next to images
//! - **captioner**: Drive the sequential per-image loop

pub mod captioner;
pub mod discovery;
pub mod prepare;
pub mod sidecar;

// Re-exports for convenient access
pub use captioner::DatasetCaptioner;
pub use discovery::{DatasetDiscovery, DatasetPlan, SubjectFolder};
pub use prepare::ImagePreparer;
pub use sidecar::{sidecar_path, write_caption};
