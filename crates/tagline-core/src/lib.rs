//! Tagline Core - dataset captioning library.
//!
//! Tagline writes a descriptive caption next to every image of a dataset
//! organized in per-subject folders. Each caption combines a category
//! template chosen from the folder name with, when a vision model is
//! reachable, the model's own short caption of the image.
//!
//! # Architecture
//!
//! ```text
//! root/ → subject folders → images → [vision model] → Composer → name.txt
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use tagline_core::{Composer, Config, DatasetCaptioner};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> tagline_core::Result<()> {
//!     let config = Config::load()?;
//!     let composer = Composer::from_config(None, &config);
//!     let mut captioner = DatasetCaptioner::new(&config, composer);
//!
//!     let stats = captioner.run_root("./images".as_ref()).await?;
//!     println!("Captioned {} images", stats.images);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod caption;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod vision;

// Re-exports for convenient access
pub use caption::{categorize, Composer};
pub use config::Config;
pub use error::{ConfigError, DiscoveryError, InferenceError, Result, TaglineError};
pub use pipeline::{DatasetCaptioner, DatasetPlan};
pub use types::{Caption, CaptionPolicy, Category, RunStats};
pub use vision::{VisionModel, VisionModelFactory};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_reexported_categorize() {
        assert_eq!(categorize("kottu").0, Category::Food);
    }
}
