//! Caption composition: template selection plus optional model enrichment.
//!
//! The composer owns an optional [`VisionModel`] and a seedable RNG. Every
//! call returns a caption; model and image failures only change which
//! policy applies.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::Path;

use super::category::categorize;
use super::templates::{render, templates, SUBJECT_PLACEHOLDER};
use crate::config::{Config, LimitsConfig};
use crate::error::InferenceResult;
use crate::pipeline::ImagePreparer;
use crate::types::{Caption, CaptionPolicy, Category};
use crate::vision::{CaptionRequest, VisionModel};

/// Model captions must be longer than this many characters to be kept.
pub const DEFAULT_MIN_MODEL_CAPTION_CHARS: usize = 10;

/// Longest edge of images sent to the model when no config is supplied.
pub const DEFAULT_MODEL_IMAGE_SIZE: u32 = 768;

/// Builds the final caption for each image.
pub struct Composer<R = StdRng> {
    model: Option<Box<dyn VisionModel>>,
    preparer: ImagePreparer,
    rng: R,
    min_model_caption_chars: usize,
}

impl Composer<StdRng> {
    /// Composer with a deterministic template sequence.
    pub fn seeded(model: Option<Box<dyn VisionModel>>, seed: u64) -> Self {
        Self::new(model, StdRng::seed_from_u64(seed))
    }

    /// Composer seeded from OS entropy.
    pub fn from_entropy(model: Option<Box<dyn VisionModel>>) -> Self {
        Self::new(model, StdRng::from_entropy())
    }

    /// Composer configured from the `caption`, `model` and `limits` sections.
    ///
    /// Uses `caption.seed` when set, OS entropy otherwise.
    pub fn from_config(model: Option<Box<dyn VisionModel>>, config: &Config) -> Self {
        let composer = match config.caption.seed {
            Some(seed) => Self::seeded(model, seed),
            None => Self::from_entropy(model),
        };
        composer
            .with_min_model_caption_chars(config.caption.min_model_caption_chars)
            .with_preparer(ImagePreparer::from_config(config))
    }
}

impl<R: Rng> Composer<R> {
    /// Create a composer from an optional model and any RNG.
    pub fn new(model: Option<Box<dyn VisionModel>>, rng: R) -> Self {
        Self {
            model,
            preparer: ImagePreparer::new(LimitsConfig::default(), DEFAULT_MODEL_IMAGE_SIZE),
            rng,
            min_model_caption_chars: DEFAULT_MIN_MODEL_CAPTION_CHARS,
        }
    }

    /// Override the enrichment threshold.
    pub fn with_min_model_caption_chars(mut self, chars: usize) -> Self {
        self.min_model_caption_chars = chars;
        self
    }

    /// Override how images are prepared for the model.
    pub fn with_preparer(mut self, preparer: ImagePreparer) -> Self {
        self.preparer = preparer;
        self
    }

    /// Whether a model backend is attached.
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Name of the attached model backend, if any.
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.name())
    }

    /// Caption one image of a subject folder.
    ///
    /// Asks the model for a base caption when one is attached. Any failure
    /// (unreadable image, request error, bad response) is logged and the
    /// caption is composed without model output.
    pub async fn caption_image(&mut self, folder_label: &str, image_path: &Path) -> Caption {
        let base = match self.model.as_deref() {
            Some(model) => match infer(model, &self.preparer, image_path).await {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!("Model caption failed for {:?}: {e}", image_path);
                    None
                }
            },
            None => None,
        };

        self.compose(folder_label, base.as_deref())
    }

    /// Combine a folder label and an optional model caption.
    ///
    /// - no (or blank) model caption: `"{subject}: {description}"`
    /// - model caption longer than the threshold: `"{subject}: {model}, {description}"`
    /// - shorter model caption: discarded, same form as the first case
    pub fn compose(&mut self, folder_label: &str, model_caption: Option<&str>) -> Caption {
        let (category, subject) = categorize(folder_label);
        let description = self.describe(category, &subject);

        let (text, policy) = match model_caption.filter(|c| !c.trim().is_empty()) {
            Some(base) if base.chars().count() > self.min_model_caption_chars => (
                format!("{subject}: {base}, {description}"),
                CaptionPolicy::Enriched,
            ),
            Some(_) => (format!("{subject}: {description}"), CaptionPolicy::Thin),
            None => (format!("{subject}: {description}"), CaptionPolicy::Fallback),
        };

        Caption {
            text,
            category,
            policy,
        }
    }

    /// Pick a template for the category at random and render it.
    fn describe(&mut self, category: Category, subject: &str) -> String {
        let template = templates(category)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(SUBJECT_PLACEHOLDER);
        render(template, subject)
    }
}

async fn infer(
    model: &dyn VisionModel,
    preparer: &ImagePreparer,
    image_path: &Path,
) -> InferenceResult<String> {
    let image = preparer.prepare(image_path)?;
    let request = CaptionRequest::short_caption(image);
    let response = model.caption(&request).await?;
    tracing::debug!(
        "{} captioned {:?} in {}ms",
        response.model,
        image_path,
        response.latency_ms
    );
    Ok(single_line(&response.text))
}

/// Collapse every whitespace run (newlines included) into one space.
pub(crate) fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
