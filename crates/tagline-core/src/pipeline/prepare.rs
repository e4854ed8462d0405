//! Image preparation for the vision model: limits, decode, RGB, downscale.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::config::{Config, LimitsConfig};
use crate::error::{InferenceError, InferenceResult};
use crate::vision::ImageInput;

/// Turns an image file into a model-ready, base64-encoded RGB JPEG.
#[derive(Debug, Clone)]
pub struct ImagePreparer {
    limits: LimitsConfig,
    /// Longest edge of the encoded image
    image_size: u32,
}

impl ImagePreparer {
    /// Create a preparer with the given limits and target size.
    pub fn new(limits: LimitsConfig, image_size: u32) -> Self {
        Self { limits, image_size }
    }

    /// Create a preparer from the `limits` and `model` config sections.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.limits.clone(), config.model.image_size)
    }

    /// Read, validate, decode, and re-encode an image.
    pub fn prepare(&self, path: &Path) -> InferenceResult<ImageInput> {
        let bytes = self.read_checked(path)?;
        let image = Self::decode(bytes, path)?;

        let (width, height) = image.dimensions();
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(InferenceError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim: self.limits.max_image_dimension,
            });
        }

        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        let resized = if width > self.image_size || height > self.image_size {
            rgb.thumbnail(self.image_size, self.image_size)
        } else {
            rgb
        };

        let mut buffer = Cursor::new(Vec::new());
        resized
            .write_to(&mut buffer, ImageFormat::Jpeg)
            .map_err(|e| InferenceError::Prepare {
                path: path.to_path_buf(),
                message: format!("JPEG encode failed: {e}"),
            })?;

        tracing::trace!(
            "Prepared {:?}: {}x{} -> {}x{}",
            path,
            width,
            height,
            resized.width(),
            resized.height()
        );

        Ok(ImageInput::jpeg(&buffer.into_inner()))
    }

    /// Read the file after checking it against the size limit.
    fn read_checked(&self, path: &Path) -> InferenceResult<Vec<u8>> {
        let metadata = std::fs::metadata(path).map_err(|e| InferenceError::Prepare {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {e}"),
        })?;

        // Saturates for absurdly large configured limits.
        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(InferenceError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        std::fs::read(path).map_err(|e| InferenceError::Prepare {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {e}"),
        })
    }

    /// Decode with the format sniffed from content, not the extension.
    fn decode(bytes: Vec<u8>, path: &Path) -> InferenceResult<DynamicImage> {
        image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| InferenceError::Prepare {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {e}"),
            })?
            .decode()
            .map_err(|e| InferenceError::Prepare {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}
