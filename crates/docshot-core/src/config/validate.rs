//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::types::OutputFormat;

use super::Config;

/// Largest DPI value the JPEG density field can carry.
pub const MAX_DPI: u32 = u16::MAX as u32;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.dpi == 0 || self.defaults.dpi > MAX_DPI {
            return Err(ConfigError::ValidationError(format!(
                "defaults.dpi must be between 1 and {MAX_DPI}"
            )));
        }
        if self.defaults.padding > self.limits.max_image_dimension {
            return Err(ConfigError::ValidationError(format!(
                "defaults.padding must not exceed limits.max_image_dimension ({})",
                self.limits.max_image_dimension
            )));
        }
        if OutputFormat::from_name(&self.defaults.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "defaults.format must be one of png, jpg, jpeg, webp (got {:?})",
                self.defaults.format
            )));
        }
        if self.style.viz_contrast < 0.0 || self.style.viz_sharpness < 0.0 {
            return Err(ConfigError::ValidationError(
                "style.viz_contrast and style.viz_sharpness must be >= 0.0".into(),
            ));
        }
        if self.encoding.jpeg_quality == 0 || self.encoding.jpeg_quality > 100 {
            return Err(ConfigError::ValidationError(
                "encoding.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if !(1.0..=100.0).contains(&self.encoding.webp_quality) {
            return Err(ConfigError::ValidationError(
                "encoding.webp_quality must be between 1 and 100".into(),
            ));
        }
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        Ok(())
    }
}
