//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::{HexColor, ScreenshotKind, SizePreset};

/// Default processing options, overridable per run from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Size preset (small, medium, large)
    pub size: SizePreset,

    /// Screenshot kind (default or viz)
    pub kind: ScreenshotKind,

    /// Padding in pixels added around the source before resizing
    pub padding: u32,

    /// DPI metadata embedded in the output
    pub dpi: u32,

    /// Draw the decorative border
    pub border: bool,

    /// Output format name ("png", "jpg", "jpeg" or "webp")
    pub format: String,

    /// Output directory for processed images
    pub outdir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            size: SizePreset::Medium,
            kind: ScreenshotKind::Default,
            padding: 0,
            dpi: 144,
            border: true,
            format: "png".to_string(),
            outdir: PathBuf::from("processed-screenshots"),
        }
    }
}

/// Colors, border widths and enhancement factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Canvas color for padding and alpha compositing
    pub background: HexColor,

    /// Color of the inner border ring (and the outer viz ring)
    pub border_color: HexColor,

    /// Width of the standard border in pixels
    pub border_width: u32,

    /// Width of the white ring added around the border in viz mode
    pub viz_inner_ring: u32,

    /// Width of the outermost ring in viz mode
    pub viz_outer_ring: u32,

    /// Contrast factor for viz mode (1.0 = unchanged)
    pub viz_contrast: f32,

    /// Sharpness factor for viz mode (1.0 = unchanged)
    pub viz_sharpness: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: HexColor::WHITE,
            border_color: HexColor::LIGHT_GRAY,
            border_width: 2,
            viz_inner_ring: 6,
            viz_outer_ring: 1,
            viz_contrast: 1.08,
            viz_sharpness: 1.2,
        }
    }
}

impl StyleConfig {
    /// Total border added per side for the given kind.
    pub fn border_per_side(&self, viz: bool) -> u32 {
        if viz {
            self.border_width + self.viz_inner_ring + self.viz_outer_ring
        } else {
            self.border_width
        }
    }
}

/// PNG compression effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    /// Fastest encode, larger files
    #[default]
    Fast,
    /// Balanced
    Default,
    /// Smallest files, slowest encode
    Best,
}

/// Format-specific encoder parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// PNG compression effort (lossless either way)
    pub png_compression: PngCompression,

    /// JPEG quality, 1-100
    pub jpeg_quality: u8,

    /// WebP lossy quality, 1-100
    pub webp_quality: f32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            png_compression: PngCompression::Fast,
            jpeg_quality: 95,
            webp_quality: 90.0,
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of images processed concurrently in batch mode
    pub parallel_workers: usize,

    /// Extensions recognized when scanning a directory
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 1,
            supported_formats: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "gif".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 20000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
