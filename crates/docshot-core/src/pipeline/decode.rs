//! Image decoding with format detection and dimension limits.

use image::codecs::gif::GifDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, DynamicImage, GenericImageView, ImageFormat};
use std::io::{Cursor, ErrorKind};
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::ProcessError;

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image, in one of the 8-bit working modes
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Original file size in bytes
    pub file_size: u64,
    /// Source holds more than one frame; only the first was decoded
    pub animated: bool,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read and decode an image file.
    ///
    /// Files over `limits.max_file_size_mb` are rejected from their metadata
    /// alone. Otherwise the file is read into memory in one call, so the
    /// handle is closed before any pixel work starts.
    pub fn decode(&self, path: &Path) -> Result<DecodedImage, ProcessError> {
        let read_err = |e: std::io::Error| match e.kind() {
            ErrorKind::NotFound => ProcessError::NotFound(path.to_path_buf()),
            _ => ProcessError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot read file: {}", e),
            },
        };

        let size = std::fs::metadata(path).map_err(read_err)?.len();
        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if size > max_bytes {
            return Err(ProcessError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: size / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let bytes = std::fs::read(path).map_err(read_err)?;
        self.decode_from_bytes(bytes, path)
    }

    /// Decode an image from an in-memory byte buffer and enforce limits.
    pub fn decode_from_bytes(
        &self,
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<DecodedImage, ProcessError> {
        let decoded = Self::decode_bytes(bytes, path)?;

        if decoded.width == 0 || decoded.height == 0 {
            return Err(ProcessError::Decode {
                path: path.to_path_buf(),
                message: "Image has zero width or height".to_string(),
            });
        }
        if decoded.width > self.limits.max_image_dimension
            || decoded.height > self.limits.max_image_dimension
        {
            return Err(ProcessError::ImageTooLarge {
                path: path.to_path_buf(),
                width: decoded.width,
                height: decoded.height,
                max_dim: self.limits.max_image_dimension,
            });
        }
        if decoded.animated {
            tracing::warn!(
                "{:?} has multiple frames; only the first frame is processed",
                path
            );
        }
        Ok(decoded)
    }

    fn decode_bytes(bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, ProcessError> {
        let file_size = bytes.len() as u64;
        let mut reader = image::ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| ProcessError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| ProcessError::Decode {
                path: path.to_path_buf(),
                message: format!(
                    "Unsupported format: {}",
                    path.extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("unknown")
                ),
            })?,
        };
        reader.set_format(format);
        let image = reader.decode().map_err(|e| ProcessError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let animated = is_animated(&bytes, format);
        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image: to_working_mode(image),
            format,
            width,
            height,
            file_size,
            animated,
        })
    }
}

/// Collapse any decoded color type onto one of the four 8-bit working modes:
/// `Luma8`, `LumaA8`, `Rgb8`, `Rgba8`.
pub fn to_working_mode(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => image,
        other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Whether a GIF or WebP source carries more than one frame.
fn is_animated(bytes: &[u8], format: ImageFormat) -> bool {
    match format {
        ImageFormat::Gif => GifDecoder::new(Cursor::new(bytes))
            .map(|decoder| decoder.into_frames().take(2).count() > 1)
            .unwrap_or(false),
        ImageFormat::WebP => WebPDecoder::new(Cursor::new(bytes))
            .map(|decoder| decoder.has_animation())
            .unwrap_or(false),
        _ => false,
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}
