//! Output encoding with format-specific quality settings and DPI metadata.

use bytes::Bytes;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::DynamicImage;
use img_parts::png::{Png, PngChunk};
use std::path::Path;

use crate::config::PngCompression;
use crate::error::ProcessError;
use crate::types::OutputFormat;

use super::transform::TransformSettings;

const INCHES_PER_METER: f64 = 1.0 / 0.0254;
const PHYS_UNIT_METER: u8 = 1;

/// Encode `image` in the configured output format.
///
/// `path` is only used to label errors.
pub fn encode(
    image: &DynamicImage,
    settings: &TransformSettings,
    path: &Path,
) -> Result<Vec<u8>, ProcessError> {
    let encoded = match settings.format {
        OutputFormat::Png => encode_png(image, settings.encoding.png_compression, settings.dpi),
        OutputFormat::Jpeg => encode_jpeg(image, settings.encoding.jpeg_quality, settings.dpi),
        OutputFormat::WebP => {
            tracing::debug!("WebP has no DPI field; {} dpi not embedded", settings.dpi);
            encode_webp(image, settings.encoding.webp_quality)
        }
    };
    encoded.map_err(|message| ProcessError::Encode {
        path: path.to_path_buf(),
        message,
    })
}

/// Write encoded bytes to `path`, creating missing parent directories.
///
/// Returns the number of bytes written.
pub fn write_output(bytes: &[u8], path: &Path) -> Result<u64, ProcessError> {
    let encode_err = |message: String| ProcessError::Encode {
        path: path.to_path_buf(),
        message,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| encode_err(format!("Cannot create {}: {}", parent.display(), e)))?;
    }
    std::fs::write(path, bytes).map_err(|e| encode_err(format!("Cannot write file: {}", e)))?;
    Ok(bytes.len() as u64)
}

/// DPI expressed as pixels per meter, as stored in a PNG `pHYs` chunk.
pub fn dots_per_meter(dpi: u32) -> u32 {
    (f64::from(dpi) * INCHES_PER_METER).round() as u32
}

fn encode_png(
    image: &DynamicImage,
    compression: PngCompression,
    dpi: u32,
) -> Result<Vec<u8>, String> {
    let compression = match compression {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    };
    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buf, compression, PngFilterType::Adaptive);
    image
        .write_with_encoder(encoder)
        .map_err(|e| e.to_string())?;
    with_png_dpi(buf, dpi)
}

/// Insert (or replace) the `pHYs` chunk right after `IHDR`.
fn with_png_dpi(encoded: Vec<u8>, dpi: u32) -> Result<Vec<u8>, String> {
    let mut png = Png::from_bytes(Bytes::from(encoded)).map_err(|e| e.to_string())?;

    let ppm = dots_per_meter(dpi).to_be_bytes();
    let mut phys = Vec::with_capacity(9);
    phys.extend_from_slice(&ppm);
    phys.extend_from_slice(&ppm);
    phys.push(PHYS_UNIT_METER);

    let chunks = png.chunks_mut();
    chunks.retain(|chunk| chunk.kind() != *b"pHYs");
    chunks.insert(1, PngChunk::new(*b"pHYs", Bytes::from(phys)));

    Ok(png.encoder().bytes().to_vec())
}

/// JPEG at the given quality. The encoder writes every component at full
/// resolution (4:4:4), which keeps small text crisp.
fn encode_jpeg(image: &DynamicImage, quality: u8, dpi: u32) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.set_pixel_density(PixelDensity::dpi(u16::try_from(dpi).unwrap_or(u16::MAX)));

    let written = if image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)
    } else {
        image.write_with_encoder(encoder)
    };
    written.map_err(|e| e.to_string())?;
    Ok(buf)
}

fn encode_webp(image: &DynamicImage, quality: f32) -> Result<Vec<u8>, String> {
    let memory = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
            .encode_simple(false, quality)
    } else {
        let rgb = image.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
            .encode_simple(false, quality)
    }
    .map_err(|e| format!("WebP encoding failed: {e:?}"))?;
    Ok(memory.to_vec())
}
