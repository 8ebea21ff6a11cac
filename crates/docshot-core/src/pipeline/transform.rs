//! The screenshot transform: pad, resize, normalize color, enhance, border.
//!
//! Stages run in a fixed order and each one is a plain function from image to
//! image. Settings only decide whether a stage runs and with which values.

use image::imageops::{self, FilterType};
use image::{
    DynamicImage, GenericImageView, ImageBuffer, Luma, LumaA, Pixel, Rgb, RgbImage, Rgba,
    RgbaImage,
};

use crate::config::{Config, EncodingConfig, StyleConfig};
use crate::error::ConfigError;
use crate::types::{HexColor, OutputFormat, ScreenshotKind, SizePreset};

use super::enhance;

/// Fully resolved, immutable settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSettings {
    /// Width preset
    pub size: SizePreset,
    /// Default or viz processing
    pub kind: ScreenshotKind,
    /// Padding (px) added on each side before resizing
    pub padding: u32,
    /// Draw the decorative border
    pub border: bool,
    /// DPI metadata written into the output
    pub dpi: u32,
    /// Output encoding
    pub format: OutputFormat,
    /// Output file extension, as the user spelled the format (`jpg` stays `jpg`)
    pub extension: String,
    /// Colors, border widths, enhancement factors
    pub style: StyleConfig,
    /// Encoder parameters
    pub encoding: EncodingConfig,
}

impl TransformSettings {
    /// Resolve settings from the configuration defaults.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let defaults = &config.defaults;
        let mut settings = Self {
            size: defaults.size,
            kind: defaults.kind,
            padding: defaults.padding,
            border: defaults.border,
            dpi: defaults.dpi,
            format: OutputFormat::Png,
            extension: String::new(),
            style: config.style.clone(),
            encoding: config.encoding.clone(),
        };
        settings.set_format(&defaults.format)?;
        Ok(settings)
    }

    /// Set output format and extension from a format name (`png`, `jpg`, `jpeg`, `webp`).
    pub fn set_format(&mut self, name: &str) -> Result<(), ConfigError> {
        self.format = OutputFormat::from_name(name).ok_or_else(|| {
            ConfigError::ValidationError(format!("unsupported output format: {name}"))
        })?;
        self.extension = name.to_lowercase();
        Ok(())
    }

    /// Output width in pixels, before borders.
    pub fn target_width(&self) -> u32 {
        self.size.width()
    }

    /// Source size after padding, or `None` if it does not fit in `u32`.
    pub fn padded_dimensions(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let grow = self.padding.checked_mul(2)?;
        Some((width.checked_add(grow)?, height.checked_add(grow)?))
    }

    /// Final canvas size for a source of the given dimensions.
    ///
    /// `None` when padding or borders overflow the pixel range.
    pub fn expected_dimensions(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let (w, h) = self.padded_dimensions(width, height)?;
        let target_height = scaled_height(w, h, self.target_width());
        let border = if self.border {
            self.style.border_per_side(self.kind.is_viz())
        } else {
            0
        }
        .checked_mul(2)?;
        Some((
            self.target_width().checked_add(border)?,
            target_height.checked_add(border)?,
        ))
    }
}

/// Run every enabled stage on `image`, in order.
///
/// Decoding rejects zero-sized sources, so every input reaching this point
/// has a defined aspect ratio. Callers bound the padded canvas with
/// [`TransformSettings::padded_dimensions`] first.
pub fn transform(image: DynamicImage, settings: &TransformSettings) -> DynamicImage {
    let mut image = image;

    if settings.padding > 0 {
        image = expand_canvas(image, settings.padding, settings.style.background);
        tracing::trace!("  Padded: {}x{}", image.width(), image.height());
    }

    image = resize_to_width(image, settings.target_width());
    tracing::trace!("  Resized: {}x{}", image.width(), image.height());

    image = normalize_color(image, settings.format, settings.style.background);

    if settings.kind.is_viz() {
        image = enhance::contrast(image, settings.style.viz_contrast);
        image = enhance::sharpness(image, settings.style.viz_sharpness);
        tracing::trace!("  Applied visualization enhancements");
    }

    if settings.border {
        image = add_border(image, &settings.style, settings.kind.is_viz());
        tracing::trace!("  Bordered: {}x{}", image.width(), image.height());
    }

    image
}

/// `round(target_width * height / width)`, never below 1.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = f64::from(target_width) * f64::from(height) / f64::from(width.max(1));
    (scaled.round() as u32).max(1)
}

/// Resize to `target_width`, keeping the aspect ratio, with Lanczos3.
pub fn resize_to_width(image: DynamicImage, target_width: u32) -> DynamicImage {
    let (w, h) = image.dimensions();
    let target_height = scaled_height(w, h, target_width);
    if (w, h) == (target_width, target_height) {
        return image;
    }
    image.resize_exact(target_width, target_height, FilterType::Lanczos3)
}

/// Grow the canvas by `amount` on every side, filled with `fill`.
///
/// The new canvas keeps the source's color mode; fills are opaque.
pub fn expand_canvas(image: DynamicImage, amount: u32, fill: HexColor) -> DynamicImage {
    if amount == 0 {
        return image;
    }
    let [r, g, b] = fill.0;
    match image {
        DynamicImage::ImageLuma8(buf) => {
            DynamicImage::ImageLuma8(framed(&buf, amount, Luma([fill.luma()])))
        }
        DynamicImage::ImageLumaA8(buf) => {
            DynamicImage::ImageLumaA8(framed(&buf, amount, LumaA([fill.luma(), 255])))
        }
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(framed(&buf, amount, Rgb([r, g, b]))),
        other => DynamicImage::ImageRgba8(framed(&other.to_rgba8(), amount, Rgba([r, g, b, 255]))),
    }
}

fn framed<P: Pixel>(
    source: &ImageBuffer<P, Vec<P::Subpixel>>,
    amount: u32,
    fill: P,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let grow = amount.saturating_mul(2);
    let mut canvas = ImageBuffer::from_pixel(
        source.width().saturating_add(grow),
        source.height().saturating_add(grow),
        fill,
    );
    imageops::replace(&mut canvas, source, i64::from(amount), i64::from(amount));
    canvas
}

/// Bring the image into a mode the output format can carry.
///
/// Alpha survives only when the format keeps it; otherwise it is composited
/// over `background`. Everything ends up as `Rgb8` or `Rgba8`.
pub fn normalize_color(
    image: DynamicImage,
    format: OutputFormat,
    background: HexColor,
) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) => image,
        DynamicImage::ImageRgba8(_) if format.keeps_alpha() => image,
        other if other.color().has_alpha() => {
            DynamicImage::ImageRgb8(flatten_alpha(&other.to_rgba8(), background))
        }
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

fn flatten_alpha(image: &RgbaImage, background: HexColor) -> RgbImage {
    let bg = background.0;
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let a = u32::from(a);
        let over = |c: u8, under: u8| {
            ((u32::from(c) * a + u32::from(under) * (255 - a) + 127) / 255) as u8
        };
        Rgb([over(r, bg[0]), over(g, bg[1]), over(b, bg[2])])
    })
}

/// Standard border ring, plus the background and outer rings in viz mode.
pub fn add_border(image: DynamicImage, style: &StyleConfig, viz: bool) -> DynamicImage {
    let image = expand_canvas(image, style.border_width, style.border_color);
    if !viz {
        return image;
    }
    let image = expand_canvas(image, style.viz_inner_ring, style.background);
    expand_canvas(image, style.viz_outer_ring, style.border_color)
}
