//! Core data types for the docshot pipeline.
//!
//! These types describe what to produce (size preset, screenshot kind, output
//! format, colors) and what happened to each image (`ProcessResult`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ProcessError;

/// Named target output width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    /// 1024px wide
    Small,
    /// 1440px wide
    #[default]
    Medium,
    /// 1920px wide
    Large,
}

impl SizePreset {
    /// Output width in pixels.
    pub fn width(self) -> u32 {
        match self {
            SizePreset::Small => 1024,
            SizePreset::Medium => 1440,
            SizePreset::Large => 1920,
        }
    }

    /// Preset name as used in output file names.
    pub fn name(self) -> &'static str {
        match self {
            SizePreset::Small => "small",
            SizePreset::Medium => "medium",
            SizePreset::Large => "large",
        }
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Processing variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotKind {
    /// Plain UI screenshot
    #[default]
    Default,
    /// Data visualization: contrast/sharpness boost and a three-ring border
    Viz,
}

impl ScreenshotKind {
    pub fn is_viz(self) -> bool {
        matches!(self, ScreenshotKind::Viz)
    }
}

impl fmt::Display for ScreenshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenshotKind::Default => write!(f, "default"),
            ScreenshotKind::Viz => write!(f, "viz"),
        }
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless PNG (keeps alpha)
    Png,
    /// JPEG, quality 95 without chroma subsampling
    Jpeg,
    /// Lossy WebP
    WebP,
}

impl OutputFormat {
    /// Parse a format name (case-insensitive). `jpg` and `jpeg` are the same format.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Whether the encoded output keeps an alpha channel.
    ///
    /// Only PNG does; every other format gets composited over the background.
    pub fn keeps_alpha(self) -> bool {
        matches!(self, OutputFormat::Png)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::Jpeg => write!(f, "jpeg"),
            OutputFormat::WebP => write!(f, "webp"),
        }
    }
}

/// An opaque sRGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const WHITE: HexColor = HexColor([0xff, 0xff, 0xff]);
    pub const LIGHT_GRAY: HexColor = HexColor([0xe0, 0xe0, 0xe0]);

    /// Luma of this color (ITU-R 601-2), used when filling grey canvases.
    pub fn luma(self) -> u8 {
        let [r, g, b] = self.0;
        ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
    }
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color {s:?} must start with '#'"))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("color {s:?} must have the form #rrggbb"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("color {s:?} contains a non-hex digit"))
        };
        Ok(HexColor([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// One unit of work: read `input`, write `output`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Why an image was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Destination exists and overwrite was not forced
    AlreadyExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyExists => write!(f, "destination already exists"),
        }
    }
}

/// What happened to a single image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Output written; dimensions are those of the final canvas
    Written { width: u32, height: u32, bytes: u64 },
    /// Nothing was done
    Skipped { reason: SkipReason },
}

/// Outcome of a successful `process` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub status: ProcessStatus,
}

impl ProcessResult {
    pub fn is_written(&self) -> bool {
        matches!(self.status, ProcessStatus::Written { .. })
    }
}

/// Aggregated counts for a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Images written
    pub processed: usize,
    /// Images skipped because the destination already existed
    pub skipped: usize,
    /// Images that failed to decode, encode, or write
    pub failed: usize,
}

impl BatchSummary {
    /// Reduce per-image results into counts.
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a Result<ProcessResult, ProcessError>>,
    {
        results
            .into_iter()
            .fold(Self::default(), |mut summary, result| {
                match result {
                    Ok(r) if r.is_written() => summary.processed += 1,
                    Ok(_) => summary.skipped += 1,
                    Err(_) => summary.failed += 1,
                }
                summary
            })
    }

    /// Total number of images seen.
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }

    /// Images that did not produce output, for whatever reason.
    pub fn not_processed(&self) -> usize {
        self.skipped + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_preset_widths() {
        assert_eq!(SizePreset::Small.width(), 1024);
        assert_eq!(SizePreset::Medium.width(), 1440);
        assert_eq!(SizePreset::Large.width(), 1920);
        assert_eq!(SizePreset::default(), SizePreset::Medium);
    }

    #[test]
    fn test_output_format_from_name() {
        assert_eq!(OutputFormat::from_name("PNG"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_name("jpg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_name("jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_name("webp"), Some(OutputFormat::WebP));
        assert_eq!(OutputFormat::from_name("gif"), None);
    }

    #[test]
    fn test_only_png_keeps_alpha() {
        assert!(OutputFormat::Png.keeps_alpha());
        assert!(!OutputFormat::Jpeg.keeps_alpha());
        assert!(!OutputFormat::WebP.keeps_alpha());
    }

    #[test]
    fn test_hex_color_parse_and_display() {
        let color: HexColor = "#e0e0e0".parse().unwrap();
        assert_eq!(color, HexColor::LIGHT_GRAY);
        assert_eq!(color.to_string(), "#e0e0e0");
        assert_eq!("#FFFFFF".parse::<HexColor>().unwrap(), HexColor::WHITE);
    }

    #[test]
    fn test_hex_color_rejects_malformed() {
        assert!("e0e0e0".parse::<HexColor>().is_err());
        assert!("#e0e0".parse::<HexColor>().is_err());
        assert!("#gg0000".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_hex_color_luma() {
        assert_eq!(HexColor::WHITE.luma(), 255);
        assert_eq!(HexColor([0, 0, 0]).luma(), 0);
        assert_eq!(HexColor::LIGHT_GRAY.luma(), 0xe0);
    }

    #[test]
    fn test_batch_summary_reduction() {
        let written = ProcessResult {
            input: PathBuf::from("a.png"),
            output: PathBuf::from("out/a_medium.png"),
            status: ProcessStatus::Written {
                width: 1444,
                height: 904,
                bytes: 1234,
            },
        };
        let skipped = ProcessResult {
            input: PathBuf::from("b.png"),
            output: PathBuf::from("out/b_medium.png"),
            status: ProcessStatus::Skipped {
                reason: SkipReason::AlreadyExists,
            },
        };
        let results = vec![
            Ok(written),
            Ok(skipped),
            Err(ProcessError::NotFound(PathBuf::from("c.png"))),
        ];

        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.not_processed(), 2);
    }

    #[test]
    fn test_process_result_serializes_flat() {
        let result = ProcessResult {
            input: PathBuf::from("a.png"),
            output: PathBuf::from("a_small.png"),
            status: ProcessStatus::Skipped {
                reason: SkipReason::AlreadyExists,
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"], "already_exists");
        assert_eq!(json["output"], "a_small.png");
    }
}
