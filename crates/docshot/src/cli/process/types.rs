//! CLI enum types for the process command: size, kind, output and report formats.

use clap::ValueEnum;
use docshot_core::{ReportFormat, ScreenshotKind, SizePreset};

/// Width presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SizeArg {
    /// 1024px wide
    Small,
    /// 1440px wide
    Medium,
    /// 1920px wide
    Large,
}

impl From<SizeArg> for SizePreset {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::Small => SizePreset::Small,
            SizeArg::Medium => SizePreset::Medium,
            SizeArg::Large => SizePreset::Large,
        }
    }
}

/// Screenshot kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Plain UI screenshot
    Default,
    /// Chart or diagram: extra contrast, sharpening and a wider frame
    Viz,
}

impl From<KindArg> for ScreenshotKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Default => ScreenshotKind::Default,
            KindArg::Viz => ScreenshotKind::Viz,
        }
    }
}

/// Output image formats. `jpg` and `jpeg` encode the same way but keep
/// their own spelling in output file names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Png,
    Jpg,
    Jpeg,
    Webp,
}

impl FormatArg {
    pub fn as_str(self) -> &'static str {
        match self {
            FormatArg::Png => "png",
            FormatArg::Jpg => "jpg",
            FormatArg::Jpeg => "jpeg",
            FormatArg::Webp => "webp",
        }
    }
}

impl std::fmt::Display for FormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(format: ReportFormatArg) -> Self {
        match format {
            ReportFormatArg::Json => ReportFormat::Json,
            ReportFormatArg::Jsonl => ReportFormat::JsonLines,
        }
    }
}
