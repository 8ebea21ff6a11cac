//! Error types for the docshot pipeline.
//!
//! Errors carry the offending file path so every message printed to the user
//! names the file and the reason.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while planning or processing images.
///
/// An existing destination is deliberately absent here: it is reported as
/// [`crate::types::ProcessStatus::Skipped`] so a batch run treats it as a
/// recoverable skip.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Input path does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Source file is not a readable image
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Output could not be encoded or written
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Invalid combination of options, detected before any processing
    #[error("{0}")]
    Usage(String),
}

impl ProcessError {
    /// Whether this error is a usage error that must abort the whole run.
    pub fn is_usage(&self) -> bool {
        matches!(self, ProcessError::Usage(_))
    }

    /// Short machine-readable kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessError::NotFound(_) => "not_found",
            ProcessError::Decode { .. } => "decode",
            ProcessError::Encode { .. } => "encode",
            ProcessError::FileTooLarge { .. } => "file_too_large",
            ProcessError::ImageTooLarge { .. } => "image_too_large",
            ProcessError::Usage(_) => "usage",
        }
    }
}
