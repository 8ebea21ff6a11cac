//! Pipeline orchestration - wires together all processing stages.

use std::time::Instant;

use crate::config::Config;
use crate::error::ProcessError;
use crate::types::{Job, ProcessResult, ProcessStatus, SkipReason};

use super::decode::{format_to_string, ImageDecoder};
use super::discovery::FileDiscovery;
use super::encode::{encode, write_output};
use super::plan::{plan, Plan, PlanRequest};
use super::transform::{transform, TransformSettings};

/// Runs the screenshot pipeline for one job at a time.
///
/// Holds no per-image state, so one processor can be shared across threads.
pub struct ScreenshotProcessor {
    settings: TransformSettings,
    decoder: ImageDecoder,
    discovery: FileDiscovery,
    max_dimension: u32,
}

impl ScreenshotProcessor {
    /// Create a processor for the given settings; limits and discovery come from `config`.
    pub fn new(config: &Config, settings: TransformSettings) -> Self {
        Self {
            settings,
            decoder: ImageDecoder::new(config.limits.clone()),
            discovery: FileDiscovery::new(config.processing.clone()),
            max_dimension: config.limits.max_image_dimension,
        }
    }

    /// The settings every job is processed with.
    pub fn settings(&self) -> &TransformSettings {
        &self.settings
    }

    /// Resolve a request into jobs using this processor's discovery rules.
    pub fn plan(&self, request: &PlanRequest<'_>) -> Result<Plan, ProcessError> {
        plan(request, &self.discovery)
    }

    /// Process a single job.
    ///
    /// An existing destination is left untouched unless `force` is set; that
    /// check runs before the source is even opened.
    pub fn process(&self, job: &Job, force: bool) -> Result<ProcessResult, ProcessError> {
        if job.output.exists() && !force {
            tracing::debug!("Skipping {:?}: {:?} already exists", job.input, job.output);
            return Ok(ProcessResult {
                input: job.input.clone(),
                output: job.output.clone(),
                status: ProcessStatus::Skipped {
                    reason: SkipReason::AlreadyExists,
                },
            });
        }

        let start = Instant::now();
        tracing::debug!("Processing: {:?}", job.input);

        let decode_start = Instant::now();
        let decoded = self.decoder.decode(&job.input)?;
        tracing::trace!(
            "  Decode: {:?} ({} {}x{}, {} bytes)",
            decode_start.elapsed(),
            format_to_string(decoded.format),
            decoded.width,
            decoded.height,
            decoded.file_size
        );

        self.check_padded_size(job, decoded.width, decoded.height)?;

        let transform_start = Instant::now();
        let image = transform(decoded.image, &self.settings);
        tracing::trace!("  Transform: {:?}", transform_start.elapsed());

        let encode_start = Instant::now();
        let bytes = encode(&image, &self.settings, &job.output)?;
        let written = write_output(&bytes, &job.output)?;
        tracing::trace!("  Encode + write: {:?}", encode_start.elapsed());

        tracing::debug!(
            "Processed {:?} in {:?} ({}x{} -> {}x{})",
            job.input,
            start.elapsed(),
            decoded.width,
            decoded.height,
            image.width(),
            image.height()
        );

        Ok(ProcessResult {
            input: job.input.clone(),
            output: job.output.clone(),
            status: ProcessStatus::Written {
                width: image.width(),
                height: image.height(),
                bytes: written,
            },
        })
    }

    /// Reject padding that would push the canvas past the dimension limit.
    fn check_padded_size(&self, job: &Job, width: u32, height: u32) -> Result<(), ProcessError> {
        let too_large = |w: u32, h: u32| ProcessError::ImageTooLarge {
            path: job.input.clone(),
            width: w,
            height: h,
            max_dim: self.max_dimension,
        };
        match self.settings.padded_dimensions(width, height) {
            Some((w, h)) if w <= self.max_dimension && h <= self.max_dimension => Ok(()),
            Some((w, h)) => Err(too_large(w, h)),
            None => Err(too_large(u32::MAX, u32::MAX)),
        }
    }
}
