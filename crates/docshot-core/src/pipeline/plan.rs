//! Output planning: turn an input path and naming options into jobs.
//!
//! All usage checks happen here, before any image is touched.

use std::path::{Path, PathBuf};

use crate::error::ProcessError;
use crate::types::{Job, SizePreset};

use super::discovery::FileDiscovery;

/// What the user asked for.
#[derive(Debug, Clone)]
pub struct PlanRequest<'a> {
    /// File or directory to process
    pub input: &'a Path,
    /// Explicit output file (single-file input only)
    pub output: Option<&'a Path>,
    /// Directory for derived output names
    pub outdir: &'a Path,
    /// Size preset, used in batch output names
    pub size: SizePreset,
    /// Output extension without the dot
    pub extension: &'a str,
}

/// Resolved work for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// One input file
    Single(Job),
    /// Every recognized image in a directory, in path order
    Batch(Vec<Job>),
}

impl Plan {
    /// All jobs in enumeration order.
    pub fn jobs(&self) -> &[Job] {
        match self {
            Plan::Single(job) => std::slice::from_ref(job),
            Plan::Batch(jobs) => jobs,
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Plan::Batch(_))
    }
}

/// Build the job list for a request.
///
/// Fails with `NotFound` for a missing input, and with `Usage` when an
/// explicit output is combined with a directory or when the directory holds
/// no recognized images.
pub fn plan(request: &PlanRequest<'_>, discovery: &FileDiscovery) -> Result<Plan, ProcessError> {
    let input = request.input;
    if !input.exists() {
        return Err(ProcessError::NotFound(input.to_path_buf()));
    }

    if !input.is_dir() {
        let output = match request.output {
            Some(explicit) => explicit.to_path_buf(),
            None => single_output_path(request.outdir, input, request.extension),
        };
        return Ok(Plan::Single(Job {
            input: input.to_path_buf(),
            output,
        }));
    }

    if request.output.is_some() {
        return Err(ProcessError::Usage(
            "--output can only be used with a single input file, not a directory. \
             Use --outdir to choose where batch results go."
                .to_string(),
        ));
    }

    let files = discovery.discover(input);
    if files.is_empty() {
        return Err(ProcessError::Usage(format!(
            "No image files found in directory: {}",
            input.display()
        )));
    }

    let jobs = files
        .into_iter()
        .map(|file| {
            let output =
                batch_output_path(request.outdir, &file, request.size, request.extension);
            Job {
                input: file,
                output,
            }
        })
        .collect();
    Ok(Plan::Batch(jobs))
}

/// `{outdir}/{stem}_{size}.{ext}`
pub fn batch_output_path(outdir: &Path, input: &Path, size: SizePreset, extension: &str) -> PathBuf {
    outdir.join(format!("{}_{}.{}", stem(input), size.name(), extension))
}

/// `{outdir}/{stem}_processed.{ext}`
pub fn single_output_path(outdir: &Path, input: &Path, extension: &str) -> PathBuf {
    outdir.join(format!("{}_processed.{}", stem(input), extension))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}
