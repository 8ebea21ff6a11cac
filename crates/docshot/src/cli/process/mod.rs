//! The `docshot process` command.

mod batch;
mod setup;
pub mod types;

pub use types::{FormatArg, KindArg, ReportFormatArg, SizeArg};

use clap::Args;
use docshot_core::{Config, Job, Plan, ProcessStatus, ReportRecord};
use std::path::PathBuf;
use std::sync::Arc;

use batch::{process_batch, run_job, write_report};
use setup::{setup_processor, ProcessContext};

/// Arguments for the `process` command.
///
/// Options left unset fall back to the `[defaults]` section of the config file.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Screenshot file or directory of screenshots
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file (single input file only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output directory [default: processed-screenshots]
    #[arg(short = 'd', long)]
    pub outdir: Option<PathBuf>,

    /// Width preset [default: medium]
    #[arg(short, long, value_enum)]
    pub size: Option<SizeArg>,

    /// Screenshot type [default: default]
    #[arg(short = 't', long = "type", value_enum)]
    pub kind: Option<KindArg>,

    /// Padding in pixels added on every side before resizing [default: 0]
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// DPI written into the output metadata [default: 144]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=65535))]
    pub dpi: Option<u32>,

    /// Do not draw the border
    #[arg(long)]
    pub no_border: bool,

    /// Overwrite existing output files
    #[arg(short, long)]
    pub force: bool,

    /// Output format [default: png]
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Number of images processed concurrently [default: 1]
    #[arg(long)]
    pub parallel: Option<usize>,

    /// Write a per-image report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    pub report_format: ReportFormatArg,
}

/// Manual Default impl for constructing ProcessArgs outside of clap.
///
/// Values match the clap annotations above.
impl Default for ProcessArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            outdir: None,
            size: None,
            kind: None,
            padding: None,
            dpi: None,
            no_border: false,
            force: false,
            format: None,
            parallel: None,
            report: None,
            report_format: ReportFormatArg::Json,
        }
    }
}

/// Execute the process command against the user's config file.
pub async fn execute(args: ProcessArgs) -> anyhow::Result<()> {
    // An invalid config file is fatal here, unlike at startup.
    let config = Config::load()?;
    run(args, &config).await
}

/// Run the process command with an already loaded config.
pub async fn run(args: ProcessArgs, config: &Config) -> anyhow::Result<()> {
    let ProcessContext {
        processor,
        plan,
        parallel,
    } = setup_processor(config, &args)?;
    let processor = Arc::new(processor);

    match plan {
        Plan::Single(job) => process_single(processor, job, &args).await,
        Plan::Batch(jobs) => {
            tracing::info!("Found {} image file(s) in {:?}", jobs.len(), args.input);
            process_batch(processor, jobs, &args, parallel).await?;
            Ok(())
        }
    }
}

// ── Single-file processing ─────────────────────────────────────────────────

/// Process one file. Errors abort the command; an existing destination is
/// reported and is not an error.
async fn process_single(
    processor: Arc<docshot_core::ScreenshotProcessor>,
    job: Job,
    args: &ProcessArgs,
) -> anyhow::Result<()> {
    tracing::debug!("Processing single file: {:?} -> {:?}", job.input, job.output);
    let (job, result) = run_job(processor, job, args.force).await?;

    if let Some(report) = &args.report {
        write_report(report, args.report_format.into(), &[ReportRecord::new(&job, &result)])?;
    }

    let result = result?;
    match result.status {
        ProcessStatus::Written { width, height, .. } => {
            tracing::info!(
                "Processed: {} -> {} ({}x{})",
                display_name(&job.input),
                job.output.display(),
                width,
                height
            );
        }
        ProcessStatus::Skipped { reason } => {
            tracing::warn!(
                "Skipped {}: {}. Use --force to overwrite.",
                job.output.display(),
                reason
            );
        }
    }
    Ok(())
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
