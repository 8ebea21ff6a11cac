//! Processor setup: CLI overrides on top of the config, output planning.

use std::path::Path;

use docshot_core::config::expand_path;
use docshot_core::{Config, Plan, PlanRequest, ScreenshotKind, ScreenshotProcessor, TransformSettings};

use super::ProcessArgs;

/// Everything needed to run the command, assembled by [`setup_processor`].
pub(crate) struct ProcessContext {
    pub processor: ScreenshotProcessor,
    pub plan: Plan,
    pub parallel: usize,
}

/// Apply CLI overrides to `config` and resolve the jobs to run.
///
/// Usage problems (missing input, `--output` with a directory, a directory
/// without images) fail here, before any image is read.
pub fn setup_processor(config: &Config, args: &ProcessArgs) -> anyhow::Result<ProcessContext> {
    let settings = resolve_settings(config, args)?;
    let parallel = resolve_parallel(config, args)?;

    let input = expand_path(&args.input);
    let output = args.output.as_deref().map(expand_path);
    let outdir = args
        .outdir
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| config.outdir());

    log_run_settings(&input, &outdir, &settings);

    let processor = ScreenshotProcessor::new(config, settings);
    let plan = processor.plan(&PlanRequest {
        input: &input,
        output: output.as_deref(),
        outdir: &outdir,
        size: processor.settings().size,
        extension: &processor.settings().extension,
    })?;

    Ok(ProcessContext {
        processor,
        plan,
        parallel,
    })
}

/// Config defaults with CLI flags layered on top.
pub(crate) fn resolve_settings(
    config: &Config,
    args: &ProcessArgs,
) -> anyhow::Result<TransformSettings> {
    let mut settings = TransformSettings::from_config(config)?;

    if let Some(size) = args.size {
        settings.size = size.into();
    }
    if let Some(kind) = args.kind {
        settings.kind = kind.into();
    }
    if let Some(padding) = args.padding {
        if padding > config.limits.max_image_dimension {
            anyhow::bail!(
                "--padding {} exceeds the image dimension limit ({})",
                padding,
                config.limits.max_image_dimension
            );
        }
        settings.padding = padding;
    }
    if let Some(dpi) = args.dpi {
        settings.dpi = dpi;
    }
    if args.no_border {
        settings.border = false;
    }
    if let Some(format) = args.format {
        settings.set_format(format.as_str())?;
    }

    Ok(settings)
}

fn resolve_parallel(config: &Config, args: &ProcessArgs) -> anyhow::Result<usize> {
    let parallel = args.parallel.unwrap_or(config.processing.parallel_workers);
    if parallel == 0 {
        anyhow::bail!("--parallel must be at least 1");
    }
    Ok(parallel)
}

fn log_run_settings(input: &Path, outdir: &Path, settings: &TransformSettings) {
    tracing::debug!("Input path: {:?}", input);
    tracing::debug!("Output directory: {:?}", outdir);
    tracing::debug!(
        "Size preset: {} ({}px width), type: {}, format: {}, dpi: {}",
        settings.size.name(),
        settings.target_width(),
        match settings.kind {
            ScreenshotKind::Default => "default",
            ScreenshotKind::Viz => "viz",
        },
        settings.extension,
        settings.dpi
    );
}
