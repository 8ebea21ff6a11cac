//! Batch processing: bounded concurrency, progress, summary, and reports.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use console::Style;
use docshot_core::config::expand_path;
use docshot_core::{
    BatchSummary, Job, ProcessError, ProcessResult, ProcessStatus, ReportFormat, ReportRecord,
    ReportWriter, ScreenshotProcessor,
};
use futures_util::stream::{self, StreamExt};

use super::ProcessArgs;

/// Outcome of one job, paired with the job it belongs to.
pub(crate) type JobOutcome = (Job, Result<ProcessResult, ProcessError>);

/// Run one job on the blocking pool.
///
/// Only a panic inside the pipeline surfaces as `Err`; processing failures
/// are part of the outcome.
pub async fn run_job(
    processor: Arc<ScreenshotProcessor>,
    job: Job,
    force: bool,
) -> anyhow::Result<JobOutcome> {
    let outcome = tokio::task::spawn_blocking(move || {
        let result = processor.process(&job, force);
        (job, result)
    })
    .await?;
    Ok(outcome)
}

/// Process every job, up to `parallel` at a time.
///
/// Failures are logged and counted; the batch always runs to the end.
/// Outcomes are consumed in job order whatever order they finish in.
pub async fn process_batch(
    processor: Arc<ScreenshotProcessor>,
    jobs: Vec<Job>,
    args: &ProcessArgs,
    parallel: usize,
) -> anyhow::Result<BatchSummary> {
    let total = jobs.len();
    let progress = create_progress_bar(total as u64);
    let start_time = Instant::now();
    let force = args.force;

    let mut outcomes = stream::iter(jobs)
        .map(|job| run_job(Arc::clone(&processor), job, force))
        .buffered(parallel.max(1));

    let mut results = Vec::with_capacity(total);
    let mut records = Vec::new();
    while let Some(outcome) = outcomes.next().await {
        let (job, result) = outcome?;
        log_outcome(&progress, &job, &result);
        if args.report.is_some() {
            records.push(ReportRecord::new(&job, &result));
        }
        results.push(result);

        progress.inc(1);
        let elapsed = start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            progress.set_message(format!("{:.1} img/sec", results.len() as f64 / elapsed));
        }
    }
    progress.finish_and_clear();

    let summary = BatchSummary::from_results(&results);

    if let Some(report) = &args.report {
        write_report(report, args.report_format.into(), &records)?;
    }

    print_summary(&summary, start_time.elapsed());
    Ok(summary)
}

/// Log one job's outcome with the progress bar hidden, so lines never
/// interleave with the bar.
fn log_outcome(
    progress: &indicatif::ProgressBar,
    job: &Job,
    result: &Result<ProcessResult, ProcessError>,
) {
    progress.suspend(|| match result {
        Ok(ProcessResult {
            status: ProcessStatus::Written { .. },
            ..
        }) => {
            tracing::info!("Processed: {} -> {}", file_name(&job.input), job.output.display());
        }
        Ok(ProcessResult {
            status: ProcessStatus::Skipped { reason },
            ..
        }) => {
            tracing::debug!("Skipped {}: {}", job.output.display(), reason);
        }
        Err(e) => {
            tracing::error!("Error processing {}: {}", job.input.display(), e);
        }
    });
}

/// Write report records to `path`, creating parent directories.
pub fn write_report(
    path: &Path,
    format: ReportFormat,
    records: &[ReportRecord],
) -> anyhow::Result<()> {
    let path = expand_path(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create report directory {}", parent.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("Cannot create report file {}", path.display()))?;

    let mut writer = ReportWriter::new(BufWriter::new(file), format, format == ReportFormat::Json);
    writer.write_all(records)?;
    writer.flush()?;
    tracing::info!("Report written to {:?} ({} records)", path, writer.items_written());
    Ok(())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// The plain summary lines; failures count as skipped here.
fn summary_lines(summary: &BatchSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Summary: Processed {} of {} images",
        summary.processed,
        summary.total()
    )];
    if summary.not_processed() > 0 {
        lines.push(format!(
            "Skipped {} files. Use --force to overwrite existing files.",
            summary.not_processed()
        ));
    }
    lines
}

/// Print the summary lines to stdout and a breakdown table to stderr.
fn print_summary(summary: &BatchSummary, elapsed: Duration) {
    println!();
    for line in summary_lines(summary) {
        println!("{line}");
    }

    let rate = if elapsed.as_secs_f64() > 0.0 {
        summary.processed as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };
    let dim = Style::new().for_stderr().dim();
    let green = Style::new().for_stderr().green();
    let yellow = Style::new().for_stderr().yellow();
    let red = Style::new().for_stderr().red();

    eprintln!();
    eprintln!("  {}", dim.apply_to("===================================="));
    eprintln!("    Written:      {:>8}", green.apply_to(summary.processed));
    if summary.skipped > 0 {
        eprintln!("    Existing:     {:>8}", yellow.apply_to(summary.skipped));
    }
    if summary.failed > 0 {
        eprintln!("    Failed:       {:>8}", red.apply_to(summary.failed));
    }
    eprintln!("  {}", dim.apply_to("------------------------------------"));
    eprintln!("    Total:        {:>8}", summary.total());
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  {}", dim.apply_to("===================================="));
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::super::types::{ReportFormatArg, SizeArg};
    use super::*;
    use docshot_core::{Config, SizePreset, TransformSettings};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn processor() -> Arc<ScreenshotProcessor> {
        let config = Config::default();
        let mut settings = TransformSettings::from_config(&config).unwrap();
        settings.size = SizePreset::Small;
        Arc::new(ScreenshotProcessor::new(&config, settings))
    }

    fn write_png(path: &Path, w: u32, h: u32) {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([200, 100, 50])))
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    fn jobs(dir: &Path, names: &[&str]) -> Vec<Job> {
        names
            .iter()
            .map(|name| Job {
                input: dir.join(name),
                output: dir.join("out").join(name.replace(".png", "_small.png")),
            })
            .collect()
    }

    /// Shared buffer standing in for stderr.
    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn outcomes_are_logged_while_the_bar_is_drawn() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();

        let progress = create_progress_bar(2);
        let job = Job {
            input: Path::new("in/a.png").to_path_buf(),
            output: Path::new("out/a_small.png").to_path_buf(),
        };
        let written = Ok(ProcessResult {
            input: job.input.clone(),
            output: job.output.clone(),
            status: ProcessStatus::Written {
                width: 10,
                height: 10,
                bytes: 100,
            },
        });
        let failed = Err(ProcessError::NotFound(job.input.clone()));

        tracing::subscriber::with_default(subscriber, || {
            log_outcome(&progress, &job, &written);
            progress.inc(1);
            log_outcome(&progress, &job, &failed);
        });
        progress.finish_and_clear();

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("Processed: a.png -> out/a_small.png"), "{logs}");
        assert!(logs.contains("Error processing in/a.png"), "{logs}");
        assert_eq!(progress.position(), 1);
    }

    #[test]
    fn summary_lines_fold_failures_into_skipped() {
        let summary = BatchSummary {
            processed: 3,
            skipped: 1,
            failed: 1,
        };
        assert_eq!(
            summary_lines(&summary),
            vec![
                "Summary: Processed 3 of 5 images".to_string(),
                "Skipped 2 files. Use --force to overwrite existing files.".to_string(),
            ]
        );

        let clean = BatchSummary {
            processed: 2,
            skipped: 0,
            failed: 0,
        };
        assert_eq!(summary_lines(&clean).len(), 1);
    }

    #[tokio::test]
    async fn batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 64, 32);
        std::fs::write(dir.path().join("b.png"), b"garbage").unwrap();
        write_png(&dir.path().join("c.png"), 64, 32);

        let args = ProcessArgs {
            size: Some(SizeArg::Small),
            ..ProcessArgs::default()
        };
        let summary = process_batch(
            processor(),
            jobs(dir.path(), &["a.png", "b.png", "c.png"]),
            &args,
            1,
        )
        .await
        .unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert!(dir.path().join("out/a_small.png").exists());
        assert!(dir.path().join("out/c_small.png").exists());
    }

    #[tokio::test]
    async fn parallel_report_keeps_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let names = ["a.png", "b.png", "c.png", "d.png", "e.png"];
        for (i, name) in names.iter().enumerate() {
            // Larger images first so they tend to finish last.
            write_png(&dir.path().join(name), 800 - i as u32 * 150, 200);
        }
        let report = dir.path().join("reports/run.jsonl");

        let args = ProcessArgs {
            report: Some(report.clone()),
            report_format: ReportFormatArg::Jsonl,
            ..ProcessArgs::default()
        };
        let summary = process_batch(processor(), jobs(dir.path(), &names), &args, 4)
            .await
            .unwrap();
        assert_eq!(summary.processed, 5);

        let content = std::fs::read_to_string(&report).unwrap();
        let inputs: Vec<String> = content
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                assert_eq!(value["status"], "written");
                value["input"].as_str().unwrap().to_string()
            })
            .collect();
        let expected: Vec<String> = names
            .iter()
            .map(|n| dir.path().join(n).to_string_lossy().into_owned())
            .collect();
        assert_eq!(inputs, expected);
    }

    #[tokio::test]
    async fn existing_outputs_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 64, 32);
        let jobs = jobs(dir.path(), &["a.png"]);
        std::fs::create_dir_all(dir.path().join("out")).unwrap();
        std::fs::write(&jobs[0].output, b"old").unwrap();

        let summary = process_batch(processor(), jobs.clone(), &ProcessArgs::default(), 2)
            .await
            .unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(std::fs::read(&jobs[0].output).unwrap(), b"old");
    }
}
