//! Per-image run reports in JSON or JSONL.
//!
//! One record per job, in input order, describing where the output went and
//! whether it was written, skipped, or failed.

use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::ProcessError;
use crate::types::{Job, ProcessResult, ProcessStatus};

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// Outcome label in a report record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Written,
    Skipped,
    Failed,
}

/// One line of the run report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRecord {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    /// Skip reason or error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

impl ReportRecord {
    /// Build a record from a job and its outcome.
    pub fn new(job: &Job, result: &Result<ProcessResult, ProcessError>) -> Self {
        let mut record = Self {
            input: job.input.clone(),
            output: job.output.clone(),
            status: RecordStatus::Failed,
            width: None,
            height: None,
            bytes: None,
            message: None,
            error_kind: None,
        };
        match result {
            Ok(ProcessResult {
                status:
                    ProcessStatus::Written {
                        width,
                        height,
                        bytes,
                    },
                ..
            }) => {
                record.status = RecordStatus::Written;
                record.width = Some(*width);
                record.height = Some(*height);
                record.bytes = Some(*bytes);
            }
            Ok(ProcessResult {
                status: ProcessStatus::Skipped { reason },
                ..
            }) => {
                record.status = RecordStatus::Skipped;
                record.message = Some(reason.to_string());
            }
            Err(e) => {
                record.message = Some(e.to_string());
                record.error_kind = Some(e.kind());
            }
        }
        record
    }
}

/// A writer that serializes items to JSON or JSONL format.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> ReportWriter<W> {
    /// Create a new report writer.
    ///
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: ReportFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write multiple items.
    ///
    /// For JSON format, writes as a JSON array.
    /// For JSONL format, writes one object per line.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            ReportFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, items)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, items).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
            ReportFormat::JsonLines => {
                for item in items {
                    serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                }
            }
        }
        self.items_written += items.len();
        Ok(())
    }

    /// Get the number of items written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SkipReason;

    fn job(name: &str) -> Job {
        Job {
            input: PathBuf::from(format!("in/{name}.png")),
            output: PathBuf::from(format!("out/{name}_medium.png")),
        }
    }

    fn sample_records() -> Vec<ReportRecord> {
        let written = Ok(ProcessResult {
            input: job("a").input,
            output: job("a").output,
            status: ProcessStatus::Written {
                width: 1444,
                height: 904,
                bytes: 4096,
            },
        });
        let skipped = Ok(ProcessResult {
            input: job("b").input,
            output: job("b").output,
            status: ProcessStatus::Skipped {
                reason: SkipReason::AlreadyExists,
            },
        });
        let failed = Err(ProcessError::Decode {
            path: job("c").input,
            message: "truncated".to_string(),
        });
        vec![
            ReportRecord::new(&job("a"), &written),
            ReportRecord::new(&job("b"), &skipped),
            ReportRecord::new(&job("c"), &failed),
        ]
    }

    #[test]
    fn test_records_from_results() {
        let records = sample_records();
        assert_eq!(records[0].status, RecordStatus::Written);
        assert_eq!(records[0].width, Some(1444));
        assert_eq!(records[1].status, RecordStatus::Skipped);
        assert_eq!(
            records[1].message.as_deref(),
            Some("destination already exists")
        );
        assert_eq!(records[2].status, RecordStatus::Failed);
        assert_eq!(records[2].error_kind, Some("decode"));
        assert!(records[2].message.as_ref().unwrap().contains("truncated"));
    }

    #[test]
    fn test_jsonl_one_record_per_line() {
        let mut writer = ReportWriter::new(Vec::new(), ReportFormat::JsonLines, false);
        writer.write_all(&sample_records()).unwrap();
        assert_eq!(writer.items_written(), 3);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["status"], "written");
        assert!(first.get("error_kind").is_none());
    }

    #[test]
    fn test_json_is_array() {
        let mut writer = ReportWriter::new(Vec::new(), ReportFormat::Json, true);
        writer.write_all(&sample_records()).unwrap();
        let output = String::from_utf8(writer.into_inner()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 3);
        assert_eq!(parsed[2]["status"], "failed");
    }
}
