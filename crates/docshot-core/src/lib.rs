//! Docshot Core - screenshot normalization library.
//!
//! Docshot turns raw screenshots into consistent, documentation-ready images:
//! a fixed width preset, a uniform background, an optional "viz" treatment
//! for charts and diagrams, a thin frame, and DPI metadata in the output.
//!
//! # Architecture
//!
//! ```text
//! Plan → Decode → Size check → Pad → Resize → Normalize color → (Enhance) → Border → Encode
//! ```
//!
//! The library holds no global state; every job is independent, so one
//! [`ScreenshotProcessor`] can be shared across worker threads.
//!
//! # Usage
//!
//! ```rust,ignore
//! use docshot_core::{Config, PlanRequest, ScreenshotProcessor, TransformSettings};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let settings = TransformSettings::from_config(&config)?;
//!     let processor = ScreenshotProcessor::new(&config, settings);
//!
//!     let outdir = config.outdir();
//!     let plan = processor.plan(&PlanRequest {
//!         input: "./shot.png".as_ref(),
//!         output: None,
//!         outdir: &outdir,
//!         size: processor.settings().size,
//!         extension: &processor.settings().extension,
//!     })?;
//!     for job in plan.jobs() {
//!         let result = processor.process(job, false)?;
//!         println!("{:?}", result.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, ProcessError};
pub use output::{RecordStatus, ReportFormat, ReportRecord, ReportWriter};
pub use pipeline::{Plan, PlanRequest, ScreenshotProcessor, TransformSettings};
pub use types::{
    BatchSummary, HexColor, Job, OutputFormat, ProcessResult, ProcessStatus, ScreenshotKind,
    SizePreset, SkipReason,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
