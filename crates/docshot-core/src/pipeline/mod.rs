//! Screenshot processing pipeline components.
//!
//! - **discovery**: Find image files in a directory
//! - **plan**: Derive output paths and reject invalid option combinations
//! - **decode**: Size check, load and decode images
//! - **transform**: Pad, resize, normalize, enhance, border
//! - **enhance**: Contrast and sharpness filters used by viz mode
//! - **encode**: Format-specific encoding with DPI metadata
//! - **processor**: Runs one job end to end

pub mod decode;
pub mod discovery;
pub mod encode;
pub mod enhance;
pub mod plan;
pub mod processor;
pub mod transform;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::FileDiscovery;
pub use plan::{Plan, PlanRequest};
pub use processor::ScreenshotProcessor;
pub use transform::{transform, TransformSettings};
