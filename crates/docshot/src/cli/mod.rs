//! Command handlers for the docshot CLI.

pub mod config;
pub mod process;
