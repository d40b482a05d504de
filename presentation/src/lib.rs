//! Presentation layer for roundtable
//!
//! This crate contains CLI definitions, transcript formatters,
//! and streaming progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::TranscriptFormatter;
pub use progress::reporter::{SimpleProgress, StreamingReporter};
