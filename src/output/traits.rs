//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! errors they raise.

use crate::crawler::RunResult;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for persisting the links of a run
pub trait OutputHandler {
    /// Writes every link of `result`, returning the number of rows written
    fn write_result(&mut self, result: &RunResult) -> OutputResult<usize>;

    /// Flushes buffered output
    fn finish(&mut self) -> OutputResult<()>;
}
