//! Output module for persisting and reporting run results
//!
//! This module handles:
//! - Writing collected links to CSV
//! - Naming output files after the source, query and time
//! - Printing a summary of the run

mod csv_output;
mod summary;
mod traits;

pub use csv_output::{default_file_name, CsvOutputHandler};
pub use summary::{print_summary, RunSummary};
pub use traits::{OutputError, OutputHandler, OutputResult};

use crate::crawler::RunResult;
use std::path::Path;

/// Writes `result` as CSV to `path`, returning the number of links written
pub fn write_csv(path: &Path, header: &str, result: &RunResult) -> OutputResult<usize> {
    let mut handler = CsvOutputHandler::create(path, header)?;
    let written = handler.write_result(result)?;
    handler.finish()?;
    tracing::info!("Wrote {} links to {}", written, path.display());
    Ok(written)
}
