//! Run summary printed at the end of a collection run

use crate::crawler::RunResult;
use crate::sources::SourceKind;
use crate::state::RunOutcome;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::time::Duration;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The site that was swept
    pub source: SourceKind,

    /// The search term or seed URL
    pub query: String,

    /// When the run started
    pub started_at: DateTime<Local>,

    /// Wall-clock time of the run
    pub duration: Duration,

    /// Number of result pages fetched successfully
    pub pages_fetched: u32,

    /// The page cap in effect
    pub max_pages: u32,

    /// Number of unique links collected
    pub total_links: usize,

    /// How the run ended
    pub outcome: RunOutcome,

    /// Where the links were written, if anywhere
    pub output_path: Option<PathBuf>,
}

impl RunSummary {
    /// Builds a summary from a finished run
    pub fn from_result(
        source: SourceKind,
        query: &str,
        max_pages: u32,
        started_at: DateTime<Local>,
        duration: Duration,
        result: &RunResult,
    ) -> Self {
        Self {
            source,
            query: query.to_string(),
            started_at,
            duration,
            pages_fetched: result.pages_fetched,
            max_pages,
            total_links: result.count(),
            outcome: result.outcome.clone(),
            output_path: None,
        }
    }

    /// Records where the links were written
    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.output_path = Some(path);
        self
    }

    /// Average number of new links per fetched page
    pub fn links_per_page(&self) -> f64 {
        if self.pages_fetched == 0 {
            0.0
        } else {
            self.total_links as f64 / self.pages_fetched as f64
        }
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("\n=== Sweep Summary ===\n");

    println!("Run:");
    println!("  Source: {}", summary.source);
    println!("  Query: {}", summary.query);
    println!(
        "  Started: {}",
        summary.started_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("  Duration: {:.1}s", summary.duration.as_secs_f64());
    println!();

    println!("Results:");
    println!(
        "  Pages fetched: {} of {}",
        summary.pages_fetched, summary.max_pages
    );
    println!("  Unique links: {}", summary.total_links);
    println!("  Links per page: {:.1}", summary.links_per_page());
    println!("  Outcome: {}", summary.outcome);

    if let RunOutcome::FetchFailed { .. } = summary.outcome {
        println!("  Partial results were kept");
    }

    if let Some(path) = &summary.output_path {
        println!();
        println!("Saved {} links to {}", summary.total_links, path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StopReason;

    fn run_result(links: usize, pages: u32) -> RunResult {
        RunResult {
            links: (0..links).map(|i| format!("https://a.test/{}", i)).collect(),
            pages_fetched: pages,
            outcome: RunOutcome::Completed {
                page: pages,
                reason: StopReason::NoNewLinks,
            },
        }
    }

    #[test]
    fn test_from_result() {
        let summary = RunSummary::from_result(
            SourceKind::Ebay,
            "lamp",
            5,
            Local::now(),
            Duration::from_secs(3),
            &run_result(6, 3),
        );

        assert_eq!(summary.total_links, 6);
        assert_eq!(summary.pages_fetched, 3);
        assert_eq!(summary.max_pages, 5);
        assert!(summary.output_path.is_none());
        assert!((summary.links_per_page() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_links_per_page_without_pages() {
        let summary = RunSummary::from_result(
            SourceKind::Amazon,
            "lamp",
            5,
            Local::now(),
            Duration::ZERO,
            &run_result(0, 0),
        );
        assert_eq!(summary.links_per_page(), 0.0);
    }

    #[test]
    fn test_with_output_path() {
        let summary = RunSummary::from_result(
            SourceKind::Walmart,
            "lamp",
            5,
            Local::now(),
            Duration::ZERO,
            &run_result(1, 1),
        )
        .with_output_path(PathBuf::from("out.csv"));
        assert_eq!(summary.output_path, Some(PathBuf::from("out.csv")));
    }
}
