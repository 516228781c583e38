//! Paginated link collector - the fetch/extract/dedupe loop
//!
//! One run walks result pages 1..=max_pages of a single query:
//! - fetches the page through a `PageFetcher`
//! - extracts and normalizes candidate links through a `LinkExtractor`
//! - de-duplicates against every link accepted earlier in the run
//! - stops on the first termination signal, then waits before the next page
//!
//! # Termination precedence
//!
//! | Order | Signal | Outcome |
//! |-------|--------|---------|
//! | 1 | Fetch failed / non-success status | `FetchFailed` (partial result) |
//! | 2 | No candidate links on the page | `EmptyPage` |
//! | 3 | No link on the page was new | `NoNewLinks` |
//! | 4 | Page reports no "next page" control | `NoNextPage` |
//! | 5 | `page == max_pages` | `PageCapReached` |
//!
//! Signals 2-4 can each be switched off through `TerminationPolicy`; the page
//! cap is always enforced.

use crate::crawler::delay::DelayRange;
use crate::crawler::seen::SeenSet;
use crate::crawler::traits::{LinkExtractor, PageContent, PageFetcher, Query};
use crate::state::{RunOutcome, StopReason};
use crate::{ConfigError, ConfigResult, UrlError};
use tokio_util::sync::CancellationToken;

/// Which content-based termination signals are honored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationPolicy {
    pub stop_on_empty_page: bool,
    pub stop_on_no_new_links: bool,
    pub stop_on_missing_next: bool,
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self {
            stop_on_empty_page: true,
            stop_on_no_new_links: true,
            stop_on_missing_next: true,
        }
    }
}

/// Settings for a collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Maximum number of pages to fetch (>= 1)
    pub max_pages: u32,

    /// Delay drawn between successful page fetches
    pub delay: DelayRange,

    /// Content-based termination signals
    pub policy: TerminationPolicy,
}

impl CollectorSettings {
    /// Validates the settings
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_pages < 1 {
            return Err(ConfigError::Validation(format!(
                "max_pages must be >= 1, got {}",
                self.max_pages
            )));
        }
        DelayRange::new(self.delay.min(), self.delay.max())?;
        Ok(())
    }
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            max_pages: 5,
            delay: DelayRange::default(),
            policy: TerminationPolicy::default(),
        }
    }
}

/// Progress information emitted after each fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageReport {
    /// The page just processed (1-based)
    pub page: u32,

    /// The configured page cap
    pub max_pages: u32,

    /// Candidate links extracted from this page
    pub candidates: usize,

    /// Links from this page that were not seen before
    pub new_links: usize,

    /// Unique links accepted so far in the run
    pub total_links: usize,
}

impl PageReport {
    /// Fraction of the page cap processed so far, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        (f64::from(self.page) / f64::from(self.max_pages)).min(1.0)
    }
}

/// Result of a collection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Unique normalized links in first-discovery order
    pub links: Vec<String>,

    /// Number of pages fetched successfully
    pub pages_fetched: u32,

    /// How the run ended
    pub outcome: RunOutcome,
}

impl RunResult {
    pub fn count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns true if the run ended on a termination signal
    pub fn is_complete(&self) -> bool {
        self.outcome.is_complete()
    }
}

/// Collects listing links across the result pages of one query
///
/// The collector holds only its settings; every `collect` call starts from a
/// fresh page index and seen set, so one collector can serve many runs.
#[derive(Debug, Clone)]
pub struct PaginatedLinkCollector {
    settings: CollectorSettings,
}

impl PaginatedLinkCollector {
    /// Creates a collector
    ///
    /// # Returns
    ///
    /// * `Ok(PaginatedLinkCollector)` - Settings are valid
    /// * `Err(ConfigError)` - `max_pages < 1` or reversed delay bounds
    pub fn new(settings: CollectorSettings) -> ConfigResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    /// Runs a collection without progress reporting
    ///
    /// See [`collect_with_progress`](Self::collect_with_progress).
    pub async fn collect<F, E>(
        &self,
        query: &str,
        fetcher: &F,
        extractor: &E,
        cancel: &CancellationToken,
    ) -> ConfigResult<RunResult>
    where
        F: PageFetcher,
        E: LinkExtractor,
    {
        self.collect_with_progress(query, fetcher, extractor, cancel, |_| {})
            .await
    }

    /// Runs a collection, calling `on_page` after every fetched page
    ///
    /// # Returns
    ///
    /// * `Ok(RunResult)` - The run started; the outcome tells whether it
    ///   completed or stopped early (fetch failure, cancellation)
    /// * `Err(ConfigError)` - The query was rejected; nothing was fetched
    pub async fn collect_with_progress<F, E, P>(
        &self,
        query: &str,
        fetcher: &F,
        extractor: &E,
        cancel: &CancellationToken,
        mut on_page: P,
    ) -> ConfigResult<RunResult>
    where
        F: PageFetcher,
        E: LinkExtractor,
        P: FnMut(&PageReport),
    {
        let query = Query::new(query)?;
        fetcher.check_query(&query)?;

        let max_pages = self.settings.max_pages;
        let mut seen = SeenSet::new();
        let mut pages_fetched = 0;
        let mut page = 1;

        tracing::info!("Collecting '{}' (up to {} pages)", query, max_pages);

        let outcome = loop {
            if cancel.is_cancelled() {
                tracing::info!("Run cancelled before page {}", page);
                break RunOutcome::Cancelled { page };
            }

            tracing::debug!("Fetching page {}/{}", page, max_pages);
            let content = match fetcher.fetch_page(&query, page).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Failed to fetch page {}: {}", page, e);
                    break RunOutcome::FetchFailed {
                        page,
                        reason: e.to_string(),
                    };
                }
            };
            pages_fetched += 1;

            let candidates = match extractor.extract_links(&content) {
                Ok(links) => links,
                Err(e) => {
                    tracing::warn!("Link extraction failed on page {}: {}", page, e);
                    Vec::new()
                }
            };

            let mut new_links = 0;
            for candidate in &candidates {
                match extractor.normalize(candidate) {
                    Ok(link) => {
                        if seen.insert(link) {
                            new_links += 1;
                        }
                    }
                    Err(UrlError::Filtered(link)) => {
                        tracing::trace!("Skipping non-listing link {}", link);
                    }
                    Err(e) => {
                        tracing::debug!("Skipping malformed link '{}': {}", candidate, e);
                    }
                }
            }

            tracing::info!(
                "Page {}: {} candidates, {} new, {} total",
                page,
                candidates.len(),
                new_links,
                seen.len()
            );

            on_page(&PageReport {
                page,
                max_pages,
                candidates: candidates.len(),
                new_links,
                total_links: seen.len(),
            });

            if let Some(reason) =
                self.stop_signal(page, candidates.is_empty(), new_links, &content, extractor)
            {
                tracing::info!("Stopping after page {}: {}", page, reason.describe());
                break RunOutcome::Completed { page, reason };
            }

            let delay = self.settings.delay.sample();
            tracing::debug!("Waiting {}ms before page {}", delay.as_millis(), page + 1);
            let cancelled = tokio::select! {
                _ = cancel.cancelled() => true,
                _ = tokio::time::sleep(delay) => false,
            };
            if cancelled {
                tracing::info!("Run cancelled before page {}", page + 1);
                break RunOutcome::Cancelled { page: page + 1 };
            }

            page += 1;
        };

        Ok(RunResult {
            links: seen.into_links(),
            pages_fetched,
            outcome,
        })
    }

    /// Evaluates the content-based signals and the page cap, in precedence order
    fn stop_signal<E: LinkExtractor>(
        &self,
        page: u32,
        empty: bool,
        new_links: usize,
        content: &PageContent,
        extractor: &E,
    ) -> Option<StopReason> {
        let policy = &self.settings.policy;

        if empty && policy.stop_on_empty_page {
            return Some(StopReason::EmptyPage);
        }

        if new_links == 0 && policy.stop_on_no_new_links {
            return Some(StopReason::NoNewLinks);
        }

        if policy.stop_on_missing_next && extractor.is_final_page(content) == Some(true) {
            return Some(StopReason::NoNextPage);
        }

        if page >= self.settings.max_pages {
            return Some(StopReason::PageCapReached);
        }

        None
    }
}
