/// Run outcome definitions for paginated collection
///
/// This module defines the termination signals a run can end on and the
/// overall outcome reported to the caller.
use std::fmt;

/// The termination signal that ended a run normally
///
/// Variants are listed in precedence order: when several signals fire on the
/// same page, the first one listed wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The page yielded no candidate links
    EmptyPage,

    /// Every link on the page had already been seen
    NoNewLinks,

    /// The page has no "next page" control
    NoNextPage,

    /// The configured maximum number of pages was fetched
    PageCapReached,
}

impl StopReason {
    /// Returns the short machine-readable name of this reason
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyPage => "empty_page",
            Self::NoNewLinks => "no_new_links",
            Self::NoNextPage => "no_next_page",
            Self::PageCapReached => "page_cap_reached",
        }
    }

    /// Returns a human-readable description
    pub fn describe(&self) -> &'static str {
        match self {
            Self::EmptyPage => "no more results",
            Self::NoNewLinks => "page repeated links already seen",
            Self::NoNextPage => "no next page control",
            Self::PageCapReached => "page limit reached",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a collection run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A termination signal fired on `page`
    Completed { page: u32, reason: StopReason },

    /// Fetching `page` failed; links from earlier pages are kept
    FetchFailed { page: u32, reason: String },

    /// The caller cancelled the run before `page` was fetched
    Cancelled { page: u32 },
}

impl RunOutcome {
    /// Returns true if the run ended on a termination signal
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Returns true if the run stopped before a termination signal fired
    pub fn is_early_stop(&self) -> bool {
        !self.is_complete()
    }

    /// Returns the stop reason for completed runs
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Completed { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Returns the page the run ended on
    pub fn page(&self) -> u32 {
        match self {
            Self::Completed { page, .. }
            | Self::FetchFailed { page, .. }
            | Self::Cancelled { page } => *page,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed { page, reason } => {
                write!(f, "completed on page {} ({})", page, reason.describe())
            }
            Self::FetchFailed { page, reason } => {
                write!(f, "stopped early - network error on page {}: {}", page, reason)
            }
            Self::Cancelled { page } => write!(f, "cancelled before page {}", page),
        }
    }
}
