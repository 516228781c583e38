use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure for Listing-Sweep
///
/// Every section is optional; missing sections and keys fall back to the
/// defaults below and to the per-source defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub collector: CollectorConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
    /// Per-source overrides keyed by source name (`amazon`, `ebay`, ...)
    pub sources: HashMap<String, SourceOverride>,
}

/// Pagination and termination settings shared by all sources
///
/// Unset values defer to the selected source's defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Maximum number of result pages to fetch
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Lower bound of the delay between page fetches (milliseconds)
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: Option<u64>,

    /// Upper bound of the delay between page fetches (milliseconds)
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: Option<u64>,

    /// Stop when a page yields no candidate links
    #[serde(rename = "stop-on-empty-page")]
    pub stop_on_empty_page: bool,

    /// Stop when every link on a page was already seen
    #[serde(rename = "stop-on-no-new-links")]
    pub stop_on_no_new_links: bool,

    /// Stop when a page has no "next page" control
    #[serde(rename = "stop-on-missing-next")]
    pub stop_on_missing_next: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            min_delay_ms: None,
            max_delay_ms: None,
            stop_on_empty_page: true,
            stop_on_no_new_links: true,
            stop_on_missing_next: true,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept-Language header sent with every request
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory CSV files are written to
    pub directory: String,

    /// CSV header column; defaults to the source's header
    pub header: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            header: None,
        }
    }
}

/// Overrides for a single source
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceOverride {
    /// Maximum number of result pages to fetch
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Lower bound of the delay between page fetches (milliseconds)
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: Option<u64>,

    /// Upper bound of the delay between page fetches (milliseconds)
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: Option<u64>,

    /// Site root used to build search URLs and resolve relative links
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,
}
