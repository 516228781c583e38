//! Listing sources
//!
//! Each source knows how its site addresses result page N of a query, how
//! listings are marked up, whether pages expose a "next page" control, and
//! which links count as listings.
//!
//! | Source | Query | Extraction | Next-page signal | Default cap |
//! |--------|-------|------------|------------------|-------------|
//! | Amazon | search term | result cards | none | 5 |
//! | eBay | search term | item wrappers | "Next page" link | 5 |
//! | Walmart | search term | `/ip/` anchors | none | 5 |
//! | Airbnb | search URL | regex on raw markup | none | 1 |

mod airbnb;
mod amazon;
mod ebay;
mod walmart;

pub use airbnb::AirbnbSource;
pub use amazon::AmazonSource;
pub use ebay::EbaySource;
pub use walmart::WalmartSource;

use crate::config::{resolve_source, Config, ResolvedSource};
use crate::crawler::{build_http_client, CandidateLink, HttpFetcher, LinkExtractor, PageContent, Query};
use crate::{ConfigError, ConfigResult, ExtractError, UrlError, UrlResult};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Addresses the result pages of a site
pub trait SearchSource {
    /// Which site this is
    fn kind(&self) -> SourceKind;

    /// Builds the URL of result page `page` (1-based) for `query`
    fn page_url(&self, query: &Query, page: u32) -> UrlResult<Url>;

    /// Rejects queries the site cannot use
    fn check_query(&self, _query: &Query) -> ConfigResult<()> {
        Ok(())
    }
}

/// Supported listing sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Amazon,
    Ebay,
    Walmart,
    Airbnb,
}

/// Built-in settings of a source, before configuration overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceDefaults {
    pub max_pages: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub base_url: &'static str,
    pub csv_header: &'static str,
}

impl SourceKind {
    /// Returns the lowercase name used on the command line and in config
    pub fn name(&self) -> &'static str {
        match self {
            Self::Amazon => "amazon",
            Self::Ebay => "ebay",
            Self::Walmart => "walmart",
            Self::Airbnb => "airbnb",
        }
    }

    /// Returns all sources
    pub fn all() -> Vec<Self> {
        vec![Self::Amazon, Self::Ebay, Self::Walmart, Self::Airbnb]
    }

    /// Returns the built-in settings for this source
    pub fn defaults(&self) -> SourceDefaults {
        match self {
            Self::Amazon => SourceDefaults {
                max_pages: 5,
                min_delay_ms: 2000,
                max_delay_ms: 4000,
                base_url: "https://www.amazon.com",
                csv_header: "url",
            },
            Self::Ebay => SourceDefaults {
                max_pages: 5,
                min_delay_ms: 2000,
                max_delay_ms: 4000,
                base_url: "https://www.ebay.com",
                csv_header: "Product URL",
            },
            Self::Walmart => SourceDefaults {
                max_pages: 5,
                min_delay_ms: 1000,
                max_delay_ms: 3000,
                base_url: "https://www.walmart.com",
                csv_header: "Product URL",
            },
            Self::Airbnb => SourceDefaults {
                max_pages: 1,
                min_delay_ms: 0,
                max_delay_ms: 0,
                base_url: "https://www.airbnb.com",
                csv_header: "url",
            },
        }
    }

    /// Whether the query is a seed URL rather than a search term
    pub fn takes_url(&self) -> bool {
        matches!(self, Self::Airbnb)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amazon" => Ok(Self::Amazon),
            "ebay" => Ok(Self::Ebay),
            "walmart" => Ok(Self::Walmart),
            "airbnb" => Ok(Self::Airbnb),
            other => Err(ConfigError::Validation(format!(
                "unknown source '{}' (expected one of: amazon, ebay, walmart, airbnb)",
                other
            ))),
        }
    }
}

/// Any of the supported sources
///
/// Lets the caller pick a site at runtime while the collector stays generic.
#[derive(Debug, Clone)]
pub enum Source {
    Amazon(AmazonSource),
    Ebay(EbaySource),
    Walmart(WalmartSource),
    Airbnb(AirbnbSource),
}

impl Source {
    /// Builds the source of the given kind rooted at `base`
    pub fn new(kind: SourceKind, base: Url) -> Result<Self, ExtractError> {
        Ok(match kind {
            SourceKind::Amazon => Self::Amazon(AmazonSource::new(base)),
            SourceKind::Ebay => Self::Ebay(EbaySource::new(base)),
            SourceKind::Walmart => Self::Walmart(WalmartSource::new(base)),
            SourceKind::Airbnb => Self::Airbnb(AirbnbSource::new(base)?),
        })
    }
}

impl SearchSource for Source {
    fn kind(&self) -> SourceKind {
        match self {
            Self::Amazon(s) => s.kind(),
            Self::Ebay(s) => s.kind(),
            Self::Walmart(s) => s.kind(),
            Self::Airbnb(s) => s.kind(),
        }
    }

    fn page_url(&self, query: &Query, page: u32) -> UrlResult<Url> {
        match self {
            Self::Amazon(s) => s.page_url(query, page),
            Self::Ebay(s) => s.page_url(query, page),
            Self::Walmart(s) => s.page_url(query, page),
            Self::Airbnb(s) => s.page_url(query, page),
        }
    }

    fn check_query(&self, query: &Query) -> ConfigResult<()> {
        match self {
            Self::Amazon(s) => s.check_query(query),
            Self::Ebay(s) => s.check_query(query),
            Self::Walmart(s) => s.check_query(query),
            Self::Airbnb(s) => s.check_query(query),
        }
    }
}

impl LinkExtractor for Source {
    fn extract_links(&self, content: &PageContent) -> Result<Vec<CandidateLink>, ExtractError> {
        match self {
            Self::Amazon(s) => s.extract_links(content),
            Self::Ebay(s) => s.extract_links(content),
            Self::Walmart(s) => s.extract_links(content),
            Self::Airbnb(s) => s.extract_links(content),
        }
    }

    fn is_final_page(&self, content: &PageContent) -> Option<bool> {
        match self {
            Self::Amazon(s) => s.is_final_page(content),
            Self::Ebay(s) => s.is_final_page(content),
            Self::Walmart(s) => s.is_final_page(content),
            Self::Airbnb(s) => s.is_final_page(content),
        }
    }

    fn normalize(&self, link: &str) -> UrlResult<String> {
        match self {
            Self::Amazon(s) => s.normalize(link),
            Self::Ebay(s) => s.normalize(link),
            Self::Walmart(s) => s.normalize(link),
            Self::Airbnb(s) => s.normalize(link),
        }
    }
}

/// Everything needed to start collecting from one source
#[derive(Debug)]
pub struct PreparedRun {
    /// Effective settings after all configuration layers
    pub resolved: ResolvedSource,

    /// The validated query
    pub query: Query,

    /// URL of the first result page
    pub first_page: Url,

    /// HTTP fetcher bound to the source
    pub fetcher: HttpFetcher<Source>,
}

/// Resolves settings, validates the query and builds the fetcher for a run
///
/// Nothing is fetched; every error here is raised before the network is
/// touched.
///
/// # Arguments
///
/// * `config` - The loaded (or default) configuration
/// * `kind` - The source to collect from
/// * `query` - Search term, or seed URL for sources that take one
/// * `max_pages` - Page cap given on the command line, if any
///
/// # Returns
///
/// * `Ok(PreparedRun)` - Ready to hand to a collector
/// * `Err(SweepError)` - Invalid settings or query, or the HTTP client
///   could not be built
pub fn prepare_run(
    config: &Config,
    kind: SourceKind,
    query: &str,
    max_pages: Option<u32>,
) -> crate::Result<PreparedRun> {
    let resolved = resolve_source(config, kind, max_pages)?;
    let query = Query::new(query)?;

    let source = Source::new(kind, resolved.base_url.clone())?;
    source.check_query(&query)?;
    let first_page = source.page_url(&query, 1)?;

    let client = build_http_client(&config.http)?;
    tracing::debug!("Prepared {} run starting at {}", kind, first_page);

    Ok(PreparedRun {
        resolved,
        query,
        first_page,
        fetcher: HttpFetcher::new(client, source),
    })
}

/// Builds `{base}{path}?{params}` with form-style encoding (spaces as `+`)
fn search_url(base: &Url, path: &str, params: &[(&str, &str)]) -> UrlResult<Url> {
    let mut url = base
        .join(path)
        .map_err(|e| UrlError::Parse(format!("{}{}: {}", base, path, e)))?;
    url.query_pairs_mut().clear().extend_pairs(params);
    Ok(url)
}
