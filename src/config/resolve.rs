//! Resolution of effective per-run settings
//!
//! Layers, lowest precedence first:
//! 1. Built-in source defaults
//! 2. `[collector]` section
//! 3. `[sources.<name>]` section
//! 4. Command-line overrides

use crate::config::types::Config;
use crate::crawler::{CollectorSettings, DelayRange, TerminationPolicy};
use crate::sources::SourceKind;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Effective settings for collecting from one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub kind: SourceKind,
    pub base_url: Url,
    pub settings: CollectorSettings,
    pub csv_header: String,
}

/// Resolves the settings for `kind`
///
/// # Arguments
///
/// * `config` - The loaded (or default) configuration
/// * `kind` - The source to collect from
/// * `max_pages` - Page cap given on the command line, if any
///
/// # Returns
///
/// * `Ok(ResolvedSource)` - Valid settings
/// * `Err(ConfigError)` - The layers combine into invalid settings
pub fn resolve_source(
    config: &Config,
    kind: SourceKind,
    max_pages: Option<u32>,
) -> ConfigResult<ResolvedSource> {
    let defaults = kind.defaults();
    let overrides = config.sources.get(kind.name());

    let max_pages = max_pages
        .or_else(|| overrides.and_then(|o| o.max_pages))
        .or(config.collector.max_pages)
        .unwrap_or(defaults.max_pages);

    let min_delay_ms = overrides
        .and_then(|o| o.min_delay_ms)
        .or(config.collector.min_delay_ms)
        .unwrap_or(defaults.min_delay_ms);
    let max_delay_ms = overrides
        .and_then(|o| o.max_delay_ms)
        .or(config.collector.max_delay_ms)
        .unwrap_or(defaults.max_delay_ms);

    let base_url = overrides
        .and_then(|o| o.base_url.as_deref())
        .unwrap_or(defaults.base_url);
    let base_url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("base URL '{}': {}", base_url, e)))?;

    let settings = CollectorSettings {
        max_pages,
        delay: DelayRange::from_millis(min_delay_ms, max_delay_ms)?,
        policy: TerminationPolicy {
            stop_on_empty_page: config.collector.stop_on_empty_page,
            stop_on_no_new_links: config.collector.stop_on_no_new_links,
            stop_on_missing_next: config.collector.stop_on_missing_next,
        },
    };
    settings.validate()?;

    let csv_header = config
        .output
        .header
        .clone()
        .unwrap_or_else(|| defaults.csv_header.to_string());

    Ok(ResolvedSource {
        kind,
        base_url,
        settings,
        csv_header,
    })
}
