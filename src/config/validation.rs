use crate::config::types::{CollectorConfig, Config, HttpConfig, OutputConfig, SourceOverride};
use crate::sources::SourceKind;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_collector_config(&config.collector)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    for (name, entry) in &config.sources {
        validate_source_override(name, entry)?;
    }
    Ok(())
}

/// Validates collector configuration
fn validate_collector_config(config: &CollectorConfig) -> Result<(), ConfigError> {
    validate_max_pages("collector", config.max_pages)?;
    validate_delay_bounds("collector", config.min_delay_ms, config.max_delay_ms)
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.user_agent.chars().any(char::is_control) {
        return Err(ConfigError::Validation(
            "user-agent cannot contain control characters".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if let Some(header) = &config.header {
        if header.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output header cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates a `[sources.<name>]` entry
fn validate_source_override(name: &str, entry: &SourceOverride) -> Result<(), ConfigError> {
    let kind: SourceKind = name.parse()?;
    let section = format!("sources.{}", kind);

    validate_max_pages(&section, entry.max_pages)?;
    validate_delay_bounds(&section, entry.min_delay_ms, entry.max_delay_ms)?;

    if let Some(base_url) = &entry.base_url {
        validate_base_url(&section, base_url)?;
    }

    Ok(())
}

fn validate_max_pages(section: &str, max_pages: Option<u32>) -> Result<(), ConfigError> {
    match max_pages {
        Some(0) => Err(ConfigError::Validation(format!(
            "{}: max-pages must be >= 1, got 0",
            section
        ))),
        _ => Ok(()),
    }
}

/// Checks delay bounds when both are given in the same section
///
/// Bounds split across sections are checked again once resolved.
fn validate_delay_bounds(
    section: &str,
    min_ms: Option<u64>,
    max_ms: Option<u64>,
) -> Result<(), ConfigError> {
    if let (Some(min), Some(max)) = (min_ms, max_ms) {
        if min > max {
            return Err(ConfigError::Validation(format!(
                "{}: min-delay-ms ({}) must not exceed max-delay-ms ({})",
                section, min, max
            )));
        }
    }
    Ok(())
}

fn validate_base_url(section: &str, base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: base-url '{}': {}", section, base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{}: base-url '{}' must use HTTP or HTTPS",
            section, base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{}: base-url '{}' has no host",
            section, base_url
        )));
    }

    Ok(())
}
