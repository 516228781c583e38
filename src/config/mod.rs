//! Configuration module for Listing-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and resolving the effective settings for one source.
//!
//! # Example
//!
//! ```no_run
//! use listing_sweep::config::{load_config, resolve_source};
//! use listing_sweep::SourceKind;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! let resolved = resolve_source(&config, SourceKind::Ebay, None).unwrap();
//! println!("Will fetch up to {} pages", resolved.settings.max_pages);
//! ```

mod parser;
mod resolve;
mod types;
mod validation;

// Re-export types
pub use resolve::{resolve_source, ResolvedSource};
pub use types::{CollectorConfig, Config, HttpConfig, OutputConfig, SourceOverride};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
