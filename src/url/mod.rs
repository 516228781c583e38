//! URL handling module for Listing-Sweep
//!
//! This module provides candidate-link resolution and normalization, and the
//! `LinkRule` predicate each source uses to decide which links are listings.

mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use normalize::normalize_link;

/// Predicate and normalization rule for candidate links
///
/// A link is accepted when it resolves against `base` to an HTTP(S) URL
/// whose path contains `required_path` (if set). Accepted links are returned
/// in normalized form, which is also the key used for de-duplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRule {
    base: Url,
    required_path: Option<String>,
    strip_query: bool,
}

impl LinkRule {
    /// Creates a rule that resolves links against `base` and accepts any path
    pub fn new(base: Url) -> Self {
        Self {
            base,
            required_path: None,
            strip_query: false,
        }
    }

    /// Only accept links whose path contains `segment` (e.g. `/itm/`)
    pub fn require_path(mut self, segment: impl Into<String>) -> Self {
        self.required_path = Some(segment.into());
        self
    }

    /// Drop the whole query string instead of only tracking parameters
    pub fn strip_query(mut self, strip: bool) -> Self {
        self.strip_query = strip;
        self
    }

    /// The base URL relative links are resolved against
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves, normalizes and filters a candidate link
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The normalized link
    /// * `Err(UrlError::Filtered)` - The link is valid but not a listing link
    /// * `Err(UrlError)` - The link could not be resolved
    ///
    /// # Examples
    ///
    /// ```
    /// use listing_sweep::url::LinkRule;
    /// use url::Url;
    ///
    /// let rule = LinkRule::new(Url::parse("https://www.ebay.com").unwrap())
    ///     .require_path("/itm/")
    ///     .strip_query(true);
    /// let link = rule.apply("https://www.ebay.com/itm/123?hash=abc").unwrap();
    /// assert_eq!(link, "https://www.ebay.com/itm/123");
    /// assert!(rule.apply("/sch/i.html?_nkw=phone").is_err());
    /// ```
    pub fn apply(&self, href: &str) -> UrlResult<String> {
        let url = normalize_link(href, &self.base, self.strip_query)?;

        if let Some(required) = &self.required_path {
            if !url.path().contains(required.as_str()) {
                return Err(UrlError::Filtered(url.to_string()));
            }
        }

        Ok(url.to_string())
    }
}
