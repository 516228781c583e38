use crate::{UrlError, UrlResult};
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Resolves a candidate link and normalizes it for de-duplication
///
/// # Normalization Steps
///
/// 1. Reject empty hrefs, fragment-only hrefs and `javascript:`, `mailto:`,
///    `tel:` and `data:` links
/// 2. Resolve the href against `base` (absolute hrefs are kept as-is)
/// 3. Reject anything that is not HTTP or HTTPS, or has no host
/// 4. Remove fragment (everything after #)
/// 5. Remove the query string entirely if `strip_query` is set, otherwise
///    remove only tracking parameters, keeping the order of the rest
/// 6. Remove empty query string (trailing ?)
///
/// # Arguments
///
/// * `href` - The raw link as found in the page
/// * `base` - The base URL for resolving relative links
/// * `strip_query` - Whether to drop the whole query string
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to resolve or normalize the link
///
/// # Examples
///
/// ```
/// use listing_sweep::url::normalize_link;
/// use url::Url;
///
/// let base = Url::parse("https://www.amazon.com").unwrap();
/// let url = normalize_link("/dp/B0C1?th=1&utm_source=x#reviews", &base, false).unwrap();
/// assert_eq!(url.as_str(), "https://www.amazon.com/dp/B0C1?th=1");
/// ```
pub fn normalize_link(href: &str, base: &Url, strip_query: bool) -> UrlResult<Url> {
    let href = href.trim();

    // Step 1: Skip links that never point at another page
    if href.is_empty() {
        return Err(UrlError::Parse("empty link".to_string()));
    }

    if href.starts_with('#') {
        return Err(UrlError::Parse(format!("fragment-only link: {}", href)));
    }

    let lowered = href.to_ascii_lowercase();
    for scheme in ["javascript:", "mailto:", "tel:", "data:"] {
        if lowered.starts_with(scheme) {
            return Err(UrlError::InvalidScheme(scheme.trim_end_matches(':').to_string()));
        }
    }

    // Step 2: Resolve against the base URL
    let mut url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    // Step 3: Validate scheme and host
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    // Step 4: Remove fragment
    url.set_fragment(None);

    // Step 5 & 6: Drop or filter query parameters
    if strip_query {
        url.set_query(None);
    } else if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let had_tracking = kept.len() != url.query_pairs().count();
        if kept.is_empty() {
            url.set_query(None);
        } else if had_tracking {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Ok(url)
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
