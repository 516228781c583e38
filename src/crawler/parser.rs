//! HTML helpers shared by the listing sources
//!
//! Sources describe their markup with CSS selectors or a regular expression;
//! this module turns those descriptions into raw `href` values in document
//! order. Resolution and filtering happen later, in the source's `LinkRule`.

use crate::ExtractError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Parses a CSS selector, mapping failures to `ExtractError::Selector`
pub fn parse_selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Collects `href` values of elements matching `link_css` inside each
/// element matching `container_css`
///
/// Only the first matching link per container is taken; containers without
/// one are skipped. When `container_css` matches nothing, an empty vector is
/// returned.
///
/// # Example
///
/// ```
/// use listing_sweep::crawler::hrefs_in_containers;
/// use scraper::Html;
///
/// let html = r#"<div class="card"><a class="go" href="/p/1">One</a></div>"#;
/// let document = Html::parse_document(html);
/// let hrefs = hrefs_in_containers(&document, "div.card", "a.go").unwrap();
/// assert_eq!(hrefs, vec!["/p/1".to_string()]);
/// ```
pub fn hrefs_in_containers(
    document: &Html,
    container_css: &str,
    link_css: &str,
) -> Result<Vec<String>, ExtractError> {
    let containers = parse_selector(container_css)?;
    let link = parse_selector(link_css)?;

    Ok(document
        .select(&containers)
        .filter_map(|container| first_href(container, &link))
        .collect())
}

/// Collects `href` values of every element matching `css`
pub fn hrefs_matching(document: &Html, css: &str) -> Result<Vec<String>, ExtractError> {
    let selector = parse_selector(css)?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect())
}

/// Returns true if any element matches `css`
pub fn has_element(document: &Html, css: &str) -> Result<bool, ExtractError> {
    let selector = parse_selector(css)?;
    Ok(document.select(&selector).next().is_some())
}

/// Returns the number of elements matching `css`
pub fn count_elements(document: &Html, css: &str) -> Result<usize, ExtractError> {
    let selector = parse_selector(css)?;
    Ok(document.select(&selector).count())
}

/// Collects the first capture group of every match of `pattern` in raw markup
///
/// HTML entities (named and numeric) are decoded, since the pattern runs on
/// undecoded source text.
pub fn captures_in_markup(html: &str, pattern: &Regex) -> Vec<String> {
    pattern
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
        .collect()
}

/// Finds the `href` of the first element matching `link` within `container`
///
/// The container itself counts when it matches, so a bare `<a>` can stand in
/// for its own wrapper.
fn first_href(container: ElementRef<'_>, link: &Selector) -> Option<String> {
    if link.matches(&container) {
        return container.value().attr("href").map(str::to_string);
    }

    container
        .select(link)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hrefs_in_containers() {
        let html = r#"
            <html><body>
                <div class="card"><a class="go" href="/p/1">One</a><a class="go" href="/p/1b">Dup</a></div>
                <div class="card"><span>No link</span></div>
                <div class="card"><a class="go" href="/p/2">Two</a></div>
                <a class="go" href="/outside">Outside</a>
            </body></html>
        "#;
        let document = Html::parse_document(html);
        let hrefs = hrefs_in_containers(&document, "div.card", "a.go").unwrap();
        assert_eq!(hrefs, vec!["/p/1", "/p/2"]);
    }

    #[test]
    fn test_container_is_link() {
        let html = r#"<a class="item" href="/itm/1">One</a>"#;
        let document = Html::parse_document(html);
        let hrefs = hrefs_in_containers(&document, "a.item", "a.item").unwrap();
        assert_eq!(hrefs, vec!["/itm/1"]);
    }

    #[test]
    fn test_hrefs_matching_attribute_substring() {
        let html = r#"
            <a href="/ip/Widget/1">W</a>
            <a href="/browse/toys">T</a>
            <a href="https://www.walmart.com/ip/Gadget/2?from=x">G</a>
        "#;
        let document = Html::parse_document(html);
        let hrefs = hrefs_matching(&document, r#"a[href*="/ip/"]"#).unwrap();
        assert_eq!(
            hrefs,
            vec!["/ip/Widget/1", "https://www.walmart.com/ip/Gadget/2?from=x"]
        );
    }

    #[test]
    fn test_entities_decoded_by_parser() {
        let html = r#"<a href="/ip/1?a=1&amp;b=2">W</a>"#;
        let document = Html::parse_document(html);
        let hrefs = hrefs_matching(&document, "a").unwrap();
        assert_eq!(hrefs, vec!["/ip/1?a=1&b=2"]);
    }

    #[test]
    fn test_has_element() {
        let document = Html::parse_document(r#"<a aria-label="Next page" href="?p=2">Next</a>"#);
        assert!(has_element(&document, r#"a[aria-label="Next page"]"#).unwrap());
        assert!(!has_element(&document, "div.missing").unwrap());
    }

    #[test]
    fn test_count_elements() {
        let document = Html::parse_document(r#"<p>1</p><p>2</p>"#);
        assert_eq!(count_elements(&document, "p").unwrap(), 2);
    }

    #[test]
    fn test_invalid_selector() {
        let document = Html::parse_document("<p></p>");
        let result = has_element(&document, "div[[");
        assert!(matches!(result, Err(ExtractError::Selector { .. })));
    }

    #[test]
    fn test_captures_in_markup() {
        let pattern = Regex::new(r#"href="(/rooms/\d+[^"]*)""#).unwrap();
        let html = r#"<a href="/rooms/12?adults=2&amp;children=0">x</a><a href="/help">h</a><a href="/rooms/34">y</a>"#;
        assert_eq!(
            captures_in_markup(html, &pattern),
            vec!["/rooms/12?adults=2&children=0", "/rooms/34"]
        );
    }

    #[test]
    fn test_captures_decode_numeric_entities() {
        let pattern = Regex::new(r#"href="(/rooms/\d+[^"]*)""#).unwrap();
        let html = concat!(
            r#"<a href="/rooms/1?q=a&amp;amp;b">1</a>"#,
            r#"<a href="/rooms/2?a=1&#38;b=2">2</a>"#,
            r#"<a href="/rooms/3?a=1&#x26;b=2">3</a>"#,
        );
        assert_eq!(
            captures_in_markup(html, &pattern),
            vec!["/rooms/1?q=a&amp;b", "/rooms/2?a=1&b=2", "/rooms/3?a=1&b=2"]
        );
    }
}
