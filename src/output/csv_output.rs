//! CSV output
//!
//! One header column followed by one row per link, in discovery order.

use crate::crawler::{Query, RunResult};
use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::sources::SourceKind;
use chrono::{DateTime, TimeZone};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Longest query fragment kept in generated file names
const MAX_SLUG_LEN: usize = 40;

/// Writes run results as a single-column CSV
pub struct CsvOutputHandler<W: Write> {
    writer: csv::Writer<W>,
    header: String,
    header_written: bool,
}

impl CsvOutputHandler<File> {
    /// Creates (or truncates) the CSV file at `path`
    pub fn create(path: &Path, header: &str) -> OutputResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let writer = csv::Writer::from_path(path)?;
        Ok(Self::with_writer(writer, header))
    }
}

impl<W: Write> CsvOutputHandler<W> {
    /// Wraps any writer, e.g. a `Vec<u8>` in tests
    pub fn from_writer(inner: W, header: &str) -> Self {
        Self::with_writer(csv::Writer::from_writer(inner), header)
    }

    fn with_writer(writer: csv::Writer<W>, header: &str) -> Self {
        Self {
            writer,
            header: header.to_string(),
            header_written: false,
        }
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::Write(e.to_string()))
    }
}

impl<W: Write> OutputHandler for CsvOutputHandler<W> {
    fn write_result(&mut self, result: &RunResult) -> OutputResult<usize> {
        if !self.header_written {
            self.writer.write_record([self.header.as_str()])?;
            self.header_written = true;
        }

        for link in &result.links {
            self.writer.write_record([link.as_str()])?;
        }

        Ok(result.links.len())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Builds the default output file name for a run
///
/// Format: `{source}_{query-slug}_{YYYYmmdd_HHMMSS}.csv`
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use listing_sweep::crawler::Query;
/// use listing_sweep::output::default_file_name;
/// use listing_sweep::SourceKind;
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
/// let query = Query::new("s24 ultra").unwrap();
/// assert_eq!(
///     default_file_name(SourceKind::Ebay, &query, &at),
///     "ebay_s24_ultra_20240501_093000.csv"
/// );
/// ```
pub fn default_file_name<Tz>(source: SourceKind, query: &Query, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let slug = query_slug(source, query);
    let timestamp = at.format("%Y%m%d_%H%M%S");
    if slug.is_empty() {
        format!("{}_results_{}.csv", source, timestamp)
    } else {
        format!("{}_{}_{}.csv", source, slug, timestamp)
    }
}

/// Reduces a query to lowercase alphanumerics joined by underscores
///
/// URL queries contribute only their path, so `https://www.airbnb.com/s/Lisbon/homes`
/// becomes `s_lisbon_homes`.
fn query_slug(source: SourceKind, query: &Query) -> String {
    let text = if source.takes_url() {
        url::Url::parse(query.as_str())
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| query.as_str().to_string())
    } else {
        query.as_str().to_string()
    };

    let mut slug = String::new();
    for word in text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !slug.is_empty() {
            slug.push('_');
        }
        slug.push_str(&word.to_ascii_lowercase());
        if slug.len() >= MAX_SLUG_LEN {
            slug.truncate(MAX_SLUG_LEN);
            break;
        }
    }
    slug
}
