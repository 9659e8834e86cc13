//! Page extraction
//!
//! Turns a fetched forum page into a typed [`PageRecord`]. There is one
//! extractor per record kind; the set is closed and selected by kind.
//!
//! All rules target the youBBS markup. They run synchronously over a parsed
//! document and only the user extractor awaits afterwards, to embed the
//! avatar it found.

mod article;
mod category;
mod user;

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

use crate::crawler::{FetchError, PageFetcher};
use crate::record::{PageRecord, RecordKind};

/// Errors raised when a page does not have the expected shape
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing element '{0}'")]
    MissingElement(String),

    #[error("missing {0}")]
    MissingValue(&'static str),

    #[error("no date found in '{0}'")]
    BadDate(String),

    #[error("invalid selector '{0}'")]
    Selector(String),

    #[error("avatar {url}: {source}")]
    Avatar { url: String, source: FetchError },
}

/// Everything an extractor needs besides the page itself
pub struct ExtractContext<'a> {
    /// ID the page was requested for
    pub id: u64,

    /// Address the page was fetched from, used to resolve relative links
    pub page_url: &'a Url,

    /// Offset the forum prints its dates in
    pub offset: FixedOffset,

    /// Fetcher for secondary resources
    pub fetcher: &'a dyn PageFetcher,
}

/// Extraction rules, one per record kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    Article,
    User,
    Category,
}

impl Extractor {
    /// Returns the extractor for a record kind
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Article => Self::Article,
            RecordKind::User => Self::User,
            RecordKind::Category => Self::Category,
        }
    }

    /// Builds a record from a page's HTML
    pub async fn extract(
        &self,
        html: &str,
        ctx: &ExtractContext<'_>,
    ) -> Result<PageRecord, ExtractError> {
        match self {
            Self::Article => article::extract(html, ctx).map(PageRecord::Article),
            Self::User => user::extract(html, ctx).await.map(PageRecord::User),
            Self::Category => category::extract(html, ctx).map(PageRecord::Category),
        }
    }
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}

/// Returns the page's `.main-content` element
fn main_content(document: &Html) -> Result<ElementRef<'_>, ExtractError> {
    document
        .select(&selector(".main-content")?)
        .next()
        .ok_or_else(|| ExtractError::MissingElement(".main-content".to_string()))
}

/// Returns the first element matching `css` below `scope`
fn select_one<'a>(scope: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>, ExtractError> {
    scope
        .select(&selector(css)?)
        .next()
        .ok_or_else(|| ExtractError::MissingElement(css.to_string()))
}

/// Returns the trimmed text content of an element
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Returns the `content` of `<meta name="...">`
fn meta_content(document: &Html, name: &str) -> Result<Option<String>, ExtractError> {
    let css = format!("meta[name=\"{}\"]", name);
    Ok(document
        .select(&selector(&css)?)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string()))
}

/// Pulls the numeric ID out of a forum link like `/member/42`
fn id_from_link(text: &str, segment: &str) -> Option<u64> {
    let pattern = format!(r"/{}/(\d+)", regex::escape(segment));
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Finds the first `YYYY-MM-DD` in `text` and reads it as midnight at `offset`
fn parse_date(text: &str, offset: FixedOffset) -> Result<DateTime<Utc>, ExtractError> {
    static DATE: OnceLock<Regex> = OnceLock::new();
    let re = DATE.get_or_init(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("valid date regex"));

    let bad_date = || ExtractError::BadDate(text.trim().chars().take(80).collect());

    let matched = re.captures(text).and_then(|c| c.get(1)).ok_or_else(bad_date)?;
    let date = NaiveDate::parse_from_str(matched.as_str(), "%Y-%m-%d").map_err(|_| bad_date())?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(bad_date)?;

    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(bad_date)
}

/// Returns the element's HTML with the "new replies" badges cut out
fn without_badges(element: ElementRef<'_>, html: String) -> Result<String, ExtractError> {
    let badge = selector(".badge-notification")?;
    let mut result = html;
    for node in element.select(&badge) {
        result = result.replace(&node.html(), "");
    }
    Ok(result)
}
