//! Metadata extraction from a book detail page
//!
//! One page carries two partially overlapping views of the same book: an
//! embedded JSON-LD `Book` block and the visible markup. This module merges
//! them into a single [`BookMetadata`] record: structured data first, markup
//! fallback per field where one exists. Series and publication year are
//! markup-only; isbn, publisher, description, rating and cover URL are
//! structured-only.
//!
//! A record is only produced when both a title and at least one author were
//! resolved; anything less is reported as "no result", never as a partial
//! record.

mod markup;
mod structured;

pub use structured::{extract_structured, structured_cover_url, StructuredRecord};

use crate::config::SourceConfig;
use crate::metadata::{normalize_rating, year_to_date, BookMetadata};
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;
use url::Url;

fn book_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/book/(\d+)").unwrap_or_else(|_| unreachable!()))
}

/// Extracts the livelib id from a detail-page URL
///
/// The id is the numeric segment of the canonical `/book/<id>` path. A URL
/// without one yields None; extraction still proceeds, only cover-URL
/// caching is skipped downstream.
pub fn id_from_url(url: &str) -> Option<String> {
    book_id_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extracts one metadata record from a detail page
///
/// Every field resolves independently: a malformed number, missing node or
/// type mismatch leaves that field absent and never aborts the others.
///
/// # Arguments
///
/// * `page_html` - Raw HTML of the book detail page
/// * `source_url` - The URL the page was fetched from, for id derivation
/// * `config` - Source configuration (markup label strings)
///
/// # Returns
///
/// * `Some(BookMetadata)` - Title and at least one author were resolved
/// * `None` - The page did not yield a usable record
pub fn extract(page_html: &str, source_url: &Url, config: &SourceConfig) -> Option<BookMetadata> {
    let document = Html::parse_document(page_html);

    let structured = extract_structured(&document);
    if structured == StructuredRecord::default() {
        tracing::debug!("No JSON-LD Book block in {}", source_url);
    }

    let title = structured
        .name
        .clone()
        .or_else(|| markup::first_heading(&document))
        .unwrap_or_default();

    let authors = if structured.authors.is_empty() {
        markup::author_links(&document)
    } else {
        structured.authors.clone()
    };

    // Required-field post-condition: no partial records
    if title.is_empty() || authors.is_empty() {
        tracing::info!("Missing title or authors for {}, skipping", source_url);
        return None;
    }

    let tags = if structured.genres.is_empty() {
        markup::genre_links(&document)
    } else {
        structured.genres.clone()
    };

    let (series, series_index) = match markup::series(&document) {
        Some((name, index)) => (Some(name), index),
        None => (None, None),
    };

    let pubdate = markup::publication_year(&document, &config.publication_year_label)
        .and_then(year_to_date);

    let record = BookMetadata {
        title,
        authors,
        livelib_id: id_from_url(source_url.as_str()),
        isbn: structured.isbn,
        tags,
        series,
        series_index,
        publisher: structured.publisher,
        description: structured.description,
        rating: structured.rating.map(normalize_rating),
        pubdate,
        cover_url: structured.image,
    };

    tracing::info!(
        "Extracted '{}' by {:?} from {}",
        record.title,
        record.authors,
        source_url
    );

    Some(record)
}
