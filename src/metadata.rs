//! Canonical metadata types exchanged with the host application
//!
//! [`Query`] is the caller-supplied lookup criteria and [`BookMetadata`] is
//! the single normalized record a successful lookup produces. Both are plain
//! data; all resolution logic lives in the `extract` and `search` modules.

use chrono::NaiveDate;
use serde::Serialize;

/// Ratings arrive on livelib's 0-5 scale and leave on the host's 0-10 scale.
pub const RATING_SCALE_FACTOR: f32 = 2.0;

/// Lookup criteria supplied by the host
///
/// At least one of `livelib_id` or `title` must be present for a lookup to
/// proceed; `identify` logs and emits nothing otherwise.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Known livelib book id, if the host already has one
    pub livelib_id: Option<String>,

    /// Free-text title to search for
    pub title: Option<String>,

    /// Author names, in host order; only the first is used for searching
    pub authors: Vec<String>,
}

impl Query {
    /// True if the query carries enough information to attempt a lookup
    pub fn is_actionable(&self) -> bool {
        self.livelib_id.is_some() || self.title.is_some()
    }
}

/// One normalized book metadata record
///
/// Only `title` and `authors` are guaranteed non-empty; every other field is
/// best-effort and omitted when the page did not yield it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookMetadata {
    /// Book title
    pub title: String,

    /// Author names, order of appearance, never empty
    pub authors: Vec<String>,

    /// Livelib's own numeric id, from the detail-page URL
    pub livelib_id: Option<String>,

    /// ISBN as printed in the structured data
    pub isbn: Option<String>,

    /// Genre tags, order of appearance, de-duplicated
    pub tags: Vec<String>,

    /// Series name, when the book belongs to one
    pub series: Option<String>,

    /// Position within the series; meaningless without `series`
    pub series_index: Option<u32>,

    /// Publisher name
    pub publisher: Option<String>,

    /// Long-form description text
    pub description: Option<String>,

    /// Aggregate rating on the host's 0-10 scale
    pub rating: Option<f32>,

    /// Publication date, January 1st of the year the page lists
    pub pubdate: Option<NaiveDate>,

    /// Cover image URL from the structured data
    pub cover_url: Option<String>,
}

impl BookMetadata {
    /// Creates a record with the two required fields; the rest default to absent
    pub fn new(title: String, authors: Vec<String>) -> Self {
        Self {
            title,
            authors,
            livelib_id: None,
            isbn: None,
            tags: Vec::new(),
            series: None,
            series_index: None,
            publisher: None,
            description: None,
            rating: None,
            pubdate: None,
            cover_url: None,
        }
    }
}

/// Cover image bytes emitted by `download_cover`, tagged with the source name
#[derive(Debug, Clone)]
pub struct CoverImage {
    /// Name of the metadata source that produced the image
    pub source: String,

    /// Raw image bytes as served by the site
    pub bytes: Vec<u8>,
}

/// Converts a source-scale rating (0-5) to the host scale (0-10)
pub fn normalize_rating(source_rating: f32) -> f32 {
    source_rating * RATING_SCALE_FACTOR
}

/// Converts a publication year into a date value
///
/// Mirrors the host convention of pinning a bare year to January 1st.
/// Out-of-range years yield None rather than an error.
pub fn year_to_date(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}
