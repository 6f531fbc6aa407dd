//! JSON-LD structured data
//!
//! Livelib embeds a Schema.org `Book` block in each detail page. It is the
//! preferred source for most fields but entirely optional and never trusted
//! alone: any or all keys may be missing, and a malformed field must not
//! poison its neighbors. Each field is therefore decoded independently from
//! the raw JSON value; a decode failure just leaves that field absent.

use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;

/// Resolved fields from the page's JSON-LD `Book` block
///
/// Flattened to plain optionals: shape dualities in the raw JSON (single
/// author vs. list, genre string vs. list) are resolved during decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredRecord {
    pub name: Option<String>,
    pub authors: Vec<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub genres: Vec<String>,
    pub description: Option<String>,
    /// Aggregate rating on the site's native 0-5 scale
    pub rating: Option<f32>,
    pub image: Option<String>,
}

/// The `author` key is either one person object or a list of them.
///
/// Modeled as an untagged enum so the shape is dispatched once, at parse
/// time, instead of being inspected at every use site.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorField {
    Single(Person),
    Multiple(Vec<Person>),
}

#[derive(Debug, Deserialize)]
struct Person {
    name: Option<String>,
}

/// The `genre` key is either one string or a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenreField {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct Organization {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AggregateRating {
    #[serde(rename = "ratingValue")]
    rating_value: Option<Value>,
}

/// The `image` key is usually a bare URL string, occasionally an ImageObject.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageField {
    Url(String),
    Object { url: String },
}

/// Extracts the structured record from a detail page
///
/// Scans `script[type="application/ld+json"]` elements in document order and
/// takes the first whose JSON parses to an object declaring `@type: "Book"`.
/// Scripts with invalid JSON are skipped. No matching block is not an error:
/// the caller proceeds with an empty record and markup fallbacks.
pub fn extract_structured(document: &Html) -> StructuredRecord {
    find_book_block(document)
        .map(|block| resolve_fields(&block))
        .unwrap_or_default()
}

/// Returns only the cover image URL from the structured block
///
/// Used by cover download, which re-fetches a detail page solely to recover
/// the cover URL and must not pay for full extraction.
pub fn structured_cover_url(page_html: &str) -> Option<String> {
    let document = Html::parse_document(page_html);
    find_book_block(&document).and_then(|block| {
        block
            .get("image")
            .cloned()
            .and_then(decode_image)
    })
}

/// Finds the first JSON-LD object typed as a `Book`
fn find_book_block(document: &Html) -> Option<serde_json::Map<String, Value>> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;

    for script in document.select(&selector) {
        let json_text = script.text().collect::<String>();

        let data: Value = match serde_json::from_str(json_text.trim()) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("Skipping malformed JSON-LD script: {}", e);
                continue;
            }
        };

        if let Value::Object(map) = data {
            if map.get("@type").and_then(Value::as_str) == Some("Book") {
                return Some(map);
            }
        }
    }

    None
}

/// Decodes each field of the block independently
fn resolve_fields(block: &serde_json::Map<String, Value>) -> StructuredRecord {
    StructuredRecord {
        name: string_field(block, "name"),
        authors: block
            .get("author")
            .cloned()
            .and_then(decode_authors)
            .unwrap_or_default(),
        isbn: string_field(block, "isbn"),
        publisher: block
            .get("publisher")
            .cloned()
            .and_then(|v| serde_json::from_value::<Organization>(v).ok())
            .and_then(|org| org.name)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        genres: block
            .get("genre")
            .cloned()
            .and_then(decode_genres)
            .unwrap_or_default(),
        description: string_field(block, "description"),
        rating: block
            .get("aggregateRating")
            .cloned()
            .and_then(|v| serde_json::from_value::<AggregateRating>(v).ok())
            .and_then(|r| r.rating_value)
            .and_then(numeric_value),
        image: block.get("image").cloned().and_then(decode_image),
    }
}

fn string_field(block: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    block
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn decode_authors(value: Value) -> Option<Vec<String>> {
    let field: AuthorField = serde_json::from_value(value).ok()?;

    let persons = match field {
        AuthorField::Single(person) => vec![person],
        AuthorField::Multiple(persons) => persons,
    };

    let names: Vec<String> = persons
        .into_iter()
        .filter_map(|p| p.name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();

    Some(names)
}

fn decode_genres(value: Value) -> Option<Vec<String>> {
    let field: GenreField = serde_json::from_value(value).ok()?;

    let genres = match field {
        GenreField::Single(genre) => vec![genre],
        GenreField::Multiple(genres) => genres,
    };

    Some(
        genres
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect(),
    )
}

fn decode_image(value: Value) -> Option<String> {
    let field: ImageField = serde_json::from_value(value).ok()?;

    match field {
        ImageField::Url(url) | ImageField::Object { url } => {
            let url = url.trim().to_string();
            (!url.is_empty()).then_some(url)
        }
    }
}

/// Accepts a rating value given as a JSON number or a numeric string
///
/// Real-world JSON-LD emits both. Anything non-numeric is omitted, not zero.
fn numeric_value(value: Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        Value::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    }
}
