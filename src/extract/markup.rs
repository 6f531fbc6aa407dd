//! Markup fallback extraction
//!
//! Fields the JSON-LD block omits are scraped from the page markup. Each
//! resolver here is independent and returns an `Option` (or an empty Vec):
//! a missing or malformed node leaves that one field absent and never
//! affects the others. Series and publication year have no structured
//! counterpart on livelib, so markup is their only source.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Number of author links considered before stopping
///
/// Detail pages repeat author links in sidebars and "related" blocks; the
/// first few links in document order belong to the book itself.
const AUTHOR_LINK_CAP: usize = 3;

fn series_index_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#(\d+)").unwrap_or_else(|_| unreachable!()))
}

/// Title fallback: text of the first page heading
pub fn first_heading(document: &Html) -> Option<String> {
    let selector = Selector::parse("h1").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element_text(&element))
        .filter(|s| !s.is_empty())
}

/// Authors fallback: texts of the first few author links
///
/// Only the first [`AUTHOR_LINK_CAP`] links are considered; duplicates are
/// dropped with order of appearance preserved.
pub fn author_links(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(r#"a[href*="/author/"]"#) else {
        return Vec::new();
    };

    let mut authors: Vec<String> = Vec::new();
    for link in document.select(&selector).take(AUTHOR_LINK_CAP) {
        let name = element_text(&link);
        if !name.is_empty() && !authors.contains(&name) {
            authors.push(name);
        }
    }

    authors
}

/// Tags fallback: texts of genre-category links, de-duplicated
pub fn genre_links(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(r#"a[href*="/genre/"]"#) else {
        return Vec::new();
    };

    let mut genres: Vec<String> = Vec::new();
    for link in document.select(&selector) {
        let genre = element_text(&link);
        if !genre.is_empty() && !genres.contains(&genre) {
            genres.push(genre);
        }
    }

    genres
}

/// Series name and optional index
///
/// The first `/series/` or `/pubseries/` link with non-empty text names the
/// series. The index comes from a `#<digits>` pattern in the text trailing
/// that link (the text nodes between the link and its next element sibling);
/// no pattern means no index, but the name is kept.
pub fn series(document: &Html) -> Option<(String, Option<u32>)> {
    let selector = Selector::parse(r#"a[href*="/series/"], a[href*="/pubseries/"]"#).ok()?;

    for link in document.select(&selector) {
        let name = element_text(&link);
        if name.is_empty() {
            continue;
        }

        let index = series_index_pattern()
            .captures(&trailing_text(&link))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok());

        return Some((name, index));
    }

    None
}

/// Publication year, located by its label text
///
/// Finds the element whose own text contains `label` and reads the first
/// following element sibling's text as a 4-digit year. Anything malformed is
/// omitted.
pub fn publication_year(document: &Html, label: &str) -> Option<i32> {
    let selector = Selector::parse("*").ok()?;

    for element in document.select(&selector) {
        if !own_text_contains(&element, label) {
            continue;
        }

        let year_text = element
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .next()
            .map(|sibling| element_text(&sibling))?;

        return parse_year(&year_text);
    }

    None
}

fn parse_year(text: &str) -> Option<i32> {
    let text = text.trim();
    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

/// Full text content of an element, trimmed
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// True if any text node directly under `element` contains `needle`
///
/// Direct children only: matching descendant text would make every ancestor
/// of the label element a hit.
fn own_text_contains(element: &ElementRef, needle: &str) -> bool {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .any(|text| text.contains(needle))
}

/// Text nodes following `element` up to its next element sibling
///
/// Matches lxml "tail" semantics, which is where livelib prints the series
/// position ("#2 в серии").
fn trailing_text(element: &ElementRef) -> String {
    let mut tail = String::new();
    for node in element.next_siblings() {
        if let Some(text) = node.value().as_text() {
            tail.push_str(text);
        } else if node.value().is_element() {
            break;
        }
    }
    tail
}
