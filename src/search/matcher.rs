//! Search-result matching
//!
//! Given a search-results page and the normalized title/author terms, pick
//! the single detail-page link most likely to be the requested book. The
//! heuristic tolerates both sites that truncate long titles in listings and
//! queries that are themselves truncated: the title test is a substring
//! match in either direction. The author is only required to appear in the
//! candidate's surrounding block, not the link text itself, since bylines sit
//! beside the title link, not inside it.

use crate::source::Abort;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Candidates scanned before giving up on a title match
const CANDIDATE_SCAN_CAP: usize = 20;

/// One search hit: a detail-page link with its visible and surrounding text
#[derive(Debug, Clone)]
struct CandidateLink {
    href: String,
    text: String,
    context: String,
}

/// Selects the best candidate detail-page URL from a search-results page
///
/// # Algorithm
///
/// 1. Collect `/book/` links, de-duplicated by href, first-seen order.
/// 2. Scan at most the first 20. The first candidate whose lower-cased text
///    contains the title terms (or vice versa) ends the scan: it is accepted
///    if there is no author term, or if its parent block's text contains the
///    author term. A failed author check does NOT resume the scan; later
///    candidates are never reconsidered.
/// 3. With no accepted candidate, fall back to the first link in document
///    order; the search engine already ranked by relevance.
///
/// The abort flag is checked between candidates; once set the selection
/// returns None without considering anything further.
///
/// # Arguments
///
/// * `search_html` - Raw HTML of the search-results page
/// * `title_terms` - Normalized title tokens to match
/// * `author_terms` - Normalized first-author tokens, if any
/// * `abort` - Cooperative cancellation flag
/// * `base_url` - Site base for resolving relative hrefs
///
/// # Returns
///
/// * `Some(Url)` - Absolute URL of the chosen detail page
/// * `None` - No candidates, or aborted mid-scan
pub fn select_best_candidate(
    search_html: &str,
    title_terms: &str,
    author_terms: Option<&str>,
    abort: &Abort,
    base_url: &Url,
) -> Option<Url> {
    let document = Html::parse_document(search_html);
    let candidates = collect_candidates(&document);

    if candidates.is_empty() {
        tracing::info!("No book links in search results");
        return None;
    }
    tracing::debug!("Found {} candidate links", candidates.len());

    let title_lower = title_terms.to_lowercase();
    let author_lower = author_terms.map(str::to_lowercase);

    let mut best_match: Option<&CandidateLink> = None;

    for candidate in candidates.iter().take(CANDIDATE_SCAN_CAP) {
        if abort.is_set() {
            tracing::info!("Aborted during candidate scan");
            return None;
        }

        let text_lower = candidate.text.to_lowercase();
        if !text_lower.contains(&title_lower) && !title_lower.contains(&text_lower) {
            continue;
        }
        tracing::debug!("Title match: {}", candidate.text);

        // First title match ends the scan either way (see module docs)
        match &author_lower {
            Some(author) => {
                if candidate.context.to_lowercase().contains(author) {
                    tracing::debug!("Author also matches");
                    best_match = Some(candidate);
                }
            }
            None => best_match = Some(candidate),
        }
        break;
    }

    let chosen = match best_match {
        Some(candidate) => candidate,
        None => {
            let first = candidates.first()?;
            tracing::info!("No exact match, using first result: {}", first.href);
            first
        }
    };

    match base_url.join(&chosen.href) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!("Could not resolve candidate href {}: {}", chosen.href, e);
            None
        }
    }
}

/// Collects detail-page links, de-duplicated by href in first-seen order
fn collect_candidates(document: &Html) -> Vec<CandidateLink> {
    let Ok(selector) = Selector::parse(r#"a[href*="/book/"]"#) else {
        return Vec::new();
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for link in document.select(&selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !seen.insert(href.to_string()) {
            continue;
        }

        candidates.push(CandidateLink {
            href: href.to_string(),
            text: link.text().collect::<String>().trim().to_string(),
            context: parent_text(&link),
        });
    }

    candidates
}

/// Text content of the link's containing block
fn parent_text(link: &ElementRef) -> String {
    link.parent()
        .and_then(ElementRef::wrap)
        .map(|parent| parent.text().collect::<String>())
        .unwrap_or_default()
}
