//! Search query construction
//!
//! Turns free-text title and author input into the site's search URL,
//! `<base>/find/books/<url-encoded query>`. Token normalization here is
//! intentionally plain (whitespace split, punctuation trimmed); hosts with
//! their own tokenizers can pre-tokenize and pass the joined result as the
//! title string.

use url::Url;

/// Splits free text into search tokens
///
/// Tokens are whitespace-separated words with leading/trailing punctuation
/// stripped; empty leftovers are dropped. Case is preserved; matching
/// lower-cases on its own side.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .map(|word| word.to_string())
        .collect()
}

/// Builds the combined search query from a title and an optional first author
///
/// The query is the normalized title tokens followed by the normalized
/// tokens of the first author, space-joined. Returns the query together with
/// the joined title and author token strings, which the matcher needs for
/// its substring tests.
pub fn search_terms(title: &str, authors: &[String]) -> SearchTerms {
    let title_tokens = tokenize(title).join(" ");

    let author_tokens = authors
        .first()
        .map(|author| tokenize(author).join(" "))
        .filter(|tokens| !tokens.is_empty());

    let query = match &author_tokens {
        Some(author) => format!("{title_tokens} {author}"),
        None => title_tokens.clone(),
    };

    SearchTerms {
        query,
        title_tokens,
        author_tokens,
    }
}

/// Normalized search input shared by the search URL and the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    /// Full query sent to the search endpoint
    pub query: String,

    /// Title tokens alone, for the candidate title test
    pub title_tokens: String,

    /// First-author tokens, for the candidate context test
    pub author_tokens: Option<String>,
}

/// Builds the search-results URL for a query
///
/// The query lands in a single path segment, so spaces and Cyrillic are
/// percent-encoded by the url crate.
pub fn search_url(base_url: &str, query: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;

    url.path_segments_mut()
        .map_err(|()| url::ParseError::SetHostOnCannotBeABaseUrl)?
        .pop_if_empty()
        .extend(["find", "books", query]);

    Ok(url)
}
