//! Search and candidate matching
//!
//! This module turns a fuzzy title/author query into one detail-page URL:
//! - Query token normalization and search-URL construction
//! - Candidate link collection from the search-results page
//! - The best-candidate selection heuristic

mod matcher;
mod query;

pub use matcher::select_best_candidate;
pub use query::{search_terms, search_url, tokenize, SearchTerms};
