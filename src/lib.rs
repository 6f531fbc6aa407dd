//! Livelib-Source: a book metadata source for livelib.ru
//!
//! This crate fetches bibliographic metadata (title, authors, identifiers,
//! tags, series, publisher, description, rating, cover image) for a single
//! book, either by a known livelib id or by a fuzzy title/author search, and
//! normalizes the result into one [`BookMetadata`] record.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod metadata;
pub mod search;
pub mod source;

use thiserror::Error;

/// Main error type for livelib-source operations
///
/// None of these variants ever cross the public `identify`/`download_cover`
/// boundary: the source facade logs them and degrades to "no result".
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Operation aborted before fetching {url}")]
    Aborted { url: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for livelib-source operations
pub type Result<T> = std::result::Result<T, SourceError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::SourceConfig;
pub use metadata::{BookMetadata, CoverImage, Query};
pub use source::{Abort, CoverUrlCache, LivelibSource, MemoryCoverCache};
