//! Source facade: identify and cover download
//!
//! [`LivelibSource`] wires the fetcher, extractor and matcher into the two
//! host-facing operations:
//! - `identify`: resolve a query to at most one metadata record
//! - `download_cover`: resolve and fetch at most one cover image
//!
//! Results are emitted into host-provided channels. No error ever crosses
//! these boundaries: every internal failure is logged and degrades to
//! emitting nothing, which is the host's cue that the lookup found no result.

mod cover;

pub use cover::{cover_cache_key, CoverUrlCache, MemoryCoverCache};

use crate::config::SourceConfig;
use crate::extract::{extract, structured_cover_url};
use crate::fetch::Fetcher;
use crate::metadata::{BookMetadata, CoverImage, Query};
use crate::search::{search_terms, search_url, select_best_candidate};
use crate::SourceError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

/// Cooperative cancellation flag
///
/// Checked before every fetch and between candidate scans. Once set, the
/// running operation returns promptly without further network I/O and
/// without emitting a result. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct Abort {
    flag: Arc<AtomicBool>,
}

impl Abort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the operation holding this flag
    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// The livelib.ru metadata source
///
/// Stateless per invocation; the only shared state is the injected cover-URL
/// cache. Safe to call concurrently alongside other metadata sources.
pub struct LivelibSource {
    config: SourceConfig,
    base_url: Url,
    fetcher: Fetcher,
    cache: Arc<dyn CoverUrlCache>,
}

impl LivelibSource {
    /// Source name reported with emitted covers and used in logs
    pub const NAME: &'static str = "Livelib.ru";

    /// Creates a source with its own fetcher and an in-memory cover cache
    pub fn new(config: SourceConfig) -> crate::Result<Self> {
        let cache = Arc::new(MemoryCoverCache::new());
        Self::with_cache(config, cache)
    }

    /// Creates a source backed by a host-owned cover cache
    pub fn with_cache(
        config: SourceConfig,
        cache: Arc<dyn CoverUrlCache>,
    ) -> crate::Result<Self> {
        let fetcher = Fetcher::from_config(&config)?;
        Self::with_parts(config, fetcher, cache)
    }

    /// Creates a source from explicit parts, for tests that inject a fetcher
    pub fn with_parts(
        config: SourceConfig,
        fetcher: Fetcher,
        cache: Arc<dyn CoverUrlCache>,
    ) -> crate::Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self {
            config,
            base_url,
            fetcher,
            cache,
        })
    }

    /// Default per-request timeout from the configuration
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }

    /// Canonical detail-page URL for a livelib id
    pub fn book_url(&self, livelib_id: &str) -> crate::Result<Url> {
        Url::parse(&format!("{}/book/{livelib_id}", self.config.base_url))
            .map_err(SourceError::from)
    }

    /// Identifies at most one book matching the query
    ///
    /// With a known livelib id the detail page is fetched directly; otherwise
    /// a search is run and the best candidate is extracted. At most one
    /// record is emitted into `sink`; any failure along the way emits
    /// nothing.
    ///
    /// # Arguments
    ///
    /// * `query` - Lookup criteria; needs an id or a title
    /// * `timeout` - Per-request deadline for each fetch
    /// * `sink` - Host channel receiving the record
    /// * `abort` - Cooperative cancellation flag
    pub async fn identify(
        &self,
        query: &Query,
        timeout: Duration,
        sink: &UnboundedSender<BookMetadata>,
        abort: &Abort,
    ) {
        tracing::info!("{} identification started", Self::NAME);

        if let Some(livelib_id) = &query.livelib_id {
            tracing::info!("Using existing livelib id: {}", livelib_id);
            let book_url = match self.book_url(livelib_id) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Invalid book URL for id {}: {}", livelib_id, e);
                    return;
                }
            };
            if let Some(record) = self.parse_book_page(&book_url, timeout, abort).await {
                if !abort.is_set() {
                    emit(sink, record);
                }
            }
            return;
        }

        let Some(title) = query.title.as_deref() else {
            tracing::info!("No title provided, cannot search");
            return;
        };

        let terms = search_terms(title, &query.authors);
        if terms.query.trim().is_empty() {
            tracing::info!("Query normalized to nothing, cannot search");
            return;
        }
        tracing::info!("Searching for: \"{}\"", terms.query);

        let results_url = match search_url(&self.config.base_url, &terms.query) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Could not build search URL: {}", e);
                return;
            }
        };

        let search_html = match self.fetcher.get(&results_url, timeout, abort).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!("Failed to fetch search results: {}", e);
                return;
            }
        };

        let Some(best_match) = select_best_candidate(
            &search_html,
            &terms.title_tokens,
            terms.author_tokens.as_deref(),
            abort,
            &self.base_url,
        ) else {
            tracing::info!("No usable candidate in search results");
            return;
        };

        if let Some(record) = self.parse_book_page(&best_match, timeout, abort).await {
            if !abort.is_set() {
                emit(sink, record);
            }
        }
    }

    /// Downloads at most one cover image for the query
    ///
    /// The cover URL comes from the cache when `identify` already saw this
    /// book; otherwise the detail page is re-fetched and only its structured
    /// block is consulted. Without a livelib id there is nothing to resolve.
    pub async fn download_cover(
        &self,
        query: &Query,
        timeout: Duration,
        sink: &UnboundedSender<CoverImage>,
        abort: &Abort,
    ) {
        tracing::info!("{} cover download started", Self::NAME);

        let Some(livelib_id) = &query.livelib_id else {
            tracing::info!("No livelib id, cannot resolve a cover URL");
            return;
        };

        let mut cover_url = self.cache.get(&cover_cache_key(livelib_id));

        if cover_url.is_none() {
            let book_url = match self.book_url(livelib_id) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Invalid book URL for id {}: {}", livelib_id, e);
                    return;
                }
            };
            match self.fetcher.get(&book_url, timeout, abort).await {
                Ok(bytes) => {
                    cover_url = structured_cover_url(&String::from_utf8_lossy(&bytes));
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", book_url, e);
                }
            }
        }

        let Some(cover_url) = cover_url else {
            tracing::info!("No cover URL found");
            return;
        };
        tracing::info!("Downloading cover from: {}", cover_url);

        let cover_url = match Url::parse(&cover_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Invalid cover URL {}: {}", cover_url, e);
                return;
            }
        };

        match self.fetcher.get(&cover_url, timeout, abort).await {
            Ok(bytes) if !bytes.is_empty() => {
                tracing::info!("Cover downloaded ({} bytes)", bytes.len());
                let _ = sink.send(CoverImage {
                    source: Self::NAME.to_string(),
                    bytes,
                });
            }
            Ok(_) => tracing::info!("Cover response was empty"),
            Err(e) => tracing::warn!("Error downloading cover: {}", e),
        }
    }

    /// Fetches and extracts one detail page
    ///
    /// On success, registers the (id -> cover URL) association with the
    /// cache when both were resolved. This is the cache-population side effect of
    /// extraction, not part of the returned value.
    async fn parse_book_page(
        &self,
        book_url: &Url,
        timeout: Duration,
        abort: &Abort,
    ) -> Option<BookMetadata> {
        tracing::info!("Fetching book page: {}", book_url);

        let bytes = match self.fetcher.get(book_url, timeout, abort).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Error fetching {}: {}", book_url, e);
                return None;
            }
        };

        let page_html = String::from_utf8_lossy(&bytes);
        let record = extract(&page_html, book_url, &self.config)?;

        if let (Some(id), Some(cover)) = (&record.livelib_id, &record.cover_url) {
            self.cache.set(&cover_cache_key(id), cover.clone());
        }

        Some(record)
    }
}

fn emit(sink: &UnboundedSender<BookMetadata>, record: BookMetadata) {
    if sink.send(record).is_err() {
        tracing::debug!("Result receiver dropped, discarding record");
    }
}
