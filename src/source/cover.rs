//! Cover-URL cache collaborator
//!
//! The host owns a persistent association from `livelib:<id>` to a cover
//! image URL so that `download_cover` can skip re-fetching a detail page it
//! already extracted. The crate only sees the get/set surface; concurrency
//! discipline is the implementor's problem (assumed atomic per key). An
//! in-memory implementation ships for the CLI and tests.

use std::collections::HashMap;
use std::sync::Mutex;

/// Host-owned cover URL cache, keyed by `livelib:<id>`
pub trait CoverUrlCache: Send + Sync {
    /// Returns the cached cover URL for a key, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Associates a cover URL with a key, replacing any previous value
    fn set(&self, key: &str, url: String);
}

/// Builds the composite cache key for a livelib id
pub fn cover_cache_key(livelib_id: &str) -> String {
    format!("livelib:{livelib_id}")
}

/// In-memory cache for standalone use and tests
#[derive(Debug, Default)]
pub struct MemoryCoverCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCoverCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoverUrlCache for MemoryCoverCache {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => None,
        }
    }

    fn set(&self, key: &str, url: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cover_cache_key("1002542"), "livelib:1002542");
    }

    #[test]
    fn test_memory_cache_round_trip() {
        let cache = MemoryCoverCache::new();
        assert_eq!(cache.get("livelib:1"), None);

        cache.set("livelib:1", "https://example.com/a.jpg".to_string());
        assert_eq!(
            cache.get("livelib:1").as_deref(),
            Some("https://example.com/a.jpg")
        );

        cache.set("livelib:1", "https://example.com/b.jpg".to_string());
        assert_eq!(
            cache.get("livelib:1").as_deref(),
            Some("https://example.com/b.jpg")
        );
    }
}
