//! Page fetching for livelib-source
//!
//! This module contains the network plumbing:
//! - HTTP client construction with the configured user agent
//! - Rate-gated, abort-aware GET requests with per-request timeouts
//! - Uniform error classification for every transport failure

mod fetcher;
mod gate;

pub use fetcher::{build_http_client, Fetcher};
pub use gate::RateGate;
