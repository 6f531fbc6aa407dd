//! HTTP fetcher
//!
//! All network traffic goes through [`Fetcher::get`]: rate-gated, abort-aware,
//! timeout-bounded GET requests. Transport failures of every kind (DNS,
//! connect, non-2xx, timeout) surface uniformly as [`SourceError`]; callers
//! log them and treat them as "no data for this step", never as fatal.

use crate::config::SourceConfig;
use crate::fetch::RateGate;
use crate::source::Abort;
use crate::SourceError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used for all requests to the site
///
/// # Arguments
///
/// * `config` - Source configuration carrying the user-agent string
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &SourceConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rate-limited page fetcher
///
/// Leaf component: depends on nothing but the HTTP client and the injected
/// [`RateGate`]. The extractor and matcher consume its output and never talk
/// to the network themselves.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    gate: RateGate,
}

impl Fetcher {
    /// Creates a fetcher from an existing client and gate
    pub fn new(client: Client, gate: RateGate) -> Self {
        Self { client, gate }
    }

    /// Creates a fetcher with the configured client and request interval
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = build_http_client(config)?;
        let gate = RateGate::new(Duration::from_millis(config.min_request_interval_ms));
        Ok(Self::new(client, gate))
    }

    /// Fetches a URL and returns the response body bytes
    ///
    /// The abort flag is checked before any waiting or I/O; once it is set no
    /// further network traffic happens. The rate gate is awaited before every
    /// request, including cover image downloads.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `timeout` - Overall deadline for this single request
    /// * `abort` - Cooperative cancellation flag
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - Response body for a 2xx response
    /// * `Err(SourceError)` - Any transport or status failure
    pub async fn get(&self, url: &Url, timeout: Duration, abort: &Abort) -> crate::Result<Vec<u8>> {
        if abort.is_set() {
            return Err(SourceError::Aborted {
                url: url.to_string(),
            });
        }

        self.gate.wait().await;

        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(bytes.to_vec())
    }
}

/// Maps a reqwest error onto the source error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> SourceError {
    if error.is_timeout() {
        SourceError::Timeout {
            url: url.to_string(),
        }
    } else {
        SourceError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
