use serde::Deserialize;

/// Main configuration structure for a livelib source instance
///
/// Everything the original site plugin kept as class-level constants lives
/// here instead, so extraction and matching can be pointed at a mock server
/// in tests.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the site, without a trailing slash
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Minimum time between outbound requests (milliseconds)
    #[serde(rename = "min-request-interval", default = "default_min_request_interval")]
    pub min_request_interval_ms: u64,

    /// Default per-request timeout (seconds), used when the host supplies none
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Label text preceding the publication year on a detail page
    ///
    /// Livelib renders this in Russian; configurable so fixtures and any
    /// localized mirror keep working.
    #[serde(rename = "publication-year-label", default = "default_year_label")]
    pub publication_year_label: String,
}

fn default_base_url() -> String {
    "https://www.livelib.ru".to_string()
}

fn default_min_request_interval() -> u64 {
    500
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "livelib-source/1.0".to_string()
}

fn default_year_label() -> String {
    "Год издания".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            min_request_interval_ms: default_min_request_interval(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
            publication_year_label: default_year_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_livelib() {
        let config = SourceConfig::default();
        assert_eq!(config.base_url, "https://www.livelib.ru");
        assert_eq!(config.min_request_interval_ms, 500);
        assert_eq!(config.publication_year_label, "Год издания");
    }
}
