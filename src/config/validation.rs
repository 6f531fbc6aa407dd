//! Configuration validation
//!
//! Catches configuration mistakes up front, before any network traffic:
//! a malformed base URL or a zero timeout would otherwise only surface as a
//! confusing fetch failure mid-lookup.

use crate::config::SourceConfig;
use crate::ConfigError;
use url::Url;

/// Validates a loaded configuration
///
/// # Rules
///
/// * `base-url` must parse as an absolute http(s) URL with a host
/// * `base-url` must not end with a slash (paths are appended verbatim)
/// * `request-timeout` must be non-zero
/// * `publication-year-label` must be non-empty
///
/// A `min-request-interval` of 0 is allowed: tests rely on a zero-delay gate.
pub fn validate(config: &SourceConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::Validation(format!("base-url is not a valid URL: {e}")))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must be http or https, got {}",
            base.scheme()
        )));
    }

    if base.host_str().is_none() {
        return Err(ConfigError::Validation(
            "base-url is missing a host".to_string(),
        ));
    }

    if config.base_url.ends_with('/') {
        return Err(ConfigError::Validation(
            "base-url must not end with a slash".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout must be greater than zero".to_string(),
        ));
    }

    if config.publication_year_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "publication-year-label must not be empty".to_string(),
        ));
    }

    Ok(())
}
