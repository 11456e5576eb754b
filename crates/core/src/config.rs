//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the upstream clients and aggregators. The binaries read environment variables and
//! hand the raw values to the `*_from_env_value` parsers here; nothing in request handling reads
//! the process environment.

use crate::constants::{
    DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_OPENFDA_BASE_URL, DEFAULT_REQUEST_SPACING_MS,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_RXNAV_BASE_URL,
};
use crate::{SafetyError, SafetyResult};
use medsafe_types::NonEmptyText;
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct SafetyConfig {
    rxnav_base_url: String,
    openfda_base_url: String,
    request_timeout: Duration,
    max_concurrent_requests: usize,
    request_spacing: Duration,
}

impl SafetyConfig {
    /// Create a new `SafetyConfig`.
    ///
    /// Trailing slashes are stripped from both base URLs so endpoint paths can be appended
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::InvalidInput` if:
    /// - either base URL is empty once trailing slashes are removed,
    /// - `max_concurrent_requests` is zero,
    /// - `request_timeout` is zero.
    pub fn new(
        rxnav_base_url: &str,
        openfda_base_url: &str,
        request_timeout: Duration,
        max_concurrent_requests: usize,
        request_spacing: Duration,
    ) -> SafetyResult<Self> {
        if max_concurrent_requests == 0 {
            return Err(SafetyError::InvalidInput(
                "max_concurrent_requests must be at least 1".into(),
            ));
        }
        if request_timeout.is_zero() {
            return Err(SafetyError::InvalidInput(
                "request_timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            rxnav_base_url: normalise_base_url(rxnav_base_url)?,
            openfda_base_url: normalise_base_url(openfda_base_url)?,
            request_timeout,
            max_concurrent_requests,
            request_spacing,
        })
    }

    pub fn rxnav_base_url(&self) -> &str {
        &self.rxnav_base_url
    }

    pub fn openfda_base_url(&self) -> &str {
        &self.openfda_base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    pub fn request_spacing(&self) -> Duration {
        self.request_spacing
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            rxnav_base_url: DEFAULT_RXNAV_BASE_URL.to_string(),
            openfda_base_url: DEFAULT_OPENFDA_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_spacing: Duration::from_millis(DEFAULT_REQUEST_SPACING_MS),
        }
    }
}

fn normalise_base_url(url: &str) -> SafetyResult<String> {
    let text = NonEmptyText::new(url.trim().trim_end_matches('/'))?;
    Ok(text.as_str().to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a base URL from an optional string value, falling back to `default` when absent.
pub fn base_url_from_env_value(value: Option<String>, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}

/// Parse a millisecond duration from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `default_ms`.
pub fn millis_from_env_value(value: Option<String>, default_ms: u64) -> SafetyResult<Duration> {
    let parsed = non_blank(value)
        .map(|v| {
            v.parse::<u64>().map_err(|_| {
                SafetyError::InvalidInput(format!("expected a number of milliseconds, got {v:?}"))
            })
        })
        .transpose()?;

    Ok(Duration::from_millis(parsed.unwrap_or(default_ms)))
}

/// Parse the per-service concurrency limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default limit. Zero is rejected.
pub fn concurrency_from_env_value(value: Option<String>) -> SafetyResult<usize> {
    let parsed = non_blank(value)
        .map(|v| {
            v.parse::<usize>().map_err(|_| {
                SafetyError::InvalidInput(format!("expected a positive integer, got {v:?}"))
            })
        })
        .transpose()?;

    match parsed {
        Some(0) => Err(SafetyError::InvalidInput(
            "UPSTREAM_MAX_CONCURRENCY must be at least 1".into(),
        )),
        Some(n) => Ok(n),
        None => Ok(DEFAULT_MAX_CONCURRENT_REQUESTS),
    }
}

/// Build a `SafetyConfig` from raw (optional) environment values.
///
/// Arguments are, in order: `RXNAV_BASE_URL`, `OPENFDA_BASE_URL`, `UPSTREAM_TIMEOUT_MS`,
/// `UPSTREAM_MAX_CONCURRENCY` and `UPSTREAM_SPACING_MS`.
pub fn config_from_env_values(
    rxnav_base_url: Option<String>,
    openfda_base_url: Option<String>,
    timeout_ms: Option<String>,
    max_concurrency: Option<String>,
    spacing_ms: Option<String>,
) -> SafetyResult<SafetyConfig> {
    SafetyConfig::new(
        &base_url_from_env_value(rxnav_base_url, DEFAULT_RXNAV_BASE_URL),
        &base_url_from_env_value(openfda_base_url, DEFAULT_OPENFDA_BASE_URL),
        millis_from_env_value(timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS)?,
        concurrency_from_env_value(max_concurrency)?,
        millis_from_env_value(spacing_ms, DEFAULT_REQUEST_SPACING_MS)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_strips_trailing_slashes() {
        let cfg = SafetyConfig::new(
            "http://127.0.0.1:9000/REST/",
            "http://127.0.0.1:9001//",
            Duration::from_secs(1),
            2,
            Duration::ZERO,
        )
        .expect("config should be valid");

        assert_eq!(cfg.rxnav_base_url(), "http://127.0.0.1:9000/REST");
        assert_eq!(cfg.openfda_base_url(), "http://127.0.0.1:9001");
    }

    #[test]
    fn test_new_rejects_zero_concurrency_and_timeout() {
        let err = SafetyConfig::new("http://a", "http://b", Duration::from_secs(1), 0, Duration::ZERO)
            .expect_err("zero concurrency should be rejected");
        assert!(matches!(err, SafetyError::InvalidInput(_)));

        let err = SafetyConfig::new("http://a", "http://b", Duration::ZERO, 1, Duration::ZERO)
            .expect_err("zero timeout should be rejected");
        assert!(matches!(err, SafetyError::InvalidInput(_)));
    }

    #[test]
    fn test_new_rejects_empty_base_url() {
        let err = SafetyConfig::new("  / ", "http://b", Duration::from_secs(1), 1, Duration::ZERO)
            .expect_err("empty URL should be rejected");
        assert!(matches!(err, SafetyError::InvalidInput(_)));
    }

    #[test]
    fn test_env_values_default_when_absent_or_blank() {
        let cfg = config_from_env_values(None, Some("   ".into()), None, Some("".into()), None)
            .expect("defaults should be valid");

        assert_eq!(cfg.rxnav_base_url(), DEFAULT_RXNAV_BASE_URL);
        assert_eq!(cfg.openfda_base_url(), DEFAULT_OPENFDA_BASE_URL);
        assert_eq!(
            cfg.request_timeout(),
            Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)
        );
        assert_eq!(cfg.max_concurrent_requests(), DEFAULT_MAX_CONCURRENT_REQUESTS);
        assert_eq!(cfg.request_spacing(), Duration::ZERO);
    }

    #[test]
    fn test_env_values_are_parsed() {
        let cfg = config_from_env_values(
            Some("http://localhost:8080/REST".into()),
            None,
            Some("2500".into()),
            Some("8".into()),
            Some(" 150 ".into()),
        )
        .expect("values should parse");

        assert_eq!(cfg.rxnav_base_url(), "http://localhost:8080/REST");
        assert_eq!(cfg.request_timeout(), Duration::from_millis(2500));
        assert_eq!(cfg.max_concurrent_requests(), 8);
        assert_eq!(cfg.request_spacing(), Duration::from_millis(150));
    }

    #[test]
    fn test_env_values_reject_garbage() {
        assert!(millis_from_env_value(Some("soon".into()), 10).is_err());
        assert!(concurrency_from_env_value(Some("-1".into())).is_err());
        assert!(concurrency_from_env_value(Some("0".into())).is_err());
    }

    #[test]
    fn test_default_matches_constants() {
        let cfg = SafetyConfig::default();
        assert_eq!(cfg.rxnav_base_url(), DEFAULT_RXNAV_BASE_URL);
        assert_eq!(cfg.max_concurrent_requests(), DEFAULT_MAX_CONCURRENT_REQUESTS);
    }
}
