//! Client configuration loaded explicitly or from environment variables.

use std::env;
use std::time::Duration;

use crate::error::ApiError;

pub const BASE_URL_VAR: &str = "BERANI_API_BASE_URL";
pub const REPORT_PATH_VAR: &str = "BERANI_REPORT_PATH";
pub const CHAT_PATH_VAR: &str = "BERANI_CHAT_PATH";
pub const TIMEOUT_VAR: &str = "BERANI_TIMEOUT_SECS";

/// Per-attempt timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Backend location and endpoint overrides for a `BeraniClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash. Empty means offline.
    pub base_url: String,
    /// Report endpoint tried before the defaults.
    pub report_path: Option<String>,
    /// Chat endpoint tried before the defaults.
    pub chat_path: Option<String>,
    /// Applied to each attempt, not to the whole candidate sequence.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            report_path: None,
            chat_path: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Self::default()
        }
    }

    pub fn with_report_path(mut self, path: &str) -> Self {
        self.report_path = non_blank(path);
        self
    }

    pub fn with_chat_path(mut self, path: &str) -> Self {
        self.chat_path = non_blank(path);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// True when there is no backend to talk to.
    pub fn is_offline(&self) -> bool {
        self.base_url.trim().is_empty()
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };
        Ok(Self {
            base_url: normalize_base_url(&lookup(BASE_URL_VAR).unwrap_or_default()),
            report_path: lookup(REPORT_PATH_VAR).as_deref().and_then(non_blank),
            chat_path: lookup(CHAT_PATH_VAR).as_deref().and_then(non_blank),
            timeout,
        })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, ApiError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::Config(format!("{TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}")))?;
    if secs == 0 {
        return Err(ApiError::Config(format!("{TIMEOUT_VAR} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_vars_reads_everything() {
        let env = vars(&[
            (BASE_URL_VAR, "https://berani-backend.onrender.com/"),
            (REPORT_PATH_VAR, "/generate_report"),
            (CHAT_PATH_VAR, "/assistant"),
            (TIMEOUT_VAR, "10"),
        ]);
        let config = ClientConfig::from_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.base_url, "https://berani-backend.onrender.com");
        assert_eq!(config.report_path.as_deref(), Some("/generate_report"));
        assert_eq!(config.chat_path.as_deref(), Some("/assistant"));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn from_vars_defaults_to_offline() {
        let config = ClientConfig::from_vars(|_| None).unwrap();
        assert!(config.is_offline());
        assert_eq!(config.report_path, None);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn whitespace_base_url_is_offline() {
        assert!(ClientConfig::new("   ").is_offline());
    }

    #[test]
    fn literal_blank_base_url_is_offline() {
        let config = ClientConfig {
            base_url: " \t".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.is_offline());
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let env = vars(&[(BASE_URL_VAR, "http://x"), (REPORT_PATH_VAR, "  ")]);
        let config = ClientConfig::from_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.report_path, None);
        assert_eq!(ClientConfig::new("http://x").with_chat_path("").chat_path, None);
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let env = vars(&[(TIMEOUT_VAR, "soon")]);
        let err = ClientConfig::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));

        let env = vars(&[(TIMEOUT_VAR, "0")]);
        let err = ClientConfig::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
