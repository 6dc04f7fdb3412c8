//! Client configuration fixed at construction time.

use std::time::Duration;

use reqwest::Url;

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "SPY_CAT_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the backend lives and how long a single request may take.
///
/// Built once and handed to the client; there is no per-call override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads `SPY_CAT_API_URL`, falling back to the local default.
    pub fn from_env() -> Self {
        Self::from_override(std::env::var(BASE_URL_ENV).ok().as_deref())
    }

    /// Blank overrides count as unset.
    pub fn from_override(base_url: Option<&str>) -> Self {
        match base_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => Self::new(url),
            None => Self::new(DEFAULT_BASE_URL),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Port the backend is expected on: the explicit one in the base URL,
    /// else the scheme default.
    pub fn backend_port(&self) -> Option<u16> {
        Url::parse(&self.base_url)
            .ok()
            .and_then(|url| url.port_or_known_default())
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
        assert_eq!(config.backend_port(), Some(8000));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("http://agency.local:9000/");
        assert_eq!(config.base_url(), "http://agency.local:9000");
        assert_eq!(config.url_for("/cats/"), "http://agency.local:9000/cats/");
    }

    #[test]
    fn blank_override_falls_back_to_default() {
        assert_eq!(ClientConfig::from_override(Some("  ")), ClientConfig::default());
        assert_eq!(ClientConfig::from_override(None), ClientConfig::default());
        assert_eq!(
            ClientConfig::from_override(Some("https://api.agency.test")).base_url(),
            "https://api.agency.test"
        );
    }

    #[test]
    fn port_falls_back_to_scheme_default() {
        assert_eq!(ClientConfig::new("https://api.agency.test").backend_port(), Some(443));
        assert_eq!(ClientConfig::new("http://api.agency.test").backend_port(), Some(80));
        assert_eq!(ClientConfig::new("not a url").backend_port(), None);
    }
}
