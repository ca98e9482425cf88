use url::Url;

use crate::error::{GhdlError, Result};

/// Default contents API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Settings shared by every request the downloader makes
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the GitHub REST API, parsed when a request is built
    pub api_base: String,
    /// User-Agent header; the GitHub API rejects requests without one
    pub user_agent: String,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the contents API at another host (GitHub Enterprise, a test server)
    pub fn with_api_base(mut self, api_base: &str) -> Result<Self> {
        let url = Url::parse(api_base).map_err(|e| GhdlError::invalid_url(api_base, e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(GhdlError::invalid_url(api_base, "cannot be used as a base URL"));
        }
        self.api_base = url.into();
        Ok(self)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the HTTP client used for API listings and file downloads
    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: format!("ghdl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
