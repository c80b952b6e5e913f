use std::env;

use anyhow::Result;

use crate::classifier::http::DEFAULT_API_URL;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. The only
/// setting is where the classification service lives.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the classification service (SCAMWATCH_API_URL).
    /// `/api/detect` is appended when requests are made.
    pub api_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Ok(Self {
            api_url: env::var("SCAMWATCH_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    /// Replace the API URL when one was given on the command line.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }

    /// Check that the API URL is something we can POST to.
    /// Call this before building the classifier.
    pub fn require_api_url(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            anyhow::bail!(
                "SCAMWATCH_API_URL must be an http:// or https:// URL, got '{}'.\n\
                 Set it in your .env file or pass --api-url.",
                self.api_url
            );
        }
        Ok(())
    }
}
