//! Transport collaborator: fetch the bytes behind a URL
//!
//! The resolver only needs a single blocking GET. Connection handling, TLS
//! and redirects are the fetcher's business.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::RegistryConfig;
use crate::error::FetchError;

/// Transport for one blocking GET. `Send`, so the registry owning it is too.
pub trait WebResourceFetcher: Send {
    /// Retrieve the body at `url`, blocking until it arrives or fails
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F: WebResourceFetcher + ?Sized> WebResourceFetcher for Box<F> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher backed by reqwest
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, FetchError> {
        Self::new(&config.user_agent, config.timeout)
    }
}

impl WebResourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(body.to_vec())
    }
}

/// Fetcher that never reaches the network; every call fails.
///
/// Used for offline runs where only the seed snapshot should answer.
pub struct OfflineFetcher;

impl WebResourceFetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::Other(format!("offline, not fetching {}", url)))
    }
}
