//! Registry configuration
//!
//! Defaults target the public Wikidata API. `from_env` applies overrides
//! from the process environment (the CLI loads `.env` first via dotenvy).

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_API_URL: &str = "https://www.wikidata.org/w/api.php";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_API_URL: &str = "WIKIBASE_API_URL";
const ENV_CACHE_FAILURES: &str = "PROPERTY_TYPES_CACHE_FAILURES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Base endpoint for `wbgetentities` queries
    pub api_url: String,
    /// Remember failed lookups so they are not retried on every call
    pub cache_failures: bool,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cache_failures: true,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RegistryConfig {
    /// Defaults overridden by `WIKIBASE_API_URL` and `PROPERTY_TYPES_CACHE_FAILURES`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_CACHE_FAILURES) {
            match parse_bool(&raw) {
                Some(flag) => config.cache_failures = flag,
                None => warn!(
                    value = %raw,
                    "Ignoring {}: expected true/false",
                    ENV_CACHE_FAILURES
                ),
            }
        }

        config
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_cache_failures(mut self, cache_failures: bool) -> Self {
        self.cache_failures = cache_failures;
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
