//! Error types for the property datatype registry
//!
//! Every failure in this crate has a degraded, non-fatal outcome at the
//! registry boundary. These types carry enough context (property id, URL,
//! raw message) for the log line that records the degradation.

use thiserror::Error;

use crate::property_id::PropertyId;

/// A string that is not a valid `P<digits>` property identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid property id '{input}': {reason}")]
pub struct PropertyIdError {
    pub input: String,
    pub reason: &'static str,
}

/// Transport-level failures raised by a [`crate::fetcher::WebResourceFetcher`]
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetch failed: {0}")]
    Other(String),
}

/// Failures of a single remote datatype lookup
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Network error fetching datatype of {property}: {source}")]
    Network {
        property: PropertyId,
        #[source]
        source: FetchError,
    },

    #[error("Malformed datatype response for {property}: {message}")]
    Parse { property: PropertyId, message: String },

    #[error("Unknown datatype '{datatype}' for {property}")]
    UnknownType {
        property: PropertyId,
        datatype: String,
    },

    #[error("Invalid API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ResolveError {
    /// Property the failed lookup was for, if the failure got that far
    pub fn property(&self) -> Option<&PropertyId> {
        match self {
            ResolveError::Network { property, .. }
            | ResolveError::Parse { property, .. }
            | ResolveError::UnknownType { property, .. } => Some(property),
            ResolveError::InvalidUrl { .. } => None,
        }
    }
}

/// Snapshot loading and writing errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
