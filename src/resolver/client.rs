//! Remote datatype lookup against a Wikibase API
//!
//! One blocking request per call, no retries. Failures are returned as
//! [`ResolveError`]; deciding what to do with them is the registry's job.

use tracing::{debug, info};
use url::Url;

use super::types::GetEntitiesResponse;
use crate::datatype::DatatypeId;
use crate::error::ResolveError;
use crate::fetcher::WebResourceFetcher;
use crate::property_id::PropertyId;

const QUERY_PARAMS: [&str; 4] = ["action", "ids", "format", "props"];

pub struct RemoteResolver {
    api_url: String,
    fetcher: Box<dyn WebResourceFetcher>,
}

impl RemoteResolver {
    pub fn new(api_url: impl Into<String>, fetcher: Box<dyn WebResourceFetcher>) -> Self {
        Self {
            api_url: api_url.into(),
            fetcher,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Build the `wbgetentities` query for a single property.
    ///
    /// Query parameters already present on the base URL are kept, except the
    /// four this request sets, which are replaced.
    pub fn query_url(&self, property: &PropertyId) -> Result<Url, ResolveError> {
        let mut url = Url::parse(&self.api_url).map_err(|source| ResolveError::InvalidUrl {
            url: self.api_url.clone(),
            source,
        })?;

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !QUERY_PARAMS.iter().any(|p| k == p))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("action", "wbgetentities")
            .append_pair("ids", property.as_str())
            .append_pair("format", "json")
            .append_pair("props", "datatype");

        Ok(url)
    }

    /// Look up the declared datatype of `property` online
    pub fn resolve(&self, property: &PropertyId) -> Result<DatatypeId, ResolveError> {
        let url = self.query_url(property)?;
        info!(property = %property, url = %url, "Fetching datatype of property online");

        let body = self
            .fetcher
            .fetch(url.as_str())
            .map_err(|source| ResolveError::Network {
                property: property.clone(),
                source,
            })?;

        debug!(property = %property, bytes = body.len(), "Received datatype response");
        parse_datatype_response(property, &body)
    }
}

/// Extract `entities.<property>.datatype` and map it onto [`DatatypeId`]
pub fn parse_datatype_response(
    property: &PropertyId,
    body: &[u8],
) -> Result<DatatypeId, ResolveError> {
    let malformed = |message: String| ResolveError::Parse {
        property: property.clone(),
        message,
    };

    let response: GetEntitiesResponse =
        serde_json::from_slice(body).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    if let Some(api_error) = response.error {
        return Err(malformed(format!(
            "API error '{}': {}",
            api_error.code,
            api_error.info.unwrap_or_default()
        )));
    }

    let entities = response
        .entities
        .ok_or_else(|| malformed("missing 'entities' object".to_string()))?;
    let entity = entities
        .get(property.as_str())
        .ok_or_else(|| malformed(format!("no entry for {} in 'entities'", property)))?;

    if entity.is_missing() {
        return Err(malformed(format!("{} does not exist", property)));
    }

    let datatype = entity
        .datatype
        .as_deref()
        .ok_or_else(|| malformed("missing 'datatype' field".to_string()))?;

    DatatypeId::from_wikibase_name(datatype).ok_or_else(|| ResolveError::UnknownType {
        property: property.clone(),
        datatype: datatype.to_string(),
    })
}
