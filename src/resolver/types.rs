//! `wbgetentities` response types
//!
//! Only the fields needed for datatype lookup are mapped:
//!
//! ```json
//! {"entities": {"P31": {"type": "property", "id": "P31", "datatype": "wikibase-item"}}}
//! ```
//!
//! Unknown ids come back with a `missing` marker instead of a datatype, and
//! request-level failures as a top-level `error` object.

use std::collections::HashMap;

use serde::Deserialize;

/// Top-level API response
#[derive(Debug, Clone, Deserialize)]
pub struct GetEntitiesResponse {
    #[serde(default)]
    pub entities: Option<HashMap<String, EntityDatatype>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityDatatype {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub datatype: Option<String>,
    /// Present (as an empty string) when the entity does not exist
    #[serde(default)]
    pub missing: Option<serde_json::Value>,
}

impl EntityDatatype {
    pub fn is_missing(&self) -> bool {
        self.missing.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub info: Option<String>,
}
