//! The closed set of property datatypes
//!
//! Each datatype has three spellings:
//! - the snapshot token (`ITEM`, `GLOBE_COORDINATES`, ...), also used for serde
//! - the remote API name (`wikibase-item`, `globe-coordinate`, ...)
//! - the ontology IRI emitted by RDF serializers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const ONTOLOGY_PREFIX: &str = "http://www.wikidata.org/ontology#";

/// Declared datatype of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatatypeId {
    Item,
    String,
    Quantity,
    Time,
    Url,
    GlobeCoordinates,
    CommonsMedia,
}

impl DatatypeId {
    pub const ALL: [DatatypeId; 7] = [
        DatatypeId::Item,
        DatatypeId::String,
        DatatypeId::Quantity,
        DatatypeId::Time,
        DatatypeId::Url,
        DatatypeId::GlobeCoordinates,
        DatatypeId::CommonsMedia,
    ];

    /// Token used in snapshot files
    pub fn token(self) -> &'static str {
        match self {
            DatatypeId::Item => "ITEM",
            DatatypeId::String => "STRING",
            DatatypeId::Quantity => "QUANTITY",
            DatatypeId::Time => "TIME",
            DatatypeId::Url => "URL",
            DatatypeId::GlobeCoordinates => "GLOBE_COORDINATES",
            DatatypeId::CommonsMedia => "COMMONS_MEDIA",
        }
    }

    /// Name used by the remote `wbgetentities` API
    pub fn wikibase_name(self) -> &'static str {
        match self {
            DatatypeId::Item => "wikibase-item",
            DatatypeId::String => "string",
            DatatypeId::Quantity => "quantity",
            DatatypeId::Time => "time",
            DatatypeId::Url => "url",
            DatatypeId::GlobeCoordinates => "globe-coordinate",
            DatatypeId::CommonsMedia => "commonsMedia",
        }
    }

    /// Exact, case-sensitive match against the remote vocabulary
    pub fn from_wikibase_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dt| dt.wikibase_name() == name)
    }

    /// Ontology IRI for RDF output
    pub fn iri(self) -> String {
        let local = match self {
            DatatypeId::Item => "propertyTypeItem",
            DatatypeId::String => "propertyTypeString",
            DatatypeId::Quantity => "propertyTypeQuantity",
            DatatypeId::Time => "propertyTypeTime",
            DatatypeId::Url => "propertyTypeUrl",
            DatatypeId::GlobeCoordinates => "propertyTypeGlobeCoordinates",
            DatatypeId::CommonsMedia => "propertyTypeCommonsMedia",
        };
        format!("{}{}", ONTOLOGY_PREFIX, local)
    }
}

impl fmt::Display for DatatypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Unrecognized snapshot token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown datatype token '{0}'")]
pub struct UnknownDatatype(pub String);

impl FromStr for DatatypeId {
    type Err = UnknownDatatype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dt| dt.token() == s)
            .ok_or_else(|| UnknownDatatype(s.to_string()))
    }
}
