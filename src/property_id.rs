//! Property identifiers (`P31`, `P625`, ...)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PropertyIdError;

/// A validated `P<digits>` property identifier.
///
/// The numeric part is parsed once at construction and used as the ordering
/// key for snapshot export, so `P9` sorts before `P10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyId {
    id: String,
    numeric: u64,
}

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Result<Self, PropertyIdError> {
        let id = id.into();
        let numeric = parse_numeric(&id)?;
        Ok(Self { id, numeric })
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// The number after the leading `P`
    pub fn numeric_id(&self) -> u64 {
        self.numeric
    }
}

fn parse_numeric(id: &str) -> Result<u64, PropertyIdError> {
    let invalid = |reason| PropertyIdError {
        input: id.to_string(),
        reason,
    };

    let digits = id
        .strip_prefix('P')
        .ok_or_else(|| invalid("must start with 'P'"))?;
    if digits.is_empty() {
        return Err(invalid("missing numeric part"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("numeric part must be ASCII digits"));
    }
    // "P031" would name P31 under a different key
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(invalid("numeric part has leading zeros"));
    }
    digits
        .parse::<u64>()
        .map_err(|_| invalid("numeric part out of range"))
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl FromStr for PropertyId {
    type Err = PropertyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PropertyId {
    type Error = PropertyIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PropertyId> for String {
    fn from(value: PropertyId) -> Self {
        value.id
    }
}

impl AsRef<str> for PropertyId {
    fn as_ref(&self) -> &str {
        &self.id
    }
}
