//! Statement values as seen by the datatype registry
//!
//! Only the *kind* of a value matters for datatype inference; the payloads
//! are carried so callers can hand over the value they are serializing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Storage shape of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    EntityReference,
    GlobeCoordinates,
    Quantity,
    Textual,
    PointInTime,
}

/// A concrete statement value with a definite kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    /// Reference to another entity, e.g. "Q42"
    EntityId { id: String },

    GlobeCoordinates {
        latitude: f64,
        longitude: f64,
        precision: f64,
        /// IRI of the globe, usually Earth (Q2)
        globe: String,
    },

    Quantity {
        amount: Decimal,
        #[serde(default)]
        lower_bound: Option<Decimal>,
        #[serde(default)]
        upper_bound: Option<Decimal>,
        /// Unit IRI, or "1" for unitless quantities
        #[serde(default = "unitless")]
        unit: String,
    },

    /// Plain string payload; its declared datatype may be STRING, URL or COMMONS_MEDIA
    String { value: String },

    Time {
        year: i64,
        month: u8,
        day: u8,
        #[serde(default)]
        hour: u8,
        #[serde(default)]
        minute: u8,
        #[serde(default)]
        second: u8,
        precision: u8,
        /// Offset from UTC in minutes
        #[serde(default)]
        timezone: i32,
        calendar_model: String,
    },
}

fn unitless() -> String {
    "1".to_string()
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::EntityId { .. } => ValueKind::EntityReference,
            Value::GlobeCoordinates { .. } => ValueKind::GlobeCoordinates,
            Value::Quantity { .. } => ValueKind::Quantity,
            Value::String { .. } => ValueKind::Textual,
            Value::Time { .. } => ValueKind::PointInTime,
        }
    }

    pub fn entity(id: impl Into<String>) -> Self {
        Value::EntityId { id: id.into() }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Value::String {
            value: value.into(),
        }
    }

    /// Coordinates on Earth
    pub fn coordinates(latitude: f64, longitude: f64, precision: f64) -> Self {
        Value::GlobeCoordinates {
            latitude,
            longitude,
            precision,
            globe: "http://www.wikidata.org/entity/Q2".to_string(),
        }
    }

    /// Quantity without bounds or unit
    pub fn quantity(amount: Decimal) -> Self {
        Value::Quantity {
            amount,
            lower_bound: None,
            upper_bound: None,
            unit: unitless(),
        }
    }

    /// Day-precision Gregorian date
    pub fn date(year: i64, month: u8, day: u8) -> Self {
        Value::Time {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            precision: 11,
            timezone: 0,
            calendar_model: "http://www.wikidata.org/entity/Q1985727".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Value::entity("Q42").kind(), ValueKind::EntityReference);
        assert_eq!(
            Value::coordinates(52.5, 13.4, 0.01).kind(),
            ValueKind::GlobeCoordinates
        );
        assert_eq!(
            Value::quantity(Decimal::new(1234, 2)).kind(),
            ValueKind::Quantity
        );
        assert_eq!(Value::string("foo.jpg").kind(), ValueKind::Textual);
        assert_eq!(Value::date(1952, 3, 11).kind(), ValueKind::PointInTime);
    }

    #[test]
    fn test_deserialize_tagged_value() {
        let value: Value = serde_json::from_str(r#"{"type":"quantity","amount":"42"}"#).unwrap();
        match value {
            Value::Quantity { amount, unit, .. } => {
                assert_eq!(amount, Decimal::new(42, 0));
                assert_eq!(unit, "1");
            }
            other => panic!("unexpected value {:?}", other),
        }
    }
}
