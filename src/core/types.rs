use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::labels::normalize_entity_code;
use crate::core::primitives::{parse_observation_date, parse_observation_value};

/// One metric value for one entity on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub entity: String,
    pub timestamp: NaiveDate,
    pub value: f64,
}

impl Observation {
    #[must_use]
    pub fn new(entity: impl Into<String>, timestamp: NaiveDate, value: f64) -> Self {
        Self {
            entity: entity.into(),
            timestamp,
            value,
        }
    }
}

/// Observation row exactly as delivered by the data endpoint.
///
/// Every field is optional so a single malformed row can be rejected on its
/// own instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(default, alias = "location_key", alias = "entity")]
    pub country: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl RawObservation {
    /// Builds a row; non-finite values are kept as their textual form so the
    /// row is rejected as [`RowRejection::NonFiniteValue`], not as missing.
    #[must_use]
    pub fn new(country: &str, date: &str, value: f64) -> Self {
        let value = serde_json::Number::from_f64(value)
            .map_or_else(|| serde_json::Value::String(value.to_string()), serde_json::Value::Number);
        Self {
            country: Some(country.to_owned()),
            date: Some(date.to_owned()),
            value: Some(value),
        }
    }

    /// Validates the row and converts it into a typed [`Observation`].
    pub fn into_observation(self) -> Result<Observation, RowRejection> {
        let entity = match self.country {
            Some(code) if !code.trim().is_empty() => normalize_entity_code(&code),
            _ => return Err(RowRejection::MissingEntity),
        };
        let date = self.date.ok_or(RowRejection::MissingDate)?;
        let timestamp = parse_observation_date(&date).ok_or(RowRejection::UnparsableDate)?;
        let value = match self.value {
            None | Some(serde_json::Value::Null) => return Err(RowRejection::MissingValue),
            Some(raw) => parse_observation_value(&raw)?,
        };

        Ok(Observation {
            entity,
            timestamp,
            value,
        })
    }
}

/// Reason an inbound row was dropped before alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRejection {
    #[error("row does not have the observation shape")]
    MalformedRow,
    #[error("row has no entity code")]
    MissingEntity,
    #[error("row has no date")]
    MissingDate,
    #[error("row date cannot be parsed")]
    UnparsableDate,
    #[error("row has no value")]
    MissingValue,
    #[error("row value is not numeric")]
    UnparsableValue,
    #[error("row value is not finite")]
    NonFiniteValue,
}

/// A single cell of an aligned series.
///
/// `Gap` marks a date on the shared axis with no observation for the entity.
/// It is never coerced to zero; on the wire it is `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum SeriesValue {
    Value(f64),
    Gap,
}

impl SeriesValue {
    #[must_use]
    pub fn is_gap(self) -> bool {
        matches!(self, Self::Gap)
    }

    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(value) => Some(value),
            Self::Gap => None,
        }
    }
}

impl From<Option<f64>> for SeriesValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Gap, Self::Value)
    }
}

impl From<SeriesValue> for Option<f64> {
    fn from(value: SeriesValue) -> Self {
        value.value()
    }
}
