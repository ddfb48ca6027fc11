use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Alignment, Observation, RawObservation, RowRejection, align_rows};
use crate::error::{ScopeError, ScopeResult};

/// Body returned by the data endpoint.
///
/// Rows stay as raw JSON values until alignment so that one row with the
/// wrong shape is dropped on its own instead of failing the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeResponse {
    #[serde(default)]
    pub data: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ScopeResponse {
    /// Builds a successful response from typed rows.
    pub fn from_rows(rows: Vec<RawObservation>) -> ScopeResult<Self> {
        let data = rows
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ScopeError::InvalidData(format!("failed to encode rows: {e}")))?;
        Ok(Self {
            data: Some(data),
            error: None,
        })
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    /// Parses a response body.
    ///
    /// Fails only when the body itself is not a response object (for example
    /// `data` is not a sequence); malformed rows are handled at alignment.
    pub fn from_json_str(input: &str) -> ScopeResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            ScopeError::InvalidData(format!("failed to parse response json payload: {e}"))
        })
    }

    /// Non-empty upstream error message, if any.
    #[must_use]
    pub fn upstream_error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// Aligns the response rows.
    ///
    /// A non-empty `error` field fails the whole response and no alignment is
    /// attempted.
    pub fn into_alignment(self) -> ScopeResult<Alignment> {
        if let Some(message) = self.upstream_error() {
            warn!(error = message, "data endpoint reported failure");
            return Err(ScopeError::Upstream(message.to_owned()));
        }
        let rows = self.data.unwrap_or_default();
        Ok(align_rows(rows.into_iter().map(row_from_value)))
    }
}

fn row_from_value(value: serde_json::Value) -> Result<Observation, RowRejection> {
    if !value.is_object() {
        return Err(RowRejection::MalformedRow);
    }
    serde_json::from_value::<RawObservation>(value)
        .map_err(|_| RowRejection::MalformedRow)?
        .into_observation()
}
