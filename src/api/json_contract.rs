use serde::{Deserialize, Serialize};

use crate::core::AlignedSeriesMatrix;
use crate::error::{ScopeError, ScopeResult};

use super::ScopeRequest;
use super::request::ScopeRequestWire;

pub const REQUEST_JSON_SCHEMA_V1: u32 = 1;
pub const PLOT_DATA_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRequestJsonContractV1 {
    pub schema_version: u32,
    pub request: ScopeRequest,
}

#[derive(Deserialize)]
struct ScopeRequestEnvelopeWire {
    schema_version: u32,
    request: ScopeRequestWire,
}

/// Plot-ready export: axis column first, then one column per label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotDataJsonContractV1 {
    pub schema_version: u32,
    pub labels: Vec<String>,
    pub columns: Vec<Vec<Option<f64>>>,
}

impl ScopeRequest {
    pub fn to_json_contract_v1_pretty(&self) -> ScopeResult<String> {
        let payload = ScopeRequestJsonContractV1 {
            schema_version: REQUEST_JSON_SCHEMA_V1,
            request: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ScopeError::InvalidData(format!("failed to serialize request contract v1: {e}"))
        })
    }

    /// Accepts either a bare request body or a v1 envelope.
    pub fn from_json_compat_str(input: &str) -> ScopeResult<Self> {
        if let Ok(wire) = serde_json::from_str::<ScopeRequestWire>(input) {
            return Self::try_from(wire);
        }
        let payload: ScopeRequestEnvelopeWire = serde_json::from_str(input).map_err(|e| {
            ScopeError::InvalidRequest(format!("failed to parse request json payload: {e}"))
        })?;
        if payload.schema_version != REQUEST_JSON_SCHEMA_V1 {
            return Err(ScopeError::InvalidRequest(format!(
                "unsupported request schema version: {}",
                payload.schema_version
            )));
        }
        Self::try_from(payload.request)
    }
}

impl AlignedSeriesMatrix {
    #[must_use]
    pub fn to_plot_data_contract_v1(&self) -> PlotDataJsonContractV1 {
        PlotDataJsonContractV1 {
            schema_version: PLOT_DATA_JSON_SCHEMA_V1,
            labels: self.labels().to_vec(),
            columns: self.plot_columns(),
        }
    }

    pub fn to_plot_data_json_contract_v1(&self) -> ScopeResult<String> {
        serde_json::to_string(&self.to_plot_data_contract_v1()).map_err(|e| {
            ScopeError::InvalidData(format!("failed to serialize plot data contract v1: {e}"))
        })
    }
}
