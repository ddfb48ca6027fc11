//! coviscope: aligned per-country metric timelines with cursor lookup.
//!
//! Raw observation rows are aligned into one rectangular matrix sharing a
//! date axis ([`crate::core::align`]); pointer positions already mapped to a data
//! index by the plotting surface resolve to a tooltip payload
//! ([`crate::core::resolve`]). [`api::ScopeView`] ties both to filter edits and
//! last-response-wins fetch commits.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod telemetry;

pub use crate::api::{ChartViewConfig, ScopeRequest, ScopeResponse, ScopeView};
pub use crate::core::{AlignedSeriesMatrix, CursorQuery, Observation, SeriesValue, TooltipPayload};
pub use crate::error::{ScopeError, ScopeResult};
