//! View-controller surface: request/response contracts, legend options and
//! the filter/fetch state machine.

mod json_contract;
mod legend;
mod request;
mod response;
mod view_config;
mod view_state;

pub use json_contract::{
    PLOT_DATA_JSON_SCHEMA_V1, PlotDataJsonContractV1, REQUEST_JSON_SCHEMA_V1,
    ScopeRequestJsonContractV1,
};
pub use legend::{SeriesColor, SeriesOption, series_color, series_options};
pub use request::{AggregationFunc, CountrySelection, Metric, ScopeRequest};
pub use response::ScopeResponse;
pub use view_config::ChartViewConfig;
pub use view_state::{ChartPhase, CommitOutcome, FilterState, RequestToken, ScopeView};
