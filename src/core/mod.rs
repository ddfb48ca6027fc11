pub mod aligner;
pub mod cursor;
pub mod labels;
pub mod primitives;
pub mod types;

pub use aligner::{
    AlignedSeriesMatrix, Alignment, AlignmentReport, align, align_observations, align_raw,
    align_rows,
};
pub use cursor::{CursorQuery, TooltipPayload, TooltipRow, resolve};
pub use labels::{
    UNKNOWN_ENTITY_LABEL, entity_label, is_known_entity, known_entities, normalize_entity_code,
};
pub use primitives::{date_to_unix_seconds, parse_observation_date};
pub use types::{Observation, RawObservation, RowRejection, SeriesValue};
