use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::aligner::AlignedSeriesMatrix;
use crate::core::types::SeriesValue;

/// Data index reported by the plotting surface for the current pointer.
///
/// `None` means the pointer is outside the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorQuery {
    pub index: Option<i64>,
}

impl CursorQuery {
    #[must_use]
    pub fn at(index: i64) -> Self {
        Self { index: Some(index) }
    }

    #[must_use]
    pub fn outside() -> Self {
        Self { index: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub label: String,
    pub value: SeriesValue,
}

/// Everything a tooltip shows for one axis position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipPayload {
    pub index: usize,
    pub timestamp: NaiveDate,
    pub rows: SmallVec<[TooltipRow; 8]>,
}

/// Maps a cursor index to the date and per-entity values at that index.
///
/// Returns `None` for an absent, negative, or past-the-end index. Lookup is a
/// direct slot access into the matrix; gap cells are returned as
/// [`SeriesValue::Gap`].
#[must_use]
pub fn resolve(matrix: &AlignedSeriesMatrix, query: CursorQuery) -> Option<TooltipPayload> {
    let slot = usize::try_from(query.index?).ok()?;
    let timestamp = *matrix.timestamps().get(slot)?;

    let rows = matrix
        .labels()
        .iter()
        .zip(matrix.values())
        .map(|(label, series)| TooltipRow {
            label: label.clone(),
            value: series.get(slot).copied().unwrap_or(SeriesValue::Gap),
        })
        .collect();

    trace!(slot, %timestamp, "resolved cursor");
    Some(TooltipPayload {
        index: slot,
        timestamp,
        rows,
    })
}
