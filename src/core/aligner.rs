use std::collections::BTreeSet;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::labels::{entity_label, normalize_entity_code};
use crate::core::primitives::date_to_unix_seconds;
use crate::core::types::{Observation, RawObservation, RowRejection, SeriesValue};

/// Rectangular multi-series table sharing one date axis.
///
/// Invariants upheld by construction:
/// - `timestamps` is strictly ascending
/// - `entities`, `labels` and `values` have one entry per entity, in first-seen order
/// - entity codes are normalized (trimmed, ASCII upper-case)
/// - every `values[e]` has exactly `timestamps.len()` cells
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignedSeriesMatrix {
    timestamps: Vec<NaiveDate>,
    entities: Vec<String>,
    labels: Vec<String>,
    values: Vec<Vec<SeriesValue>>,
}

impl AlignedSeriesMatrix {
    #[must_use]
    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    #[must_use]
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Display labels, index-aligned with [`Self::entities`].
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn values(&self) -> &[Vec<SeriesValue>] {
        &self.values
    }

    #[must_use]
    pub fn series(&self, entity_index: usize) -> Option<&[SeriesValue]> {
        self.values.get(entity_index).map(Vec::as_slice)
    }

    #[must_use]
    pub fn value_at(&self, entity_index: usize, slot: usize) -> Option<SeriesValue> {
        self.values.get(entity_index)?.get(slot).copied()
    }

    #[must_use]
    pub fn entity_index(&self, entity: &str) -> Option<usize> {
        let entity = normalize_entity_code(entity);
        self.entities.iter().position(|known| *known == entity)
    }

    /// Number of points on the shared axis.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// `true` when there is nothing to plot; hosts show a "no data" state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Column-major data for the plotting surface.
    ///
    /// Column 0 holds the axis as unix seconds at UTC midnight; every
    /// following column is one entity with `None` in gap cells.
    #[must_use]
    pub fn plot_columns(&self) -> Vec<Vec<Option<f64>>> {
        let mut columns = Vec::with_capacity(self.values.len() + 1);
        columns.push(
            self.timestamps
                .iter()
                .map(|date| Some(date_to_unix_seconds(*date) as f64))
                .collect(),
        );
        for series in &self.values {
            columns.push(series.iter().map(|cell| cell.value()).collect());
        }
        columns
    }
}

/// Diagnostics gathered while aligning one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentReport {
    pub input_rows: usize,
    pub dropped_rows: usize,
    /// Cells written more than once; the last row in input order is kept.
    pub overwritten_cells: usize,
    pub rejections: IndexMap<RowRejection, usize>,
}

impl AlignmentReport {
    fn record_rejection(&mut self, reason: RowRejection) {
        self.dropped_rows += 1;
        *self.rejections.entry(reason).or_insert(0) += 1;
    }
}

/// Aligned matrix plus the report describing how it was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Alignment {
    pub matrix: AlignedSeriesMatrix,
    pub report: AlignmentReport,
}

/// Aligns typed observations into a rectangular matrix.
///
/// Observations with a blank entity or a non-finite value are skipped.
#[must_use]
pub fn align(observations: &[Observation]) -> AlignedSeriesMatrix {
    align_observations(observations).matrix
}

/// Same as [`align`] but also returns the [`AlignmentReport`].
#[must_use]
pub fn align_observations(observations: &[Observation]) -> Alignment {
    let mut report = AlignmentReport {
        input_rows: observations.len(),
        ..AlignmentReport::default()
    };
    let mut accepted: Vec<&Observation> = Vec::with_capacity(observations.len());
    for observation in observations {
        match check_observation(observation) {
            Ok(()) => accepted.push(observation),
            Err(reason) => report.record_rejection(reason),
        }
    }
    finish(&accepted, report)
}

/// Aligns endpoint rows, dropping malformed ones individually.
#[must_use]
pub fn align_raw(rows: Vec<RawObservation>) -> Alignment {
    align_rows(rows.into_iter().map(RawObservation::into_observation))
}

/// Aligns pre-validated rows; each `Err` is counted as a dropped row.
pub fn align_rows<I>(rows: I) -> Alignment
where
    I: IntoIterator<Item = Result<Observation, RowRejection>>,
{
    let mut report = AlignmentReport::default();
    let mut accepted: Vec<Observation> = Vec::new();
    for row in rows {
        report.input_rows += 1;
        match row.and_then(|observation| check_observation(&observation).map(|()| observation)) {
            Ok(observation) => accepted.push(observation),
            Err(reason) => report.record_rejection(reason),
        }
    }
    let refs: Vec<&Observation> = accepted.iter().collect();
    finish(&refs, report)
}

fn check_observation(observation: &Observation) -> Result<(), RowRejection> {
    if observation.entity.trim().is_empty() {
        return Err(RowRejection::MissingEntity);
    }
    if !observation.value.is_finite() {
        return Err(RowRejection::NonFiniteValue);
    }
    Ok(())
}

fn finish(observations: &[&Observation], mut report: AlignmentReport) -> Alignment {
    let (matrix, overwritten_cells) = build_matrix(observations);
    report.overwritten_cells = overwritten_cells;

    debug!(
        input_rows = report.input_rows,
        timestamps = matrix.len(),
        entities = matrix.entity_count(),
        "aligned observations"
    );
    if report.dropped_rows > 0 || report.overwritten_cells > 0 {
        warn!(
            dropped_rows = report.dropped_rows,
            overwritten_cells = report.overwritten_cells,
            "dropped or overwrote observation rows during alignment"
        );
    }

    Alignment { matrix, report }
}

fn build_matrix(observations: &[&Observation]) -> (AlignedSeriesMatrix, usize) {
    let timestamps: Vec<NaiveDate> = observations
        .iter()
        .map(|observation| observation.timestamp)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut series: IndexMap<String, Vec<SeriesValue>> = IndexMap::new();
    let mut overwritten_cells = 0_usize;
    for observation in observations {
        let Ok(slot) = timestamps.binary_search(&observation.timestamp) else {
            continue;
        };
        let cells = series
            .entry(normalize_entity_code(&observation.entity))
            .or_insert_with(|| vec![SeriesValue::Gap; timestamps.len()]);
        if !cells[slot].is_gap() {
            overwritten_cells += 1;
        }
        cells[slot] = SeriesValue::Value(observation.value);
    }

    let mut entities = Vec::with_capacity(series.len());
    let mut labels = Vec::with_capacity(series.len());
    let mut values = Vec::with_capacity(series.len());
    for (entity, cells) in series {
        labels.push(entity_label(&entity).to_owned());
        entities.push(entity);
        values.push(cells);
    }

    (
        AlignedSeriesMatrix {
            timestamps,
            entities,
            labels,
            values,
        },
        overwritten_cells,
    )
}

#[cfg(test)]
mod tests {
    use super::{align_observations, build_matrix};
    use crate::core::types::{Observation, RowRejection, SeriesValue};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 5, d).expect("valid date")
    }

    #[test]
    fn build_matrix_counts_overwrites_per_cell() {
        let rows = [
            Observation::new("US", day(1), 1.0),
            Observation::new("US", day(1), 2.0),
            Observation::new("US", day(1), 3.0),
            Observation::new("IN", day(1), 4.0),
        ];
        let refs: Vec<&Observation> = rows.iter().collect();
        let (matrix, overwritten) = build_matrix(&refs);

        assert_eq!(overwritten, 2);
        assert_eq!(matrix.value_at(0, 0), Some(SeriesValue::Value(3.0)));
        assert_eq!(matrix.value_at(1, 0), Some(SeriesValue::Value(4.0)));
    }

    #[test]
    fn non_finite_and_blank_rows_are_reported_not_aligned() {
        let rows = [
            Observation::new(" ", day(1), 1.0),
            Observation::new("US", day(2), f64::NAN),
            Observation::new("US", day(3), 5.0),
        ];
        let alignment = align_observations(&rows);

        assert_eq!(alignment.matrix.timestamps(), &[day(3)]);
        assert_eq!(alignment.report.input_rows, 3);
        assert_eq!(alignment.report.dropped_rows, 2);
        assert_eq!(
            alignment.report.rejections.get(&RowRejection::MissingEntity),
            Some(&1)
        );
        assert_eq!(
            alignment.report.rejections.get(&RowRejection::NonFiniteValue),
            Some(&1)
        );
    }
}
