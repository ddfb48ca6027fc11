use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::ChartViewConfig;
use crate::core::{AlignedSeriesMatrix, CursorQuery, SeriesValue, TooltipPayload, resolve};

/// Cursor update emitted by the plotting surface.
///
/// `left`/`top` are pixel offsets inside the plot; `index` is the data index
/// the surface already resolved for the pointer. Any of them is `None` while
/// the pointer is outside the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CursorEvent {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub index: Option<i64>,
}

impl CursorEvent {
    #[must_use]
    pub fn at(left: f64, top: f64, index: i64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            index: Some(index),
        }
    }

    #[must_use]
    pub fn leave() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(self) -> CursorQuery {
        CursorQuery { index: self.index }
    }
}

/// Public tooltip state exposed to host applications.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipState {
    pub visible: bool,
    pub left: f64,
    pub top: f64,
    pub payload: Option<TooltipPayload>,
}

/// Tracks tooltip visibility and content across cursor events.
#[derive(Debug, Clone, Default)]
pub struct TooltipTracker {
    state: TooltipState,
}

impl TooltipTracker {
    #[must_use]
    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    /// Applies one cursor event; returns whether the tooltip is visible.
    ///
    /// The tooltip shows only when the event carries a position and an index
    /// that resolves inside `matrix`.
    pub fn on_cursor(&mut self, matrix: Option<&AlignedSeriesMatrix>, event: CursorEvent) -> bool {
        let resolved = match (matrix, event.left, event.top) {
            (Some(matrix), Some(left), Some(top)) => {
                resolve(matrix, event.query()).map(|payload| (left, top, payload))
            }
            _ => None,
        };

        match resolved {
            Some((left, top, payload)) => {
                self.state.visible = true;
                self.state.left = left;
                self.state.top = top;
                self.state.payload = Some(payload);
            }
            None => self.on_pointer_leave(),
        }
        self.state.visible
    }

    pub fn on_pointer_leave(&mut self) {
        self.state.visible = false;
        self.state.payload = None;
    }
}

/// Text lines for a tooltip: the date first, then `label: value` per series.
#[must_use]
pub fn tooltip_lines(payload: &TooltipPayload, config: &ChartViewConfig) -> Vec<String> {
    let mut lines = Vec::with_capacity(payload.rows.len() + 1);
    lines.push(format!(
        "Date: {}",
        format_date(payload.timestamp, &config.tooltip_date_format)
    ));
    for row in &payload.rows {
        lines.push(format!(
            "{}: {}",
            row.label,
            format_series_value(row.value, &config.gap_text)
        ));
    }
    lines
}

/// Renders a cell; gaps use `gap_text`, whole numbers drop the fraction.
#[must_use]
pub fn format_series_value(value: SeriesValue, gap_text: &str) -> String {
    match value {
        SeriesValue::Gap => gap_text.to_owned(),
        SeriesValue::Value(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        SeriesValue::Value(v) => format!("{v}"),
    }
}

fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(format)) {
        Ok(()) => out,
        Err(_) => date.format("%Y-%m-%d").to_string(),
    }
}
