use serde::{Deserialize, Serialize};

use crate::core::AlignedSeriesMatrix;

use super::ChartViewConfig;

/// HSL stroke color assigned to a series by its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesColor {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl SeriesColor {
    #[must_use]
    pub fn css(self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Legend/series entry for one entity of the aligned matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesOption {
    pub entity: String,
    pub label: String,
    pub color: SeriesColor,
    pub stroke: String,
    pub width: f64,
}

/// Color for the series at `index`; depends only on the index and config.
#[must_use]
pub fn series_color(index: usize, config: &ChartViewConfig) -> SeriesColor {
    let hue = (index as u64 * u64::from(config.hue_step)) % 360;
    SeriesColor {
        hue: hue as u16,
        saturation: config.saturation,
        lightness: config.lightness,
    }
}

/// One option per entity, in the matrix entity order.
#[must_use]
pub fn series_options(matrix: &AlignedSeriesMatrix, config: &ChartViewConfig) -> Vec<SeriesOption> {
    matrix
        .entities()
        .iter()
        .zip(matrix.labels())
        .enumerate()
        .map(|(index, (entity, label))| {
            let color = series_color(index, config);
            SeriesOption {
                entity: entity.clone(),
                label: label.clone(),
                color,
                stroke: color.css(),
                width: config.stroke_width,
            }
        })
        .collect()
}
