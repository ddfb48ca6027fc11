use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

/// Presentation settings for the chart and its tooltip.
///
/// Serializable so hosts can persist chart setup; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartViewConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Hue distance between consecutive series, in degrees.
    #[serde(default = "default_hue_step")]
    pub hue_step: u16,
    #[serde(default = "default_saturation")]
    pub saturation: u8,
    #[serde(default = "default_lightness")]
    pub lightness: u8,
    /// `chrono` format string for the tooltip date line.
    #[serde(default = "default_tooltip_date_format")]
    pub tooltip_date_format: String,
    #[serde(default = "default_gap_text")]
    pub gap_text: String,
}

impl Default for ChartViewConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            stroke_width: default_stroke_width(),
            hue_step: default_hue_step(),
            saturation: default_saturation(),
            lightness: default_lightness(),
            tooltip_date_format: default_tooltip_date_format(),
            gap_text: default_gap_text(),
        }
    }
}

impl ChartViewConfig {
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_gap_text(mut self, gap_text: impl Into<String>) -> Self {
        self.gap_text = gap_text.into();
        self
    }

    pub fn validate(&self) -> ScopeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ScopeError::InvalidConfig(format!(
                "chart size must be non-zero: width={}, height={}",
                self.width, self.height
            )));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ScopeError::InvalidConfig(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        if self.saturation > 100 || self.lightness > 100 {
            return Err(ScopeError::InvalidConfig(
                "saturation and lightness are percentages (0..=100)".to_owned(),
            ));
        }
        if StrftimeItems::new(&self.tooltip_date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ScopeError::InvalidConfig(format!(
                "invalid tooltip date format `{}`",
                self.tooltip_date_format
            )));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ScopeResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ScopeError::InvalidConfig(format!("failed to parse view config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_title() -> String {
    "COVID-19 Metric Over Time".to_owned()
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    400
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_hue_step() -> u16 {
    30
}

fn default_saturation() -> u8 {
    70
}

fn default_lightness() -> u8 {
    50
}

fn default_tooltip_date_format() -> String {
    "%Y-%m-%d".to_owned()
}

fn default_gap_text() -> String {
    "no data".to_owned()
}
