use serde::{Deserialize, Serialize};

use crate::core::{Band, OffsetUnit};
use crate::error::{FinderError, FinderResult};
use crate::interaction::HighlightStyle;

/// Finder chart setup.
///
/// This type is serializable so observers can keep per-instrument chart
/// presets next to their target lists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinderChartConfig {
    /// Band that drives marker sizes and brightness labels.
    #[serde(default = "default_band")]
    pub band: Band,
    #[serde(default = "default_faintest_magnitude_to_show")]
    pub faintest_magnitude_to_show: f64,
    #[serde(default = "default_faintest_magnitude_to_label")]
    pub faintest_magnitude_to_label: f64,
    /// Marker area of a zero-magnitude star.
    #[serde(default = "default_size_of_zero_magnitude")]
    pub size_of_zero_magnitude: f64,
    #[serde(default = "default_unit")]
    pub unit: OffsetUnit,
    /// Pick tolerance around each star, in `unit`.
    #[serde(default = "default_pick_radius")]
    pub pick_radius: f64,
    #[serde(default = "default_label_font_size_pt")]
    pub label_font_size_pt: f64,
    #[serde(default)]
    pub highlight: HighlightStyle,
}

impl Default for FinderChartConfig {
    fn default() -> Self {
        Self {
            band: default_band(),
            faintest_magnitude_to_show: default_faintest_magnitude_to_show(),
            faintest_magnitude_to_label: default_faintest_magnitude_to_label(),
            size_of_zero_magnitude: default_size_of_zero_magnitude(),
            unit: default_unit(),
            pick_radius: default_pick_radius(),
            label_font_size_pt: default_label_font_size_pt(),
            highlight: HighlightStyle::default(),
        }
    }
}

impl FinderChartConfig {
    #[must_use]
    pub fn with_band(mut self, band: Band) -> Self {
        self.band = band;
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: OffsetUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Sets the faintest magnitude drawn with a visible marker and the
    /// faintest magnitude that gets a brightness label.
    #[must_use]
    pub fn with_magnitude_limits(mut self, show: f64, label: f64) -> Self {
        self.faintest_magnitude_to_show = show;
        self.faintest_magnitude_to_label = label;
        self
    }

    #[must_use]
    pub fn with_pick_radius(mut self, pick_radius: f64) -> Self {
        self.pick_radius = pick_radius;
        self
    }

    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightStyle) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn validate(self) -> FinderResult<()> {
        for (field, value) in [
            ("faintest_magnitude_to_show", self.faintest_magnitude_to_show),
            ("faintest_magnitude_to_label", self.faintest_magnitude_to_label),
        ] {
            if !value.is_finite() {
                return Err(FinderError::InvalidData(format!("`{field}` must be finite")));
            }
        }
        if self.faintest_magnitude_to_show <= 0.0 {
            return Err(FinderError::InvalidData(
                "`faintest_magnitude_to_show` must be > 0".to_owned(),
            ));
        }
        for (field, value) in [
            ("size_of_zero_magnitude", self.size_of_zero_magnitude),
            ("pick_radius", self.pick_radius),
            ("label_font_size_pt", self.label_font_size_pt),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FinderError::InvalidData(format!(
                    "`{field}` must be finite and > 0"
                )));
            }
        }
        self.highlight.validate()
    }

    pub fn to_json_pretty(&self) -> FinderResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            FinderError::InvalidData(format!("failed to serialize finder chart config: {e}"))
        })
    }

    /// Parses and validates a config; missing fields take their defaults.
    pub fn from_json_str(input: &str) -> FinderResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            FinderError::InvalidData(format!("failed to parse finder chart config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn default_band() -> Band {
    Band::GGaia
}

fn default_faintest_magnitude_to_show() -> f64 {
    20.0
}

fn default_faintest_magnitude_to_label() -> f64 {
    16.0
}

fn default_size_of_zero_magnitude() -> f64 {
    100.0
}

fn default_unit() -> OffsetUnit {
    OffsetUnit::Arcmin
}

fn default_pick_radius() -> f64 {
    0.1
}

fn default_label_font_size_pt() -> f64 {
    5.0
}
