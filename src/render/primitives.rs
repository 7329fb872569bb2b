use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, PointIndex};
use crate::error::{FinderError, FinderResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);
    pub const DARK_ORCHID: Self = Self::rgb(0.6, 0.196, 0.8);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    pub fn validate(self) -> FinderResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(FinderError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextVAlign {
    Top,
    Center,
    Bottom,
}

/// Draw command for one label anchored in data space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub anchor: DataPoint,
    pub font_size_pt: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(text: impl Into<String>, anchor: DataPoint, font_size_pt: f64, color: Color) -> Self {
        Self {
            text: text.into(),
            anchor,
            font_size_pt,
            color,
            h_align: TextHAlign::Left,
            v_align: TextVAlign::Center,
        }
    }

    #[must_use]
    pub fn with_alignment(mut self, h_align: TextHAlign, v_align: TextVAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn validate(&self) -> FinderResult<()> {
        if self.text.is_empty() {
            return Err(FinderError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.anchor.is_finite() {
            return Err(FinderError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_pt.is_finite() || self.font_size_pt <= 0.0 {
            return Err(FinderError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// One marker of a scatter primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub index: PointIndex,
    pub position: DataPoint,
    /// Marker area in points squared.
    pub size: f64,
}

/// Draw command for a set of markers.
///
/// When `pick_radius` is set the surface reports presses within that
/// data-space distance of a marker as pick events carrying `ScatterPoint::index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPrimitive {
    pub points: Vec<ScatterPoint>,
    pub fill: Option<Color>,
    pub edge: Option<Color>,
    pub pick_radius: Option<f64>,
}

impl ScatterPrimitive {
    #[must_use]
    pub fn filled(points: Vec<ScatterPoint>, fill: Color) -> Self {
        Self {
            points,
            fill: Some(fill),
            edge: None,
            pick_radius: None,
        }
    }

    /// Hollow markers, used to ring highlighted stars.
    #[must_use]
    pub fn ring(points: Vec<ScatterPoint>, edge: Color) -> Self {
        Self {
            points,
            fill: None,
            edge: Some(edge),
            pick_radius: None,
        }
    }

    #[must_use]
    pub fn with_pick_radius(mut self, pick_radius: f64) -> Self {
        self.pick_radius = Some(pick_radius);
        self
    }

    pub fn validate(&self) -> FinderResult<()> {
        if self.fill.is_none() && self.edge.is_none() {
            return Err(FinderError::InvalidData(
                "scatter primitive needs a fill or an edge color".to_owned(),
            ));
        }
        for point in &self.points {
            if !point.position.is_finite() {
                return Err(FinderError::InvalidData(format!(
                    "scatter point {} has non-finite coordinates",
                    point.index
                )));
            }
            if !point.size.is_finite() || point.size < 0.0 {
                return Err(FinderError::InvalidData(format!(
                    "scatter point {} size must be finite and >= 0",
                    point.index
                )));
            }
        }
        if let Some(radius) = self.pick_radius {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(FinderError::InvalidData(
                    "pick radius must be finite and > 0".to_owned(),
                ));
            }
        }
        for color in self.fill.iter().chain(self.edge.iter()) {
            color.validate()?;
        }
        Ok(())
    }
}

/// Draw command for a circle outline in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub center: DataPoint,
    pub radius: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(center: DataPoint, radius: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            center,
            radius,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> FinderResult<()> {
        if !self.center.is_finite() {
            return Err(FinderError::InvalidData(
                "circle center must be finite".to_owned(),
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(FinderError::InvalidData(
                "circle radius must be finite and > 0".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(FinderError::InvalidData(
                "circle stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Axis titles, limits and grid for the plot area.
///
/// Limits are `(left, right)` / `(bottom, top)`, so a reversed pair flips the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxesPrimitive {
    pub x_label: String,
    pub y_label: String,
    pub x_limits: (f64, f64),
    pub y_limits: (f64, f64),
    pub grid: Option<Color>,
    pub equal_aspect: bool,
}

impl AxesPrimitive {
    pub fn validate(&self) -> FinderResult<()> {
        for (axis, (low, high)) in [("x", self.x_limits), ("y", self.y_limits)] {
            if !low.is_finite() || !high.is_finite() || low == high {
                return Err(FinderError::InvalidData(format!(
                    "{axis} limits must be finite and distinct"
                )));
            }
        }
        if let Some(grid) = self.grid {
            grid.validate()?;
        }
        Ok(())
    }
}
