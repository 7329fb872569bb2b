use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{DataPoint, PointIndex};
use crate::error::{FinderError, FinderResult};
use crate::render::{
    Color, PlotSurface, ScatterPoint, ScatterPrimitive, TextHAlign, TextPrimitive, TextVAlign,
    VisualHandle,
};

/// Look of the label and ring drawn around a selected star.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    pub color: Color,
    pub marker_size: f64,
    pub label_font_size_pt: f64,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: Color::DARK_ORCHID.with_alpha(0.5),
            marker_size: 100.0,
            label_font_size_pt: 7.0,
        }
    }
}

impl HighlightStyle {
    pub fn validate(self) -> FinderResult<()> {
        if !self.marker_size.is_finite() || self.marker_size <= 0.0 {
            return Err(FinderError::InvalidData(
                "highlight marker size must be finite and > 0".to_owned(),
            ));
        }
        if !self.label_font_size_pt.is_finite() || self.label_font_size_pt <= 0.0 {
            return Err(FinderError::InvalidData(
                "highlight label font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionChange {
    Added(PointIndex),
    Removed(PointIndex),
}

impl SelectionChange {
    #[must_use]
    pub fn index(self) -> PointIndex {
        match self {
            SelectionChange::Added(index) | SelectionChange::Removed(index) => index,
        }
    }
}

/// A selected star and the visuals that highlight it.
///
/// Records are only created by `acquire`, which either draws both visuals or
/// none, and only destroyed by `release`, which removes both.
#[derive(Debug, PartialEq)]
pub struct SelectionRecord {
    index: PointIndex,
    position: DataPoint,
    label: VisualHandle,
    marker: VisualHandle,
}

impl SelectionRecord {
    fn acquire<S: PlotSurface + ?Sized>(
        surface: &mut S,
        index: PointIndex,
        position: DataPoint,
        style: HighlightStyle,
    ) -> FinderResult<Self> {
        let label = surface.draw_text(
            &TextPrimitive::new(
                format!("[{index}]"),
                position,
                style.label_font_size_pt,
                style.color,
            )
            .with_alignment(TextHAlign::Center, TextVAlign::Bottom),
        )?;

        let ring = ScatterPrimitive::ring(
            vec![ScatterPoint {
                index,
                position,
                size: style.marker_size,
            }],
            style.color,
        );
        let marker = match surface.draw_points(&ring) {
            Ok(marker) => marker,
            Err(err) => {
                surface.remove_visual(label);
                return Err(err);
            }
        };

        Ok(Self {
            index,
            position,
            label,
            marker,
        })
    }

    fn release<S: PlotSurface + ?Sized>(self, surface: &mut S) {
        let label_removed = surface.remove_visual(self.label);
        let marker_removed = surface.remove_visual(self.marker);
        if !(label_removed && marker_removed) {
            debug!(
                index = self.index,
                label_removed, marker_removed, "highlight visuals were already gone"
            );
        }
    }

    #[must_use]
    pub fn index(&self) -> PointIndex {
        self.index
    }

    #[must_use]
    pub fn position(&self) -> DataPoint {
        self.position
    }

    #[must_use]
    pub fn label(&self) -> VisualHandle {
        self.label
    }

    #[must_use]
    pub fn marker(&self) -> VisualHandle {
        self.marker
    }
}

/// Toggled set of picked points, kept in pick order.
///
/// `order` holds the explicit pick sequence; `records` gives constant-time
/// membership. Both always describe the same set of indices.
#[derive(Debug, Default)]
pub struct Selection {
    order: Vec<PointIndex>,
    records: HashMap<PointIndex, SelectionRecord>,
    style: HighlightStyle,
}

impl Selection {
    #[must_use]
    pub fn new(style: HighlightStyle) -> Self {
        Self {
            order: Vec::new(),
            records: HashMap::new(),
            style,
        }
    }

    /// Selects `index` at `position`, or deselects it when it is already selected.
    pub fn pick<S: PlotSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        index: PointIndex,
        position: DataPoint,
    ) -> FinderResult<SelectionChange> {
        if let Some(record) = self.records.remove(&index) {
            self.order.retain(|selected| *selected != index);
            record.release(surface);
            debug!(index, selected = self.order.len(), "deselected point");
            return Ok(SelectionChange::Removed(index));
        }

        let record = SelectionRecord::acquire(surface, index, position, self.style)?;
        self.records.insert(index, record);
        self.order.push(index);
        debug!(index, selected = self.order.len(), "selected point");
        Ok(SelectionChange::Added(index))
    }

    /// Deselects everything and releases all highlight visuals.
    pub fn clear<S: PlotSurface + ?Sized>(&mut self, surface: &mut S) {
        for index in self.order.drain(..) {
            if let Some(record) = self.records.remove(&index) {
                record.release(surface);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn contains(&self, index: PointIndex) -> bool {
        self.records.contains_key(&index)
    }

    /// Selected indices in pick order.
    #[must_use]
    pub fn indices(&self) -> &[PointIndex] {
        &self.order
    }

    /// Records in pick order.
    pub fn records(&self) -> impl Iterator<Item = &SelectionRecord> {
        self.order.iter().filter_map(|index| self.records.get(index))
    }

    /// The `(A, B)` pair, by pick order, when exactly two points are selected.
    #[must_use]
    pub fn pair(&self) -> Option<(PointIndex, PointIndex)> {
        match self.order.as_slice() {
            [first, second] => Some((*first, *second)),
            _ => None,
        }
    }

    #[must_use]
    pub fn style(&self) -> HighlightStyle {
        self.style
    }
}
