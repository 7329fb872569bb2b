use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, PointIndex};

/// Key names that only ever act as modifiers.
pub const MODIFIER_KEYS: [&str; 7] = ["alt", "control", "ctrl", "shift", "super", "cmd", "meta"];

/// Event categories a handler can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ButtonPress,
    ButtonRelease,
    Scroll,
    KeyPress,
    KeyRelease,
    Pick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerAction {
    Press,
    Release,
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    WheelUp,
    WheelDown,
}

/// Pointer event in plot data space.
///
/// `position` is `None` when the pointer was outside the plot area (for
/// example a drag that ended over the axis labels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub button: PointerButton,
    pub position: Option<DataPoint>,
}

impl PointerEvent {
    #[must_use]
    pub fn press(button: PointerButton, position: Option<DataPoint>) -> Self {
        Self {
            action: PointerAction::Press,
            button,
            position,
        }
    }

    #[must_use]
    pub fn release(button: PointerButton, position: Option<DataPoint>) -> Self {
        Self {
            action: PointerAction::Release,
            button,
            position,
        }
    }

    #[must_use]
    pub fn scroll(up: bool, position: Option<DataPoint>) -> Self {
        Self {
            action: PointerAction::Scroll,
            button: if up {
                PointerButton::WheelUp
            } else {
                PointerButton::WheelDown
            },
            position,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self.action {
            PointerAction::Press => EventKind::ButtonPress,
            PointerAction::Release => EventKind::ButtonRelease,
            PointerAction::Scroll => EventKind::Scroll,
        }
    }

    /// Position when it is present and finite.
    #[must_use]
    pub fn valid_position(&self) -> Option<DataPoint> {
        self.position.filter(|point| point.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    Press,
    Release,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub action: KeyAction,
    pub key: String,
    pub position: Option<DataPoint>,
}

impl KeyEvent {
    #[must_use]
    pub fn new(action: KeyAction, key: impl Into<String>, position: Option<DataPoint>) -> Self {
        Self {
            action,
            key: key.into(),
            position,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self.action {
            KeyAction::Press => EventKind::KeyPress,
            KeyAction::Release => EventKind::KeyRelease,
        }
    }

    /// True for a bare modifier such as `alt` or `control`.
    #[must_use]
    pub fn is_modifier_only(&self) -> bool {
        let key = self.key.trim().to_ascii_lowercase();
        MODIFIER_KEYS.contains(&key.as_str())
    }
}

/// A pointer interaction that landed on one or more plotted points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickEvent {
    /// Every point within the pick radius, in plotting order.
    pub indices: Vec<PointIndex>,
    pub pointer: PointerEvent,
}

impl PickEvent {
    #[must_use]
    pub fn new(indices: Vec<PointIndex>, pointer: PointerEvent) -> Self {
        Self { indices, pointer }
    }

    #[must_use]
    pub fn first_index(&self) -> Option<PointIndex> {
        self.indices.first().copied()
    }

    /// Picks also fire for scroll-wheel motion over a point; only presses select.
    #[must_use]
    pub fn is_press(&self) -> bool {
        self.pointer.action == PointerAction::Press
    }
}

/// Everything a plot surface can deliver to registered handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlotEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
    Pick(PickEvent),
}

impl PlotEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            PlotEvent::Pointer(pointer) => pointer.kind(),
            PlotEvent::Key(key) => key.kind(),
            PlotEvent::Pick(_) => EventKind::Pick,
        }
    }
}
