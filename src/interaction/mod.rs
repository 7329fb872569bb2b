pub mod bridge;
pub mod events;
pub mod selection;

use serde::{Deserialize, Serialize};

pub use bridge::{
    CancelToken, Click, EventBridge, INVALID_CLICK_MESSAGE, WaitOutcome, blocking_wait,
};
pub use events::{
    EventKind, KeyAction, KeyEvent, MODIFIER_KEYS, PickEvent, PlotEvent, PointerAction,
    PointerButton, PointerEvent,
};
pub use selection::{HighlightStyle, Selection, SelectionChange, SelectionRecord};

/// Lifecycle of an interactive chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    /// Rendered, no event registrations held.
    Idle,
    /// Pick registrations active; picks mutate the selection.
    Watching,
}
