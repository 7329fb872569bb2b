mod headless;
mod primitives;

use serde::{Deserialize, Serialize};

pub use headless::{HeadlessDisplay, HeadlessSurface, Visual};
pub use primitives::{
    AxesPrimitive, CirclePrimitive, Color, ScatterPoint, ScatterPrimitive, TextHAlign,
    TextPrimitive, TextVAlign,
};

use crate::error::FinderResult;
use crate::interaction::{EventKind, PlotEvent};

/// Opaque handle to one drawn visual, used to remove it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Opaque handle to one event-handler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionHandle(pub u64);

/// Opaque handle to one text output area of a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputHandle(pub u64);

/// Push-style event handler owned by a plot surface.
pub type EventCallback = Box<dyn FnMut(&PlotEvent)>;

/// Contract implemented by any plotting backend.
///
/// Coordinates are in data space (sky offsets). The surface owns the host
/// event loop: handlers registered here are invoked from inside
/// `process_next_event`, on the caller's thread.
pub trait PlotSurface {
    fn configure_axes(&mut self, axes: &AxesPrimitive) -> FinderResult<()>;

    fn draw_points(&mut self, points: &ScatterPrimitive) -> FinderResult<VisualHandle>;

    fn draw_text(&mut self, text: &TextPrimitive) -> FinderResult<VisualHandle>;

    fn draw_circle(&mut self, circle: &CirclePrimitive) -> FinderResult<VisualHandle>;

    /// Removes a visual. Returns `false` when the handle was not live.
    fn remove_visual(&mut self, handle: VisualHandle) -> bool;

    fn register_event_handler(
        &mut self,
        kind: EventKind,
        callback: EventCallback,
    ) -> FinderResult<SubscriptionHandle>;

    /// Drops a registration. Returns `false` when the handle was not registered.
    fn unregister_event_handler(&mut self, handle: SubscriptionHandle) -> bool;

    /// Runs the host event loop until exactly one event has been dispatched.
    ///
    /// Blocks for as long as the host has nothing to deliver. Fails with
    /// `FinderError::SurfaceClosed` once the surface is torn down.
    fn process_next_event(&mut self) -> FinderResult<()>;
}

/// Arrangement of the plot canvas (always in the center) and text outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub right_sidebar: Option<OutputHandle>,
    pub footer: Option<OutputHandle>,
}

/// Contract implemented by whatever hosts the canvas and its text outputs.
pub trait DisplaySurface {
    fn create_output(&mut self) -> OutputHandle;

    fn show_layout(&mut self, layout: &Layout) -> FinderResult<()>;

    /// Appends `text` verbatim to an output.
    fn write_to_output(&mut self, output: OutputHandle, text: &str) -> FinderResult<()>;

    fn clear_output(&mut self, output: OutputHandle) -> FinderResult<()>;

    /// Appends one line, like printing into the output.
    fn write_line(&mut self, output: OutputHandle, line: &str) -> FinderResult<()> {
        self.write_to_output(output, &format!("{line}\n"))
    }

    /// Replaces the output's content with a single status line.
    fn speak(&mut self, output: OutputHandle, line: &str) -> FinderResult<()> {
        self.clear_output(output)?;
        self.write_line(output, line)
    }
}
