use std::collections::VecDeque;
use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::{DataPoint, PointIndex};
use crate::error::{FinderError, FinderResult};
use crate::interaction::{
    EventKind, KeyAction, KeyEvent, PickEvent, PlotEvent, PointerAction, PointerButton,
    PointerEvent,
};
use crate::render::{
    AxesPrimitive, CirclePrimitive, DisplaySurface, EventCallback, Layout, OutputHandle,
    PlotSurface, ScatterPrimitive, SubscriptionHandle, TextPrimitive, VisualHandle,
};

/// One live visual held by the headless surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Points(ScatterPrimitive),
    Text(TextPrimitive),
    Circle(CirclePrimitive),
}

struct Registration {
    handle: SubscriptionHandle,
    kind: EventKind,
    callback: EventCallback,
}

/// In-memory plot surface used by tests and headless sessions.
///
/// It validates every primitive, keeps the live visual set, and replays a
/// scripted queue of host events. Presses and scrolls over a pickable scatter
/// are followed by a pick event, mirroring how interactive backends report
/// hits. Once the script runs dry the surface behaves as torn down.
#[derive(Default)]
pub struct HeadlessSurface {
    axes: Option<AxesPrimitive>,
    visuals: IndexMap<VisualHandle, Visual>,
    registrations: Vec<Registration>,
    pending: VecDeque<PlotEvent>,
    next_visual: u64,
    next_subscription: u64,
    dispatched: usize,
    closed: bool,
}

impl fmt::Debug for HeadlessSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessSurface")
            .field("visuals", &self.visuals.len())
            .field("registrations", &self.registrations.len())
            .field("pending", &self.pending.len())
            .field("dispatched", &self.dispatched)
            .field("closed", &self.closed)
            .finish()
    }
}

impl HeadlessSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn axes(&self) -> Option<&AxesPrimitive> {
        self.axes.as_ref()
    }

    #[must_use]
    pub fn visual(&self, handle: VisualHandle) -> Option<&Visual> {
        self.visuals.get(&handle)
    }

    /// Live visuals in drawing order.
    pub fn visuals(&self) -> impl Iterator<Item = (VisualHandle, &Visual)> {
        self.visuals.iter().map(|(handle, visual)| (*handle, visual))
    }

    #[must_use]
    pub fn live_visual_count(&self) -> usize {
        self.visuals.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.visuals.values().filter_map(|visual| match visual {
            Visual::Text(text) => Some(text),
            _ => None,
        })
    }

    #[must_use]
    pub fn active_registration_count(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn registration_count_for(&self, kind: EventKind) -> usize {
        self.registrations
            .iter()
            .filter(|registration| registration.kind == kind)
            .count()
    }

    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn dispatched_event_count(&self) -> usize {
        self.dispatched
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Tears the surface down; later draws, registrations and event pumps fail.
    pub fn close(&mut self) {
        self.closed = true;
        self.pending.clear();
    }

    pub fn queue_event(&mut self, event: PlotEvent) -> &mut Self {
        self.pending.push_back(event);
        self
    }

    pub fn press_at(&mut self, x: f64, y: f64) -> &mut Self {
        self.queue_event(PlotEvent::Pointer(PointerEvent::press(
            PointerButton::Primary,
            Some(DataPoint::new(x, y)),
        )))
    }

    pub fn release_at(&mut self, x: f64, y: f64) -> &mut Self {
        self.queue_event(PlotEvent::Pointer(PointerEvent::release(
            PointerButton::Primary,
            Some(DataPoint::new(x, y)),
        )))
    }

    pub fn click_at(&mut self, x: f64, y: f64) -> &mut Self {
        self.press_at(x, y).release_at(x, y)
    }

    /// Release reported outside the plot area, without data coordinates.
    pub fn release_outside(&mut self) -> &mut Self {
        self.queue_event(PlotEvent::Pointer(PointerEvent::release(
            PointerButton::Primary,
            None,
        )))
    }

    pub fn scroll_at(&mut self, x: f64, y: f64) -> &mut Self {
        self.queue_event(PlotEvent::Pointer(PointerEvent::scroll(
            true,
            Some(DataPoint::new(x, y)),
        )))
    }

    pub fn key_press(&mut self, key: &str) -> &mut Self {
        self.queue_event(PlotEvent::Key(KeyEvent::new(KeyAction::Press, key, None)))
    }

    pub fn key_release(&mut self, key: &str) -> &mut Self {
        self.queue_event(PlotEvent::Key(KeyEvent::new(KeyAction::Release, key, None)))
    }

    pub fn tap_key(&mut self, key: &str) -> &mut Self {
        self.key_press(key).key_release(key)
    }

    /// Indices of every pickable point within its scatter's pick radius.
    #[must_use]
    pub fn hit_test(&self, position: DataPoint) -> Vec<PointIndex> {
        let mut hits = Vec::new();
        for visual in self.visuals.values() {
            let Visual::Points(scatter) = visual else {
                continue;
            };
            let Some(radius) = scatter.pick_radius else {
                continue;
            };
            for point in &scatter.points {
                if point.position.distance_to(position) <= radius && !hits.contains(&point.index) {
                    hits.push(point.index);
                }
            }
        }
        hits
    }

    fn ensure_open(&self) -> FinderResult<()> {
        if self.closed {
            return Err(FinderError::SurfaceClosed);
        }
        Ok(())
    }

    fn insert_visual(&mut self, visual: Visual) -> VisualHandle {
        let handle = VisualHandle(self.next_visual);
        self.next_visual += 1;
        self.visuals.insert(handle, visual);
        handle
    }

    fn dispatch(&mut self, event: &PlotEvent) {
        let kind = event.kind();
        for registration in &mut self.registrations {
            if registration.kind == kind {
                (registration.callback)(event);
            }
        }
    }
}

impl PlotSurface for HeadlessSurface {
    fn configure_axes(&mut self, axes: &AxesPrimitive) -> FinderResult<()> {
        self.ensure_open()?;
        axes.validate()?;
        self.axes = Some(axes.clone());
        Ok(())
    }

    fn draw_points(&mut self, points: &ScatterPrimitive) -> FinderResult<VisualHandle> {
        self.ensure_open()?;
        points.validate()?;
        Ok(self.insert_visual(Visual::Points(points.clone())))
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> FinderResult<VisualHandle> {
        self.ensure_open()?;
        text.validate()?;
        Ok(self.insert_visual(Visual::Text(text.clone())))
    }

    fn draw_circle(&mut self, circle: &CirclePrimitive) -> FinderResult<VisualHandle> {
        self.ensure_open()?;
        circle.validate()?;
        Ok(self.insert_visual(Visual::Circle(*circle)))
    }

    fn remove_visual(&mut self, handle: VisualHandle) -> bool {
        self.visuals.shift_remove(&handle).is_some()
    }

    fn register_event_handler(
        &mut self,
        kind: EventKind,
        callback: EventCallback,
    ) -> FinderResult<SubscriptionHandle> {
        self.ensure_open()?;
        let handle = SubscriptionHandle(self.next_subscription);
        self.next_subscription += 1;
        self.registrations.push(Registration {
            handle,
            kind,
            callback,
        });
        trace!(?kind, subscription = handle.0, "registered event handler");
        Ok(handle)
    }

    fn unregister_event_handler(&mut self, handle: SubscriptionHandle) -> bool {
        if let Some(position) = self
            .registrations
            .iter()
            .position(|registration| registration.handle == handle)
        {
            self.registrations.remove(position);
            trace!(subscription = handle.0, "unregistered event handler");
            return true;
        }
        false
    }

    fn process_next_event(&mut self) -> FinderResult<()> {
        self.ensure_open()?;
        let Some(event) = self.pending.pop_front() else {
            debug!(
                dispatched = self.dispatched,
                "event script exhausted; closing headless surface"
            );
            self.closed = true;
            return Err(FinderError::SurfaceClosed);
        };

        self.dispatch(&event);
        self.dispatched += 1;

        if let PlotEvent::Pointer(pointer) = &event {
            if matches!(pointer.action, PointerAction::Press | PointerAction::Scroll) {
                if let Some(position) = pointer.valid_position() {
                    let hits = self.hit_test(position);
                    if !hits.is_empty() {
                        self.pending
                            .push_front(PlotEvent::Pick(PickEvent::new(hits, *pointer)));
                    }
                }
            }
        }
        Ok(())
    }
}

/// In-memory display holding each output's text and the last shown layout.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    outputs: Vec<String>,
    clear_counts: Vec<usize>,
    layout: Option<Layout>,
}

impl HeadlessDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn output_text(&self, output: OutputHandle) -> Option<&str> {
        self.outputs.get(output.0 as usize).map(String::as_str)
    }

    #[must_use]
    pub fn clear_count(&self, output: OutputHandle) -> usize {
        self.clear_counts.get(output.0 as usize).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    fn slot(&mut self, output: OutputHandle) -> FinderResult<usize> {
        let slot = output.0 as usize;
        if slot >= self.outputs.len() {
            return Err(FinderError::InvalidData(format!(
                "unknown display output {}",
                output.0
            )));
        }
        Ok(slot)
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn create_output(&mut self) -> OutputHandle {
        self.outputs.push(String::new());
        self.clear_counts.push(0);
        OutputHandle((self.outputs.len() - 1) as u64)
    }

    fn show_layout(&mut self, layout: &Layout) -> FinderResult<()> {
        for output in layout.right_sidebar.iter().chain(layout.footer.iter()) {
            self.slot(*output)?;
        }
        self.layout = Some(*layout);
        Ok(())
    }

    fn write_to_output(&mut self, output: OutputHandle, text: &str) -> FinderResult<()> {
        let slot = self.slot(output)?;
        self.outputs[slot].push_str(text);
        Ok(())
    }

    fn clear_output(&mut self, output: OutputHandle) -> FinderResult<()> {
        let slot = self.slot(output)?;
        self.outputs[slot].clear();
        self.clear_counts[slot] += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{HeadlessDisplay, HeadlessSurface};
    use crate::core::DataPoint;
    use crate::error::FinderError;
    use crate::interaction::{EventKind, PlotEvent};
    use crate::render::{
        Color, DisplaySurface, PlotSurface, ScatterPoint, ScatterPrimitive, TextPrimitive,
    };

    #[test]
    fn press_over_pickable_point_is_followed_by_pick() {
        let mut surface = HeadlessSurface::new();
        surface
            .draw_points(
                &ScatterPrimitive::filled(
                    vec![ScatterPoint {
                        index: 3,
                        position: DataPoint::new(1.0, 1.0),
                        size: 4.0,
                    }],
                    Color::BLACK,
                )
                .with_pick_radius(0.5),
            )
            .expect("draw");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        surface
            .register_event_handler(
                EventKind::Pick,
                Box::new(move |event: &PlotEvent| sink.borrow_mut().push(event.clone())),
            )
            .expect("register");

        surface.press_at(1.2, 1.1);
        surface.process_next_event().expect("press");
        assert_eq!(surface.pending_event_count(), 1);
        surface.process_next_event().expect("pick");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        match &seen[0] {
            PlotEvent::Pick(pick) => assert_eq!(pick.indices, vec![3]),
            other => panic!("expected pick, got {other:?}"),
        }
    }

    #[test]
    fn exhausted_script_closes_surface() {
        let mut surface = HeadlessSurface::new();
        let err = surface.process_next_event().expect_err("empty script");
        assert!(matches!(err, FinderError::SurfaceClosed));
        assert!(surface.is_closed());
        let text = TextPrimitive::new("x", DataPoint::new(0.0, 0.0), 5.0, Color::BLACK);
        assert!(matches!(
            surface.draw_text(&text),
            Err(FinderError::SurfaceClosed)
        ));
    }

    #[test]
    fn display_speak_replaces_previous_text() {
        let mut display = HeadlessDisplay::new();
        let output = display.create_output();
        display.write_line(output, "first").expect("write");
        display.speak(output, "second").expect("speak");
        assert_eq!(display.output_text(output), Some("second\n"));
        assert_eq!(display.clear_count(output), 1);
    }
}
