//! Pull-style waits on top of push-style plot surfaces.
//!
//! A wait registers one handler per requested event kind. The handlers only
//! enqueue into a mailbox private to that wait; the waiting caller pumps the
//! host loop through `PlotSurface::process_next_event` and drains the mailbox
//! in delivery order until its stop condition holds. Every registration is
//! released before the wait returns, whatever the outcome.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::core::DataPoint;
use crate::error::FinderResult;
use crate::interaction::{EventKind, KeyEvent, PlotEvent, PointerButton};
use crate::render::{DisplaySurface, OutputHandle, PlotSurface, SubscriptionHandle};

/// Message shown when a click lacks data coordinates.
pub const INVALID_CLICK_MESSAGE: &str =
    "Hmmm, that wasn't a very nice click. Could you please try again?";

type Mailbox = Rc<RefCell<VecDeque<PlotEvent>>>;

/// Shared flag that aborts a running wait from outside its stop condition.
///
/// Clones share state, so a handler registered elsewhere on the surface (for
/// example a close button) can cancel a wait that is in progress.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    /// Re-arms the token for the next wait.
    pub fn reset(&self) {
        self.0.set(false);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The stop condition returned `true`.
    Completed,
    /// The cancel token fired first.
    Cancelled,
}

/// One accepted click: a button release with data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub position: DataPoint,
    pub button: PointerButton,
}

/// Registers for `kinds`, then blocks until `on_event` returns `true` or `cancel` fires.
///
/// `on_event` gets the surface back so it can draw while the wait is active;
/// it may start a nested wait, which owns its own registrations. Errors from
/// the surface or from `on_event` end the wait and are returned after all
/// registrations made here have been released.
pub fn blocking_wait<S, F>(
    surface: &mut S,
    kinds: &[EventKind],
    cancel: &CancelToken,
    mut on_event: F,
) -> FinderResult<WaitOutcome>
where
    S: PlotSurface + ?Sized,
    F: FnMut(&mut S, &PlotEvent) -> FinderResult<bool>,
{
    let mailbox = Mailbox::default();
    let mut subscriptions = SmallVec::<[SubscriptionHandle; 4]>::new();

    let outcome = subscribe_all(surface, kinds, &mailbox, &mut subscriptions)
        .and_then(|()| drive(surface, &mailbox, cancel, &mut on_event));

    for handle in subscriptions {
        if !surface.unregister_event_handler(handle) {
            warn!(subscription = handle.0, "event handler was already released");
        }
    }

    match &outcome {
        Ok(outcome) => debug!(?outcome, ?kinds, "wait finished"),
        Err(err) => debug!(error = %err, ?kinds, "wait aborted"),
    }
    outcome
}

fn subscribe_all<S: PlotSurface + ?Sized>(
    surface: &mut S,
    kinds: &[EventKind],
    mailbox: &Mailbox,
    subscriptions: &mut SmallVec<[SubscriptionHandle; 4]>,
) -> FinderResult<()> {
    for &kind in kinds {
        let sink = Rc::clone(mailbox);
        let handle = surface.register_event_handler(
            kind,
            Box::new(move |event: &PlotEvent| sink.borrow_mut().push_back(event.clone())),
        )?;
        subscriptions.push(handle);
    }
    Ok(())
}

fn drive<S, F>(
    surface: &mut S,
    mailbox: &Mailbox,
    cancel: &CancelToken,
    on_event: &mut F,
) -> FinderResult<WaitOutcome>
where
    S: PlotSurface + ?Sized,
    F: FnMut(&mut S, &PlotEvent) -> FinderResult<bool>,
{
    loop {
        if cancel.is_cancelled() {
            return Ok(WaitOutcome::Cancelled);
        }
        // The borrow must end before `on_event` runs: a nested wait pumps the
        // surface, which pushes into this mailbox.
        let next = mailbox.borrow_mut().pop_front();
        match next {
            Some(event) => {
                if on_event(surface, &event)? {
                    return Ok(WaitOutcome::Completed);
                }
            }
            None => surface.process_next_event()?,
        }
    }
}

/// Typed waits used by interactive charts, with status output.
#[derive(Debug, Clone, Default)]
pub struct EventBridge {
    cancel: CancelToken,
}

impl EventBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cancel_token(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    /// Token that cancels whichever wait this bridge is running.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs `blocking_wait` with this bridge's token, re-armed first so a
    /// cancel from an earlier wait does not end this one.
    pub fn blocking_wait<S, F>(
        &self,
        surface: &mut S,
        kinds: &[EventKind],
        on_event: F,
    ) -> FinderResult<WaitOutcome>
    where
        S: PlotSurface + ?Sized,
        F: FnMut(&mut S, &PlotEvent) -> FinderResult<bool>,
    {
        self.cancel.reset();
        blocking_wait(surface, kinds, &self.cancel, on_event)
    }

    /// Waits for `count` button releases that carry data coordinates.
    ///
    /// Releases without coordinates are reported on `status` and not counted.
    /// Returns `None` when the wait was cancelled.
    pub fn wait_for_clicks<S, D>(
        &self,
        surface: &mut S,
        display: &mut D,
        status: OutputHandle,
        count: usize,
    ) -> FinderResult<Option<Vec<Click>>>
    where
        S: PlotSurface + ?Sized,
        D: DisplaySurface + ?Sized,
    {
        if count == 0 {
            return Ok(Some(Vec::new()));
        }
        display.speak(status, &format!("waiting for {count} mouse click(s)."))?;
        info!(count, "waiting for mouse clicks");

        let mut clicks = Vec::with_capacity(count);
        let outcome = self.blocking_wait(surface, &[EventKind::ButtonRelease], |_, event| {
            let PlotEvent::Pointer(pointer) = event else {
                return Ok(false);
            };
            let Some(position) = pointer.valid_position() else {
                warn!("rejected click without data coordinates");
                display.write_line(status, INVALID_CLICK_MESSAGE)?;
                return Ok(false);
            };
            clicks.push(Click {
                position,
                button: pointer.button,
            });
            Ok(clicks.len() >= count)
        })?;

        Ok(match outcome {
            WaitOutcome::Completed => Some(clicks),
            WaitOutcome::Cancelled => None,
        })
    }

    /// Waits for the first key release that is not a bare modifier.
    ///
    /// Returns `None` when the wait was cancelled.
    pub fn wait_for_key_press<S, D>(
        &self,
        surface: &mut S,
        display: &mut D,
        status: OutputHandle,
    ) -> FinderResult<Option<KeyEvent>>
    where
        S: PlotSurface + ?Sized,
        D: DisplaySurface + ?Sized,
    {
        display.speak(status, "waiting for a key to be pressed and released")?;
        info!("waiting for a key press");

        let mut released = None;
        let outcome = self.blocking_wait(surface, &[EventKind::KeyRelease], |_, event| {
            let PlotEvent::Key(key) = event else {
                return Ok(false);
            };
            if key.is_modifier_only() {
                return Ok(false);
            }
            released = Some(key.clone());
            Ok(true)
        })?;

        if outcome == WaitOutcome::Cancelled {
            return Ok(None);
        }
        if let Some(key) = &released {
            let at = match key.position {
                Some(point) => format!("{}, {}", point.x, point.y),
                None => "None, None".to_owned(),
            };
            display.write_line(status, &format!("\"{}\" pressed at {at}", key.key))?;
        }
        Ok(released)
    }
}
