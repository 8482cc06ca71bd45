//! Event translation and routing.
//!
//! Converts raw device events into window-addressed events (stamping key
//! and button events with the current cursor position, running axis motion
//! through the cursor tracker) and routes window events through the stack:
//! a modal active window intercepts everything, otherwise the scan runs
//! top-down and stops at the first consumer.

use std::sync::Arc;

use tracing::{debug, warn};

use super::Application;
use crate::cursor::AxisOutcome;
use crate::event::{
    InputEvent, InputEventFlags, InputEventKind, WindowEvent, WindowEventFlags, WindowEventKind,
};
use crate::window::{Modality, Window};

impl Application {
    // =========================================================================
    // TRANSLATION
    // =========================================================================

    /// Translate one raw device event and route the result.
    pub(super) fn handle_input_event(&self, event: &InputEvent) {
        match event.kind {
            InputEventKind::KeyPress => self.handle_key_input(event, WindowEventKind::KeyDown),
            InputEventKind::KeyRelease => self.handle_key_input(event, WindowEventKind::KeyUp),
            InputEventKind::ButtonPress => {
                self.handle_button_input(event, WindowEventKind::ButtonDown)
            }
            InputEventKind::ButtonRelease => {
                self.handle_button_input(event, WindowEventKind::ButtonUp)
            }
            InputEventKind::AxisMotion => self.handle_axis_motion(event),
        }
    }

    /// Key events copy symbol, modifier and lock state verbatim and are
    /// stamped with the current cursor position; they never move the cursor.
    fn handle_key_input(&self, event: &InputEvent, kind: WindowEventKind) {
        let position = self.lock().cursor.position();

        let mut translated = WindowEvent::new(kind, position);
        if event.flags.contains(InputEventFlags::REPEAT) {
            translated.flags |= WindowEventFlags::REPEAT;
        }
        translated.key = event.key;
        translated.modifiers = event.modifiers;
        translated.locks = event.locks;
        translated.button = event.button;
        translated.buttons = event.buttons;

        self.deliver_window_event(&translated);
    }

    fn handle_button_input(&self, event: &InputEvent, kind: WindowEventKind) {
        let position = self.lock().cursor.position();

        let mut translated = WindowEvent::new(kind, position);
        translated.button = event.button;
        translated.buttons = event.buttons;

        self.deliver_window_event(&translated);
    }

    /// Axis motion moves the cursor (or becomes a wheel step), schedules
    /// cursor damage on the active window when the cursor is visible, and
    /// routes the resulting event.
    fn handle_axis_motion(&self, event: &InputEvent) {
        let (outcome, position, damage) = {
            let mut shared = self.lock();
            let outcome = shared.cursor.apply(event);
            let damage = match outcome {
                AxisOutcome::Motion { .. } if self.platform.cursor_visible() => shared
                    .stack
                    .active()
                    .map(|active| (active, shared.cursor.damage())),
                _ => None,
            };
            (outcome, shared.cursor.position(), damage)
        };

        // Repaint the region the cursor vacated and now occupies.
        if let Some((active, region)) = damage {
            active.schedule_update(region);
        }

        let mut translated = WindowEvent::new(WindowEventKind::Motion, position);
        if let AxisOutcome::Wheel { step } = outcome {
            translated.kind = WindowEventKind::Wheel;
            translated.step = step;
        }
        translated.button = event.button;
        translated.buttons = event.buttons;

        self.deliver_window_event(&translated);
    }

    // =========================================================================
    // ROUTING
    // =========================================================================

    /// Apply the pre-routing filter, then route.
    pub(super) fn deliver_window_event(&self, event: &WindowEvent) {
        let consumed = {
            let filter = self
                .hooks
                .window_filter
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            filter.as_ref().is_some_and(|filter| filter(event))
        };
        if !consumed {
            self.route_window_event(event);
        }
    }

    /// Route a window event through the stack.
    ///
    /// A modal active window receives the event unconditionally; otherwise
    /// windows are tried topmost first until one consumes it. Events with
    /// no eligible target are dropped without error.
    pub fn route_window_event(&self, event: &WindowEvent) {
        let (modal_target, scan) = self.routing_snapshot();
        let dragging = self.dragging();

        if let Some(active) = modal_target {
            active.handle_window_event(event, dragging);
            return;
        }

        for window in scan {
            if window.handle_window_event(event, dragging) {
                debug!("window event consumed");
                return;
            }
        }
    }

    /// Drag-gesture variant of the routing scan: windows flagged as the
    /// drag source are skipped before hit-testing.
    pub fn handle_drag_events(&self, event: &WindowEvent) {
        let (modal_target, scan) = self.routing_snapshot();
        let dragging = self.dragging();

        if let Some(active) = modal_target {
            active.handle_window_event(event, dragging);
            return;
        }

        for window in scan {
            if window.drag_source() {
                continue;
            }
            if window.handle_window_event(event, dragging) {
                return;
            }
        }
    }

    /// Snapshot the routing inputs: either the modal active window, or the
    /// top-down scan order. `modality` is a window callback and runs on the
    /// snapshot, after the lock is released.
    #[allow(clippy::type_complexity)]
    fn routing_snapshot(&self) -> (Option<Arc<dyn Window>>, Vec<Arc<dyn Window>>) {
        let (active, scan) = {
            let shared = self.lock();
            if shared.stack.is_empty() {
                warn!("window event dropped: empty window stack");
            }
            (shared.stack.active(), shared.stack.top_down())
        };
        match active {
            Some(active) if active.modality() == Modality::Modal => (Some(active), Vec::new()),
            _ => (None, scan),
        }
    }
}
