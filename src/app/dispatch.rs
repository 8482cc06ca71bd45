//! The dispatch loop.
//!
//! Each iteration waits for events (blocking only when no window has a
//! redraw pending), drains the backend queue with motion coalescing, then
//! asks every window to flush its accumulated damage. The loop ends when
//! the engine reports stopped; the terminal path hides the stack and fires
//! the quit notification exactly once.

use std::time::Duration;

use tracing::{debug, info};

use super::Application;
use crate::event::{Event, WindowEvent, WindowEventKind};
use crate::types::AppOptions;

impl Application {
    /// Run the dispatch loop until stopped.
    ///
    /// Shows the primary window, repeats wait/drain/update cycles, then
    /// hides it and emits the quit notification. This is the single
    /// blocking call of the runtime.
    pub fn exec(&self) {
        info!("starting");
        self.show();

        loop {
            if self.engine.stopped() {
                break;
            }
            self.handle_events(self.engine.cycle(), false);
            self.update_windows();
        }

        self.hide();
        info!("stopping");
        self.fire(&self.hooks.quit);
    }

    /// One wait-and-drain step.
    ///
    /// Blocks on the backend for at most `timeout` unless a window already
    /// has a pending redraw (or `force_wait` is set), then drains the queue.
    /// Consecutive pure-motion window events are coalesced: only the last
    /// one before a non-motion event or the end of the batch is routed.
    pub fn handle_events(&self, timeout: Duration, force_wait: bool) {
        // pending_update is a window callback; consult it on a snapshot.
        let wait = force_wait || {
            let windows = self.lock().stack.bottom_up();
            !windows.iter().any(|window| window.pending_update())
        };
        if wait {
            self.engine.wait_for_events(timeout);
        }

        let mut last_motion: Option<WindowEvent> = None;

        while let Some(event) = self.engine.next_event() {
            match event {
                Event::Input(input) => self.handle_input_event(&input),

                Event::Window(window_event) => {
                    // Window events are synthesized only in shared mode;
                    // Update events never reach window handlers.
                    if self.options.contains(AppOptions::EXCLUSIVE)
                        || window_event.kind == WindowEventKind::Update
                    {
                        continue;
                    }
                    if window_event.is_pure_motion() {
                        last_motion = Some(window_event);
                    } else {
                        if let Some(motion) = last_motion.take() {
                            self.deliver_window_event(&motion);
                        }
                        self.deliver_window_event(&window_event);
                    }
                }

                Event::User(user_event) => {
                    let handler = self
                        .hooks
                        .user_handler
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    if let Some(handler) = handler.as_ref() {
                        handler(&user_event);
                    }
                }

                Event::Surface(surface_event) => {
                    let listeners = self
                        .hooks
                        .surface_listeners
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    match listeners.get(&surface_event.surface) {
                        Some(listener) => listener(&surface_event),
                        None => debug!(
                            surface = surface_event.surface.0,
                            "surface event without a listener"
                        ),
                    }
                }
            }
        }

        if let Some(motion) = last_motion {
            self.deliver_window_event(&motion);
        }
    }

    /// Ask every window to flush accumulated damage, then re-render the
    /// cursor in exclusive mode if it moved since the last render.
    pub fn update_windows(&self) {
        if !self.options.contains(AppOptions::NO_UPDATES) {
            let windows = self.lock().stack.bottom_up();
            for window in windows {
                window.update_window();
            }
        }

        if self.options.contains(AppOptions::EXCLUSIVE) {
            let moved = {
                let mut shared = self.lock();
                let position = shared.cursor.position();
                if position != shared.last_cursor_render {
                    shared.last_cursor_render = position;
                    Some(position)
                } else {
                    None
                }
            };
            if let Some(position) = moved {
                self.platform.render_cursor(position, self.dragging());
            }
        }
    }
}
