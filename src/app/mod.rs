//! Application facade: the runtime object that owns the window stack,
//! cursor state and dispatch loop.
//!
//! Exactly one `Application` may exist per process; it is explicitly
//! constructed and explicitly owned, and a second construction panics.
//! Window-stack state, the active window and the cursor sit behind a single
//! non-reentrant mutex. The locking discipline throughout this module: the
//! lock guards state only, and window callbacks always run on snapshots
//! taken under the lock, never while it is held - a window handler may
//! therefore re-enter the facade (add, remove, quit) without deadlocking.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use emberwin::{Application, QueueEngine, StaticPlatform, AppOptions, Size};
//!
//! let engine = Arc::new(QueueEngine::new());
//! let platform = Arc::new(StaticPlatform::new(Size::new(800, 600), AppOptions::empty()));
//! let app = Application::new(engine, platform);
//! app.add_window(my_window.clone()).unwrap();
//! app.set_active_window(&my_window).unwrap();
//! app.exec();
//! ```

mod dispatch;
mod translate;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, info, warn};

use crate::cursor::CursorTracker;
use crate::engine::DisplayEngine;
use crate::error::{AppError, AppResult};
use crate::event::{
    Axis, Button, ButtonMask, Event, InputEvent, InputEventFlags, KeySymbol, LockState, Modifiers,
    SurfaceEvent, SurfaceId, UserEvent, WindowEvent, WindowEventKind,
};
use crate::platform::Platform;
use crate::stack::{Removal, WindowStack};
use crate::types::{AppOptions, Point, Size};
use crate::window::{Modality, Window, same_window};

/// Guards the single-instance invariant.
static INSTANCE: AtomicBool = AtomicBool::new(false);

/// Pointer event kinds accepted by the injection API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Motion,
    ButtonDown,
    ButtonUp,
    Wheel,
}

type Callback = Box<dyn Fn() + Send>;
type WindowEventFilter = Box<dyn Fn(&WindowEvent) -> bool + Send>;
type UserEventHandler = Box<dyn Fn(&UserEvent) + Send>;
type SurfaceListener = Box<dyn Fn(&SurfaceEvent) + Send>;

/// State guarded by the application lock.
struct Shared {
    stack: WindowStack,
    cursor: CursorTracker,
    /// Cursor position at the last exclusive-mode cursor render.
    last_cursor_render: Point,
}

/// Registered callbacks; each behind its own lock so handlers can call
/// back into the facade.
#[derive(Default)]
struct Hooks {
    visible: Mutex<Vec<Callback>>,
    hidden: Mutex<Vec<Callback>>,
    quit: Mutex<Vec<Callback>>,
    window_filter: Mutex<Option<WindowEventFilter>>,
    user_handler: Mutex<Option<UserEventHandler>>,
    surface_listeners: Mutex<HashMap<SurfaceId, SurfaceListener>>,
}

/// The windowing runtime.
pub struct Application {
    engine: Arc<dyn DisplayEngine>,
    platform: Arc<dyn Platform>,
    /// Startup options, read once from the platform.
    options: AppOptions,
    /// Screen bounds, read once from the platform.
    screen: Size,
    shared: Mutex<Shared>,
    dragging: AtomicBool,
    visible: AtomicBool,
    hooks: Hooks,
}

impl Application {
    /// Construct the runtime.
    ///
    /// # Panics
    ///
    /// Panics if another `Application` already exists in this process; the
    /// single-instance invariant cannot be repaired at runtime.
    pub fn new(engine: Arc<dyn DisplayEngine>, platform: Arc<dyn Platform>) -> Self {
        if INSTANCE.swap(true, Ordering::SeqCst) {
            panic!("cannot allow more than one Application instance per process");
        }

        let options = platform.app_options();
        let screen = platform.screen_size();
        info!(?options, w = screen.w, h = screen.h, "application created");

        Self {
            engine,
            platform,
            options,
            screen,
            shared: Mutex::new(Shared {
                stack: WindowStack::new(),
                cursor: CursorTracker::new(screen),
                last_cursor_render: Point::default(),
            }),
            dragging: AtomicBool::new(false),
            visible: AtomicBool::new(false),
            hooks: Hooks::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn exclusive(&self) -> bool {
        self.options.contains(AppOptions::EXCLUSIVE)
    }

    pub fn options(&self) -> AppOptions {
        self.options
    }

    pub fn screen_size(&self) -> Size {
        self.screen
    }

    // =========================================================================
    // WINDOW STACK
    // =========================================================================

    /// Append `window` to the top of the stack. The active window is not
    /// changed.
    pub fn add_window(&self, window: Arc<dyn Window>) -> AppResult<()> {
        let mut shared = self.lock();
        match shared.stack.add(window) {
            Ok(()) => {
                debug!(windows = shared.stack.len(), "window added");
                Ok(())
            }
            Err(err) => {
                error!(%err, "add_window rejected");
                Err(err)
            }
        }
    }

    /// Erase `window` from the stack. If it was active, the new topmost
    /// remaining window is promoted and receives backend focus.
    pub fn remove_window(&self, window: &Arc<dyn Window>) -> AppResult<()> {
        // Side effects run on the change report, after the lock is released.
        let removal = {
            let mut shared = self.lock();
            shared.stack.remove(window)
        };
        match removal {
            Ok(Removal::Unchanged) => {
                debug!("window removed");
                Ok(())
            }
            Ok(Removal::Cleared) => {
                debug!("window removed; no active window remains");
                Ok(())
            }
            Ok(Removal::Promoted(top)) => {
                debug!("window removed; topmost window promoted");
                if top.modality() == Modality::Modal {
                    self.detach(window);
                }
                self.attach(&top);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "remove_window rejected");
                Err(err)
            }
        }
    }

    /// Make `window` the active (input-receiving) window. It must already
    /// be a stack member.
    pub fn set_active_window(&self, window: &Arc<dyn Window>) -> AppResult<()> {
        let change = {
            let mut shared = self.lock();
            shared.stack.set_active(window)
        };
        match change {
            Ok(change) => {
                // A modal takeover detaches the displaced window so only
                // the modal window can receive backend focus.
                if window.modality() == Modality::Modal
                    && let Some(previous) = change.previous.as_ref()
                    && !same_window(previous, window)
                {
                    self.detach(previous);
                }
                self.attach(window);
                debug!("window is now active");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "set_active_window rejected");
                Err(err)
            }
        }
    }

    /// The currently active window, if any.
    pub fn active_window(&self) -> Option<Arc<dyn Window>> {
        self.lock().stack.active()
    }

    pub fn window_count(&self) -> usize {
        self.lock().stack.len()
    }

    /// Attach a window to the backend and request input focus for it.
    /// Backend failures are logged and execution continues; a no-op in
    /// exclusive mode.
    fn attach(&self, window: &Arc<dyn Window>) {
        if self.exclusive() {
            return;
        }
        let Some(surface) = window.surface() else {
            warn!("cannot attach a window without a backend surface");
            return;
        };
        if let Err(err) = self.engine.attach_window(surface) {
            warn!(%err, "attach failed");
        }
        if let Err(err) = self.engine.request_focus(surface) {
            error!(%err, "focus request failed");
        }
        if let Err(err) = self.engine.reset_buffer() {
            warn!(%err, "buffer reset failed");
        }
    }

    /// Detach a window from the backend. A no-op in exclusive mode.
    fn detach(&self, window: &Arc<dyn Window>) {
        if self.exclusive() {
            return;
        }
        let Some(surface) = window.surface() else {
            warn!("cannot detach a window without a backend surface");
            return;
        };
        if let Err(err) = self.engine.detach_window(surface) {
            warn!(%err, "detach failed");
        }
        if let Err(err) = self.engine.reset_buffer() {
            warn!(%err, "buffer reset failed");
        }
    }

    // =========================================================================
    // CURSOR AND DRAG STATE
    // =========================================================================

    pub fn cursor_position(&self) -> Point {
        self.lock().cursor.position()
    }

    /// Flag a window-drag gesture in progress. While set, drag routing
    /// skips the drag-source window as a hit-test candidate.
    pub fn set_dragging(&self, dragging: bool) {
        self.dragging.store(dragging, Ordering::SeqCst);
    }

    pub fn dragging(&self) -> bool {
        self.dragging.load(Ordering::SeqCst)
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Make the primary window (the bottom-most stack entry) visible.
    /// Idempotent: a second call while visible does nothing.
    pub fn show(&self) {
        if self
            .visible
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        let primary = self.lock().stack.front();
        if let Some(window) = primary {
            window.show_window();
        }
        self.fire(&self.hooks.visible);
    }

    /// Hide the primary window. Idempotent inverse of [`show`](Self::show).
    pub fn hide(&self) {
        if self
            .visible
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        let primary = self.lock().stack.front();
        if let Some(window) = primary {
            window.close_window();
        }
        self.fire(&self.hooks.hidden);
    }

    pub fn visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Request dispatch-loop termination. Only flips the engine's stop
    /// flag; safe to call from any thread or callback.
    pub fn quit(&self) {
        self.engine.stop();
    }

    fn fire(&self, hooks: &Mutex<Vec<Callback>>) {
        let hooks = hooks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for hook in hooks.iter() {
            hook();
        }
    }

    // =========================================================================
    // NOTIFICATIONS AND HANDLERS
    // =========================================================================

    /// Run `hook` every time the application becomes visible.
    pub fn on_visible<F: Fn() + Send + 'static>(&self, hook: F) {
        self.push_hook(&self.hooks.visible, Box::new(hook));
    }

    /// Run `hook` every time the application is hidden.
    pub fn on_hidden<F: Fn() + Send + 'static>(&self, hook: F) {
        self.push_hook(&self.hooks.hidden, Box::new(hook));
    }

    /// Run `hook` once the dispatch loop has terminated.
    pub fn on_quit<F: Fn() + Send + 'static>(&self, hook: F) {
        self.push_hook(&self.hooks.quit, Box::new(hook));
    }

    fn push_hook(&self, hooks: &Mutex<Vec<Callback>>, hook: Callback) {
        hooks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(hook);
    }

    /// Install a filter consulted before any window event is routed.
    /// Returning true consumes the event.
    pub fn set_window_event_filter<F>(&self, filter: F)
    where
        F: Fn(&WindowEvent) -> bool + Send + 'static,
    {
        *self
            .hooks
            .window_filter
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Box::new(filter));
    }

    /// Install the handler for application-defined events.
    pub fn set_user_event_handler<F>(&self, handler: F)
    where
        F: Fn(&UserEvent) + Send + 'static,
    {
        *self
            .hooks
            .user_handler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Box::new(handler));
    }

    /// Register the listener owning `surface`; it receives that surface's
    /// lifecycle events opaquely.
    pub fn register_surface_listener<F>(&self, surface: SurfaceId, listener: F)
    where
        F: Fn(&SurfaceEvent) + Send + 'static,
    {
        self.hooks
            .surface_listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(surface, Box::new(listener));
    }

    pub fn unregister_surface_listener(&self, surface: SurfaceId) {
        self.hooks
            .surface_listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&surface);
    }

    // =========================================================================
    // EVENT INJECTION
    // =========================================================================

    /// Synthesize a key event as if it came from the backend, honoring the
    /// same exclusive/shared branching as hardware events.
    pub fn post_key_event(
        &self,
        key: KeySymbol,
        modifiers: Modifiers,
        locks: LockState,
        down: bool,
    ) -> AppResult<()> {
        if self.exclusive() {
            self.engine
                .post_event(Event::Input(InputEvent::key(key, modifiers, locks, down)));
            return Ok(());
        }

        let position = {
            let shared = self.lock();
            if shared.stack.active().is_none() {
                warn!("dropping injected key event: no active window");
                return Err(AppError::NoActiveWindow);
            }
            shared.cursor.position()
        };

        let kind = if down {
            WindowEventKind::KeyDown
        } else {
            WindowEventKind::KeyUp
        };
        let mut event = WindowEvent::new(kind, position);
        event.key = key;
        event.modifiers = modifiers;
        event.locks = locks;
        self.engine.post_event(Event::Window(event));
        Ok(())
    }

    /// Synthesize a pointer event as if it came from the backend.
    ///
    /// In exclusive mode the pointer position is reproduced as an absolute
    /// X/Y axis pair followed by the button or wheel event; in shared mode
    /// a single window event is posted.
    pub fn post_pointer_event(
        &self,
        kind: PointerEventKind,
        button: Button,
        buttons: ButtonMask,
        x: i32,
        y: i32,
        step: i32,
    ) -> AppResult<()> {
        if self.exclusive() {
            let mut axis_x = InputEvent::axis_absolute_ranged(Axis::X, x, 0, self.screen.w);
            axis_x.flags |= InputEventFlags::FOLLOW;
            self.engine.post_event(Event::Input(axis_x));

            let mut axis_y = InputEvent::axis_absolute_ranged(Axis::Y, y, 0, self.screen.h);
            axis_y.button = button;
            axis_y.buttons = buttons;
            self.engine.post_event(Event::Input(axis_y));

            match kind {
                PointerEventKind::ButtonDown => {
                    self.engine
                        .post_event(Event::Input(InputEvent::button(button, buttons, true)));
                }
                PointerEventKind::ButtonUp => {
                    self.engine
                        .post_event(Event::Input(InputEvent::button(button, buttons, false)));
                }
                PointerEventKind::Wheel => {
                    let mut wheel = InputEvent::axis_relative(Axis::Other, -step);
                    wheel.button = button;
                    wheel.buttons = buttons;
                    self.engine.post_event(Event::Input(wheel));
                }
                PointerEventKind::Motion => {}
            }
            return Ok(());
        }

        if self.lock().stack.active().is_none() {
            warn!("dropping injected pointer event: no active window");
            return Err(AppError::NoActiveWindow);
        }

        let window_kind = match kind {
            PointerEventKind::Motion => WindowEventKind::Motion,
            PointerEventKind::ButtonDown => WindowEventKind::ButtonDown,
            PointerEventKind::ButtonUp => WindowEventKind::ButtonUp,
            PointerEventKind::Wheel => WindowEventKind::Wheel,
        };
        let mut event = WindowEvent::new(window_kind, Point::new(x, y));
        event.step = step;
        event.button = button;
        event.buttons = buttons;
        self.engine.post_event(Event::Window(event));
        Ok(())
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        info!("application destroyed");
        INSTANCE.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// TESTS
// =============================================================================
