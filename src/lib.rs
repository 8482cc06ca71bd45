//! # emberwin
//!
//! Windowing runtime for embedded displays.
//!
//! The crate is the event-dispatch and window-stack manager of a
//! single-process windowing system: it owns the ordered stack of top-level
//! windows, translates raw input-device events into window-addressed
//! events, decides which window is active versus merely visible, and drives
//! the per-frame update cycle.
//!
//! ## Architecture
//!
//! ```text
//! DisplayEngine -> dispatch loop -> translator -> WindowStack -> Window
//!                        ^                                         |
//!                        +--------- per-frame update flush <-------+
//! ```
//!
//! Display/input hardware sits behind the [`DisplayEngine`] trait,
//! configuration behind [`Platform`], and window contents behind the
//! [`Window`] trait; the runtime owns only stack membership, active-state
//! and the cursor.
//!
//! ## Modules
//!
//! - [`types`] - geometry and the startup option bitmask
//! - [`event`] - device, window, user and surface events
//! - [`engine`] - backend interface, queue engine, terminal backend
//! - [`platform`] - configuration layer
//! - [`window`] - the interface windows expose to the runtime
//! - [`stack`] - ordered window membership and the active window
//! - [`cursor`] - cursor position, clamping and damage
//! - [`app`] - the `Application` facade and dispatch loop

pub mod app;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod event;
pub mod platform;
pub mod stack;
pub mod types;
pub mod window;

pub use app::{Application, PointerEventKind};
pub use cursor::{AxisOutcome, CursorTracker};
pub use engine::{DisplayEngine, EngineError, QueueEngine, TermEngine};
pub use error::{AppError, AppResult};
pub use event::{
    Axis, Button, ButtonMask, Event, InputEvent, InputEventFlags, InputEventKind, KeySymbol,
    LockState, Modifiers, SurfaceEvent, SurfaceEventKind, SurfaceId, UserEvent, WindowEvent,
    WindowEventFlags, WindowEventKind, keys,
};
pub use platform::{Platform, StaticPlatform};
pub use stack::{FocusChange, Removal, WindowStack};
pub use types::{AppOptions, CURSOR_SIZE, Point, Rectangle, Size};
pub use window::{Modality, Window};
