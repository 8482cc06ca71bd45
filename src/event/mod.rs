//! Event model for the windowing runtime.
//!
//! Events arrive from the display backend as one flat stream and are
//! classified by variant:
//!
//! - [`Event::Input`] - raw device events (key, button, axis motion)
//! - [`Event::Window`] - window-addressed events, already translated
//! - [`Event::User`] - application-defined events
//! - [`Event::Surface`] - backend surface lifecycle, forwarded opaquely to
//!   the listener that owns the surface

pub mod input;
pub mod window;

pub use input::{
    Axis, Button, ButtonMask, InputEvent, InputEventFlags, InputEventKind, KeySymbol, LockState,
    Modifiers, keys,
};
pub use window::{WindowEvent, WindowEventFlags, WindowEventKind};

// =============================================================================
// SURFACE AND USER EVENTS
// =============================================================================

/// Identifies a backend surface, and a window to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Backend surface lifecycle change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEventKind {
    /// The surface's content was updated by its producer.
    Updated,
    /// The surface was destroyed on the backend side.
    Destroyed,
}

/// A surface lifecycle event, opaque to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceEvent {
    pub surface: SurfaceId,
    pub kind: SurfaceEventKind,
}

/// An application-defined event carried through the backend queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEvent {
    pub kind: u32,
    pub data: Option<Vec<u8>>,
}

// =============================================================================
// EVENT
// =============================================================================

/// Any event the dispatch loop can pull from the backend queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Input(InputEvent),
    Window(WindowEvent),
    User(UserEvent),
    Surface(SurfaceEvent),
}
