//! Display backend interface.
//!
//! The runtime never talks to display or input hardware directly; it
//! consumes this trait. All backend calls are fire-and-forget: failures are
//! logged by the caller and execution continues best-effort, so a broken
//! backend degrades interactivity but never stalls the dispatch loop.

pub mod queue;
pub mod term;

use std::fmt;
use std::time::Duration;

use crate::event::{Event, SurfaceId};

pub use queue::QueueEngine;
pub use term::TermEngine;

/// Backend-side failures. Logged, never fatal, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Detach of a surface the backend does not consider attached.
    SurfaceNotAttached(SurfaceId),
    /// The backend refused a focus request.
    FocusDenied(SurfaceId),
    /// Anything else the backend reports.
    Backend(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceNotAttached(id) => write!(f, "surface {} is not attached", id.0),
            Self::FocusDenied(id) => write!(f, "focus request denied for surface {}", id.0),
            Self::Backend(msg) => write!(f, "backend error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

/// The display/input backend driving the dispatch loop.
pub trait DisplayEngine: Send + Sync {
    /// Block until an event is queued or `timeout` elapses.
    fn wait_for_events(&self, timeout: Duration);

    /// Pull the next queued event, if any.
    fn next_event(&self) -> Option<Event>;

    /// Push an event into the queue, as if it came from hardware.
    fn post_event(&self, event: Event);

    /// Attach a window surface so it can receive backend focus.
    fn attach_window(&self, surface: SurfaceId) -> Result<(), EngineError>;

    /// Detach a window surface from backend focus.
    fn detach_window(&self, surface: SurfaceId) -> Result<(), EngineError>;

    /// Ask the backend to give input focus to an attached surface.
    fn request_focus(&self, surface: SurfaceId) -> Result<(), EngineError>;

    /// Discard stale queued events after an attach/detach transition.
    fn reset_buffer(&self) -> Result<(), EngineError>;

    /// Request loop termination. Only flips a flag; safe from any context.
    fn stop(&self);

    /// Whether termination was requested.
    fn stopped(&self) -> bool;

    /// The wait timeout for the next dispatch iteration.
    fn cycle(&self) -> Duration;
}
