//! Error types for the windowing runtime.
//!
//! Protocol/usage errors are reported and the offending operation becomes a
//! no-op; they are never fatal. The one exception, constructing a second
//! `Application` in the same process, panics because the single-instance
//! invariant cannot be repaired.

use std::fmt;

/// Errors from window-stack and event-injection operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    /// `add_window` on a window that is already a stack member.
    AlreadyAdded,
    /// `remove_window` on a window that is not a stack member.
    WindowNotFound,
    /// `set_active_window` requires the window to already be a member.
    NotAMember,
    /// A shared-mode event was posted while no window is active.
    NoActiveWindow,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAdded => write!(f, "window already added to the stack"),
            Self::WindowNotFound => write!(f, "window not found in the stack"),
            Self::NotAMember => write!(f, "window is not a stack member"),
            Self::NoActiveWindow => write!(f, "no active window to receive the event"),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for runtime operations.
pub type AppResult<T> = Result<T, AppError>;
