//! Window-addressed events.
//!
//! The translated form delivered to [`Window`](crate::window::Window)
//! implementors: coordinates are stamped with the runtime's cursor position
//! and key/button state is copied verbatim from the device event.

use bitflags::bitflags;

use super::input::{Button, ButtonMask, KeySymbol, LockState, Modifiers};
use crate::types::Point;

/// What kind of window event this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEventKind {
    KeyDown,
    KeyUp,
    ButtonDown,
    ButtonUp,
    Motion,
    Wheel,
    /// Backend-synthesized repaint request; never routed to windows.
    Update,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowEventFlags: u32 {
        /// Key event produced by auto-repeat.
        const REPEAT = 1 << 0;
    }
}

/// An event addressed to the window stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEvent {
    pub kind: WindowEventKind,
    pub flags: WindowEventFlags,
    /// Cursor position in window coordinates.
    pub x: i32,
    pub y: i32,
    /// Cursor position in screen coordinates.
    pub cx: i32,
    pub cy: i32,
    /// Wheel step; zero for every other kind.
    pub step: i32,
    pub key: KeySymbol,
    pub modifiers: Modifiers,
    pub locks: LockState,
    pub button: Button,
    pub buttons: ButtonMask,
}

impl WindowEvent {
    /// An event of `kind` stamped with `position`, all other fields zeroed.
    pub fn new(kind: WindowEventKind, position: Point) -> Self {
        Self {
            kind,
            flags: WindowEventFlags::empty(),
            x: position.x,
            y: position.y,
            cx: position.x,
            cy: position.y,
            step: 0,
            key: KeySymbol::default(),
            modifiers: Modifiers::empty(),
            locks: LockState::empty(),
            button: Button::default(),
            buttons: ButtonMask::empty(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// True for a pure pointer motion with no buttons held, the only kind
    /// the dispatch loop is allowed to coalesce.
    pub fn is_pure_motion(&self) -> bool {
        self.kind == WindowEventKind::Motion && self.buttons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_motion() {
        let mut event = WindowEvent::new(WindowEventKind::Motion, Point::new(5, 5));
        assert!(event.is_pure_motion());

        event.buttons = ButtonMask::LEFT;
        assert!(!event.is_pure_motion());

        let wheel = WindowEvent::new(WindowEventKind::Wheel, Point::new(5, 5));
        assert!(!wheel.is_pure_motion());
    }
}
