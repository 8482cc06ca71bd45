//! Raw input-device events.
//!
//! A flat record of what an input device reported: key press/release,
//! pointer-button press/release, or motion along one axis. These are the
//! natural representation in exclusive mode; in shared mode the translator
//! turns them into window-addressed events.

use bitflags::bitflags;

// =============================================================================
// KEYS, BUTTONS, MODIFIERS
// =============================================================================

/// An opaque key identifier, carried verbatim from the device to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeySymbol(pub u32);

/// Common key symbols used by the terminal backend.
pub mod keys {
    use super::KeySymbol;

    pub const BACKSPACE: KeySymbol = KeySymbol(0x08);
    pub const TAB: KeySymbol = KeySymbol(0x09);
    pub const ENTER: KeySymbol = KeySymbol(0x0D);
    pub const ESCAPE: KeySymbol = KeySymbol(0x1B);
    pub const DELETE: KeySymbol = KeySymbol(0x7F);
    pub const UP: KeySymbol = KeySymbol(0xF000);
    pub const DOWN: KeySymbol = KeySymbol(0xF001);
    pub const LEFT: KeySymbol = KeySymbol(0xF002);
    pub const RIGHT: KeySymbol = KeySymbol(0xF003);
    pub const HOME: KeySymbol = KeySymbol(0xF004);
    pub const END: KeySymbol = KeySymbol(0xF005);
    pub const PAGE_UP: KeySymbol = KeySymbol(0xF006);
    pub const PAGE_DOWN: KeySymbol = KeySymbol(0xF007);
}

/// A pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    #[default]
    Left,
    Middle,
    Right,
}

bitflags! {
    /// The set of pointer buttons currently held.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ButtonMask: u32 {
        const LEFT = 1 << 0;
        const MIDDLE = 1 << 1;
        const RIGHT = 1 << 2;
    }
}

impl From<Button> for ButtonMask {
    fn from(button: Button) -> Self {
        match button {
            Button::Left => ButtonMask::LEFT,
            Button::Middle => ButtonMask::MIDDLE,
            Button::Right => ButtonMask::RIGHT,
        }
    }
}

bitflags! {
    /// Modifier keys held while the event fired.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u32 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

bitflags! {
    /// Keyboard lock state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LockState: u32 {
        const CAPS = 1 << 0;
        const NUM = 1 << 1;
        const SCROLL = 1 << 2;
    }
}

// =============================================================================
// INPUT EVENTS
// =============================================================================

/// What kind of device event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEventKind {
    KeyPress,
    KeyRelease,
    ButtonPress,
    ButtonRelease,
    AxisMotion,
}

/// The axis a motion event fired on.
///
/// Motion on [`Axis::Other`] is reinterpreted as a wheel/scroll step by the
/// translator rather than cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    X,
    Y,
    Other,
}

bitflags! {
    /// Which optional fields of an [`InputEvent`] are meaningful.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InputEventFlags: u32 {
        const KEY_SYMBOL = 1 << 0;
        const MODIFIERS = 1 << 1;
        const LOCKS = 1 << 2;
        const REPEAT = 1 << 3;
        const AXIS_REL = 1 << 4;
        const AXIS_ABS = 1 << 5;
        const MIN = 1 << 6;
        const MAX = 1 << 7;
        /// Another event for the same device follows immediately.
        const FOLLOW = 1 << 8;
    }
}

/// A raw input-device event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: InputEventKind,
    pub flags: InputEventFlags,
    pub key: KeySymbol,
    pub modifiers: Modifiers,
    pub locks: LockState,
    pub button: Button,
    pub buttons: ButtonMask,
    pub axis: Axis,
    pub axis_rel: i32,
    pub axis_abs: i32,
    pub min: i32,
    pub max: i32,
}

impl InputEvent {
    /// An event of `kind` with every optional field zeroed.
    pub fn new(kind: InputEventKind) -> Self {
        Self {
            kind,
            flags: InputEventFlags::empty(),
            key: KeySymbol::default(),
            modifiers: Modifiers::empty(),
            locks: LockState::empty(),
            button: Button::default(),
            buttons: ButtonMask::empty(),
            axis: Axis::default(),
            axis_rel: 0,
            axis_abs: 0,
            min: 0,
            max: 0,
        }
    }

    /// A key press or release carrying symbol, modifier and lock state.
    pub fn key(key: KeySymbol, modifiers: Modifiers, locks: LockState, down: bool) -> Self {
        let kind = if down {
            InputEventKind::KeyPress
        } else {
            InputEventKind::KeyRelease
        };
        let mut event = Self::new(kind);
        event.flags =
            InputEventFlags::KEY_SYMBOL | InputEventFlags::MODIFIERS | InputEventFlags::LOCKS;
        event.key = key;
        event.modifiers = modifiers;
        event.locks = locks;
        event
    }

    /// A button press or release with the full held-button mask.
    pub fn button(button: Button, buttons: ButtonMask, down: bool) -> Self {
        let kind = if down {
            InputEventKind::ButtonPress
        } else {
            InputEventKind::ButtonRelease
        };
        let mut event = Self::new(kind);
        event.button = button;
        event.buttons = buttons;
        event
    }

    /// A relative motion of `delta` along `axis`.
    pub fn axis_relative(axis: Axis, delta: i32) -> Self {
        let mut event = Self::new(InputEventKind::AxisMotion);
        event.flags = InputEventFlags::AXIS_REL;
        event.axis = axis;
        event.axis_rel = delta;
        event
    }

    /// An absolute position along `axis`, without a declared range.
    pub fn axis_absolute(axis: Axis, value: i32) -> Self {
        let mut event = Self::new(InputEventKind::AxisMotion);
        event.flags = InputEventFlags::AXIS_ABS;
        event.axis = axis;
        event.axis_abs = value;
        event
    }

    /// An absolute position along `axis` within a declared `[min, max]` range.
    pub fn axis_absolute_ranged(axis: Axis, value: i32, min: i32, max: i32) -> Self {
        let mut event = Self::axis_absolute(axis, value);
        event.flags |= InputEventFlags::MIN | InputEventFlags::MAX;
        event.min = min;
        event.max = max;
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_flags() {
        let event = InputEvent::key(keys::ENTER, Modifiers::CTRL, LockState::CAPS, true);
        assert_eq!(event.kind, InputEventKind::KeyPress);
        assert!(event.flags.contains(InputEventFlags::KEY_SYMBOL));
        assert!(event.flags.contains(InputEventFlags::MODIFIERS));
        assert!(event.flags.contains(InputEventFlags::LOCKS));
        assert_eq!(event.key, keys::ENTER);
    }

    #[test]
    fn test_ranged_axis_event() {
        let event = InputEvent::axis_absolute_ranged(Axis::X, 500, 0, 1000);
        assert!(event.flags.contains(InputEventFlags::AXIS_ABS));
        assert!(event.flags.contains(InputEventFlags::MIN));
        assert!(event.flags.contains(InputEventFlags::MAX));
        assert_eq!(event.axis_abs, 500);
        assert_eq!(event.max, 1000);
    }

    #[test]
    fn test_button_mask_from_button() {
        assert_eq!(ButtonMask::from(Button::Left), ButtonMask::LEFT);
        assert_eq!(ButtonMask::from(Button::Right), ButtonMask::RIGHT);
    }
}
