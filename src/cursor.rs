//! Cursor tracker: position, clamping, and motion damage.
//!
//! Holds the current and previous pointer position, applies axis-motion
//! device events (relative deltas and absolute positions with optional
//! linear rescaling), clamps into screen bounds, and computes the damage
//! region a visible cursor leaves behind when it moves.

use crate::event::{Axis, InputEvent, InputEventFlags};
use crate::types::{CURSOR_SIZE, Point, Rectangle, Size};

/// What an axis-motion event turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOutcome {
    /// True pointer motion; the tracker position was updated.
    Motion { position: Point },
    /// Motion on the "other" axis, reinterpreted as a wheel step.
    Wheel { step: i32 },
}

/// Tracks the pointer position within exclusive screen bounds.
pub struct CursorTracker {
    previous: Point,
    current: Point,
    bounds: Size,
}

impl CursorTracker {
    /// A tracker clamped to `[0, bounds.w) x [0, bounds.h)`, starting at
    /// the origin.
    pub fn new(bounds: Size) -> Self {
        Self {
            previous: Point::default(),
            current: Point::default(),
            bounds,
        }
    }

    pub fn position(&self) -> Point {
        self.current
    }

    pub fn previous(&self) -> Point {
        self.previous
    }

    /// Apply one axis-motion event.
    ///
    /// Relative deltas add to the fired axis; absolute values rescale
    /// linearly into the screen bound when the event declares both a
    /// minimum and a maximum, and are taken raw otherwise. Motion on
    /// [`Axis::Other`] does not move the cursor and becomes a wheel step
    /// equal to the negated reported value. Both components are clamped
    /// independently afterwards.
    pub fn apply(&mut self, event: &InputEvent) -> AxisOutcome {
        self.previous = self.current;

        let mut wheel_step = None;

        if event.flags.contains(InputEventFlags::AXIS_REL) {
            match event.axis {
                Axis::X => self.current.x = self.current.x.saturating_add(event.axis_rel),
                Axis::Y => self.current.y = self.current.y.saturating_add(event.axis_rel),
                Axis::Other => wheel_step = Some(event.axis_rel.saturating_neg()),
            }
        } else if event.flags.contains(InputEventFlags::AXIS_ABS) {
            match event.axis {
                Axis::X => self.current.x = self.rescale(event, self.bounds.w),
                Axis::Y => self.current.y = self.rescale(event, self.bounds.h),
                Axis::Other => wheel_step = Some(event.axis_abs.saturating_neg()),
            }
        }

        self.current.x = self.current.x.clamp(0, self.bounds.w - 1);
        self.current.y = self.current.y.clamp(0, self.bounds.h - 1);

        match wheel_step {
            Some(step) => AxisOutcome::Wheel { step },
            None => AxisOutcome::Motion {
                position: self.current,
            },
        }
    }

    fn rescale(&self, event: &InputEvent, bound: i32) -> i32 {
        let ranged = event.flags.contains(InputEventFlags::MIN)
            && event.flags.contains(InputEventFlags::MAX)
            && event.max > event.min;
        if !ranged {
            return event.axis_abs;
        }
        // Intermediate math in i64: declared ranges may span the whole
        // i32 domain.
        let offset = event.axis_abs as i64 - event.min as i64;
        let span = event.max as i64 - event.min as i64;
        (offset * bound as i64 / span).clamp(0, (bound - 1) as i64) as i32
    }

    /// The region a visible cursor dirtied by moving: the union of two
    /// fixed-size squares centered at the previous and current position.
    pub fn damage(&self) -> Rectangle {
        let old = Rectangle::centered_square(self.previous, CURSOR_SIZE);
        let new = Rectangle::centered_square(self.current, CURSOR_SIZE);
        old.united(&new)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputEvent;

    fn tracker() -> CursorTracker {
        CursorTracker::new(Size::new(800, 600))
    }

    #[test]
    fn test_relative_motion_accumulates() {
        let mut cursor = tracker();
        cursor.apply(&InputEvent::axis_relative(Axis::X, 100));
        cursor.apply(&InputEvent::axis_relative(Axis::Y, 50));
        assert_eq!(cursor.position(), Point::new(100, 50));
        assert_eq!(cursor.previous(), Point::new(100, 0));
    }

    #[test]
    fn test_relative_motion_clamps_low() {
        let mut cursor = tracker();
        cursor.apply(&InputEvent::axis_relative(Axis::X, 10));
        let outcome = cursor.apply(&InputEvent::axis_relative(Axis::X, -50));
        assert_eq!(
            outcome,
            AxisOutcome::Motion {
                position: Point::new(0, 0)
            }
        );
    }

    #[test]
    fn test_relative_motion_clamps_high() {
        let mut cursor = tracker();
        cursor.apply(&InputEvent::axis_relative(Axis::Y, 10_000));
        assert_eq!(cursor.position().y, 599);
    }

    #[test]
    fn test_absolute_rescales_into_screen() {
        let mut cursor = tracker();
        let outcome = cursor.apply(&InputEvent::axis_absolute_ranged(Axis::X, 500, 0, 1000));
        assert_eq!(
            outcome,
            AxisOutcome::Motion {
                position: Point::new(400, 0)
            }
        );
    }

    #[test]
    fn test_absolute_without_range_is_raw() {
        let mut cursor = tracker();
        cursor.apply(&InputEvent::axis_absolute(Axis::X, 123));
        assert_eq!(cursor.position().x, 123);

        // Raw values still clamp.
        cursor.apply(&InputEvent::axis_absolute(Axis::X, 5000));
        assert_eq!(cursor.position().x, 799);
    }

    #[test]
    fn test_degenerate_range_is_raw() {
        let mut cursor = tracker();
        cursor.apply(&InputEvent::axis_absolute_ranged(Axis::X, 42, 7, 7));
        assert_eq!(cursor.position().x, 42);
    }

    #[test]
    fn test_other_axis_is_wheel() {
        let mut cursor = tracker();
        cursor.apply(&InputEvent::axis_relative(Axis::X, 30));

        let outcome = cursor.apply(&InputEvent::axis_relative(Axis::Other, -3));
        assert_eq!(outcome, AxisOutcome::Wheel { step: 3 });
        // Wheel events do not move the cursor.
        assert_eq!(cursor.position(), Point::new(30, 0));

        let outcome = cursor.apply(&InputEvent::axis_absolute(Axis::Other, 2));
        assert_eq!(outcome, AxisOutcome::Wheel { step: -2 });
    }

    #[test]
    fn test_extreme_values_saturate() {
        let mut cursor = tracker();

        cursor.apply(&InputEvent::axis_relative(Axis::X, i32::MAX));
        assert_eq!(cursor.position().x, 799);
        cursor.apply(&InputEvent::axis_relative(Axis::X, i32::MIN));
        assert_eq!(cursor.position().x, 0);

        // A declared range spanning the whole i32 domain still rescales.
        cursor.apply(&InputEvent::axis_absolute_ranged(
            Axis::X,
            i32::MAX,
            i32::MIN,
            i32::MAX,
        ));
        assert_eq!(cursor.position().x, 799);

        let outcome = cursor.apply(&InputEvent::axis_relative(Axis::Other, i32::MIN));
        assert_eq!(outcome, AxisOutcome::Wheel { step: i32::MAX });
    }

    #[test]
    fn test_damage_unions_old_and_new() {
        let mut cursor = tracker();
        cursor.apply(&InputEvent::axis_relative(Axis::X, 100));
        let damage = cursor.damage();

        // Covers both the square left behind at the origin and the new one.
        assert!(damage.contains(Point::new(0, 0)));
        assert!(damage.contains(Point::new(100, 0)));
        assert_eq!(damage.x, -CURSOR_SIZE / 2);
        assert_eq!(damage.w, 100 + CURSOR_SIZE);
    }
}
