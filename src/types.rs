//! Core geometry types and application options.
//!
//! Integer pixel geometry for screens, cursors and damage regions, plus the
//! startup option bitmask read once from the platform layer.

use bitflags::bitflags;

/// Edge length of the square cursor damage region, in pixels.
pub const CURSOR_SIZE: i32 = 32;

// =============================================================================
// GEOMETRY
// =============================================================================

/// A 2D point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A 2D size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// A square of edge `size` centered at `center`.
    pub fn centered_square(center: Point, size: i32) -> Self {
        Self {
            x: center.x - size / 2,
            y: center.y - size / 2,
            w: size,
            h: size,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Bounding union of two rectangles.
    pub fn united(&self, other: &Rectangle) -> Rectangle {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rectangle::new(x, y, right - x, bottom - y)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

// =============================================================================
// APPLICATION OPTIONS
// =============================================================================

bitflags! {
    /// Startup options reported by the platform layer.
    ///
    /// Read exactly once at `Application` construction, immutable afterwards.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AppOptions: u32 {
        /// The application owns the input devices directly; raw device
        /// events are the natural representation and the runtime renders
        /// the cursor itself.
        const EXCLUSIVE = 1 << 0;
        /// Administratively disable the per-frame window flush.
        const NO_UPDATES = 1 << 1;
    }
}

// =============================================================================
// TESTS
// =============================================================================
