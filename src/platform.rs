//! Platform/configuration layer.
//!
//! The runtime consumes screen geometry, startup options and cursor policy
//! through this narrow interface; everything is read once at construction
//! and treated as immutable afterwards.

use tracing::debug;

use crate::types::{AppOptions, Point, Size};

/// Platform services consumed by the runtime.
pub trait Platform: Send + Sync {
    /// The screen size; the exclusive upper bound for cursor coordinates.
    fn screen_size(&self) -> Size;

    /// Startup option bitmask.
    fn app_options(&self) -> AppOptions;

    /// Whether the pointer cursor is currently drawn on screen.
    fn cursor_visible(&self) -> bool;

    /// Draw the cursor at `position`. Only called in exclusive mode, after
    /// the cursor moved since the last render.
    fn render_cursor(&self, position: Point, dragging: bool);
}

/// Fixed configuration platform, for embedded targets and tests.
#[derive(Debug, Clone)]
pub struct StaticPlatform {
    screen: Size,
    options: AppOptions,
    cursor_visible: bool,
}

impl StaticPlatform {
    pub fn new(screen: Size, options: AppOptions) -> Self {
        Self {
            screen,
            options,
            cursor_visible: false,
        }
    }

    pub fn with_cursor_visible(mut self, visible: bool) -> Self {
        self.cursor_visible = visible;
        self
    }
}

impl Platform for StaticPlatform {
    fn screen_size(&self) -> Size {
        self.screen
    }

    fn app_options(&self) -> AppOptions {
        self.options
    }

    fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    fn render_cursor(&self, position: Point, dragging: bool) {
        debug!(x = position.x, y = position.y, dragging, "render cursor");
    }
}
