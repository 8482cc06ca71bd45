//! The interface a top-level window exposes to the runtime.
//!
//! The runtime never owns window contents. It holds shared handles
//! (`Arc<dyn Window>`) for stack membership and compares them by pointer
//! identity; window lifetime belongs to whoever created the window.

use std::sync::Arc;

use crate::event::{SurfaceId, WindowEvent};
use crate::types::Rectangle;

/// Whether a window blocks input delivery to the rest of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modality {
    /// Input is routed top-down through the stack.
    #[default]
    Normal,
    /// While active, this window receives all input exclusively.
    Modal,
}

/// A top-level window managed by the window stack.
///
/// `handle_window_event` performs the window's own hit-testing and returns
/// true when the event was consumed, which stops the top-down routing scan.
pub trait Window: Send + Sync {
    /// Route a window event into this window's hierarchy.
    fn handle_window_event(&self, event: &WindowEvent, dragging: bool) -> bool;

    /// Flush accumulated damage to the display.
    fn update_window(&self);

    fn modality(&self) -> Modality {
        Modality::Normal
    }

    /// The backend surface used for attach/detach and focus requests.
    fn surface(&self) -> Option<SurfaceId> {
        None
    }

    /// Whether this window has a redraw queued. Consulted by the dispatch
    /// loop to decide between blocking and polling for events.
    fn pending_update(&self) -> bool {
        false
    }

    /// Queue a repaint of `region`, used for cursor damage.
    fn schedule_update(&self, region: Rectangle) {
        let _ = region;
    }

    /// Whether this window is the source of the drag gesture in progress,
    /// making it ineligible for drag-event hit-testing.
    fn drag_source(&self) -> bool {
        false
    }

    /// Make the window visible. Called on the primary window by
    /// [`Application::show`](crate::app::Application::show).
    fn show_window(&self) {}

    /// Hide the window. Called on the primary window by
    /// [`Application::hide`](crate::app::Application::hide).
    fn close_window(&self) {}
}

/// Pointer identity for window handles.
pub(crate) fn same_window(a: &Arc<dyn Window>, b: &Arc<dyn Window>) -> bool {
    Arc::ptr_eq(a, b)
}
