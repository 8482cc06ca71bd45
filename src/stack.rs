//! The window stack: ordered membership and the active window.
//!
//! Insertion order is z-order; the most recently added window is topmost.
//! The stack is pure state - no locking, no backend calls, no window
//! callbacks (handles are only compared by pointer) - so the facade can
//! mutate it under its lock and run every side effect on the returned
//! change reports after the lock is released.
//!
//! Invariants:
//! - a window appears at most once
//! - the active window is either unset or a member

use std::sync::{Arc, Weak};

use crate::error::AppError;
use crate::window::{Window, same_window};

/// How a [`WindowStack::remove`] affected the active window.
pub enum Removal {
    /// The removed window was not active.
    Unchanged,
    /// The removed window was active and the stack is now empty.
    Cleared,
    /// The removed window was active; the new topmost window was promoted.
    Promoted(Arc<dyn Window>),
}

/// What [`WindowStack::set_active`] displaced.
pub struct FocusChange {
    /// The previously active window, if any. Whether it must be detached
    /// (modal takeover) is the caller's decision.
    pub previous: Option<Arc<dyn Window>>,
}

/// Ordered collection of top-level windows plus the active reference.
#[derive(Default)]
pub struct WindowStack {
    windows: Vec<Arc<dyn Window>>,
    active: Option<Weak<dyn Window>>,
}

impl WindowStack {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // MEMBERSHIP
    // =========================================================================

    /// Append `window` to the top of the stack. Does not change the active
    /// window.
    pub fn add(&mut self, window: Arc<dyn Window>) -> Result<(), AppError> {
        if self.contains(&window) {
            return Err(AppError::AlreadyAdded);
        }
        self.windows.push(window);
        Ok(())
    }

    /// Erase `window` from the stack. If it was active, the new topmost
    /// remaining window is promoted (or the active reference is cleared).
    pub fn remove(&mut self, window: &Arc<dyn Window>) -> Result<Removal, AppError> {
        let index = self
            .windows
            .iter()
            .position(|w| same_window(w, window))
            .ok_or(AppError::WindowNotFound)?;
        self.windows.remove(index);

        if !self.is_active(window) {
            return Ok(Removal::Unchanged);
        }

        match self.windows.last().cloned() {
            Some(top) => {
                self.active = Some(Arc::downgrade(&top));
                Ok(Removal::Promoted(top))
            }
            None => {
                self.active = None;
                Ok(Removal::Cleared)
            }
        }
    }

    pub fn contains(&self, window: &Arc<dyn Window>) -> bool {
        self.windows.iter().any(|w| same_window(w, window))
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// The bottom-most window, treated as the primary application window.
    pub fn front(&self) -> Option<Arc<dyn Window>> {
        self.windows.first().cloned()
    }

    /// Snapshot in routing order, topmost first.
    pub fn top_down(&self) -> Vec<Arc<dyn Window>> {
        self.windows.iter().rev().cloned().collect()
    }

    /// Snapshot in insertion order, bottom first.
    pub fn bottom_up(&self) -> Vec<Arc<dyn Window>> {
        self.windows.clone()
    }

    // =========================================================================
    // ACTIVE WINDOW
    // =========================================================================

    /// Make `window` the active window. It must already be a member.
    pub fn set_active(&mut self, window: &Arc<dyn Window>) -> Result<FocusChange, AppError> {
        if !self.contains(window) {
            return Err(AppError::NotAMember);
        }

        let previous = self.active();
        self.active = Some(Arc::downgrade(window));
        Ok(FocusChange { previous })
    }

    /// The active window, validated by membership rather than trusted
    /// pointer validity.
    pub fn active(&self) -> Option<Arc<dyn Window>> {
        self.active
            .as_ref()
            .and_then(Weak::upgrade)
            .filter(|w| self.contains(w))
    }

    fn is_active(&self, window: &Arc<dyn Window>) -> bool {
        self.active
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|active| same_window(&active, window))
    }
}

// =============================================================================
// TESTS
// =============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::event::WindowEvent;
    use proptest::prelude::*;

    struct Plain;

    impl Window for Plain {
        fn handle_window_event(&self, _event: &WindowEvent, _dragging: bool) -> bool {
            false
        }
        fn update_window(&self) {}
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Add(usize),
        Remove(usize),
        SetActive(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..8usize).prop_map(Op::Add),
            (0..8usize).prop_map(Op::Remove),
            (0..8usize).prop_map(Op::SetActive),
        ]
    }

    proptest! {
        /// No operation sequence can produce duplicates or an active window
        /// outside the stack.
        #[test]
        fn stack_invariants_hold(ops in proptest::collection::vec(op_strategy(), 0..64)) {
            let pool: Vec<Arc<dyn Window>> =
                (0..8).map(|_| Arc::new(Plain) as Arc<dyn Window>).collect();
            let mut stack = WindowStack::new();

            for op in ops {
                let _ = match op {
                    Op::Add(i) => stack.add(pool[i].clone()).map(|_| ()),
                    Op::Remove(i) => stack.remove(&pool[i]).map(|_| ()),
                    Op::SetActive(i) => stack.set_active(&pool[i]).map(|_| ()),
                };

                // No duplicates.
                let members = stack.bottom_up();
                for (i, a) in members.iter().enumerate() {
                    for b in members.iter().skip(i + 1) {
                        prop_assert!(!Arc::ptr_eq(a, b), "duplicate stack entry");
                    }
                }

                // Active window is a member.
                if let Some(active) = stack.active() {
                    prop_assert!(stack.contains(&active), "active window not a member");
                }
            }
        }

        /// Removing the active window always promotes the new topmost entry.
        #[test]
        fn removal_promotes_topmost(count in 1..8usize) {
            let pool: Vec<Arc<dyn Window>> =
                (0..count).map(|_| Arc::new(Plain) as Arc<dyn Window>).collect();
            let mut stack = WindowStack::new();
            for w in &pool {
                stack.add(w.clone()).unwrap();
            }
            let top = pool.last().unwrap().clone();
            stack.set_active(&top).unwrap();
            stack.remove(&top).unwrap();

            match stack.active() {
                Some(active) => {
                    prop_assert!(Arc::ptr_eq(&active, &pool[count - 2]));
                }
                None => prop_assert!(count == 1),
            }
        }
    }
}
