//! In-process reference engine.
//!
//! A condvar-guarded event queue with an atomic stop flag and a fixed frame
//! interval. This is the engine the tests drive directly and the substrate
//! the terminal backend posts into. Handles are cheap clones of one shared
//! state, so a producer thread and the dispatch loop can share an engine.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use super::{DisplayEngine, EngineError};
use crate::event::{Event, SurfaceId};

const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

struct Inner {
    queue: Mutex<VecDeque<Event>>,
    available: Condvar,
    attached: Mutex<HashSet<SurfaceId>>,
    stopped: AtomicBool,
    frame_interval: Duration,
}

/// Cloneable handle to the shared queue engine.
#[derive(Clone)]
pub struct QueueEngine {
    inner: Arc<Inner>,
}

impl QueueEngine {
    pub fn new() -> Self {
        Self::with_frame_interval(DEFAULT_FRAME_INTERVAL)
    }

    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::new()),
                available: Condvar::new(),
                attached: Mutex::new(HashSet::new()),
                stopped: AtomicBool::new(false),
                frame_interval,
            }),
        }
    }

    /// Surfaces currently attached, for introspection in tests.
    pub fn attached(&self) -> Vec<SurfaceId> {
        self.lock_attached().iter().copied().collect()
    }

    pub fn queued(&self) -> usize {
        self.lock_queue().len()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Event>> {
        self.inner
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_attached(&self) -> std::sync::MutexGuard<'_, HashSet<SurfaceId>> {
        self.inner
            .attached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for QueueEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayEngine for QueueEngine {
    fn wait_for_events(&self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        let mut queue = self.lock_queue();
        while queue.is_empty() && !self.stopped() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (guard, _) = self
                .inner
                .available
                .wait_timeout(queue, deadline - now)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            queue = guard;
        }
    }

    fn next_event(&self) -> Option<Event> {
        self.lock_queue().pop_front()
    }

    fn post_event(&self, event: Event) {
        self.lock_queue().push_back(event);
        self.inner.available.notify_all();
    }

    fn attach_window(&self, surface: SurfaceId) -> Result<(), EngineError> {
        self.lock_attached().insert(surface);
        debug!(surface = surface.0, "surface attached");
        Ok(())
    }

    fn detach_window(&self, surface: SurfaceId) -> Result<(), EngineError> {
        if self.lock_attached().remove(&surface) {
            debug!(surface = surface.0, "surface detached");
            Ok(())
        } else {
            Err(EngineError::SurfaceNotAttached(surface))
        }
    }

    fn request_focus(&self, surface: SurfaceId) -> Result<(), EngineError> {
        if self.lock_attached().contains(&surface) {
            debug!(surface = surface.0, "focus granted");
            Ok(())
        } else {
            Err(EngineError::FocusDenied(surface))
        }
    }

    fn reset_buffer(&self) -> Result<(), EngineError> {
        self.lock_queue().clear();
        Ok(())
    }

    fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        self.inner.available.notify_all();
    }

    fn stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    fn cycle(&self) -> Duration {
        self.inner.frame_interval
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Axis, InputEvent};
    use std::thread;

    fn motion(delta: i32) -> Event {
        Event::Input(InputEvent::axis_relative(Axis::X, delta))
    }

    #[test]
    fn test_post_and_drain_preserves_order() {
        let engine = QueueEngine::new();
        engine.post_event(motion(1));
        engine.post_event(motion(2));

        assert_eq!(engine.next_event(), Some(motion(1)));
        assert_eq!(engine.next_event(), Some(motion(2)));
        assert_eq!(engine.next_event(), None);
    }

    #[test]
    fn test_wait_times_out_when_empty() {
        let engine = QueueEngine::new();
        let start = Instant::now();
        engine.wait_for_events(Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_wait_wakes_on_post() {
        let engine = QueueEngine::new();
        let producer = engine.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            producer.post_event(motion(1));
        });

        let start = Instant::now();
        engine.wait_for_events(Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(engine.next_event().is_some());
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_wakes_on_stop() {
        let engine = QueueEngine::new();
        let stopper = engine.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            stopper.stop();
        });

        engine.wait_for_events(Duration::from_secs(5));
        assert!(engine.stopped());
        handle.join().unwrap();
    }

    #[test]
    fn test_attach_detach_tracking() {
        let engine = QueueEngine::new();
        let surface = SurfaceId(7);

        engine.attach_window(surface).unwrap();
        assert_eq!(engine.attached(), vec![surface]);
        engine.request_focus(surface).unwrap();

        engine.detach_window(surface).unwrap();
        assert!(engine.attached().is_empty());
        assert_eq!(
            engine.detach_window(surface),
            Err(EngineError::SurfaceNotAttached(surface))
        );
        assert_eq!(
            engine.request_focus(surface),
            Err(EngineError::FocusDenied(surface))
        );
    }

    #[test]
    fn test_reset_buffer_discards_queue() {
        let engine = QueueEngine::new();
        engine.post_event(motion(1));
        engine.reset_buffer().unwrap();
        assert_eq!(engine.next_event(), None);
    }
}
