//! End-to-end scenarios driven through the public API: events go in
//! through a queue engine and come out of window handlers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use emberwin::{
    AppOptions, Application, Axis, Button, ButtonMask, DisplayEngine, Event, InputEvent,
    KeySymbol, LockState, Modality, Modifiers, Point, PointerEventKind, QueueEngine, Size,
    StaticPlatform, Window, WindowEvent, WindowEventKind,
};

/// Only one `Application` may exist per process; every test takes this
/// first.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EchoWindow {
    modality: Modality,
    consume: bool,
    events: Mutex<Vec<WindowEvent>>,
    updates: AtomicUsize,
}

impl EchoWindow {
    fn new(consume: bool) -> Arc<Self> {
        Arc::new(Self {
            modality: Modality::Normal,
            consume,
            events: Mutex::new(Vec::new()),
            updates: AtomicUsize::new(0),
        })
    }

    fn modal() -> Arc<Self> {
        Arc::new(Self {
            modality: Modality::Modal,
            consume: true,
            events: Mutex::new(Vec::new()),
            updates: AtomicUsize::new(0),
        })
    }

    fn events(&self) -> Vec<WindowEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn kinds(&self) -> Vec<WindowEventKind> {
        self.events().iter().map(|event| event.kind).collect()
    }
}

impl Window for EchoWindow {
    fn handle_window_event(&self, event: &WindowEvent, _dragging: bool) -> bool {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(*event);
        self.consume
    }

    fn update_window(&self) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }

    fn modality(&self) -> Modality {
        self.modality
    }
}

fn shared_runtime() -> (Application, QueueEngine) {
    let engine = QueueEngine::new();
    let platform = StaticPlatform::new(Size::new(640, 480), AppOptions::empty());
    let app = Application::new(Arc::new(engine.clone()), Arc::new(platform));
    (app, engine)
}

#[test]
fn test_device_events_reach_the_active_window() {
    let _serial = serial();
    let (app, engine) = shared_runtime();

    let window = EchoWindow::new(true);
    app.add_window(window.clone()).unwrap();
    app.set_active_window(&(window.clone() as Arc<dyn Window>))
        .unwrap();

    // Move the pointer, press a key, press and release a button.
    engine.post_event(Event::Input(InputEvent::axis_relative(Axis::X, 320)));
    engine.post_event(Event::Input(InputEvent::key(
        KeySymbol(b'a' as u32),
        Modifiers::empty(),
        LockState::empty(),
        true,
    )));
    engine.post_event(Event::Input(InputEvent::button(
        Button::Left,
        ButtonMask::LEFT,
        true,
    )));
    engine.post_event(Event::Input(InputEvent::button(
        Button::Left,
        ButtonMask::empty(),
        false,
    )));
    app.handle_events(Duration::ZERO, false);

    assert_eq!(
        window.kinds(),
        vec![
            WindowEventKind::Motion,
            WindowEventKind::KeyDown,
            WindowEventKind::ButtonDown,
            WindowEventKind::ButtonUp,
        ]
    );
    // Everything after the motion is stamped with the moved cursor.
    for event in &window.events()[1..] {
        assert_eq!(event.position(), Point::new(320, 0));
    }
}

#[test]
fn test_motion_flood_collapses_to_one_delivery() {
    let _serial = serial();
    let (app, engine) = shared_runtime();

    let window = EchoWindow::new(true);
    app.add_window(window.clone()).unwrap();
    app.set_active_window(&(window.clone() as Arc<dyn Window>))
        .unwrap();

    for x in 1..=50 {
        engine.post_event(Event::Window(WindowEvent::new(
            WindowEventKind::Motion,
            Point::new(x, 0),
        )));
    }
    app.handle_events(Duration::ZERO, false);

    let events = window.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].position(), Point::new(50, 0));
}

#[test]
fn test_modal_dialog_blocks_the_window_below() {
    let _serial = serial();
    let (app, _engine) = shared_runtime();

    let main = EchoWindow::new(true);
    let dialog = EchoWindow::modal();
    app.add_window(main.clone()).unwrap();
    app.add_window(dialog.clone()).unwrap();
    app.set_active_window(&(dialog.clone() as Arc<dyn Window>))
        .unwrap();

    app.post_pointer_event(
        PointerEventKind::ButtonDown,
        Button::Left,
        ButtonMask::LEFT,
        5,
        5,
        0,
    )
    .unwrap();
    app.handle_events(Duration::ZERO, false);

    assert_eq!(dialog.events().len(), 1);
    assert!(main.events().is_empty());

    // Dismissing the dialog restores routing to the window below.
    app.remove_window(&(dialog.clone() as Arc<dyn Window>))
        .unwrap();
    app.post_pointer_event(
        PointerEventKind::ButtonDown,
        Button::Left,
        ButtonMask::LEFT,
        5,
        5,
        0,
    )
    .unwrap();
    app.handle_events(Duration::ZERO, false);

    assert_eq!(main.events().len(), 1);
    assert_eq!(dialog.events().len(), 1);
}

#[test]
fn test_declined_events_fall_through_the_stack() {
    let _serial = serial();
    let (app, _engine) = shared_runtime();

    let bottom = EchoWindow::new(true);
    let top = EchoWindow::new(false);
    app.add_window(bottom.clone()).unwrap();
    app.add_window(top.clone()).unwrap();
    app.set_active_window(&(top.clone() as Arc<dyn Window>))
        .unwrap();

    app.post_key_event(KeySymbol(b' ' as u32), Modifiers::empty(), LockState::empty(), true)
        .unwrap();
    app.handle_events(Duration::ZERO, false);

    // The topmost window saw it first and declined.
    assert_eq!(top.events().len(), 1);
    assert_eq!(bottom.events().len(), 1);
}

#[test]
fn test_update_cycle_flushes_every_window_bottom_up() {
    let _serial = serial();
    let (app, _engine) = shared_runtime();

    let a = EchoWindow::new(true);
    let b = EchoWindow::new(true);
    app.add_window(a.clone()).unwrap();
    app.add_window(b.clone()).unwrap();

    app.update_windows();
    app.update_windows();

    assert_eq!(a.updates.load(Ordering::SeqCst), 2);
    assert_eq!(b.updates.load(Ordering::SeqCst), 2);
}

#[test]
fn test_exec_terminates_when_another_thread_quits() {
    let _serial = serial();
    let engine = QueueEngine::with_frame_interval(Duration::from_millis(5));
    let platform = StaticPlatform::new(Size::new(640, 480), AppOptions::empty());
    let app = Arc::new(Application::new(Arc::new(engine.clone()), Arc::new(platform)));

    let window = EchoWindow::new(true);
    app.add_window(window.clone()).unwrap();
    app.set_active_window(&(window.clone() as Arc<dyn Window>))
        .unwrap();

    let quits = Arc::new(AtomicUsize::new(0));
    let count = quits.clone();
    app.on_quit(move || {
        count.fetch_add(1, Ordering::SeqCst);
    });

    let producer = app.clone();
    let handle = thread::spawn(move || {
        producer
            .post_key_event(KeySymbol(b'q' as u32), Modifiers::empty(), LockState::empty(), true)
            .unwrap();
        thread::sleep(Duration::from_millis(25));
        producer.quit();
    });

    app.exec();
    handle.join().unwrap();

    assert_eq!(quits.load(Ordering::SeqCst), 1);
    assert!(!app.visible());
    // The key posted before shutdown made it through the loop.
    assert!(window.kinds().contains(&WindowEventKind::KeyDown));
    // The loop kept flushing windows while it ran.
    assert!(window.updates.load(Ordering::SeqCst) > 0);
}
