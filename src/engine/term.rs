//! Terminal backend over crossterm.
//!
//! A development engine for running the runtime inside a terminal: a
//! dedicated reader thread polls crossterm and posts raw device events into
//! a [`QueueEngine`]. Keys become key press/release events, mouse motion
//! becomes absolute X/Y axis pairs, buttons become press/release with a
//! maintained button mask, and scroll becomes relative motion on the
//! "other" axis.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as CtEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers, MouseButton as CtMouseButton, MouseEvent as CtMouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{debug, warn};

use super::{DisplayEngine, EngineError, QueueEngine};
use crate::event::{
    Axis, Button, ButtonMask, Event, InputEvent, InputEventFlags, KeySymbol, LockState, Modifiers,
    SurfaceId, keys,
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Display engine fed by terminal input.
pub struct TermEngine {
    queue: QueueEngine,
    running: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl TermEngine {
    /// Put the terminal into raw mode, enable mouse capture and spawn the
    /// reader thread.
    pub fn spawn() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnableMouseCapture)?;

        let queue = QueueEngine::new();
        let running = Arc::new(AtomicBool::new(true));

        let thread_queue = queue.clone();
        let thread_running = running.clone();
        let reader = thread::Builder::new()
            .name("emberwin-input".to_string())
            .spawn(move || {
                read_loop(thread_running, thread_queue);
            })?;

        Ok(Self {
            queue,
            running,
            reader: Some(reader),
        })
    }

    /// The terminal size, as the screen bound for a platform config.
    pub fn screen_size() -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }
}

impl Drop for TermEngine {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        let _ = execute!(io::stdout(), DisableMouseCapture);
        let _ = disable_raw_mode();
    }
}

impl DisplayEngine for TermEngine {
    fn wait_for_events(&self, timeout: Duration) {
        self.queue.wait_for_events(timeout);
    }

    fn next_event(&self) -> Option<Event> {
        self.queue.next_event()
    }

    fn post_event(&self, event: Event) {
        self.queue.post_event(event);
    }

    fn attach_window(&self, surface: SurfaceId) -> Result<(), EngineError> {
        self.queue.attach_window(surface)
    }

    fn detach_window(&self, surface: SurfaceId) -> Result<(), EngineError> {
        self.queue.detach_window(surface)
    }

    fn request_focus(&self, surface: SurfaceId) -> Result<(), EngineError> {
        self.queue.request_focus(surface)
    }

    fn reset_buffer(&self) -> Result<(), EngineError> {
        self.queue.reset_buffer()
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.queue.stop();
    }

    fn stopped(&self) -> bool {
        self.queue.stopped()
    }

    fn cycle(&self) -> Duration {
        self.queue.cycle()
    }
}

// =============================================================================
// READER THREAD
// =============================================================================

fn read_loop(running: Arc<AtomicBool>, queue: QueueEngine) {
    let (mut width, mut height) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut buttons = ButtonMask::empty();

    while running.load(Ordering::SeqCst) {
        match event::poll(POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(err) => {
                warn!(error = %err, "terminal poll failed, stopping reader");
                break;
            }
        }

        match event::read() {
            Ok(CtEvent::Key(key)) => {
                if let Some(input) = translate_key(&key) {
                    queue.post_event(Event::Input(input));
                }
            }
            Ok(CtEvent::Mouse(mouse)) => {
                for input in translate_mouse(&mouse, width, height, &mut buttons) {
                    queue.post_event(Event::Input(input));
                }
            }
            Ok(CtEvent::Resize(w, h)) => {
                debug!(w, h, "terminal resized");
                width = w;
                height = h;
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "terminal read failed, stopping reader");
                break;
            }
        }
    }
}

fn translate_key(key: &KeyEvent) -> Option<InputEvent> {
    let symbol = key_symbol(key.code)?;
    let down = key.kind != KeyEventKind::Release;
    let mut input = InputEvent::key(symbol, modifiers(key.modifiers), LockState::empty(), down);
    if key.kind == KeyEventKind::Repeat {
        input.flags |= InputEventFlags::REPEAT;
    }
    Some(input)
}

fn key_symbol(code: KeyCode) -> Option<KeySymbol> {
    let symbol = match code {
        KeyCode::Char(c) => KeySymbol(c as u32),
        KeyCode::Enter => keys::ENTER,
        KeyCode::Tab => keys::TAB,
        KeyCode::Backspace => keys::BACKSPACE,
        KeyCode::Esc => keys::ESCAPE,
        KeyCode::Delete => keys::DELETE,
        KeyCode::Up => keys::UP,
        KeyCode::Down => keys::DOWN,
        KeyCode::Left => keys::LEFT,
        KeyCode::Right => keys::RIGHT,
        KeyCode::Home => keys::HOME,
        KeyCode::End => keys::END,
        KeyCode::PageUp => keys::PAGE_UP,
        KeyCode::PageDown => keys::PAGE_DOWN,
        _ => return None,
    };
    Some(symbol)
}

fn modifiers(ct: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if ct.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if ct.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if ct.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if ct.contains(KeyModifiers::SUPER) || ct.contains(KeyModifiers::META) {
        out |= Modifiers::META;
    }
    out
}

/// An absolute X/Y event pair locating the pointer, X flagged FOLLOW.
fn position_pair(column: u16, row: u16, width: u16, height: u16) -> [InputEvent; 2] {
    let mut x = InputEvent::axis_absolute_ranged(Axis::X, column as i32, 0, width as i32);
    x.flags |= InputEventFlags::FOLLOW;
    let y = InputEvent::axis_absolute_ranged(Axis::Y, row as i32, 0, height as i32);
    [x, y]
}

fn translate_mouse(
    mouse: &CtMouseEvent,
    width: u16,
    height: u16,
    buttons: &mut ButtonMask,
) -> Vec<InputEvent> {
    let pair = position_pair(mouse.column, mouse.row, width, height);
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => pair.to_vec(),
        MouseEventKind::Down(ct_button) => {
            let button = pointer_button(ct_button);
            buttons.insert(button.into());
            let mut events = pair.to_vec();
            events.push(InputEvent::button(button, *buttons, true));
            events
        }
        MouseEventKind::Up(ct_button) => {
            let button = pointer_button(ct_button);
            buttons.remove(button.into());
            let mut events = pair.to_vec();
            events.push(InputEvent::button(button, *buttons, false));
            events
        }
        MouseEventKind::ScrollUp => vec![InputEvent::axis_relative(Axis::Other, -1)],
        MouseEventKind::ScrollDown => vec![InputEvent::axis_relative(Axis::Other, 1)],
        _ => Vec::new(),
    }
}

fn pointer_button(ct: CtMouseButton) -> Button {
    match ct {
        CtMouseButton::Left => Button::Left,
        CtMouseButton::Middle => Button::Middle,
        CtMouseButton::Right => Button::Right,
    }
}

// =============================================================================
// TESTS
// =============================================================================
