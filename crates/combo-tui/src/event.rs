//! Terminal event handling. Captures keyboard, mouse, and resize events
//! from crossterm and dispatches them as Actions.
//!
//! Which widget owns keyboard focus is shared between the App, the
//! EventHandler and the focusable widgets through an Arc<AtomicU8>. The
//! handler uses it to pick a keymap: inside the dropdown, Space and j/k
//! drive the list instead of being typed.

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use futures::{Stream, StreamExt};
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

use combo_core::FocusRegion;

use crate::action::Action;

/// Encode FocusRegion as u8 for atomic sharing.
const FOCUS_FIELD: u8 = 0;
const FOCUS_DROPDOWN: u8 = 1;

/// Shared flag recording which region currently holds keyboard focus.
pub type FocusFlag = Arc<AtomicU8>;

pub fn new_focus_flag() -> FocusFlag {
    Arc::new(AtomicU8::new(FOCUS_FIELD))
}

pub fn set_focus(flag: &FocusFlag, region: FocusRegion) {
    let val = match region {
        FocusRegion::Field => FOCUS_FIELD,
        FocusRegion::Dropdown => FOCUS_DROPDOWN,
    };
    flag.store(val, Ordering::Relaxed);
}

pub fn current_focus(flag: &FocusFlag) -> FocusRegion {
    match flag.load(Ordering::Relaxed) {
        FOCUS_DROPDOWN => FocusRegion::Dropdown,
        _ => FocusRegion::Field,
    }
}

/// Event loop that reads terminal events and sends Actions.
pub struct EventHandler {
    tx: mpsc::UnboundedSender<Action>,
    tick_rate: Duration,
    focus: FocusFlag,
}

impl EventHandler {
    pub fn new(tx: mpsc::UnboundedSender<Action>, tick_rate: Duration, focus: FocusFlag) -> Self {
        Self {
            tx,
            tick_rate,
            focus,
        }
    }

    /// Run the event loop on the terminal. Should be spawned in a task.
    pub async fn run(&self) {
        self.run_with(EventStream::new()).await;
    }

    /// Forward events from `events` until the stream ends or the App stops
    /// listening. Reading the next event is cancel-safe, so a tick never
    /// swallows a key.
    pub async fn run_with<S>(&self, mut events: S)
    where
        S: Stream<Item = io::Result<Event>> + Unpin,
    {
        let mut interval = tokio::time::interval(self.tick_rate);

        loop {
            let action = tokio::select! {
                _ = interval.tick() => {
                    Some(Action::Tick)
                }
                next = events.next() => {
                    match next {
                        Some(Ok(event)) => self.map_event(event),
                        Some(Err(e)) => {
                            warn!(error = %e, "failed to read terminal event");
                            None
                        }
                        None => break,
                    }
                }
            };

            if let Some(action) = action {
                if self.tx.send(action).is_err() {
                    break;
                }
            }
        }
    }

    fn map_event(&self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.map_key(key),
            Event::Mouse(mouse) => map_mouse(mouse),
            Event::Paste(text) => Some(Action::PasteBulk(text)),
            Event::Resize(_, _) => Some(Action::Tick),
            _ => None,
        }
    }

    fn map_key(&self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('w') => Some(Action::DeleteWord),
                _ => None,
            };
        }

        match current_focus(&self.focus) {
            FocusRegion::Dropdown => map_key_dropdown(key),
            FocusRegion::Field => map_key_field(key),
        }
    }
}

fn map_mouse(mouse: MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::Click {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}

/// Key mapping while the text field is focused. Printable keys are typed.
fn map_key_field(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::Escape),
        KeyCode::Up => Some(Action::ArrowUp),
        KeyCode::Down => Some(Action::ArrowDown),
        KeyCode::Enter => Some(Action::Enter),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::ToggleDropdown),
        KeyCode::Backspace => Some(Action::BackspaceInput),
        KeyCode::Char(c) => Some(Action::CharInput(c)),
        _ => None,
    }
}

/// Key mapping while focus is inside the dropdown list.
fn map_key_dropdown(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::Escape),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ArrowUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ArrowDown),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Enter),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::ToggleDropdown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn handler() -> (EventHandler, FocusFlag) {
        let (tx, _rx) = mpsc::unbounded_channel();
        let focus = new_focus_flag();
        (
            EventHandler::new(tx, Duration::from_millis(100), focus.clone()),
            focus,
        )
    }

    #[test]
    fn focus_flag_round_trips() {
        let flag = new_focus_flag();
        assert_eq!(current_focus(&flag), FocusRegion::Field);
        set_focus(&flag, FocusRegion::Dropdown);
        assert_eq!(current_focus(&flag), FocusRegion::Dropdown);
    }

    #[test]
    fn letters_are_typed_in_field_but_navigate_in_dropdown() {
        let (handler, focus) = handler();
        assert!(matches!(
            handler.map_key(press(KeyCode::Char('j'))),
            Some(Action::CharInput('j'))
        ));
        set_focus(&focus, FocusRegion::Dropdown);
        assert!(matches!(
            handler.map_key(press(KeyCode::Char('j'))),
            Some(Action::ArrowDown)
        ));
        assert!(matches!(
            handler.map_key(press(KeyCode::Char(' '))),
            Some(Action::Enter)
        ));
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let (handler, focus) = handler();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(handler.map_key(ctrl_c), Some(Action::Quit)));
        set_focus(&focus, FocusRegion::Dropdown);
        assert!(matches!(handler.map_key(ctrl_c), Some(Action::Quit)));
    }

    #[tokio::test]
    async fn every_streamed_key_reaches_the_app() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handler = EventHandler::new(tx, Duration::from_millis(1), new_focus_flag());
        let keys = "Byte"
            .chars()
            .map(|c| Ok(Event::Key(press(KeyCode::Char(c)))));

        handler.run_with(futures::stream::iter(keys)).await;

        let mut typed = String::new();
        while let Ok(action) = rx.try_recv() {
            match action {
                Action::CharInput(c) => typed.push(c),
                Action::Tick => {}
                other => panic!("unexpected action {other:?}"),
            }
        }
        assert_eq!(typed, "Byte");
    }

    #[test]
    fn left_click_maps_to_cell() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert!(matches!(
            map_mouse(mouse),
            Some(Action::Click { column: 4, row: 7 })
        ));
    }
}
