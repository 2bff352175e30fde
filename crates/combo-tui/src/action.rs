//! Action enum: the message bus for the TUI.
//! Terminal input and component output flow through here.

use combo_core::{Key, PillInputEvent};

#[derive(Debug, Clone)]
pub enum Action {
    // ── Global ──────────────────────────────────────────────
    /// Quit the application.
    Quit,
    /// A tick event for redraws.
    Tick,
    /// Display a status message in the status bar.
    SetStatus(String),

    // ── Text Input ──────────────────────────────────────────
    /// A character was typed.
    CharInput(char),
    /// Backspace pressed.
    BackspaceInput,
    /// Delete word (Ctrl+W).
    DeleteWord,
    /// Bulk paste from bracketed paste mode.
    PasteBulk(String),

    // ── Combo keys ──────────────────────────────────────────
    Escape,
    ArrowUp,
    ArrowDown,
    Enter,
    /// Open or close the dropdown (Tab).
    ToggleDropdown,

    // ── Pointer ─────────────────────────────────────────────
    /// Left button pressed at a terminal cell.
    Click { column: u16, row: u16 },

    // ── Component output ────────────────────────────────────
    /// Raised by the pill field for the combo box controller.
    Pill(PillInputEvent),
}

impl Action {
    /// The key this action represents when it bubbles to the combo box
    /// root, if it is a key press at all.
    pub fn combo_key(&self) -> Option<Key> {
        match self {
            Action::Escape => Some(Key::Escape),
            Action::ArrowUp => Some(Key::ArrowUp),
            Action::ArrowDown => Some(Key::ArrowDown),
            Action::Enter => Some(Key::Enter),
            Action::ToggleDropdown => Some(Key::Tab),
            Action::BackspaceInput => Some(Key::Backspace),
            Action::CharInput(c) => Some(Key::Char(*c)),
            Action::DeleteWord | Action::PasteBulk(_) => Some(Key::Other),
            _ => None,
        }
    }
}
