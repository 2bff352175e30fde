//! Open/close button for the dropdown panel.

use ratatui::layout::{Alignment, Rect};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tracing::debug;

use combo_core::DropdownToggle;

use crate::action::Action;
use crate::components::Component;
use crate::theme::Theme;

#[derive(Debug, Default)]
pub struct DropdownButton {
    open: bool,
    disabled: bool,
}

impl DropdownButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the panel. Ignored while disabled.
    pub fn open_dropdown(&mut self) {
        if !self.disabled && !self.open {
            debug!("opening dropdown");
            self.open = true;
        }
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close_dropdown();
        } else {
            self.open_dropdown();
        }
    }
}

impl DropdownToggle for DropdownButton {
    fn is_open(&self) -> bool {
        self.open
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn close_dropdown(&mut self) {
        self.open = false;
    }
}

impl Component for DropdownButton {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::ToggleDropdown => self.toggle(),
            Action::ArrowDown => self.open_dropdown(),
            _ => {}
        }
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let (glyph, style) = if self.disabled {
            ("▾", Theme::disabled())
        } else if self.open {
            ("▴", Theme::selected())
        } else {
            ("▾", Theme::normal())
        };

        let mut button = Paragraph::new(glyph)
            .style(style)
            .alignment(Alignment::Center);
        if area.height >= 3 {
            button = button.block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            );
        }
        frame.render_widget(button, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_open_and_closed() {
        let mut button = DropdownButton::new();
        button.handle_action(&Action::ToggleDropdown);
        assert!(button.is_open());
        button.handle_action(&Action::ToggleDropdown);
        assert!(!button.is_open());
    }

    #[test]
    fn disabled_button_stays_closed() {
        let mut button = DropdownButton::new();
        button.set_disabled(true);
        button.handle_action(&Action::ToggleDropdown);
        button.handle_action(&Action::ArrowDown);
        assert!(!button.is_open());
    }

    #[test]
    fn close_is_idempotent() {
        let mut button = DropdownButton::new();
        button.close_dropdown();
        assert!(!button.is_open());
        button.open_dropdown();
        button.close_dropdown();
        button.close_dropdown();
        assert!(!button.is_open());
    }
}
