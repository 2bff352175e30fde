//! Status bar at the bottom of the TUI.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use combo_core::{HostState, Mode};

use crate::action::Action;
use crate::components::Component;
use crate::theme::Theme;

pub struct StatusBarComponent {
    /// Current status message.
    pub message: String,
    /// Selection mode shown in the badge.
    pub mode: Mode,
    /// Host state of the combo box, mirrored for display.
    pub host: HostState,
}

impl StatusBarComponent {
    pub fn new(mode: Mode) -> Self {
        Self {
            message: "Type to filter, ↓ to open the list, Enter to add a new item.".to_string(),
            mode,
            host: HostState::default(),
        }
    }

    fn flags(&self) -> String {
        let mut flags = Vec::new();
        if self.host.expanded {
            flags.push("expanded");
        }
        if self.host.disabled {
            flags.push("disabled");
        }
        flags.join(",")
    }
}

impl Component for StatusBarComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::SetStatus(msg) => self.message = msg.clone(),
            // Escape that nothing inside the combo box consumed.
            Action::Escape => self.message.clear(),
            _ => {}
        }
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = area.width as usize;

        let hints = "Tab·↑↓·Enter·^C";
        let hints_len = hints.chars().count() + 1;

        let badge = format!(" {} ", self.mode);
        let flags = self.flags();
        let flags_len = if flags.is_empty() { 0 } else { flags.len() + 2 };

        let msg_budget = width
            .saturating_sub(badge.len())
            .saturating_sub(flags_len)
            .saturating_sub(hints_len)
            .saturating_sub(4);

        let msg: String = if self.message.chars().count() > msg_budget {
            if msg_budget > 3 {
                let head: String = self.message.chars().take(msg_budget - 3).collect();
                format!("{head}...")
            } else {
                String::new()
            }
        } else {
            self.message.clone()
        };

        let used = badge.len() + flags_len + 2 + msg.chars().count();
        let pad = width.saturating_sub(used + hints_len);

        let mut spans = vec![Span::styled(badge, Theme::muted())];
        if !flags.is_empty() {
            spans.push(Span::styled(format!(" {flags} "), Theme::key_hint()));
        }
        spans.extend([
            Span::styled("  ", Theme::dim()),
            Span::styled(msg, Theme::dim()),
            Span::raw(" ".repeat(pad)),
            Span::styled(hints, Theme::key_hint()),
            Span::raw(" "),
        ]);

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
