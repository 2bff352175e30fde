//! Text field with pill tokens for the current selection.
//!
//! Features:
//! - Typing, Backspace, Ctrl+W and paste raise a search with the new text
//! - Enter on non-empty text proposes a new item after the last pill
//! - Backspace on an empty field in multi mode removes the last pill
//! - In single mode the selected value is shown until the user edits it,
//!   at which point editing starts from that value
//! - Collapsed multi mode shows the first pill and a counter; expanded
//!   shows every pill

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use combo_core::{FocusRegion, Item, Mode, PillInput, PillInputEvent, SubmitRequest};

use crate::action::Action;
use crate::components::Component;
use crate::event::{self, FocusFlag};
use crate::theme::Theme;

pub struct PillField {
    /// Text being typed (the search query).
    text: String,
    /// Cursor position (byte offset) within `text`.
    cursor: usize,
    pills: Vec<Item>,
    placeholder: String,
    /// Selected value shown in single mode while `text` is empty.
    display_value: String,
    mode: Mode,
    disabled: bool,
    /// Whether every pill is shown rather than a summary.
    expanded: bool,
    focus: FocusFlag,
}

impl PillField {
    pub fn new(focus: FocusFlag) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            pills: Vec::new(),
            placeholder: String::new(),
            display_value: String::new(),
            mode: Mode::default(),
            disabled: false,
            expanded: false,
            focus,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pills(&self) -> &[Item] {
        &self.pills
    }

    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Drop the typed text.
    pub fn clear_text(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn has_focus(&self) -> bool {
        event::current_focus(&self.focus) == FocusRegion::Field
    }

    /// In single mode, the first edit starts from the displayed value.
    fn begin_edit(&mut self) {
        if self.mode == Mode::Single && self.text.is_empty() && !self.display_value.is_empty() {
            self.text = self.display_value.clone();
            self.cursor = self.text.len();
        }
    }

    fn clamp_cursor(&mut self) {
        if self.cursor > self.text.len() {
            self.cursor = self.text.len();
        }
    }

    fn insert_str(&mut self, s: &str) {
        self.begin_edit();
        self.clamp_cursor();
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    fn delete_char(&mut self) {
        self.begin_edit();
        self.clamp_cursor();
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete the word before the cursor (Ctrl+W).
    fn delete_word(&mut self) {
        self.begin_edit();
        self.clamp_cursor();
        let bytes = self.text.as_bytes();
        let mut end = self.cursor;
        while end > 0 && bytes[end - 1] == b' ' {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && bytes[start - 1] != b' ' {
            start -= 1;
        }
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    fn search(&self) -> Option<Action> {
        Some(Action::Pill(PillInputEvent::Search(self.text.clone())))
    }

    fn backspace(&mut self) -> Option<Action> {
        let nothing_to_edit =
            self.text.is_empty() && (self.mode == Mode::Multi || self.display_value.is_empty());
        if nothing_to_edit {
            if self.mode == Mode::Multi {
                return self
                    .pills
                    .last()
                    .map(|pill| Action::Pill(PillInputEvent::RemovePill(pill.id)));
            }
            return None;
        }
        self.delete_char();
        self.search()
    }

    fn submit(&self) -> Option<Action> {
        if self.text.is_empty() {
            return None;
        }
        Some(Action::Pill(PillInputEvent::Submit(SubmitRequest {
            value: self.text.clone(),
            after: self.pills.last().map(|pill| pill.id),
        })))
    }

    fn pill_spans(&self) -> Vec<Span<'_>> {
        if self.mode == Mode::Single {
            return Vec::new();
        }
        let shown = if self.expanded {
            self.pills.len()
        } else {
            self.pills.len().min(1)
        };

        let mut spans = Vec::new();
        for pill in &self.pills[..shown] {
            spans.push(Span::styled(format!(" {} × ", pill.content), Theme::pill()));
            spans.push(Span::raw(" "));
        }
        let hidden = self.pills.len() - shown;
        if hidden > 0 {
            spans.push(Span::styled(format!("+{hidden} "), Theme::pill_counter()));
        }
        spans
    }

    fn text_spans(&self, focused: bool) -> Vec<Span<'_>> {
        if self.text.is_empty() {
            let shown = if self.mode == Mode::Single && !self.display_value.is_empty() {
                Span::styled(self.display_value.as_str(), Theme::normal())
            } else if self.pills.is_empty() {
                Span::styled(self.placeholder.as_str(), Theme::dim())
            } else {
                Span::raw("")
            };
            return if focused {
                vec![shown, Span::styled(" ", Theme::cursor())]
            } else {
                vec![shown]
            };
        }

        if !focused {
            return vec![Span::styled(self.text.as_str(), Theme::normal())];
        }

        let pos = self.cursor.min(self.text.len());
        let (before, after) = self.text.split_at(pos);
        let cursor_len = after.chars().next().map(char::len_utf8).unwrap_or(0);
        let (at, rest) = after.split_at(cursor_len);
        vec![
            Span::styled(before, Theme::normal()),
            Span::styled(if at.is_empty() { " " } else { at }, Theme::cursor()),
            Span::styled(rest, Theme::normal()),
        ]
    }
}

impl PillInput for PillField {
    fn set_pills(&mut self, pills: &[Item]) {
        self.pills = pills.to_vec();
    }

    fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    /// A new value replaces whatever was typed. Clearing the value keeps
    /// the text, which is still being edited.
    fn set_display_value(&mut self, value: &str) {
        self.display_value = value.to_string();
        if !value.is_empty() {
            self.clear_text();
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    fn focus_input(&mut self) {
        event::set_focus(&self.focus, FocusRegion::Field);
    }
}

impl Component for PillField {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        if self.disabled {
            return None;
        }
        match action {
            Action::CharInput(c) => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf));
                self.search()
            }
            Action::PasteBulk(text) => {
                let line = text.lines().next().unwrap_or("");
                if line.is_empty() {
                    return None;
                }
                self.insert_str(line);
                self.search()
            }
            Action::BackspaceInput => self.backspace(),
            Action::DeleteWord => {
                self.delete_word();
                self.search()
            }
            Action::Enter => self.submit(),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let focused = self.has_focus() && !self.disabled;

        let mut spans = self.pill_spans();
        spans.extend(self.text_spans(focused));
        let mut field = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: false });
        if self.disabled {
            field = field.style(Theme::disabled());
        }

        if area.height >= 3 {
            let mode_label = format!(" {} ", self.mode);
            field = field.block(
                Block::default()
                    .title(mode_label)
                    .title_style(if focused {
                        Theme::key_hint()
                    } else {
                        Theme::muted()
                    })
                    .borders(Borders::ALL)
                    .border_style(if focused {
                        Theme::focused_border()
                    } else {
                        Theme::border()
                    }),
            );
        }

        frame.render_widget(field, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(mode: Mode) -> PillField {
        let mut field = PillField::new(event::new_focus_flag());
        field.set_mode(mode);
        field
    }

    fn search_text(action: Option<Action>) -> String {
        match action {
            Some(Action::Pill(PillInputEvent::Search(text))) => text,
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn typing_raises_search_with_full_text() {
        let mut field = field(Mode::Multi);
        field.handle_action(&Action::CharInput('B'));
        let text = search_text(field.handle_action(&Action::CharInput('y')));
        assert_eq!(text, "By");
        assert_eq!(search_text(field.handle_action(&Action::BackspaceInput)), "B");
    }

    #[test]
    fn editing_starts_from_displayed_value_in_single_mode() {
        let mut field = field(Mode::Single);
        field.set_display_value("Byte");
        let text = search_text(field.handle_action(&Action::BackspaceInput));
        assert_eq!(text, "Byt");
    }

    #[test]
    fn new_display_value_resets_text() {
        let mut field = field(Mode::Single);
        field.handle_action(&Action::CharInput('x'));
        field.set_display_value("Abacus");
        assert_eq!(field.text(), "");
        assert_eq!(field.display_value(), "Abacus");
    }

    #[test]
    fn clearing_display_value_keeps_typed_text() {
        let mut field = field(Mode::Single);
        field.set_display_value("Byte");
        field.handle_action(&Action::BackspaceInput);
        field.set_display_value("");
        assert_eq!(field.text(), "Byt");
        assert_eq!(field.display_value(), "");
    }

    #[test]
    fn backspace_on_empty_multi_field_removes_last_pill() {
        let mut field = field(Mode::Multi);
        let pills = vec![Item::new("Abacus"), Item::new("Byte")];
        field.set_pills(&pills);
        match field.handle_action(&Action::BackspaceInput) {
            Some(Action::Pill(PillInputEvent::RemovePill(id))) => assert_eq!(id, pills[1].id),
            other => panic!("expected pill removal, got {other:?}"),
        }
    }

    #[test]
    fn backspace_on_empty_single_field_does_nothing() {
        let mut field = field(Mode::Single);
        assert!(field.handle_action(&Action::BackspaceInput).is_none());
    }

    #[test]
    fn enter_submits_after_last_pill() {
        let mut field = field(Mode::Multi);
        let pills = vec![Item::new("Abacus")];
        field.set_pills(&pills);
        assert!(field.handle_action(&Action::Enter).is_none());

        field.handle_action(&Action::PasteBulk("New\nignored".to_string()));
        match field.handle_action(&Action::Enter) {
            Some(Action::Pill(PillInputEvent::Submit(request))) => {
                assert_eq!(request.value, "New");
                assert_eq!(request.after, Some(pills[0].id));
            }
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn delete_word_trims_last_word() {
        let mut field = field(Mode::Multi);
        field.handle_action(&Action::PasteBulk("big blue ".to_string()));
        assert_eq!(search_text(field.handle_action(&Action::DeleteWord)), "big ");
    }

    #[test]
    fn disabled_field_ignores_input() {
        let mut field = field(Mode::Multi);
        field.set_disabled(true);
        assert!(field.handle_action(&Action::CharInput('a')).is_none());
        assert_eq!(field.text(), "");
    }

    #[test]
    fn focus_input_claims_shared_focus() {
        let flag = event::new_focus_flag();
        event::set_focus(&flag, FocusRegion::Dropdown);
        let mut field = PillField::new(flag.clone());
        assert!(!field.has_focus());
        field.focus_input();
        assert!(field.has_focus());
    }

    #[test]
    fn collapsed_multi_field_summarizes_pills() {
        let mut field = field(Mode::Multi);
        field.set_pills(&[Item::new("a"), Item::new("b"), Item::new("c")]);
        let spans = field.pill_spans();
        assert!(spans.iter().any(|s| s.content == "+2 "));

        field.set_expanded(true);
        let spans = field.pill_spans();
        assert!(!spans.iter().any(|s| s.content.starts_with('+')));
    }
}
