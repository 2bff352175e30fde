//! Dropdown list: owns the items, filters them and reports selection changes.
//!
//! Filtering is a case-insensitive substring match. The highlighted row and
//! "previous element" are both defined over the filtered rows, in list order.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use combo_core::{FocusRegion, Focusable, Item, ItemId, ListView, Mode, SelectEvent};

use crate::action::Action;
use crate::components::Component;
use crate::event::{self, FocusFlag};
use crate::theme::Theme;

/// Focus handle for the highlighted row.
pub struct RowCursor {
    focus: FocusFlag,
}

impl Focusable for RowCursor {
    fn focus(&mut self) {
        event::set_focus(&self.focus, FocusRegion::Dropdown);
    }
}

pub struct ListPanel {
    items: Vec<Item>,
    mode: Mode,
    /// Current filter text.
    filter: String,
    /// Indices into `items` that pass the filter.
    visible: Vec<usize>,
    /// Highlighted position within `visible`.
    highlighted: usize,
    cursor: RowCursor,
    /// Rows shown before scrolling.
    max_rows: u16,
    tx: Option<mpsc::UnboundedSender<SelectEvent>>,
}

impl ListPanel {
    pub fn new(focus: FocusFlag, max_rows: u16) -> Self {
        Self {
            items: Vec::new(),
            mode: Mode::default(),
            filter: String::new(),
            visible: Vec::new(),
            highlighted: 0,
            cursor: RowCursor { focus },
            max_rows: max_rows.clamp(1, u16::MAX - 2),
            tx: None,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Items that pass the current filter, in list order.
    pub fn visible_items(&self) -> impl Iterator<Item = &Item> {
        self.visible.iter().map(|&i| &self.items[i])
    }

    /// Height the panel wants, borders included.
    pub fn preferred_height(&self) -> u16 {
        let rows = self.visible.len().clamp(1, usize::from(self.max_rows)) as u16;
        rows.saturating_add(2)
    }

    pub fn move_next(&mut self) {
        if self.highlighted + 1 < self.visible.len() {
            self.highlighted += 1;
        }
    }

    pub fn move_prev(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    /// Select (single) or toggle (multi) the row at a visible position and
    /// notify subscribers.
    pub fn select_visible(&mut self, position: usize) {
        let Some(&index) = self.visible.get(position) else {
            return;
        };
        self.highlighted = position;

        match self.mode {
            Mode::Single => {
                for item in &mut self.items {
                    item.selected = false;
                }
                self.items[index].selected = true;
            }
            Mode::Multi => {
                self.items[index].selected = !self.items[index].selected;
            }
        }

        let item = self.items[index].clone();
        debug!(item = %item.content, selected = item.selected, "list selection changed");
        if let Some(tx) = &self.tx {
            if tx.send(SelectEvent { item }).is_err() {
                trace!("selection subscriber gone");
            }
        }
    }

    /// Visible position of the row drawn at terminal `row`, given the area
    /// the panel was rendered into.
    pub fn position_at(&self, area: Rect, row: u16) -> Option<usize> {
        let top = area.y + 1;
        let rows = area.height.saturating_sub(2) as usize;
        if row < top || (row - top) as usize >= rows {
            return None;
        }
        let position = self.scroll_offset(rows) + (row - top) as usize;
        (position < self.visible.len()).then_some(position)
    }

    fn scroll_offset(&self, rows: usize) -> usize {
        if rows == 0 || self.highlighted < rows {
            0
        } else {
            self.highlighted + 1 - rows
        }
    }

    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.content.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        if self.highlighted >= self.visible.len() {
            self.highlighted = self.visible.len().saturating_sub(1);
        }
    }

    /// Single mode allows one selected item; keep the first.
    fn enforce_mode(&mut self) {
        if self.mode != Mode::Single {
            return;
        }
        let mut seen = false;
        for item in &mut self.items {
            if item.selected {
                if seen {
                    item.selected = false;
                }
                seen = true;
            }
        }
    }

    fn has_focus(&self) -> bool {
        event::current_focus(&self.cursor.focus) == FocusRegion::Dropdown
    }
}

impl ListView for ListPanel {
    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.enforce_mode();
    }

    fn update_list(&mut self, items: Vec<Item>) {
        self.items = items;
        self.enforce_mode();
        self.refilter();
    }

    fn filter_by(&mut self, text: &str) {
        if self.filter != text {
            self.filter = text.to_string();
            self.highlighted = 0;
        }
        self.refilter();
    }

    fn selected(&self) -> Option<Vec<Item>> {
        let selected: Vec<Item> = self.items.iter().filter(|i| i.selected).cloned().collect();
        if selected.is_empty() {
            None
        } else {
            Some(selected)
        }
    }

    fn items(&self) -> &[Item] {
        &self.items
    }

    fn deselect(&mut self, id: ItemId) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.selected = false;
        }
    }

    fn current_element(&mut self) -> Option<&mut dyn Focusable> {
        if self.visible.is_empty() {
            return None;
        }
        Some(&mut self.cursor)
    }

    fn has_prev_element(&self) -> bool {
        self.highlighted > 0
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SelectEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.tx = Some(tx);
        rx
    }
}

impl Component for ListPanel {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::ArrowDown => self.move_next(),
            Action::ArrowUp => self.move_prev(),
            Action::Enter => self.select_visible(self.highlighted),
            _ => {}
        }
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let focused = self.has_focus();
        let block = Block::default()
            .title(format!(" {}/{} ", self.visible.len(), self.items.len()))
            .title_style(Theme::muted())
            .borders(Borders::ALL)
            .border_style(if focused {
                Theme::focused_border()
            } else {
                Theme::border()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.visible.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No matches", Theme::dim())),
                inner,
            );
            return;
        }

        let rows = inner.height as usize;
        let offset = self.scroll_offset(rows);

        let list_items: Vec<ListItem> = self
            .visible
            .iter()
            .enumerate()
            .skip(offset)
            .take(rows)
            .map(|(pos, &index)| {
                let item = &self.items[index];
                let marker = match (self.mode, item.selected) {
                    (Mode::Multi, true) => "[x] ",
                    (Mode::Multi, false) => "[ ] ",
                    (Mode::Single, true) => "● ",
                    (Mode::Single, false) => "  ",
                };
                let row_style = if pos == self.highlighted && focused {
                    Theme::highlight()
                } else if item.selected {
                    Theme::selected()
                } else {
                    Theme::normal()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Theme::check()),
                    Span::styled(item.content.as_str(), row_style),
                ]))
            })
            .collect();

        frame.render_widget(List::new(list_items), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combo_core::item::items_from_labels;

    fn panel(mode: Mode) -> (ListPanel, mpsc::UnboundedReceiver<SelectEvent>, FocusFlag) {
        let focus = event::new_focus_flag();
        let mut panel = ListPanel::new(focus.clone(), 4);
        panel.set_mode(mode);
        let rx = panel.subscribe();
        panel.update_list(items_from_labels(["Abacus", "Byte", "Computer", "Digital"]));
        (panel, rx, focus)
    }

    fn selected_labels(panel: &ListPanel) -> Vec<String> {
        panel
            .selected()
            .unwrap_or_default()
            .into_iter()
            .map(|i| i.content)
            .collect()
    }

    #[test]
    fn single_mode_keeps_one_selection() {
        let (mut panel, mut rx, _) = panel(Mode::Single);
        for pos in [0, 2, 2, 1, 3] {
            panel.select_visible(pos);
            assert!(panel.items().iter().filter(|i| i.selected).count() <= 1);
        }
        assert_eq!(selected_labels(&panel), vec!["Digital"]);

        let mut received = 0;
        while let Ok(ev) = rx.try_recv() {
            assert!(ev.item.selected);
            received += 1;
        }
        assert_eq!(received, 5);
    }

    #[test]
    fn multi_mode_toggles() {
        let (mut panel, mut rx, _) = panel(Mode::Multi);
        panel.select_visible(2);
        panel.select_visible(0);
        assert_eq!(selected_labels(&panel), vec!["Abacus", "Computer"]);

        panel.select_visible(2);
        assert_eq!(selected_labels(&panel), vec!["Abacus"]);

        let states: Vec<bool> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.item.selected)
            .collect();
        assert_eq!(states, vec![true, true, false]);
    }

    #[test]
    fn nothing_selected_reports_none() {
        let (panel, _, _) = panel(Mode::Multi);
        assert!(panel.selected().is_none());
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let (mut panel, _, _) = panel(Mode::Single);
        panel.filter_by("T");
        let visible: Vec<&str> = panel.visible_items().map(|i| i.content.as_str()).collect();
        assert_eq!(visible, vec!["Byte", "Computer", "Digital"]);

        panel.filter_by("");
        assert_eq!(panel.visible_items().count(), 4);
    }

    #[test]
    fn selecting_in_filtered_view_targets_the_visible_row() {
        let (mut panel, _, _) = panel(Mode::Single);
        panel.filter_by("ital");
        panel.select_visible(0);
        assert_eq!(selected_labels(&panel), vec!["Digital"]);
    }

    #[test]
    fn deselect_is_silent() {
        let (mut panel, mut rx, _) = panel(Mode::Single);
        panel.select_visible(1);
        let _ = rx.try_recv();

        let id = panel.items()[1].id;
        panel.deselect(id);
        assert!(panel.selected().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn previous_element_follows_filtered_order() {
        let (mut panel, _, _) = panel(Mode::Multi);
        assert!(!panel.has_prev_element());
        panel.move_next();
        assert!(panel.has_prev_element());

        panel.filter_by("Dig");
        assert!(!panel.has_prev_element());
        panel.move_prev();
        assert!(!panel.has_prev_element());
    }

    #[test]
    fn current_element_moves_focus_into_list() {
        let (mut panel, _, focus) = panel(Mode::Multi);
        panel.current_element().unwrap().focus();
        assert_eq!(event::current_focus(&focus), FocusRegion::Dropdown);

        panel.filter_by("zzz");
        assert!(panel.current_element().is_none());
    }

    #[test]
    fn switching_to_single_keeps_first_selection() {
        let (mut panel, _, _) = panel(Mode::Multi);
        panel.select_visible(3);
        panel.select_visible(1);
        panel.set_mode(Mode::Single);
        assert_eq!(selected_labels(&panel), vec!["Byte"]);
    }

    #[test]
    fn replacing_items_keeps_filter() {
        let (mut panel, _, _) = panel(Mode::Multi);
        panel.filter_by("a");
        panel.update_list(items_from_labels(["Alpha", "Beta", "Gamma", "Pi"]));
        assert_eq!(panel.visible_items().count(), 3);
        assert_eq!(panel.filter(), "a");
    }

    #[test]
    fn preferred_height_tolerates_huge_row_limit() {
        let mut panel = ListPanel::new(event::new_focus_flag(), u16::MAX);
        panel.update_list(items_from_labels(["Abacus", "Byte", "Computer", "Digital"]));
        assert_eq!(panel.preferred_height(), 6);

        let labels: Vec<String> = (0..70_000).map(|i| i.to_string()).collect();
        panel.update_list(items_from_labels(labels));
        assert_eq!(panel.preferred_height(), u16::MAX);
    }

    #[test]
    fn position_at_accounts_for_border_and_scroll() {
        let (mut panel, _, _) = panel(Mode::Multi);
        let area = Rect::new(0, 3, 20, 4); // two visible rows
        assert_eq!(panel.position_at(area, 3), None);
        assert_eq!(panel.position_at(area, 4), Some(0));
        assert_eq!(panel.position_at(area, 5), Some(1));
        assert_eq!(panel.position_at(area, 6), None);

        panel.move_next();
        panel.move_next();
        assert_eq!(panel.position_at(area, 4), Some(1));
    }
}
