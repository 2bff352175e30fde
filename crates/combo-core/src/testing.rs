//! Recording collaborators for controller tests.

use tokio::sync::mpsc;

use crate::collab::{DropdownToggle, Focusable, ListView, PillInput};
use crate::event::SelectEvent;
use crate::item::{Item, ItemId, Mode};

#[derive(Debug, Default)]
pub struct MockCursor {
    pub focused: bool,
}

impl Focusable for MockCursor {
    fn focus(&mut self) {
        self.focused = true;
    }
}

#[derive(Default)]
pub struct MockList {
    pub items: Vec<Item>,
    pub mode: Mode,
    pub filters: Vec<String>,
    pub highlighted: Option<usize>,
    pub cursor: MockCursor,
    pub subscriptions: usize,
    tx: Option<mpsc::UnboundedSender<SelectEvent>>,
}

impl MockList {
    pub fn last_filter(&self) -> Option<&str> {
        self.filters.last().map(String::as_str)
    }

    /// Simulate the user picking the item at `index`.
    pub fn pick(&mut self, index: usize) {
        let now_selected = match self.mode {
            Mode::Single => true,
            Mode::Multi => !self.items[index].selected,
        };
        if self.mode == Mode::Single {
            for item in &mut self.items {
                item.selected = false;
            }
        }
        self.items[index].selected = now_selected;
        if let Some(tx) = &self.tx {
            let _ = tx.send(SelectEvent {
                item: self.items[index].clone(),
            });
        }
    }
}

impl ListView for MockList {
    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn update_list(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    fn filter_by(&mut self, text: &str) {
        self.filters.push(text.to_string());
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
        self.highlighted?;
        Some(&mut self.cursor)
    }

    fn has_prev_element(&self) -> bool {
        self.highlighted.is_some_and(|i| i > 0)
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SelectEvent> {
        self.subscriptions += 1;
        let (tx, rx) = mpsc::unbounded_channel();
        self.tx = Some(tx);
        rx
    }
}

#[derive(Debug, Default)]
pub struct MockPills {
    pub pills: Vec<Item>,
    pub placeholder: String,
    pub display_value: String,
    pub mode: Mode,
    pub disabled: bool,
    pub expanded: bool,
    pub focus_count: usize,
}

impl PillInput for MockPills {
    fn set_pills(&mut self, pills: &[Item]) {
        self.pills = pills.to_vec();
    }

    fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    fn set_display_value(&mut self, value: &str) {
        self.display_value = value.to_string();
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
        self.focus_count += 1;
    }
}

#[derive(Debug, Default)]
pub struct MockDropdown {
    pub open: bool,
    pub disabled: bool,
    pub close_calls: usize,
}

impl DropdownToggle for MockDropdown {
    fn is_open(&self) -> bool {
        self.open
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn close_dropdown(&mut self) {
        self.close_calls += 1;
        self.open = false;
    }
}
