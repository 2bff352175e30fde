//! Contracts the controller needs from the widgets it coordinates.
//!
//! The controller owns one implementation of each trait and drives them;
//! it never inspects a concrete widget tree.

use tokio::sync::mpsc;

use crate::event::SelectEvent;
use crate::item::{Item, ItemId, Mode};

/// Anything that can take keyboard focus.
pub trait Focusable {
    fn focus(&mut self);
}

/// The dropdown list: authoritative item storage, filtering and focus
/// within the list.
pub trait ListView {
    fn set_mode(&mut self, mode: Mode);

    /// Replace the item list.
    fn update_list(&mut self, items: Vec<Item>);

    /// Apply a filter. An empty string shows every item. The matching
    /// policy belongs to the implementation.
    fn filter_by(&mut self, text: &str);

    /// Currently selected items in list order, or `None` when nothing is
    /// selected.
    fn selected(&self) -> Option<Vec<Item>>;

    /// Every item, unfiltered, in list order.
    fn items(&self) -> &[Item];

    /// Clear an item's selection flag without raising a [`SelectEvent`].
    fn deselect(&mut self, id: ItemId);

    /// The element the list considers highlighted, if it has one.
    fn current_element(&mut self) -> Option<&mut dyn Focusable>;

    /// Whether there is a focusable element before the highlighted one.
    fn has_prev_element(&self) -> bool;

    /// Receiver for selection-changed notifications.
    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SelectEvent>;
}

/// The text field that also renders pill tokens.
pub trait PillInput {
    fn set_pills(&mut self, pills: &[Item]);
    fn set_placeholder(&mut self, placeholder: &str);
    fn set_display_value(&mut self, value: &str);
    fn set_mode(&mut self, mode: Mode);
    fn set_disabled(&mut self, disabled: bool);
    fn set_expanded(&mut self, expanded: bool);

    /// Move keyboard focus to the primary text control, however deep it
    /// sits inside the input.
    fn focus_input(&mut self);
}

/// The button that opens and closes the dropdown panel.
pub trait DropdownToggle {
    fn is_open(&self) -> bool;
    fn set_disabled(&mut self, disabled: bool);
    fn close_dropdown(&mut self);
}
