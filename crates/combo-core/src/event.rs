//! Messages flowing into and out of the combo box controller.

use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemId};

/// Raised by the list view whenever an item's selection flag changes.
/// `item` carries the new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectEvent {
    pub item: Item,
}

/// Explicit submission from the pill input, typically Enter on text
/// that matches no item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub value: String,
    /// Item the new entry should follow, if any.
    pub after: Option<ItemId>,
}

/// Proposal to insert a new item. The embedder decides whether to commit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitEvent {
    /// The list view's items at the time of submission.
    pub items: Vec<Item>,
    /// Insertion position within `items`.
    pub index: usize,
    /// Candidate item, never selected.
    pub value: Item,
}

/// Public events emitted to the widget's consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboEvent {
    Selected(SelectEvent),
    Submit(SubmitEvent),
}

/// Events raised by the pill input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PillInputEvent {
    /// Recompute pills now.
    UpdatePills,
    /// The text in the field changed.
    Search(String),
    Submit(SubmitRequest),
    /// The user dismissed a pill token.
    RemovePill(ItemId),
}

/// Keys the controller distinguishes. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowDown,
    ArrowUp,
    Enter,
    Backspace,
    Tab,
    Char(char),
    Other,
}

/// Where keyboard focus sat when a key was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FocusRegion {
    /// The text field, or anywhere in the widget outside the dropdown.
    #[default]
    Field,
    /// Inside the dropdown panel.
    Dropdown,
}

/// A key-down that bubbled up to the widget root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub origin: FocusRegion,
}

impl KeyInput {
    pub fn new(key: Key, origin: FocusRegion) -> Self {
        Self { key, origin }
    }
}

/// Whether an event should keep bubbling to outer containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// State reflected on the widget host for accessibility tooling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostState {
    /// Mirrors the dropdown toggle's open flag.
    pub expanded: bool,
    pub disabled: bool,
}
