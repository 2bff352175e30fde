//! The combo box controller.
//!
//! Mediates between a [`ListView`], a [`PillInput`] and a
//! [`DropdownToggle`]: turns their events into selection changes, filter
//! commands and focus moves, and publishes [`ComboEvent`]s to the embedder.

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::collab::{DropdownToggle, ListView, PillInput};
use crate::config::ComboOptions;
use crate::event::{
    ComboEvent, FocusRegion, HostState, Key, KeyInput, PillInputEvent, Propagation, SelectEvent,
    SubmitEvent, SubmitRequest,
};
use crate::item::{Item, Mode, Size};
use crate::pointer::{Document, PointerEvent, PointerSubscription, Region};

pub struct ComboBox<L, P, D> {
    placeholder: String,
    mode: Mode,
    size: Size,
    disabled: bool,

    /// Absent list view degrades the widget to a plain pill input.
    list_view: Option<L>,
    pill_input: P,
    dropdown: D,

    /// Outbound public events.
    events: mpsc::UnboundedSender<ComboEvent>,
    /// Selection notifications from the list view, once subscribed.
    selections: Option<mpsc::UnboundedReceiver<SelectEvent>>,

    pills: Vec<Item>,
    selected_value: String,

    /// Document-level click registration, held while attached.
    pointer: Option<PointerSubscription>,
    /// Area covered by the widget's rendered subtree.
    bounds: Region,
    /// ArrowDown asked to move focus into the list after the next render.
    focus_pending: bool,
}

impl<L, P, D> ComboBox<L, P, D>
where
    L: ListView,
    P: PillInput,
    D: DropdownToggle,
{
    /// Bind the collaborators and run first composition.
    pub fn new(
        options: ComboOptions,
        list_view: Option<L>,
        pill_input: P,
        dropdown: D,
        events: mpsc::UnboundedSender<ComboEvent>,
    ) -> Self {
        let ComboOptions {
            items,
            placeholder,
            mode,
            size,
            disabled,
        } = options;

        let mut combo = Self {
            placeholder,
            mode,
            size,
            disabled,
            list_view,
            pill_input,
            dropdown,
            events,
            selections: None,
            pills: Vec::new(),
            selected_value: String::new(),
            pointer: None,
            bounds: Region::default(),
            focus_pending: false,
        };

        combo.pill_input.set_placeholder(&combo.placeholder);
        combo.pill_input.set_display_value("");
        combo.set_items(items);
        combo
    }

    // ── Public state ────────────────────────────────────────

    pub fn pills(&self) -> &[Item] {
        &self.pills
    }

    pub fn selected_value(&self) -> &str {
        &self.selected_value
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn host_state(&self) -> HostState {
        HostState {
            expanded: self.dropdown.is_open(),
            disabled: self.disabled,
        }
    }

    pub fn list_view(&self) -> Option<&L> {
        self.list_view.as_ref()
    }

    pub fn list_view_mut(&mut self) -> Option<&mut L> {
        self.list_view.as_mut()
    }

    pub fn pill_input(&self) -> &P {
        &self.pill_input
    }

    pub fn pill_input_mut(&mut self) -> &mut P {
        &mut self.pill_input
    }

    pub fn dropdown(&self) -> &D {
        &self.dropdown
    }

    pub fn dropdown_mut(&mut self) -> &mut D {
        &mut self.dropdown
    }

    // ── Configuration ───────────────────────────────────────

    /// Replace the content list and re-propagate settings.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.dropdown.set_disabled(self.disabled);
        self.pill_input.set_mode(self.mode);
        self.pill_input.set_disabled(self.disabled);

        if let Some(list) = self.list_view.as_mut() {
            list.set_mode(self.mode);
            if self.selections.is_none() {
                self.selections = Some(list.subscribe());
            }
            list.update_list(items);
        }

        self.recompute_pills();
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.pill_input.set_mode(mode);
        if let Some(list) = self.list_view.as_mut() {
            list.set_mode(mode);
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.dropdown.set_disabled(disabled);
        self.pill_input.set_disabled(disabled);
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
        self.pill_input.set_placeholder(&self.placeholder);
    }

    // ── Selection / pills ───────────────────────────────────

    /// Rebuild the pill set from the list view's current selection.
    pub fn recompute_pills(&mut self) {
        let Some(list) = self.list_view.as_ref() else {
            return;
        };
        self.pills = list.selected().unwrap_or_default();
        self.pill_input.set_pills(&self.pills);
    }

    /// React to the pill input's text changing.
    pub fn on_search(&mut self, text: &str) {
        if let Some(list) = self.list_view.as_mut() {
            debug!(filter = text, "filtering list");
            list.filter_by(text);
        }

        if text.is_empty() {
            self.set_selected_value(String::new());
        } else {
            self.dropdown.close_dropdown();
        }

        if self.mode != Mode::Single {
            return;
        }
        let Some(list) = self.list_view.as_mut() else {
            return;
        };

        if list.items().iter().any(|item| item.content == text) {
            // An exact match re-confirms a valid value; it does not select it.
            list.filter_by("");
        } else if let Some(current) = list.selected().and_then(|s| s.into_iter().next()) {
            debug!(item = %current.content, "search text no longer matches, deselecting");
            list.deselect(current.id);
            self.set_selected_value(String::new());
            self.recompute_pills();
        }
    }

    /// Drain pending selection notifications from the list view.
    pub fn poll_selection(&mut self) {
        let Some(rx) = self.selections.as_mut() else {
            return;
        };
        let mut pending = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            pending.push(ev);
        }
        for ev in pending {
            self.on_select(ev);
        }
    }

    /// Handle one selection change reported by the list view.
    pub fn on_select(&mut self, ev: SelectEvent) {
        if self.mode == Mode::Single {
            let value = if ev.item.selected {
                ev.item.content.clone()
            } else {
                String::new()
            };
            self.set_selected_value(value);
            self.pill_input.focus_input();
            self.dropdown.close_dropdown();
        }
        self.recompute_pills();

        self.emit(ComboEvent::Selected(ev));
        if let Some(list) = self.list_view.as_mut() {
            list.filter_by("");
        }
    }

    /// Propose a new item. Insertion is left to the embedder.
    pub fn on_submit(&mut self, request: SubmitRequest) {
        let items = self
            .list_view
            .as_ref()
            .map(|list| list.items().to_vec())
            .unwrap_or_default();

        let index = request
            .after
            .and_then(|after| items.iter().position(|item| item.id == after))
            .map(|pos| pos + 1)
            .unwrap_or(0);

        debug!(value = %request.value, index, "proposing new item");
        self.emit(ComboEvent::Submit(SubmitEvent {
            items,
            index,
            value: Item::new(request.value),
        }));
    }

    /// Dispatch an event raised by the pill input.
    pub fn handle_pill_event(&mut self, event: PillInputEvent) {
        match event {
            PillInputEvent::UpdatePills => self.recompute_pills(),
            PillInputEvent::Search(text) => self.on_search(&text),
            PillInputEvent::Submit(request) => self.on_submit(request),
            PillInputEvent::RemovePill(id) => {
                if let Some(list) = self.list_view.as_mut() {
                    list.deselect(id);
                }
                self.recompute_pills();
            }
        }
    }

    // ── Keyboard & focus ────────────────────────────────────

    /// Handle a key-down that reached the widget root.
    pub fn on_key_down(&mut self, input: KeyInput) -> Propagation {
        match (input.key, input.origin) {
            (Key::Escape, _) => {
                debug!("escape, closing dropdown");
                self.dropdown.close_dropdown();
                Propagation::Continue
            }
            (Key::ArrowDown, FocusRegion::Field) => {
                self.focus_pending = true;
                Propagation::Stop
            }
            (Key::ArrowUp, FocusRegion::Dropdown) => {
                let at_top = self
                    .list_view
                    .as_ref()
                    .is_some_and(|list| !list.has_prev_element());
                if at_top {
                    self.pill_input.focus_input();
                }
                Propagation::Continue
            }
            _ => Propagation::Continue,
        }
    }

    /// Signal from the rendering layer that a frame has been drawn.
    /// Runs the deferred ArrowDown focus move, if one is armed.
    pub fn on_render_complete(&mut self) {
        if !std::mem::take(&mut self.focus_pending) {
            return;
        }
        if !self.dropdown.is_open() {
            trace!("dropdown closed before focus move, skipping");
            return;
        }
        let Some(list) = self.list_view.as_mut() else {
            return;
        };
        match list.current_element() {
            Some(element) => element.focus(),
            None => trace!("no current list element to focus"),
        }
    }

    pub fn focus_pending(&self) -> bool {
        self.focus_pending
    }

    // ── Document attachment ─────────────────────────────────

    /// Start listening for clicks anywhere in the document.
    pub fn attach(&mut self, document: &Document) {
        self.pointer = Some(document.subscribe());
    }

    /// Stop listening for document clicks.
    pub fn detach(&mut self) {
        self.pointer = None;
    }

    pub fn is_attached(&self) -> bool {
        self.pointer.is_some()
    }

    /// Record the area covered by the widget as last rendered.
    pub fn set_bounds(&mut self, bounds: Region) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Region {
        self.bounds
    }

    /// Process clicks delivered since the last poll.
    pub fn poll_pointer(&mut self) {
        let Some(sub) = self.pointer.as_mut() else {
            return;
        };
        for event in sub.drain() {
            self.on_document_click(event);
        }
    }

    fn on_document_click(&mut self, event: PointerEvent) {
        if self.bounds.contains(&event) {
            return;
        }
        trace!(?event, "click outside combo box");
        self.pill_input.set_expanded(false);
        if self.dropdown.is_open() {
            self.dropdown.close_dropdown();
        }
    }

    // ── Helpers ─────────────────────────────────────────────

    fn set_selected_value(&mut self, value: String) {
        self.selected_value = value;
        self.pill_input.set_display_value(&self.selected_value);
    }

    fn emit(&self, event: ComboEvent) {
        if self.events.send(event).is_err() {
            debug!("combo event receiver dropped");
        }
    }
}
