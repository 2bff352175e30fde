//! Main application state and render loop.
//!
//! The App embeds a single combo box, routes keys and clicks to it and to
//! its widgets, and consumes the controller's public events. Submitted
//! items are committed here.

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use combo_core::config::UiConfig;
use combo_core::{
    ComboBox, ComboEvent, ComboOptions, Document, DropdownToggle, FocusRegion, KeyInput,
    ListView, PillInput, PointerEvent, Propagation, Region, SelectEvent, SubmitEvent,
};

use crate::action::Action;
use crate::components::dropdown_button::DropdownButton;
use crate::components::list_panel::ListPanel;
use crate::components::pill_field::PillField;
use crate::components::status_bar::StatusBarComponent;
use crate::components::Component;
use crate::event::{self, EventHandler, FocusFlag};
use crate::theme::Theme;

/// The combo box wired to its terminal collaborators.
pub type TerminalComboBox = ComboBox<ListPanel, PillField, DropdownButton>;

/// Areas computed for the last frame.
#[derive(Debug, Clone, Copy, Default)]
struct ComboLayout {
    field: Rect,
    button: Rect,
    list: Rect,
    body: Rect,
    status: Rect,
}

/// Main application state.
pub struct App {
    combo: TerminalComboBox,
    /// Public events emitted by the combo box.
    combo_events: mpsc::UnboundedReceiver<ComboEvent>,
    /// Source of document-level clicks.
    document: Document,
    /// Which region holds keyboard focus, shared with the widgets.
    focus: FocusFlag,
    status_bar: StatusBarComponent,
    layout: ComboLayout,
    tick_rate: Duration,
    should_quit: bool,
}

impl App {
    pub fn new(options: ComboOptions, ui: &UiConfig) -> Self {
        let focus = event::new_focus_flag();
        let (events_tx, combo_events) = mpsc::unbounded_channel();
        let mode = options.mode;

        let combo = ComboBox::new(
            options,
            Some(ListPanel::new(focus.clone(), ui.max_visible_rows)),
            PillField::new(focus.clone()),
            DropdownButton::new(),
            events_tx,
        );

        Self {
            combo,
            combo_events,
            document: Document::new(),
            focus,
            status_bar: StatusBarComponent::new(mode),
            layout: ComboLayout::default(),
            tick_rate: Duration::from_millis(ui.tick_rate_ms.max(10)),
            should_quit: false,
        }
    }

    pub fn combo(&self) -> &TerminalComboBox {
        &self.combo
    }

    pub fn focus(&self) -> FocusRegion {
        event::current_focus(&self.focus)
    }

    /// Run the TUI application.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Set up terminal.
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Create the action channel.
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

        let event_handler = EventHandler::new(tx, self.tick_rate, self.focus.clone());
        tokio::spawn(async move {
            event_handler.run().await;
        });

        self.attach();

        // Main loop.
        loop {
            terminal.draw(|frame| {
                self.render(frame);
            })?;
            self.after_render();

            if let Some(action) = rx.recv().await {
                self.handle_action(&action);

                if self.should_quit {
                    break;
                }
            }
        }

        self.detach();

        // Restore terminal.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Start routing document clicks to the combo box.
    pub fn attach(&mut self) {
        self.combo.attach(&self.document);
        info!("combo box attached");
    }

    pub fn detach(&mut self) {
        self.combo.detach();
        info!("combo box detached");
    }

    /// Tell the combo box a frame has been drawn.
    pub fn after_render(&mut self) {
        self.combo.on_render_complete();
    }

    /// Dispatch an action from the terminal or from a component.
    pub fn handle_action(&mut self, action: &Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::Tick => {}
            Action::SetStatus(_) => {
                self.status_bar.handle_action(action);
            }
            Action::Click { column, row } => self.handle_click(*column, *row),
            Action::Pill(event) => self.combo.handle_pill_event(event.clone()),
            _ => {
                if let Some(key) = action.combo_key() {
                    self.dispatch_key(action, key);
                }
            }
        }

        self.sync();
    }

    /// Deliver a key to the combo box root, then to the focused widget, and
    /// finally to the App unless the root stopped it. The root runs first so
    /// its focus checks see the list as it was when the key was pressed.
    fn dispatch_key(&mut self, action: &Action, key: combo_core::Key) {
        let origin = self.focus();
        let propagation = self.combo.on_key_down(KeyInput::new(key, origin));

        let follow_up = match origin {
            FocusRegion::Field => {
                self.combo.dropdown_mut().handle_action(action);
                self.combo.pill_input_mut().handle_action(action)
            }
            FocusRegion::Dropdown => {
                if matches!(action, Action::ToggleDropdown) {
                    self.combo.dropdown_mut().handle_action(action);
                }
                self.combo
                    .list_view_mut()
                    .and_then(|list| list.handle_action(action))
            }
        };
        if let Some(follow_up) = follow_up {
            self.handle_action(&follow_up);
        }

        match propagation {
            Propagation::Continue => {
                self.status_bar.handle_action(action);
            }
            Propagation::Stop => debug!(?key, "key consumed by combo box"),
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) {
        let click = PointerEvent::new(column, row);

        if region(self.layout.button).contains(&click) {
            self.combo
                .dropdown_mut()
                .handle_action(&Action::ToggleDropdown);
        } else if self.combo.dropdown().is_open() && region(self.layout.list).contains(&click) {
            let list_area = self.layout.list;
            if let Some(list) = self.combo.list_view_mut() {
                if let Some(position) = list.position_at(list_area, row) {
                    if let Some(element) = list.current_element() {
                        element.focus();
                    }
                    list.select_visible(position);
                }
            }
        } else if region(self.layout.field).contains(&click) {
            let field = self.combo.pill_input_mut();
            field.set_expanded(true);
            field.focus_input();
        }

        self.document.click(click);
    }

    /// Settle state after an action: drain collaborator notifications and
    /// the combo box's public events.
    fn sync(&mut self) {
        self.combo.poll_selection();
        self.combo.poll_pointer();

        while let Ok(event) = self.combo_events.try_recv() {
            match event {
                ComboEvent::Selected(ev) => self.on_selected(ev),
                ComboEvent::Submit(ev) => self.commit_submission(ev),
            }
        }

        // Focus cannot stay inside a hidden list.
        if self.focus() == FocusRegion::Dropdown && !self.combo.dropdown().is_open() {
            self.combo.pill_input_mut().focus_input();
        }

        self.status_bar.host = self.combo.host_state();
    }

    fn on_selected(&mut self, ev: SelectEvent) {
        let verb = if ev.item.selected {
            "Selected"
        } else {
            "Deselected"
        };
        info!(item = %ev.item.content, selected = ev.item.selected, "selection changed");
        self.set_status(format!("{verb} \"{}\"", ev.item.content));
    }

    /// Insert a proposed item where the combo box asked for it.
    fn commit_submission(&mut self, ev: SubmitEvent) {
        let SubmitEvent {
            mut items,
            index,
            value,
        } = ev;

        if items.iter().any(|item| item.content == value.content) {
            self.set_status(format!("\"{}\" already exists", value.content));
            return;
        }

        let index = index.min(items.len());
        let label = value.content.clone();
        info!(item = %label, index, "adding submitted item");
        items.insert(index, value);
        self.combo.set_items(items);

        // The proposal is spent; start the next search from scratch.
        self.combo.pill_input_mut().clear_text();
        if let Some(list) = self.combo.list_view_mut() {
            list.filter_by("");
        }
        self.set_status(format!("Added \"{label}\""));
    }

    fn set_status(&mut self, message: String) {
        self.status_bar.handle_action(&Action::SetStatus(message));
    }

    fn compute_layout(&mut self, area: Rect) {
        let field_height = self.combo.size().field_height();
        let list_height = match self.combo.list_view() {
            Some(list) if self.combo.dropdown().is_open() => list.preferred_height(),
            _ => 0,
        };

        let chunks = Layout::vertical([
            Constraint::Length(field_height), // Field + button
            Constraint::Length(list_height),  // Dropdown panel
            Constraint::Min(0),               // Selection summary
            Constraint::Length(1),            // Status bar
        ])
        .split(area);

        let row = Layout::horizontal([Constraint::Min(10), Constraint::Length(5)]).split(chunks[0]);

        self.layout = ComboLayout {
            field: row[0],
            button: row[1],
            list: chunks[1],
            body: chunks[2],
            status: chunks[3],
        };
        self.combo
            .set_bounds(region(chunks[0]).union(&region(chunks[1])));
    }

    fn render(&mut self, frame: &mut Frame) {
        self.compute_layout(frame.area());
        let layout = self.layout;

        self.combo.pill_input().render(frame, layout.field);
        self.combo.dropdown().render(frame, layout.button);
        if self.combo.dropdown().is_open() {
            if let Some(list) = self.combo.list_view() {
                list.render(frame, layout.list);
            }
        }
        self.render_summary(frame, layout.body);
        self.status_bar.render(frame, layout.status);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let pills: Vec<&str> = self
            .combo
            .pills()
            .iter()
            .map(|p| p.content.as_str())
            .collect();
        let value = self.combo.selected_value();

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(" Selection", Theme::title())),
            Line::from(vec![
                Span::styled("Selected value: ", Theme::muted()),
                Span::styled(if value.is_empty() { "none" } else { value }, Theme::normal()),
            ]),
            Line::from(vec![
                Span::styled("Pills: ", Theme::muted()),
                Span::styled(
                    if pills.is_empty() {
                        "none".to_string()
                    } else {
                        pills.join(", ")
                    },
                    Theme::normal(),
                ),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }

    /// Lay the widget out for a terminal of the given size without drawing.
    #[cfg(test)]
    fn resize(&mut self, area: Rect) {
        self.compute_layout(area);
    }
}

fn region(rect: Rect) -> Region {
    Region::new(rect.x, rect.y, rect.width, rect.height)
}
