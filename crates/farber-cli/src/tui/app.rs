//! Application state for the TUI

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::debug;

use farber_core::view::{Control, FieldKind, Row};
use farber_core::{Effect, Interaction, Router, Toasts};

/// How long the loading splash stays up unless a key dismisses it
pub const LOADER_FOR: Duration = Duration::from_millis(2200);

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Sidebar,
    Controls,
    Form,
    Table,
}

impl ActivePane {
    /// Move to the next pane (wrapping)
    pub fn next(self) -> Self {
        match self {
            ActivePane::Sidebar => ActivePane::Controls,
            ActivePane::Controls => ActivePane::Form,
            ActivePane::Form => ActivePane::Table,
            ActivePane::Table => ActivePane::Sidebar,
        }
    }

    /// Move to the previous pane (wrapping)
    pub fn prev(self) -> Self {
        match self {
            ActivePane::Sidebar => ActivePane::Table,
            ActivePane::Controls => ActivePane::Sidebar,
            ActivePane::Form => ActivePane::Controls,
            ActivePane::Table => ActivePane::Form,
        }
    }
}

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the selected field or search box
    Editing,
}

/// A confirmation the user has not answered yet
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirm {
    pub prompt: String,
    pub then: Interaction,
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    pub router: Router,
    pub toasts: Toasts,
    pub active_pane: ActivePane,
    pub input_mode: InputMode,
    /// Highlighted sidebar entry
    pub sidebar_index: usize,
    pub control_index: usize,
    /// Index into the visible (non-hidden) form fields
    pub field_index: usize,
    pub row_index: usize,
    pub confirm: Option<PendingConfirm>,
    pub show_help: bool,
    loader_started: Instant,
    loading: bool,
}

impl App {
    /// Start the router on its initial section
    pub fn new(mut router: Router) -> Result<Self> {
        router.start()?;
        let sidebar_index = router
            .sidebar()
            .iter()
            .position(|e| e.active)
            .unwrap_or(0);

        Ok(Self {
            should_quit: false,
            router,
            toasts: Toasts::new(),
            active_pane: ActivePane::Sidebar,
            input_mode: InputMode::Normal,
            sidebar_index,
            control_index: 0,
            field_index: 0,
            row_index: 0,
            confirm: None,
            show_help: false,
            loader_started: Instant::now(),
            loading: true,
        })
    }

    /// Advance timers: end the splash and drop expired toasts
    pub fn tick(&mut self, now: Instant) {
        if self.loading && now.saturating_duration_since(self.loader_started) >= LOADER_FOR {
            self.loading = false;
        }
        self.toasts.prune(now);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn dismiss_loader(&mut self) {
        self.loading = false;
    }

    /// Whether `pane` has anything to focus in the current section
    pub fn has_pane(&self, pane: ActivePane) -> bool {
        let container = self.router.container();
        match pane {
            ActivePane::Sidebar => true,
            ActivePane::Controls => !container.controls().is_empty(),
            ActivePane::Form => !self.visible_fields().is_empty(),
            ActivePane::Table => container.table().is_some(),
        }
    }

    pub fn next_pane(&mut self) {
        let mut pane = self.active_pane.next();
        while !self.has_pane(pane) {
            pane = pane.next();
        }
        self.active_pane = pane;
    }

    pub fn prev_pane(&mut self) {
        let mut pane = self.active_pane.prev();
        while !self.has_pane(pane) {
            pane = pane.prev();
        }
        self.active_pane = pane;
    }

    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Sidebar => self.sidebar_index = self.sidebar_index.saturating_sub(1),
            ActivePane::Controls => self.control_index = self.control_index.saturating_sub(1),
            ActivePane::Form => self.field_index = self.field_index.saturating_sub(1),
            ActivePane::Table => self.row_index = self.row_index.saturating_sub(1),
        }
    }

    pub fn move_down(&mut self) {
        let (index, len) = match self.active_pane {
            ActivePane::Sidebar => (&mut self.sidebar_index, self.router.sidebar().len()),
            ActivePane::Controls => (
                &mut self.control_index,
                self.router.container().controls().len(),
            ),
            ActivePane::Form => {
                let len = self.visible_fields().len();
                (&mut self.field_index, len)
            }
            ActivePane::Table => {
                let len = self.rows().len();
                (&mut self.row_index, len)
            }
        };
        if *index + 1 < len {
            *index += 1;
        }
    }

    /// Open the highlighted sidebar section
    pub fn open_selected_section(&mut self) {
        let Some(section) = self
            .router
            .sidebar()
            .get(self.sidebar_index)
            .map(|e| e.section)
        else {
            return;
        };
        self.open_section(section);
    }

    /// Open the `n`th section (1-based) from the sidebar
    pub fn open_section_number(&mut self, n: usize) {
        if n == 0 || n > self.router.sidebar().len() {
            return;
        }
        self.sidebar_index = n - 1;
        self.open_selected_section();
    }

    fn open_section(&mut self, section: &str) {
        if self.router.navigate_to(section).is_err() {
            return;
        }
        self.control_index = 0;
        self.field_index = 0;
        self.row_index = 0;
        self.input_mode = InputMode::Normal;
        self.active_pane = ActivePane::Sidebar;
    }

    /// Send an interaction to the current module
    pub fn dispatch(&mut self, interaction: Interaction) {
        debug!(?interaction, "Dispatching");
        match self.router.dispatch(interaction, &mut self.toasts) {
            Effect::None => {}
            Effect::Confirm { prompt, then } => {
                self.confirm = Some(PendingConfirm { prompt, then });
            }
        }
        self.clamp_indices();
    }

    /// Accept the pending confirmation
    pub fn accept_confirm(&mut self) {
        if let Some(pending) = self.confirm.take() {
            self.dispatch(pending.then);
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
    }

    /// Indexes of the form fields that are drawn
    pub fn visible_fields(&self) -> Vec<usize> {
        self.router
            .container()
            .form()
            .map(|form| {
                form.fields
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| f.kind != FieldKind::Hidden)
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn rows(&self) -> &[Row] {
        self.router
            .container()
            .table()
            .map(|t| t.rows.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.rows().get(self.row_index)
    }

    fn selected_control(&self) -> Option<&Control> {
        self.router.container().controls().get(self.control_index)
    }

    fn selected_field_kind(&self) -> Option<FieldKind> {
        let index = *self.visible_fields().get(self.field_index)?;
        let form = self.router.container().form()?;
        Some(form.fields[index].kind)
    }

    /// Enter on the focused pane
    pub fn activate(&mut self) {
        match self.active_pane {
            ActivePane::Sidebar => {
                self.open_selected_section();
                if self.has_pane(ActivePane::Controls)
                    || self.has_pane(ActivePane::Form)
                    || self.has_pane(ActivePane::Table)
                {
                    self.next_pane();
                }
            }
            ActivePane::Controls => match self.selected_control() {
                Some(Control::Search { .. }) => self.input_mode = InputMode::Editing,
                Some(Control::Select { .. }) => self.cycle_option(true),
                None => {}
            },
            ActivePane::Form => match self.selected_field_kind() {
                Some(FieldKind::Checkbox) => self.toggle_checkbox(),
                Some(_) => self.input_mode = InputMode::Editing,
                None => {}
            },
            ActivePane::Table => {}
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Type a character into the field or search box being edited
    pub fn input_char(&mut self, c: char) {
        self.edit_value(|value| value.push(c));
    }

    pub fn backspace(&mut self) {
        self.edit_value(|value| {
            value.pop();
        });
    }

    fn edit_value(&mut self, edit: impl FnOnce(&mut String)) {
        match self.active_pane {
            ActivePane::Controls => {
                let Some(Control::Search { value, .. }) = self.selected_control() else {
                    return;
                };
                let mut value = value.clone();
                edit(&mut value);
                self.dispatch(Interaction::Search(value));
            }
            ActivePane::Form => {
                let Some(&index) = self.visible_fields().get(self.field_index) else {
                    return;
                };
                if let Some(form) = self.router.container_mut().form_mut() {
                    edit(&mut form.fields[index].value);
                }
            }
            _ => {}
        }
    }

    /// Move a select control to its next (or previous) option
    pub fn cycle_option(&mut self, forward: bool) {
        let Some(Control::Select {
            id,
            options,
            selected,
            ..
        }) = self.selected_control()
        else {
            return;
        };
        if options.is_empty() {
            return;
        }

        let current = options
            .iter()
            .position(|o| &o.value == selected)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        let interaction = Interaction::select(*id, options[next].value.clone());
        self.dispatch(interaction);
    }

    pub fn toggle_checkbox(&mut self) {
        let Some(&index) = self.visible_fields().get(self.field_index) else {
            return;
        };
        if let Some(form) = self.router.container_mut().form_mut() {
            let field = &mut form.fields[index];
            if field.kind == FieldKind::Checkbox {
                field.value = if field.is_checked() {
                    String::new()
                } else {
                    "true".to_string()
                };
            }
        }
    }

    pub fn submit_form(&mut self) {
        let Some(data) = self.router.container().form().map(|f| f.data()) else {
            return;
        };
        self.input_mode = InputMode::Normal;
        self.dispatch(Interaction::Submit(data));
    }

    pub fn reset_form(&mut self) {
        if self.router.container().form().is_some() {
            self.input_mode = InputMode::Normal;
            self.dispatch(Interaction::ResetForm);
        }
    }

    /// Trigger the selected row's action bound to `key`
    ///
    /// Returns whether an action matched.
    pub fn row_action(&mut self, key: char) -> bool {
        let Some(row) = self.selected_row() else {
            return false;
        };
        let Some(action) = row.actions.iter().find(|a| a.key == key) else {
            return false;
        };
        let interaction = Interaction::Row {
            id: row.id,
            command: action.command.clone(),
        };
        let edits = matches!(action.command, farber_core::view::RowCommand::Edit);

        self.dispatch(interaction);
        if edits && self.has_pane(ActivePane::Form) {
            self.active_pane = ActivePane::Form;
            self.field_index = 0;
        }
        true
    }

    fn clamp_indices(&mut self) {
        let controls = self.router.container().controls().len();
        let fields = self.visible_fields().len();
        let rows = self.rows().len();
        self.control_index = self.control_index.min(controls.saturating_sub(1));
        self.field_index = self.field_index.min(fields.saturating_sub(1));
        self.row_index = self.row_index.min(rows.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farber_core::{build_router, KeyValueStore, MemoryNamespace};
    use std::rc::Rc;

    fn app(section: &str) -> App {
        let namespace: Rc<dyn KeyValueStore> = Rc::new(MemoryNamespace::new());
        App::new(build_router(namespace, section)).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        app.activate();
        for c in text.chars() {
            app.input_char(c);
        }
        app.stop_editing();
    }

    #[test]
    fn test_active_pane_next() {
        assert_eq!(ActivePane::Sidebar.next(), ActivePane::Controls);
        assert_eq!(ActivePane::Controls.next(), ActivePane::Form);
        assert_eq!(ActivePane::Form.next(), ActivePane::Table);
        assert_eq!(ActivePane::Table.next(), ActivePane::Sidebar);
    }

    #[test]
    fn test_active_pane_prev() {
        assert_eq!(ActivePane::Sidebar.prev(), ActivePane::Table);
        assert_eq!(ActivePane::Controls.prev(), ActivePane::Sidebar);
        assert_eq!(ActivePane::Form.prev(), ActivePane::Controls);
        assert_eq!(ActivePane::Table.prev(), ActivePane::Form);
    }

    #[test]
    fn test_dashboard_only_has_sidebar() {
        let mut app = app("dashboard");
        assert_eq!(app.router.current_section(), "dashboard");
        assert_eq!(app.sidebar_index, 0);

        app.next_pane();
        assert_eq!(app.active_pane, ActivePane::Sidebar);
    }

    #[test]
    fn test_loader_ends_after_timeout() {
        let mut app = app("dashboard");
        assert!(app.is_loading());

        app.tick(app.loader_started + Duration::from_millis(2199));
        assert!(app.is_loading());
        app.tick(app.loader_started + LOADER_FOR);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_open_section_by_number() {
        let mut app = app("dashboard");
        app.open_section_number(2);
        assert_eq!(app.router.current_section(), "budgets");
        assert_eq!(app.sidebar_index, 1);

        app.open_section_number(99);
        assert_eq!(app.router.current_section(), "budgets");
    }

    #[test]
    fn test_create_and_delete_budget() {
        let mut app = app("budgets");
        app.active_pane = ActivePane::Form;

        // Fields: client name, items, total
        type_text(&mut app, "Acme");
        app.move_down();
        type_text(&mut app, "2");
        app.move_down();
        type_text(&mut app, "1500");
        app.submit_form();

        assert_eq!(app.rows().len(), 1);
        assert_eq!(app.rows()[0].cells[0], "1");

        app.active_pane = ActivePane::Table;
        assert!(app.row_action('d'));
        assert!(app.confirm.is_some());
        assert_eq!(app.rows().len(), 1);

        app.cancel_confirm();
        assert_eq!(app.rows().len(), 1);

        assert!(app.row_action('d'));
        app.accept_confirm();
        assert!(app.confirm.is_none());
        assert!(app.rows().is_empty());
        assert!(!app.row_action('d'));
    }

    #[test]
    fn test_search_filters_rows() {
        let mut app = app("clients");
        app.active_pane = ActivePane::Form;
        type_text(&mut app, "Ana");
        app.submit_form();
        type_text(&mut app, "Bruno");
        app.submit_form();
        assert_eq!(app.rows().len(), 2);

        app.active_pane = ActivePane::Controls;
        type_text(&mut app, "bru");
        assert_eq!(app.rows().len(), 1);

        app.activate();
        app.backspace();
        app.backspace();
        app.backspace();
        app.stop_editing();
        assert_eq!(app.rows().len(), 2);
    }

    #[test]
    fn test_edit_action_focuses_form() {
        let mut app = app("clients");
        app.active_pane = ActivePane::Form;
        type_text(&mut app, "Ana");
        app.submit_form();

        app.active_pane = ActivePane::Table;
        assert!(app.row_action('e'));
        assert_eq!(app.active_pane, ActivePane::Form);
        let form = app.router.container().form().unwrap();
        assert!(form.is_editing());
        assert_eq!(form.get("name").unwrap().value, "Ana");
    }
}
