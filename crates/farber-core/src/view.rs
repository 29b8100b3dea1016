//! Presentation-neutral view model
//!
//! Modules render into a [`Container`]: a title, some text cards, an optional
//! form, filter controls and an optional table. Front ends draw it; the
//! router clears it on every navigation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

/// The content area of the panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    title: String,
    cards: Vec<String>,
    form: Option<Form>,
    controls: Vec<Control>,
    table: Option<Table>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove everything a module rendered
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.cards.is_empty()
            && self.form.is_none()
            && self.controls.is_empty()
            && self.table.is_none()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn cards(&self) -> &[String] {
        &self.cards
    }

    pub fn push_card(&mut self, card: impl Into<String>) {
        self.cards.push(card.into());
    }

    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut Form> {
        self.form.as_mut()
    }

    pub fn set_form(&mut self, form: Form) {
        self.form = Some(form);
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control_mut(&mut self, id: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.id() == id)
    }

    pub fn push_control(&mut self, control: Control) {
        self.controls.push(control);
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn table_mut(&mut self) -> Option<&mut Table> {
        self.table.as_mut()
    }

    pub fn set_table(&mut self, table: Table) {
        self.table = Some(table);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// `YYYY-MM-DD`
    Date,
    TextArea,
    /// Value is `"true"` when checked
    Checkbox,
    /// Carried with the form but never drawn
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
    /// Value restored by [`Form::reset`]
    pub initial: String,
}

impl Field {
    pub fn new(name: &'static str, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name,
            label: label.into(),
            kind,
            value: String::new(),
            required: false,
            initial: String::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.initial = value.clone();
        self.value = value;
        self
    }

    pub fn is_checked(&self) -> bool {
        self.value == "true"
    }
}

/// A data-entry form
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub heading: String,
    pub fields: Vec<Field>,
    pub submit_label: String,
    /// Label used when a record is loaded for editing
    pub update_label: Option<String>,
}

impl Form {
    pub fn new(heading: impl Into<String>, submit_label: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            fields: Vec::new(),
            submit_label: submit_label.into(),
            update_label: None,
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_update_label(mut self, label: impl Into<String>) -> Self {
        self.update_label = Some(label.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Set a field's current value, ignoring unknown names
    pub fn fill(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value.into();
        }
    }

    /// Restore every field to its initial value
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value = field.initial.clone();
        }
    }

    /// Whether a hidden id field currently holds a record id
    pub fn is_editing(&self) -> bool {
        self.fields
            .iter()
            .any(|f| f.kind == FieldKind::Hidden && !f.value.is_empty())
    }

    /// Label for the submit button in the current mode
    pub fn current_submit_label(&self) -> &str {
        match (&self.update_label, self.is_editing()) {
            (Some(label), true) => label,
            _ => &self.submit_label,
        }
    }

    /// Snapshot of the field values
    pub fn data(&self) -> FormData {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.value.clone()))
            .collect()
    }
}

/// Submitted form values by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Raw value, empty when absent
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value
    pub fn text(&self, name: &str) -> String {
        self.get(name).trim().to_string()
    }

    /// Numeric value; missing or invalid input reads as 0
    pub fn number(&self, name: &str) -> f64 {
        self.get(name)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    }

    /// Non-negative whole count; anything else reads as 0
    pub fn count(&self, name: &str) -> u32 {
        let n = self.number(name);
        if n > 0.0 {
            n.floor().min(u32::MAX as f64) as u32
        } else {
            0
        }
    }

    pub fn checked(&self, name: &str) -> bool {
        matches!(self.get(name).trim(), "true" | "on" | "1")
    }

    /// `YYYY-MM-DD` date, `None` when empty or invalid
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.get(name).trim(), "%Y-%m-%d").ok()
    }

    /// Record id carried in a hidden field
    pub fn id(&self, name: &str) -> Option<Uuid> {
        Uuid::parse_str(self.get(name).trim()).ok()
    }
}

impl FromIterator<(String, String)> for FormData {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Filter controls shown above a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Search {
        id: &'static str,
        placeholder: String,
        value: String,
    },
    Select {
        id: &'static str,
        label: String,
        options: Vec<SelectOption>,
        selected: String,
    },
}

impl Control {
    pub fn search(id: &'static str, placeholder: impl Into<String>) -> Self {
        Control::Search {
            id,
            placeholder: placeholder.into(),
            value: String::new(),
        }
    }

    /// A select whose current value is its first option
    pub fn select(id: &'static str, label: impl Into<String>, options: Vec<SelectOption>) -> Self {
        let selected = options
            .first()
            .map(|o| o.value.clone())
            .unwrap_or_default();
        Control::Select {
            id,
            label: label.into(),
            options,
            selected,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Control::Search { id, .. } | Control::Select { id, .. } => id,
        }
    }

    /// Current search text or selected value
    pub fn value(&self) -> &str {
        match self {
            Control::Search { value, .. } => value,
            Control::Select { selected, .. } => selected,
        }
    }

    pub fn set_value(&mut self, new_value: impl Into<String>) {
        match self {
            Control::Search { value, .. } => *value = new_value.into(),
            Control::Select { selected, .. } => *selected = new_value.into(),
        }
    }

    /// Replace a select's options, falling back to the first option when
    /// the current value is gone. No-op on a search box.
    pub fn set_options(&mut self, new_options: Vec<SelectOption>) {
        if let Control::Select {
            options, selected, ..
        } = self
        {
            if !new_options.iter().any(|o| &o.value == selected) {
                *selected = new_options
                    .first()
                    .map(|o| o.value.clone())
                    .unwrap_or_default();
            }
            *options = new_options;
        }
    }
}

/// What a row action asks the module to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowCommand {
    SetStatus(String),
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub key: char,
    pub label: String,
    pub command: RowCommand,
}

impl RowAction {
    pub fn new(key: char, label: impl Into<String>, command: RowCommand) -> Self {
        Self {
            key,
            label: label.into(),
            command,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: Uuid,
    pub cells: Vec<String>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    /// Shown instead of rows when there are none
    pub empty_message: String,
}

impl Table {
    pub fn new(headers: &[&str], empty_message: impl Into<String>) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            empty_message: empty_message.into(),
        }
    }

    /// Replace the whole body
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    pub fn row(&self, id: Uuid) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }
}
