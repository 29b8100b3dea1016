//! Module contract
//!
//! A module owns one domain's record store and knows how to render it into
//! a [`Container`] and react to user interactions. The router holds modules
//! as `Box<dyn Module>` keyed by [`Module::section`].

use std::cell::RefCell;

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::models::HistoryEntry;
use crate::notify::Notifier;
use crate::storage::{RecordStore, StorageResult};
use crate::view::{Container, FormData, RowCommand};

/// Something the user did inside a module's content
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// The form was submitted
    Submit(FormData),
    /// The form's reset button
    ResetForm,
    /// Search text changed
    Search(String),
    /// A select control changed
    Select { control: String, value: String },
    /// A row action was triggered
    Row { id: Uuid, command: RowCommand },
    /// An interaction the user already confirmed
    Confirmed(Box<Interaction>),
}

impl Interaction {
    pub fn select(control: impl Into<String>, value: impl Into<String>) -> Self {
        Interaction::Select {
            control: control.into(),
            value: value.into(),
        }
    }

    /// Wrap as confirmed
    pub fn confirmed(self) -> Self {
        match self {
            Interaction::Confirmed(_) => self,
            other => Interaction::Confirmed(Box::new(other)),
        }
    }

    /// Split into the inner interaction and whether it was confirmed
    pub fn into_parts(self) -> (Interaction, bool) {
        match self {
            Interaction::Confirmed(inner) => (*inner, true),
            other => (other, false),
        }
    }
}

/// What the host must do after an interaction
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Ask the user; dispatch `then` only if they accept
    Confirm { prompt: String, then: Interaction },
}

impl Effect {
    pub fn confirm(prompt: impl Into<String>, interaction: Interaction) -> Self {
        Effect::Confirm {
            prompt: prompt.into(),
            then: interaction.confirmed(),
        }
    }
}

/// A section of the panel
pub trait Module {
    /// Section identifier used for navigation
    fn section(&self) -> &'static str;

    /// Sidebar label
    fn label(&self) -> &'static str;

    /// Load state and populate the container
    fn render(&mut self, container: &mut Container);

    /// Called after `render`
    fn init(&mut self) {}

    /// React to an interaction; the container holds what `render` produced
    fn handle(
        &mut self,
        interaction: Interaction,
        container: &mut Container,
        notifier: &mut dyn Notifier,
    ) -> Effect;
}

/// Input rejected before touching any store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Enter the {0}")]
    MissingField(&'static str),
}

/// Require a non-blank value
pub fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Log a failed write and tell the user
///
/// Returns the success value, or `None` after reporting.
pub fn report_write<T>(
    result: StorageResult<T>,
    notifier: &mut dyn Notifier,
    failure: &str,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!(error = %e, "{}", failure);
            match e.recovery_suggestion() {
                Some(hint) => notifier.error(&format!("{}. {}", failure, hint)),
                None => notifier.error(failure),
            }
            None
        }
    }
}

/// Receives history entries for created budgets and orders
pub trait HistorySink {
    /// Append an entry in memory
    fn add_entry(&self, entry: HistoryEntry);

    /// Persist the history
    fn save(&self) -> StorageResult<()>;
}

impl HistorySink for RefCell<RecordStore<HistoryEntry>> {
    fn add_entry(&self, entry: HistoryEntry) {
        self.borrow_mut().push(entry);
    }

    fn save(&self) -> StorageResult<()> {
        self.borrow().save()
    }
}
