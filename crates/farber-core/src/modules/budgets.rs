//! Quick budgets
//!
//! Each created budget gets the next sequential number, starts as a draft
//! and is copied into the history.

use std::rc::Rc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{money_format, options_with_all, reset_form, sync_control};
use crate::filter::{matches_search, Selection};
use crate::format::{format_date, MoneyFormat};
use crate::models::{today, Budget, BudgetDraft, BudgetStatus, HistoryEntry, BUDGETS_KEY};
use crate::module::{
    report_write, require, Effect, HistorySink, Interaction, Module, ValidationError,
};
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, RecordStore};
use crate::view::{
    Container, Control, Field, FieldKind, Form, FormData, Row, RowAction, RowCommand, Table,
};

pub const SECTION: &str = "budgets";

const SEARCH: &str = "search";
const STATUS: &str = "status";

/// Budgets matching the search text (client name) and status filter
pub fn filter_budgets<'a>(
    budgets: &'a [Budget],
    search: &str,
    status: &Selection<BudgetStatus>,
) -> Vec<&'a Budget> {
    budgets
        .iter()
        .filter(|b| status.matches(&b.status))
        .filter(|b| matches_search(search, &[b.client_name.as_str()]))
        .collect()
}

pub struct BudgetsModule {
    namespace: Rc<dyn KeyValueStore>,
    store: RecordStore<Budget>,
    history: Option<Rc<dyn HistorySink>>,
    search: String,
    status: Selection<BudgetStatus>,
    money: MoneyFormat,
}

impl BudgetsModule {
    pub fn new(namespace: Rc<dyn KeyValueStore>, history: Option<Rc<dyn HistorySink>>) -> Self {
        Self {
            store: RecordStore::new(namespace.clone(), BUDGETS_KEY),
            namespace,
            history,
            search: String::new(),
            status: Selection::All,
            money: MoneyFormat::default(),
        }
    }

    /// Reload budgets and display settings
    pub fn load(&mut self) {
        self.store.load();
        self.money = money_format(&self.namespace);
    }

    pub fn budgets(&self) -> &[Budget] {
        self.store.items()
    }

    pub fn money(&self) -> &MoneyFormat {
        &self.money
    }

    /// Create a budget and record it in the history
    ///
    /// A failed write is reported through `notifier` but the budget stays in
    /// memory and is still returned.
    pub fn add_budget(
        &mut self,
        draft: BudgetDraft,
        notifier: &mut dyn Notifier,
    ) -> Result<Budget, ValidationError> {
        if let Err(e) = require(&draft.client_name, "client name") {
            notifier.error(&e.to_string());
            return Err(e);
        }

        let budget = Budget::from_draft(draft, self.store.next_number(), today());
        report_write(self.store.add(budget.clone()), notifier, "Error saving budget");

        if let Some(history) = &self.history {
            history.add_entry(HistoryEntry::from(&budget));
            if let Err(e) = history.save() {
                error!(error = %e, number = budget.number, "Failed to save history");
            }
        }

        info!(number = budget.number, client = %budget.client_name, "Budget created");
        notifier.success("Budget created");
        Ok(budget)
    }

    /// Set a budget's status; unknown ids are ignored
    pub fn update_status(
        &mut self,
        id: Uuid,
        status: BudgetStatus,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let changed = report_write(
            self.store.update(id, |b| b.status = status),
            notifier,
            "Error saving budget",
        )
        .unwrap_or(true);

        if changed {
            info!(%id, status = %status, "Budget status updated");
        } else {
            debug!(%id, "Budget not found");
        }
        changed
    }

    pub fn delete_budget(&mut self, id: Uuid, notifier: &mut dyn Notifier) -> bool {
        let removed = report_write(self.store.remove(id), notifier, "Error saving budget")
            .unwrap_or(true);
        if removed {
            info!(%id, "Budget deleted");
        }
        removed
    }

    fn draft_from(data: &FormData) -> BudgetDraft {
        BudgetDraft {
            client_name: data.text("clientName"),
            items_count: data.count("itemsCount"),
            total: data.number("total"),
        }
    }

    fn form() -> Form {
        Form::new("New budget", "Create budget")
            .field(Field::new("clientName", "Client", FieldKind::Text).required())
            .field(Field::new("itemsCount", "Items", FieldKind::Number))
            .field(Field::new("total", "Total", FieldKind::Number))
    }

    fn rows(&self) -> Vec<Row> {
        filter_budgets(self.store.items(), &self.search, &self.status)
            .into_iter()
            .map(|b| Row {
                id: b.id,
                cells: vec![
                    b.number.to_string(),
                    b.client_name.clone(),
                    format_date(Some(b.date)),
                    b.items_count.to_string(),
                    self.money.format(b.total),
                    b.status.label().to_string(),
                ],
                actions: vec![
                    status_action('s', "Send", BudgetStatus::Sent),
                    status_action('a', "Approve", BudgetStatus::Approved),
                    status_action('r', "Reject", BudgetStatus::Rejected),
                    status_action('o', "Convert to order", BudgetStatus::Ordered),
                    RowAction::new('d', "Delete", RowCommand::Delete),
                ],
            })
            .collect()
    }

    fn refresh_table(&self, container: &mut Container) {
        if let Some(table) = container.table_mut() {
            table.replace_rows(self.rows());
        }
    }
}

fn status_action(key: char, label: &str, status: BudgetStatus) -> RowAction {
    RowAction::new(key, label, RowCommand::SetStatus(status.to_string()))
}

impl Module for BudgetsModule {
    fn section(&self) -> &'static str {
        SECTION
    }

    fn label(&self) -> &'static str {
        "Budgets"
    }

    fn render(&mut self, container: &mut Container) {
        self.load();
        self.search.clear();
        self.status = Selection::All;

        container.set_title("Budgets");
        container.set_form(Self::form());
        container.push_control(Control::search(SEARCH, "Search by client"));
        container.push_control(Control::select(
            STATUS,
            "Status",
            options_with_all(
                "All",
                BudgetStatus::ALL
                    .into_iter()
                    .map(|s| (s.to_string(), s.label().to_string())),
            ),
        ));

        let mut table = Table::new(
            &["N°", "Client", "Date", "Items", "Total", "Status"],
            "No budgets yet",
        );
        table.replace_rows(self.rows());
        container.set_table(table);
    }

    fn handle(
        &mut self,
        interaction: Interaction,
        container: &mut Container,
        notifier: &mut dyn Notifier,
    ) -> Effect {
        let (interaction, confirmed) = interaction.into_parts();
        match interaction {
            Interaction::Submit(data) => {
                if self.add_budget(Self::draft_from(&data), notifier).is_ok() {
                    reset_form(container);
                }
            }
            Interaction::ResetForm => reset_form(container),
            Interaction::Search(text) => {
                sync_control(container, SEARCH, &text);
                self.search = text;
            }
            Interaction::Select { control, value } if control == STATUS => {
                match Selection::parse(&value) {
                    Ok(selection) => {
                        sync_control(container, STATUS, &value);
                        self.status = selection;
                    }
                    Err(e) => warn!(error = %e, "Ignoring status filter"),
                }
            }
            Interaction::Row {
                id,
                command: RowCommand::SetStatus(status),
            } => match status.parse() {
                Ok(status) => {
                    self.update_status(id, status, notifier);
                }
                Err(e) => warn!(error = %e, "Ignoring status change"),
            },
            Interaction::Row {
                id,
                command: RowCommand::Delete,
            } => {
                if !confirmed {
                    return Effect::confirm(
                        "Delete this budget?",
                        Interaction::Row {
                            id,
                            command: RowCommand::Delete,
                        },
                    );
                }
                self.delete_budget(id, notifier);
            }
            other => {
                debug!(?other, "Interaction not handled by budgets");
                return Effect::None;
            }
        }

        self.refresh_table(container);
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::{history, namespace};
    use crate::notify::{ToastKind, Toasts};

    fn submit(client: &str, total: &str) -> Interaction {
        Interaction::Submit(
            FormData::new()
                .with("clientName", client)
                .with("itemsCount", "3")
                .with("total", total),
        )
    }

    #[test]
    fn test_create_budget_records_history() {
        let (_ns, kv) = namespace();
        let (history, sink) = history(&kv);
        let mut module = BudgetsModule::new(kv, Some(sink));
        let mut container = Container::new();
        let mut toasts = Toasts::new();
        module.render(&mut container);

        let effect = module.handle(submit("Acme", "1500"), &mut container, &mut toasts);
        assert_eq!(effect, Effect::None);

        let budgets = module.budgets();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].number, 1);
        assert_eq!(budgets[0].client_name, "Acme");
        assert_eq!(budgets[0].items_count, 3);
        assert_eq!(budgets[0].status, BudgetStatus::Draft);

        let history = history.borrow();
        assert_eq!(history.len(), 1);
        assert_eq!(history.items()[0].id, budgets[0].id);
        assert_eq!(history.items()[0].status, BudgetStatus::Draft);

        let table = container.table().unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells[4], "$ 1.500,00");
        assert_eq!(toasts.items().last().unwrap().kind, ToastKind::Success);
    }

    #[test]
    fn test_numbers_are_sequential_and_never_reused() {
        let (_ns, kv) = namespace();
        let mut module = BudgetsModule::new(kv, None);
        let mut toasts = Toasts::new();

        let first = module.add_budget(draft("A"), &mut toasts).unwrap();
        let second = module.add_budget(draft("B"), &mut toasts).unwrap();
        assert_eq!((first.number, second.number), (1, 2));

        module.delete_budget(second.id, &mut toasts);
        let third = module.add_budget(draft("C"), &mut toasts).unwrap();
        assert_eq!(third.number, 3);
    }

    fn draft(client: &str) -> BudgetDraft {
        BudgetDraft {
            client_name: client.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_status_change_leaves_history_untouched() {
        let (_ns, kv) = namespace();
        let (history, sink) = history(&kv);
        let mut module = BudgetsModule::new(kv, Some(sink));
        let mut toasts = Toasts::new();

        let budget = module.add_budget(draft("Acme"), &mut toasts).unwrap();
        assert!(module.update_status(budget.id, BudgetStatus::Approved, &mut toasts));

        assert_eq!(module.budgets()[0].status, BudgetStatus::Approved);
        assert_eq!(history.borrow().items()[0].status, BudgetStatus::Draft);
    }

    #[test]
    fn test_update_status_unknown_id_is_noop() {
        let (ns, kv) = namespace();
        let mut module = BudgetsModule::new(kv, None);
        let mut toasts = Toasts::new();

        assert!(!module.update_status(Uuid::new_v4(), BudgetStatus::Sent, &mut toasts));
        assert_eq!(ns.write_count(), 0);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_blank_client_is_rejected() {
        let (ns, kv) = namespace();
        let (history, sink) = history(&kv);
        let mut module = BudgetsModule::new(kv, Some(sink));
        let mut container = Container::new();
        let mut toasts = Toasts::new();
        module.render(&mut container);

        module.handle(submit("   ", "100"), &mut container, &mut toasts);

        assert!(module.budgets().is_empty());
        assert!(history.borrow().is_empty());
        assert_eq!(ns.write_count(), 0);
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].kind, ToastKind::Error);
    }

    #[test]
    fn test_write_failure_keeps_budget_in_memory() {
        let (ns, kv) = namespace();
        let mut module = BudgetsModule::new(kv, None);
        let mut container = Container::new();
        let mut toasts = Toasts::new();
        module.render(&mut container);

        ns.fail_writes(true);
        module.handle(submit("Acme", "10"), &mut container, &mut toasts);

        assert_eq!(module.budgets().len(), 1);
        assert_eq!(container.table().unwrap().rows.len(), 1);
        assert!(toasts
            .items()
            .iter()
            .any(|t| t.kind == ToastKind::Error
                && t.message.starts_with("Error saving budget")));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (_ns, kv) = namespace();
        let mut module = BudgetsModule::new(kv, None);
        let mut container = Container::new();
        let mut toasts = Toasts::new();
        module.render(&mut container);
        module.handle(submit("Acme", "10"), &mut container, &mut toasts);
        let id = module.budgets()[0].id;

        let delete = Interaction::Row {
            id,
            command: RowCommand::Delete,
        };
        let effect = module.handle(delete, &mut container, &mut toasts);
        let then = match effect {
            Effect::Confirm { then, .. } => then,
            Effect::None => panic!("expected a confirmation"),
        };
        assert_eq!(module.budgets().len(), 1);

        module.handle(then, &mut container, &mut toasts);
        assert!(module.budgets().is_empty());
        assert!(container.table().unwrap().rows.is_empty());
    }

    #[test]
    fn test_filters_narrow_the_table() {
        let (_ns, kv) = namespace();
        let mut module = BudgetsModule::new(kv, None);
        let mut container = Container::new();
        let mut toasts = Toasts::new();
        module.render(&mut container);

        module.handle(submit("Acme", "10"), &mut container, &mut toasts);
        module.handle(submit("Zeta", "20"), &mut container, &mut toasts);
        let acme = module.budgets()[0].id;
        module.update_status(acme, BudgetStatus::Sent, &mut toasts);

        module.handle(Interaction::Search("  zet".to_string()), &mut container, &mut toasts);
        let table = container.table().unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells[1], "Zeta");

        module.handle(Interaction::Search(String::new()), &mut container, &mut toasts);
        module.handle(Interaction::select(STATUS, "sent"), &mut container, &mut toasts);
        let table = container.table().unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].id, acme);

        // Rendering again clears the filters
        module.render(&mut container);
        assert_eq!(container.table().unwrap().rows.len(), 2);
    }

    #[test]
    fn test_filter_budgets_is_pure() {
        let (_ns, kv) = namespace();
        let mut module = BudgetsModule::new(kv, None);
        let mut toasts = Toasts::new();
        module.add_budget(draft("Acme"), &mut toasts).unwrap();
        module.add_budget(draft("Beta"), &mut toasts).unwrap();

        let budgets = module.budgets();
        let all = filter_budgets(budgets, "", &Selection::All);
        let again = filter_budgets(budgets, "", &Selection::All);
        assert_eq!(all.len(), 2);
        assert_eq!(all, again);
        assert!(filter_budgets(budgets, "", &Selection::Only(BudgetStatus::Sent)).is_empty());
    }
}
