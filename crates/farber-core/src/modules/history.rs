//! Read-only history of created budgets and orders
//!
//! The store is shared with the budgets and orders modules, which append to
//! it through [`HistorySink`](crate::module::HistorySink).

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use super::{money_format, options_with_all, sync_control};
use crate::filter::Selection;
use crate::format::{format_date, MoneyFormat};
use crate::models::{BudgetStatus, HistoryEntry};
use crate::module::{Effect, Interaction, Module};
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, RecordStore};
use crate::view::{Container, Control, Row, Table};

pub const SECTION: &str = "history";

const CLIENT: &str = "client";
const STATUS: &str = "status";

/// Entries matching both select filters
pub fn filter_history<'a>(
    entries: &'a [HistoryEntry],
    client: &Selection<String>,
    status: &Selection<BudgetStatus>,
) -> Vec<&'a HistoryEntry> {
    entries
        .iter()
        .filter(|e| client.matches(&e.client_name))
        .filter(|e| status.matches(&e.status))
        .collect()
}

/// Distinct client names, sorted
pub fn client_names(entries: &[HistoryEntry]) -> Vec<String> {
    let mut names: Vec<String> = entries.iter().map(|e| e.client_name.clone()).collect();
    names.sort();
    names.dedup();
    names
}

pub struct HistoryModule {
    namespace: Rc<dyn KeyValueStore>,
    store: Rc<RefCell<RecordStore<HistoryEntry>>>,
    client: Selection<String>,
    status: Selection<BudgetStatus>,
    money: MoneyFormat,
}

impl HistoryModule {
    pub fn new(
        namespace: Rc<dyn KeyValueStore>,
        store: Rc<RefCell<RecordStore<HistoryEntry>>>,
    ) -> Self {
        Self {
            namespace,
            store,
            client: Selection::All,
            status: Selection::All,
            money: MoneyFormat::default(),
        }
    }

    pub fn load(&mut self) {
        self.store.borrow_mut().load();
        self.money = money_format(&self.namespace);
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.store.borrow().items().to_vec()
    }

    pub fn money(&self) -> &MoneyFormat {
        &self.money
    }

    fn rows(&self) -> Vec<Row> {
        let store = self.store.borrow();
        filter_history(store.items(), &self.client, &self.status)
            .into_iter()
            .map(|e| Row {
                id: e.id,
                cells: vec![
                    e.number.to_string(),
                    e.client_name.clone(),
                    format_date(Some(e.date)),
                    self.money.format(e.total),
                    e.status.label().to_string(),
                ],
                actions: Vec::new(),
            })
            .collect()
    }

    fn refresh_table(&self, container: &mut Container) {
        if let Some(table) = container.table_mut() {
            table.replace_rows(self.rows());
        }
    }
}

impl Module for HistoryModule {
    fn section(&self) -> &'static str {
        SECTION
    }

    fn label(&self) -> &'static str {
        "History"
    }

    fn render(&mut self, container: &mut Container) {
        self.load();
        self.client = Selection::All;
        self.status = Selection::All;

        let clients = client_names(self.store.borrow().items());

        container.set_title("History");
        container.push_control(Control::select(
            CLIENT,
            "Client",
            options_with_all("All clients", clients.into_iter().map(|c| (c.clone(), c))),
        ));
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
            &["N°", "Client", "Date", "Total", "Status"],
            "No history yet",
        );
        table.replace_rows(self.rows());
        container.set_table(table);
    }

    fn handle(
        &mut self,
        interaction: Interaction,
        container: &mut Container,
        _notifier: &mut dyn Notifier,
    ) -> Effect {
        match interaction {
            Interaction::Select { control, value } if control == CLIENT => {
                sync_control(container, CLIENT, &value);
                self.client = Selection::from_value(&value);
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
            other => {
                debug!(?other, "Interaction not handled by history");
                return Effect::None;
            }
        }

        self.refresh_table(container);
        Effect::None
    }
}
