//! Orders placed with the workshop
//!
//! Orders take an explicit number when one is given, otherwise the next one
//! in sequence. Like budgets, every new order is copied into the history.

use std::rc::Rc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{money_format, options_with_all, reset_form, sync_control};
use crate::filter::{matches_search, Selection};
use crate::format::{format_date, MoneyFormat};
use crate::models::{today, HistoryEntry, Order, OrderDraft, OrderStatus, ORDERS_KEY};
use crate::module::{
    report_write, require, Effect, HistorySink, Interaction, Module, ValidationError,
};
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, RecordStore};
use crate::view::{
    Container, Control, Field, FieldKind, Form, FormData, Row, RowAction, RowCommand, Table,
};

pub const SECTION: &str = "orders";

const SEARCH: &str = "search";
const STATUS: &str = "status";

/// Orders matching the search text (client name) and status filter
pub fn filter_orders<'a>(
    orders: &'a [Order],
    search: &str,
    status: &Selection<OrderStatus>,
) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|o| status.matches(&o.status))
        .filter(|o| matches_search(search, &[o.client_name.as_str()]))
        .collect()
}

pub struct OrdersModule {
    namespace: Rc<dyn KeyValueStore>,
    store: RecordStore<Order>,
    history: Option<Rc<dyn HistorySink>>,
    search: String,
    status: Selection<OrderStatus>,
    money: MoneyFormat,
}

impl OrdersModule {
    pub fn new(namespace: Rc<dyn KeyValueStore>, history: Option<Rc<dyn HistorySink>>) -> Self {
        Self {
            store: RecordStore::new(namespace.clone(), ORDERS_KEY),
            namespace,
            history,
            search: String::new(),
            status: Selection::All,
            money: MoneyFormat::default(),
        }
    }

    pub fn load(&mut self) {
        self.store.load();
        self.money = money_format(&self.namespace);
    }

    pub fn orders(&self) -> &[Order] {
        self.store.items()
    }

    pub fn money(&self) -> &MoneyFormat {
        &self.money
    }

    pub fn next_number(&self) -> u64 {
        self.store.next_number()
    }

    pub fn add_order(
        &mut self,
        draft: OrderDraft,
        notifier: &mut dyn Notifier,
    ) -> Result<Order, ValidationError> {
        if let Err(e) = require(&draft.client_name, "client name") {
            notifier.error(&e.to_string());
            return Err(e);
        }

        let order = Order::from_draft(draft, self.store.next_number(), today());
        report_write(self.store.add(order.clone()), notifier, "Error saving order");

        if let Some(history) = &self.history {
            history.add_entry(HistoryEntry::from(&order));
            if let Err(e) = history.save() {
                error!(error = %e, number = order.number, "Failed to save history");
            }
        }

        info!(number = order.number, client = %order.client_name, "Order created");
        notifier.success("Order created");
        Ok(order)
    }

    pub fn update_status(
        &mut self,
        id: Uuid,
        status: OrderStatus,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let changed = report_write(
            self.store.update(id, |o| o.status = status),
            notifier,
            "Error saving order",
        )
        .unwrap_or(true);

        if changed {
            info!(%id, status = %status, "Order status updated");
            notifier.success("Status updated");
        } else {
            debug!(%id, "Order not found");
        }
        changed
    }

    pub fn delete_order(&mut self, id: Uuid, notifier: &mut dyn Notifier) -> bool {
        let removed = report_write(self.store.remove(id), notifier, "Error saving order")
            .unwrap_or(true);
        if removed {
            info!(%id, "Order deleted");
            notifier.success("Order deleted");
        }
        removed
    }

    fn draft_from(data: &FormData) -> OrderDraft {
        let number = data.number("number");
        OrderDraft {
            number: (number >= 1.0).then(|| number.floor() as u64),
            client_name: data.text("clientName"),
            created: data.date("createdISO"),
            expected: data.date("expectedISO"),
            total: data.number("total"),
            items_count: data.count("itemsCount"),
            status: data.get("status").parse().ok(),
            notes: data.text("notes"),
        }
    }

    fn form() -> Form {
        Form::new("New order", "Create order")
            .field(Field::new("number", "Number (blank for next)", FieldKind::Number))
            .field(Field::new("clientName", "Client", FieldKind::Text).required())
            .field(Field::new("createdISO", "Created", FieldKind::Date))
            .field(Field::new("expectedISO", "Expected", FieldKind::Date))
            .field(Field::new("itemsCount", "Items", FieldKind::Number))
            .field(Field::new("total", "Total", FieldKind::Number))
            .field(Field::new("notes", "Notes", FieldKind::TextArea))
    }

    fn rows(&self) -> Vec<Row> {
        filter_orders(self.store.items(), &self.search, &self.status)
            .into_iter()
            .map(|o| Row {
                id: o.id,
                cells: vec![
                    o.number.to_string(),
                    o.client_name.clone(),
                    format_date(Some(o.created)),
                    format_date(o.expected),
                    o.items_count.to_string(),
                    self.money.format(o.total),
                    o.status.label().to_string(),
                ],
                actions: vec![
                    status_action('a', "Arrived", OrderStatus::Arrived),
                    status_action('v', "Delivered", OrderStatus::Delivered),
                    status_action('c', "Cancel", OrderStatus::Canceled),
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

fn status_action(key: char, label: &str, status: OrderStatus) -> RowAction {
    RowAction::new(key, label, RowCommand::SetStatus(status.to_string()))
}

impl Module for OrdersModule {
    fn section(&self) -> &'static str {
        SECTION
    }

    fn label(&self) -> &'static str {
        "Orders"
    }

    fn render(&mut self, container: &mut Container) {
        self.load();
        self.search.clear();
        self.status = Selection::All;

        container.set_title("Orders");
        container.set_form(Self::form());
        container.push_control(Control::search(SEARCH, "Search by client"));
        container.push_control(Control::select(
            STATUS,
            "Status",
            options_with_all(
                "All",
                OrderStatus::ALL
                    .into_iter()
                    .map(|s| (s.to_string(), s.label().to_string())),
            ),
        ));

        let mut table = Table::new(
            &["N°", "Client", "Created", "Expected", "Items", "Total", "Status"],
            "No orders yet",
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
                if self.add_order(Self::draft_from(&data), notifier).is_ok() {
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
                        "Delete this order?",
                        Interaction::Row {
                            id,
                            command: RowCommand::Delete,
                        },
                    );
                }
                self.delete_order(id, notifier);
            }
            other => {
                debug!(?other, "Interaction not handled by orders");
                return Effect::None;
            }
        }

        self.refresh_table(container);
        Effect::None
    }
}
