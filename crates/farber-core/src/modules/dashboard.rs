//! Landing section: a welcome card and record counts

use std::rc::Rc;

use tracing::debug;

use crate::models::{
    Budget, BudgetStatus, Client, Order, OrderStatus, Product, Settings, BUDGETS_KEY,
    CLIENTS_KEY, ORDERS_KEY, PRODUCTS_KEY, SETTINGS_KEY,
};
use crate::module::{Effect, Interaction, Module};
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, RecordStore, SingletonStore};
use crate::view::Container;

pub const SECTION: &str = "dashboard";

/// Record counts shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub budgets: usize,
    pub open_budgets: usize,
    pub clients: usize,
    pub orders: usize,
    pub pending_orders: usize,
    pub products: usize,
}

impl Summary {
    pub fn collect(namespace: &Rc<dyn KeyValueStore>) -> Self {
        let budgets = RecordStore::<Budget>::open(namespace.clone(), BUDGETS_KEY);
        let clients = RecordStore::<Client>::open(namespace.clone(), CLIENTS_KEY);
        let orders = RecordStore::<Order>::open(namespace.clone(), ORDERS_KEY);
        let products = RecordStore::<Product>::open(namespace.clone(), PRODUCTS_KEY);

        Self {
            budgets: budgets.len(),
            open_budgets: budgets
                .items()
                .iter()
                .filter(|b| matches!(b.status, BudgetStatus::Draft | BudgetStatus::Sent))
                .count(),
            clients: clients.len(),
            orders: orders.len(),
            pending_orders: orders
                .items()
                .iter()
                .filter(|o| matches!(o.status, OrderStatus::Pending | OrderStatus::Arrived))
                .count(),
            products: products.len(),
        }
    }
}

pub struct DashboardModule {
    namespace: Rc<dyn KeyValueStore>,
    summary: Summary,
}

impl DashboardModule {
    pub fn new(namespace: Rc<dyn KeyValueStore>) -> Self {
        Self {
            namespace,
            summary: Summary::default(),
        }
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

impl Module for DashboardModule {
    fn section(&self) -> &'static str {
        SECTION
    }

    fn label(&self) -> &'static str {
        "Dashboard"
    }

    fn render(&mut self, container: &mut Container) {
        let settings: SingletonStore<Settings> =
            SingletonStore::open(self.namespace.clone(), SETTINGS_KEY);
        self.summary = Summary::collect(&self.namespace);
        let settings = settings.get();

        container.set_title(format!("Welcome to {}", settings.company_name));
        container.push_card(format!(
            "{} · {}. Pick a section from the sidebar to start.",
            settings.company_name, settings.branch_name
        ));
        container.push_card(format!(
            "Budgets: {} ({} open)",
            self.summary.budgets, self.summary.open_budgets
        ));
        container.push_card(format!(
            "Orders: {} ({} in progress)",
            self.summary.orders, self.summary.pending_orders
        ));
        container.push_card(format!("Clients: {}", self.summary.clients));
        container.push_card(format!("Products: {}", self.summary.products));
    }

    fn handle(
        &mut self,
        interaction: Interaction,
        _container: &mut Container,
        _notifier: &mut dyn Notifier,
    ) -> Effect {
        debug!(?interaction, "Dashboard has no interactions");
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetDraft, OrderDraft};
    use crate::modules::test_support::namespace;
    use crate::modules::{BudgetsModule, OrdersModule};
    use crate::notify::Toasts;

    #[test]
    fn test_counts_reflect_stores() {
        let (_ns, kv) = namespace();
        let mut toasts = Toasts::new();
        let mut budgets = BudgetsModule::new(kv.clone(), None);
        let mut orders = OrdersModule::new(kv.clone(), None);

        let budget = budgets
            .add_budget(
                BudgetDraft {
                    client_name: "Acme".to_string(),
                    ..Default::default()
                },
                &mut toasts,
            )
            .unwrap();
        budgets.update_status(budget.id, BudgetStatus::Rejected, &mut toasts);
        orders
            .add_order(
                OrderDraft {
                    client_name: "Acme".to_string(),
                    ..Default::default()
                },
                &mut toasts,
            )
            .unwrap();

        let mut module = DashboardModule::new(kv);
        let mut container = Container::new();
        module.render(&mut container);

        let summary = module.summary();
        assert_eq!(summary.budgets, 1);
        assert_eq!(summary.open_budgets, 0);
        assert_eq!(summary.orders, 1);
        assert_eq!(summary.pending_orders, 1);
        assert_eq!(container.title(), "Welcome to Farber Muebles");
        assert!(container.cards().iter().any(|c| c == "Clients: 0"));
    }
}
