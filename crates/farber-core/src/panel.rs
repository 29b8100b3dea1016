//! Panel assembly
//!
//! Wires every module to one namespace and hands them to a [`Router`]. The
//! history store is created once and shared: the history module reads it,
//! budgets and orders append to it.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::config::DEFAULT_SECTION;
use crate::models::{HistoryEntry, HISTORY_KEY};
use crate::module::{HistorySink, Module};
use crate::modules::{
    BudgetsModule, ClientsModule, DashboardModule, HistoryModule, OrdersModule, ProductsModule,
    SettingsModule,
};
use crate::router::Router;
use crate::storage::{KeyValueStore, RecordStore};

/// Build the router with every section, opening on `initial_section`
///
/// An unknown initial section falls back to the dashboard.
pub fn build_router(namespace: Rc<dyn KeyValueStore>, initial_section: &str) -> Router {
    let history = Rc::new(RefCell::new(RecordStore::<HistoryEntry>::open(
        namespace.clone(),
        HISTORY_KEY,
    )));
    let sink: Rc<dyn HistorySink> = history.clone();

    let modules: Vec<Box<dyn Module>> = vec![
        Box::new(DashboardModule::new(namespace.clone())),
        Box::new(BudgetsModule::new(namespace.clone(), Some(sink.clone()))),
        Box::new(ClientsModule::new(namespace.clone())),
        Box::new(OrdersModule::new(namespace.clone(), Some(sink))),
        Box::new(ProductsModule::new(namespace.clone())),
        Box::new(HistoryModule::new(namespace.clone(), history)),
        Box::new(SettingsModule::new(namespace)),
    ];

    let initial = if modules.iter().any(|m| m.section() == initial_section) {
        initial_section
    } else {
        warn!(
            section = initial_section,
            fallback = DEFAULT_SECTION,
            "Unknown initial section"
        );
        DEFAULT_SECTION
    };

    Router::new(modules, initial)
}
