//! Order command handlers

use std::rc::Rc;

use anyhow::{anyhow, bail, Result};

use farber_core::filter::Selection;
use farber_core::modules::orders::filter_orders;
use farber_core::modules::OrdersModule;
use farber_core::{KeyValueStore, Order, OrderDraft, OrderStatus};

use super::{confirm_delete, history_sink, resolve_id};
use crate::output::Output;

fn describe(order: &Order) -> String {
    format!("#{} - {}", order.number, order.client_name)
}

fn find(module: &OrdersModule, id: &str) -> Result<Order> {
    let uuid = resolve_id(id, module.orders(), "order", describe)?;
    module
        .orders()
        .iter()
        .find(|o| o.id == uuid)
        .cloned()
        .ok_or_else(|| anyhow!("Order not found: {}", id))
}

/// Create an order and record it in the history
///
/// Without an explicit number the next free one is used.
pub fn add(namespace: Rc<dyn KeyValueStore>, draft: OrderDraft, output: &mut Output) -> Result<()> {
    let sink = history_sink(&namespace);
    let mut module = OrdersModule::new(namespace, Some(sink));
    module.load();

    let order = module.add_order(draft, output)?;
    output.finish()?;
    output.print_order(&order, module.money());

    Ok(())
}

pub fn list(
    namespace: Rc<dyn KeyValueStore>,
    search: Option<String>,
    status: Option<OrderStatus>,
    output: &Output,
) -> Result<()> {
    let mut module = OrdersModule::new(namespace, None);
    module.load();

    let status = status.map_or(Selection::All, Selection::Only);
    let orders = filter_orders(module.orders(), search.as_deref().unwrap_or(""), &status);
    output.print_orders(&orders, module.money());

    Ok(())
}

pub fn set_status(
    namespace: Rc<dyn KeyValueStore>,
    id: String,
    status: OrderStatus,
    output: &mut Output,
) -> Result<()> {
    let mut module = OrdersModule::new(namespace, None);
    module.load();

    let order = find(&module, &id)?;
    if !module.update_status(order.id, status, output) {
        bail!("Order not found: {}", id);
    }
    output.finish()
}

pub fn delete(namespace: Rc<dyn KeyValueStore>, id: String, output: &mut Output) -> Result<()> {
    let mut module = OrdersModule::new(namespace, None);
    module.load();

    let order = find(&module, &id)?;
    if !confirm_delete(output, &format!("order {}", describe(&order)))? {
        return Ok(());
    }

    module.delete_order(order.id, output);
    output.finish()
}
