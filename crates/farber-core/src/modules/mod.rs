//! Panel sections
//!
//! One module per domain area plus the dashboard. Each follows the same
//! flow: interaction, store mutation, synchronous persist, table re-render.

pub mod budgets;
pub mod clients;
pub mod dashboard;
pub mod history;
pub mod orders;
pub mod products;
pub mod settings;

use std::rc::Rc;

pub use budgets::BudgetsModule;
pub use clients::ClientsModule;
pub use dashboard::DashboardModule;
pub use history::HistoryModule;
pub use orders::OrdersModule;
pub use products::ProductsModule;
pub use settings::SettingsModule;

use crate::filter::ALL;
use crate::format::MoneyFormat;
use crate::models::{Settings, SETTINGS_KEY};
use crate::storage::{KeyValueStore, SingletonStore};
use crate::view::{Container, SelectOption};

/// Money formatting as currently configured
pub(crate) fn money_format(namespace: &Rc<dyn KeyValueStore>) -> MoneyFormat {
    let settings: SingletonStore<Settings> = SingletonStore::open(namespace.clone(), SETTINGS_KEY);
    MoneyFormat::from(settings.get())
}

/// Select options led by an "All" entry
pub(crate) fn options_with_all(
    all_label: &str,
    values: impl IntoIterator<Item = (String, String)>,
) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new(ALL, all_label))
        .chain(values.into_iter().map(|(v, l)| SelectOption::new(v, l)))
        .collect()
}

/// Restore the form to its initial values, leaving edit mode
pub(crate) fn reset_form(container: &mut Container) {
    if let Some(form) = container.form_mut() {
        form.reset();
    }
}

/// Mirror a filter value into its control
pub(crate) fn sync_control(container: &mut Container, id: &str, value: &str) {
    if let Some(control) = container.control_mut(id) {
        control.set_value(value);
    }
}
