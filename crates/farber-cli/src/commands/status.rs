//! Status command handler

use std::rc::Rc;

use anyhow::Result;

use farber_core::models::SETTINGS_KEY;
use farber_core::modules::dashboard::Summary;
use farber_core::storage::SingletonStore;
use farber_core::{KeyValueStore, Settings};

use crate::output::Output;

/// Show the dashboard counts
pub fn show(namespace: Rc<dyn KeyValueStore>, output: &Output) -> Result<()> {
    let settings: SingletonStore<Settings> = SingletonStore::open(namespace.clone(), SETTINGS_KEY);
    let summary = Summary::collect(&namespace);

    output.print_summary(&heading(settings.get()), &summary);
    Ok(())
}

fn heading(settings: &Settings) -> String {
    format!("{} · {}", settings.company_name, settings.branch_name)
}
