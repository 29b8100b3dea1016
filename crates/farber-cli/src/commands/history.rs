//! History command handlers

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use farber_core::filter::Selection;
use farber_core::models::HISTORY_KEY;
use farber_core::modules::history::filter_history;
use farber_core::modules::HistoryModule;
use farber_core::storage::RecordStore;
use farber_core::{BudgetStatus, HistoryEntry, KeyValueStore};

use crate::output::Output;

/// List history entries, optionally for one client and status
pub fn list(
    namespace: Rc<dyn KeyValueStore>,
    client: Option<String>,
    status: Option<BudgetStatus>,
    output: &Output,
) -> Result<()> {
    let module = open(namespace);
    let entries = module.entries();
    let matching = matching(&entries, client, status);
    output.print_history(&matching, module.money());

    Ok(())
}

fn open(namespace: Rc<dyn KeyValueStore>) -> HistoryModule {
    let store = Rc::new(RefCell::new(RecordStore::<HistoryEntry>::new(
        namespace.clone(),
        HISTORY_KEY,
    )));
    let mut module = HistoryModule::new(namespace, store);
    module.load();
    module
}

fn matching(
    entries: &[HistoryEntry],
    client: Option<String>,
    status: Option<BudgetStatus>,
) -> Vec<&HistoryEntry> {
    let client = client.map_or(Selection::All, Selection::Only);
    let status = status.map_or(Selection::All, Selection::Only);
    filter_history(entries, &client, &status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{budget, order};
    use crate::output::OutputFormat;
    use farber_core::{BudgetDraft, FileNamespace, OrderDraft};
    use tempfile::TempDir;

    fn namespace(dir: &TempDir) -> Rc<dyn KeyValueStore> {
        Rc::new(FileNamespace::new(dir.path()))
    }

    #[test]
    fn test_filters_by_client_and_status() {
        let temp_dir = TempDir::new().unwrap();
        let mut output = Output::new(OutputFormat::Quiet);

        for client in ["Acme", "Zeta"] {
            let draft = BudgetDraft {
                client_name: client.to_string(),
                ..Default::default()
            };
            budget::add(namespace(&temp_dir), draft, &mut output).unwrap();
        }
        let draft = OrderDraft {
            client_name: "Acme".to_string(),
            ..Default::default()
        };
        order::add(namespace(&temp_dir), draft, &mut output).unwrap();

        let entries = open(namespace(&temp_dir)).entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(matching(&entries, Some("Acme".to_string()), None).len(), 2);

        let ordered = matching(
            &entries,
            Some("Acme".to_string()),
            Some(BudgetStatus::Ordered),
        );
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].client_name, "Acme");

        assert!(matching(&entries, Some("Nadie".to_string()), None).is_empty());
        list(namespace(&temp_dir), None, None, &output).unwrap();
    }

    #[test]
    fn test_empty_data_dir_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Quiet);

        assert!(open(namespace(&temp_dir)).entries().is_empty());
        list(namespace(&temp_dir), None, None, &output).unwrap();
        assert!(!temp_dir.path().join("farber_history.json").exists());
    }
}
