//! Budget command handlers

use std::rc::Rc;

use anyhow::{anyhow, bail, Result};

use farber_core::filter::Selection;
use farber_core::modules::budgets::filter_budgets;
use farber_core::modules::BudgetsModule;
use farber_core::{Budget, BudgetDraft, BudgetStatus, KeyValueStore};

use super::{confirm_delete, history_sink, resolve_id};
use crate::output::Output;

fn describe(budget: &Budget) -> String {
    format!("#{} - {}", budget.number, budget.client_name)
}

/// Create a budget and record it in the history
pub fn add(namespace: Rc<dyn KeyValueStore>, draft: BudgetDraft, output: &mut Output) -> Result<()> {
    let sink = history_sink(&namespace);
    let mut module = BudgetsModule::new(namespace, Some(sink));
    module.load();

    let budget = module.add_budget(draft, output)?;
    output.finish()?;
    output.print_budget(&budget, module.money());

    Ok(())
}

/// List budgets, optionally filtered by client text and status
pub fn list(
    namespace: Rc<dyn KeyValueStore>,
    search: Option<String>,
    status: Option<BudgetStatus>,
    output: &Output,
) -> Result<()> {
    let mut module = BudgetsModule::new(namespace, None);
    module.load();

    let status = status.map_or(Selection::All, Selection::Only);
    let budgets = filter_budgets(module.budgets(), search.as_deref().unwrap_or(""), &status);
    output.print_budgets(&budgets, module.money());

    Ok(())
}

/// Move a budget to another status
pub fn set_status(
    namespace: Rc<dyn KeyValueStore>,
    id: String,
    status: BudgetStatus,
    output: &mut Output,
) -> Result<()> {
    let mut module = BudgetsModule::new(namespace, None);
    module.load();

    let uuid = resolve_id(&id, module.budgets(), "budget", describe)?;
    if !module.update_status(uuid, status, output) {
        bail!("Budget not found: {}", id);
    }
    output.finish()?;
    output.success(&format!("Budget marked as {}", status.label()));

    Ok(())
}

/// Delete a budget; its history entry stays
pub fn delete(namespace: Rc<dyn KeyValueStore>, id: String, output: &mut Output) -> Result<()> {
    let mut module = BudgetsModule::new(namespace, None);
    module.load();

    let uuid = resolve_id(&id, module.budgets(), "budget", describe)?;
    let budget = module
        .budgets()
        .iter()
        .find(|b| b.id == uuid)
        .cloned()
        .ok_or_else(|| anyhow!("Budget not found: {}", id))?;

    if !confirm_delete(output, &format!("budget {}", describe(&budget)))? {
        return Ok(());
    }

    module.delete_budget(uuid, output);
    output.finish()?;
    output.success(&format!("Deleted budget #{}", budget.number));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use farber_core::models::{BUDGETS_KEY, HISTORY_KEY};
    use farber_core::storage::RecordStore;
    use farber_core::{FileNamespace, HistoryEntry};
    use tempfile::TempDir;

    fn namespace(dir: &TempDir) -> Rc<dyn KeyValueStore> {
        Rc::new(FileNamespace::new(dir.path()))
    }

    fn draft(client: &str) -> BudgetDraft {
        BudgetDraft {
            client_name: client.to_string(),
            items_count: 2,
            total: 1500.0,
        }
    }

    #[test]
    fn test_add_writes_budget_and_history() {
        let temp_dir = TempDir::new().unwrap();
        let mut output = Output::new(OutputFormat::Quiet);

        add(namespace(&temp_dir), draft("Acme"), &mut output).unwrap();

        let budgets = RecordStore::<Budget>::open(namespace(&temp_dir), BUDGETS_KEY);
        let history = RecordStore::<HistoryEntry>::open(namespace(&temp_dir), HISTORY_KEY);
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets.items()[0].number, 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.items()[0].status, BudgetStatus::Draft);
    }

    #[test]
    fn test_add_rejects_blank_client() {
        let temp_dir = TempDir::new().unwrap();
        let mut output = Output::new(OutputFormat::Quiet);

        let err = add(namespace(&temp_dir), draft("  "), &mut output).unwrap_err();
        assert_eq!(err.to_string(), "Enter the client name");
        assert!(!temp_dir.path().join("farber_budgets.json").exists());
    }

    #[test]
    fn test_status_and_delete_by_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let mut output = Output::new(OutputFormat::Quiet);
        add(namespace(&temp_dir), draft("Acme"), &mut output).unwrap();

        let budgets = RecordStore::<Budget>::open(namespace(&temp_dir), BUDGETS_KEY);
        let prefix = budgets.items()[0].id.to_string()[..8].to_string();

        set_status(
            namespace(&temp_dir),
            prefix.clone(),
            BudgetStatus::Approved,
            &mut output,
        )
        .unwrap();
        let budgets = RecordStore::<Budget>::open(namespace(&temp_dir), BUDGETS_KEY);
        assert_eq!(budgets.items()[0].status, BudgetStatus::Approved);

        // Quiet mode never prompts
        delete(namespace(&temp_dir), prefix, &mut output).unwrap();
        let budgets = RecordStore::<Budget>::open(namespace(&temp_dir), BUDGETS_KEY);
        assert!(budgets.is_empty());
        let history = RecordStore::<HistoryEntry>::open(namespace(&temp_dir), HISTORY_KEY);
        assert_eq!(history.len(), 1);
    }
}
