//! Command handlers

pub mod budget;
pub mod client;
pub mod config;
pub mod history;
pub mod order;
pub mod product;
pub mod settings;
pub mod status;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Result};
use uuid::Uuid;

use farber_core::models::HISTORY_KEY;
use farber_core::storage::{Record, RecordStore};
use farber_core::{HistoryEntry, HistorySink, KeyValueStore};

use crate::output::Output;
use crate::prompt::confirm;

/// Resolve a record ID given as a full UUID or a unique prefix
pub fn resolve_id<T: Record>(
    id: &str,
    records: &[T],
    kind: &str,
    describe: impl Fn(&T) -> String,
) -> Result<Uuid> {
    // Try full UUID first
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    let prefix = id.trim().to_lowercase();
    if prefix.is_empty() {
        bail!("Empty {} ID", kind);
    }

    let matches: Vec<_> = records
        .iter()
        .filter(|r| r.id().to_string().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => bail!("No {} found matching: {}", kind, id),
        1 => Ok(matches[0].id()),
        _ => {
            eprintln!("Multiple {}s match '{}':", kind, id);
            for record in &matches {
                eprintln!("  {} - {}", record.id(), describe(record));
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// History store for commands that create budgets or orders
pub fn history_sink(namespace: &Rc<dyn KeyValueStore>) -> Rc<dyn HistorySink> {
    Rc::new(RefCell::new(RecordStore::<HistoryEntry>::open(
        namespace.clone(),
        HISTORY_KEY,
    )))
}

/// Ask before deleting when a person is at the terminal
///
/// Returns `false` when the user declines.
pub fn confirm_delete(output: &Output, description: &str) -> Result<bool> {
    if !output.should_prompt() {
        return Ok(true);
    }

    println!("Delete {}", description);
    if !confirm("Are you sure?")? {
        println!("Cancelled.");
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use farber_core::models::today;
    use farber_core::{Client, ClientFields};

    fn client(name: &str) -> Client {
        Client::new(
            ClientFields {
                name: name.to_string(),
                ..Default::default()
            },
            today(),
        )
    }

    #[test]
    fn test_resolve_full_uuid() {
        let id = Uuid::new_v4();
        let resolved = resolve_id::<Client>(&id.to_string(), &[], "client", |c| c.name.clone());
        assert_eq!(resolved.unwrap(), id);
    }

    #[test]
    fn test_resolve_unique_prefix() {
        let clients = vec![client("Acme"), client("Zeta")];
        let target = &clients[1];
        let prefix = &target.id.to_string()[..8];

        let resolved = resolve_id(prefix, &clients, "client", |c| c.name.clone()).unwrap();
        assert_eq!(resolved, target.id);
    }

    #[test]
    fn test_resolve_ambiguous_and_missing() {
        let clients = vec![client("Acme"), client("Zeta")];

        // UUIDs are hex, so nothing starts with "zz"
        let missing = resolve_id("zz", &clients, "client", |c| c.name.clone());
        assert!(missing.unwrap_err().to_string().contains("No client found"));

        let shared = common_prefix(&clients[0].id.to_string(), &clients[1].id.to_string());
        if !shared.is_empty() {
            let ambiguous = resolve_id(&shared, &clients, "client", |c| c.name.clone());
            assert!(ambiguous.unwrap_err().to_string().contains("Ambiguous"));
        }

        assert!(resolve_id("  ", &clients, "client", |c| c.name.clone()).is_err());
    }

    fn common_prefix(a: &str, b: &str) -> String {
        a.chars()
            .zip(b.chars())
            .take_while(|(x, y)| x == y)
            .map(|(x, _)| x)
            .collect()
    }
}
