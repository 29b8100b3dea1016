//! Client directory
//!
//! The form doubles as an editor: loading a row fills the hidden
//! `clientId` field, and submitting then updates that client instead of
//! creating a new one.

use std::rc::Rc;

use tracing::{debug, info};
use uuid::Uuid;

use super::{reset_form, sync_control};
use crate::filter::matches_search;
use crate::format::format_date;
use crate::models::{today, Client, ClientFields, CLIENTS_KEY};
use crate::module::{report_write, require, Effect, Interaction, Module, ValidationError};
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, RecordStore};
use crate::view::{
    Container, Control, Field, FieldKind, Form, FormData, Row, RowAction, RowCommand, Table,
};

pub const SECTION: &str = "clients";

const SEARCH: &str = "search";
const ID_FIELD: &str = "clientId";

/// Clients whose name, phone or email contains the search text
pub fn filter_clients<'a>(clients: &'a [Client], search: &str) -> Vec<&'a Client> {
    clients
        .iter()
        .filter(|c| {
            matches_search(
                search,
                &[c.name.as_str(), c.phone.as_str(), c.email.as_str()],
            )
        })
        .collect()
}

pub struct ClientsModule {
    store: RecordStore<Client>,
    search: String,
}

impl ClientsModule {
    pub fn new(namespace: Rc<dyn KeyValueStore>) -> Self {
        Self {
            store: RecordStore::new(namespace, CLIENTS_KEY),
            search: String::new(),
        }
    }

    pub fn load(&mut self) {
        self.store.load();
    }

    pub fn clients(&self) -> &[Client] {
        self.store.items()
    }

    pub fn add_client(
        &mut self,
        fields: ClientFields,
        notifier: &mut dyn Notifier,
    ) -> Result<Client, ValidationError> {
        validate(&fields, notifier)?;

        let client = Client::new(fields, today());
        report_write(self.store.add(client.clone()), notifier, "Error saving client");
        info!(id = %client.id, name = %client.name, "Client created");
        notifier.success("Client saved");
        Ok(client)
    }

    /// Overwrite a client's fields
    ///
    /// Returns `Ok(false)` when no client has `id`.
    pub fn update_client(
        &mut self,
        id: Uuid,
        fields: ClientFields,
        notifier: &mut dyn Notifier,
    ) -> Result<bool, ValidationError> {
        validate(&fields, notifier)?;

        let updated = report_write(
            self.store.update(id, |c| c.apply(fields)),
            notifier,
            "Error saving client",
        )
        .unwrap_or(true);

        if updated {
            info!(%id, "Client updated");
            notifier.success("Client updated");
        } else {
            debug!(%id, "Client not found");
        }
        Ok(updated)
    }

    pub fn delete_client(&mut self, id: Uuid, notifier: &mut dyn Notifier) -> bool {
        let removed = report_write(self.store.remove(id), notifier, "Error saving client")
            .unwrap_or(true);
        if removed {
            info!(%id, "Client deleted");
            notifier.success("Client deleted");
        }
        removed
    }

    fn fields_from(data: &FormData) -> ClientFields {
        ClientFields {
            name: data.text("name"),
            phone: data.text("phone"),
            email: data.text("email"),
            address: data.text("address"),
            notes: data.text("notes"),
        }
    }

    fn form() -> Form {
        Form::new("Client", "Save client")
            .with_update_label("Update client")
            .field(Field::new(ID_FIELD, "", FieldKind::Hidden))
            .field(Field::new("name", "Name", FieldKind::Text).required())
            .field(Field::new("phone", "Phone", FieldKind::Text))
            .field(Field::new("email", "Email", FieldKind::Text))
            .field(Field::new("address", "Address", FieldKind::Text))
            .field(Field::new("notes", "Notes", FieldKind::TextArea))
    }

    /// Load a client into the form for editing
    fn edit(&self, id: Uuid, container: &mut Container) {
        let (Some(client), Some(form)) = (self.store.get(id), container.form_mut()) else {
            return;
        };
        form.fill(ID_FIELD, client.id.to_string());
        form.fill("name", client.name.as_str());
        form.fill("phone", client.phone.as_str());
        form.fill("email", client.email.as_str());
        form.fill("address", client.address.as_str());
        form.fill("notes", client.notes.as_str());
    }

    fn submit(&mut self, data: &FormData, notifier: &mut dyn Notifier) -> bool {
        let fields = Self::fields_from(data);
        let result = match data.id(ID_FIELD) {
            Some(id) => self.update_client(id, fields, notifier).map(|_| ()),
            None => self.add_client(fields, notifier).map(|_| ()),
        };
        result.is_ok()
    }

    fn rows(&self) -> Vec<Row> {
        filter_clients(self.store.items(), &self.search)
            .into_iter()
            .map(|c| Row {
                id: c.id,
                cells: vec![
                    c.name.clone(),
                    c.phone.clone(),
                    c.email.clone(),
                    c.address.clone(),
                    format_date(Some(c.created)),
                ],
                actions: vec![
                    RowAction::new('e', "Edit", RowCommand::Edit),
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

fn validate(fields: &ClientFields, notifier: &mut dyn Notifier) -> Result<(), ValidationError> {
    require(&fields.name, "client name").map_err(|e| {
        notifier.error(&e.to_string());
        e
    })
}

impl Module for ClientsModule {
    fn section(&self) -> &'static str {
        SECTION
    }

    fn label(&self) -> &'static str {
        "Clients"
    }

    fn render(&mut self, container: &mut Container) {
        self.load();
        self.search.clear();

        container.set_title("Clients");
        container.set_form(Self::form());
        container.push_control(Control::search(SEARCH, "Search by name, phone or email"));

        let mut table = Table::new(
            &["Name", "Phone", "Email", "Address", "Since"],
            "No clients yet",
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
                if self.submit(&data, notifier) {
                    reset_form(container);
                }
            }
            Interaction::ResetForm => reset_form(container),
            Interaction::Search(text) => {
                sync_control(container, SEARCH, &text);
                self.search = text;
            }
            Interaction::Row {
                id,
                command: RowCommand::Edit,
            } => {
                self.edit(id, container);
                return Effect::None;
            }
            Interaction::Row {
                id,
                command: RowCommand::Delete,
            } => {
                if !confirmed {
                    return Effect::confirm(
                        "Delete this client?",
                        Interaction::Row {
                            id,
                            command: RowCommand::Delete,
                        },
                    );
                }
                self.delete_client(id, notifier);
            }
            other => {
                debug!(?other, "Interaction not handled by clients");
                return Effect::None;
            }
        }

        self.refresh_table(container);
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::namespace;
    use crate::notify::{ToastKind, Toasts};

    fn fields(name: &str, phone: &str, email: &str) -> ClientFields {
        ClientFields {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_matches_name_phone_and_email() {
        let (_ns, kv) = namespace();
        let mut module = ClientsModule::new(kv);
        let mut toasts = Toasts::new();
        module
            .add_client(fields("Ana Gómez", "555-1234", "ana@example.com"), &mut toasts)
            .unwrap();
        module
            .add_client(fields("Bruno", "444-9876", "bruno@shop.com"), &mut toasts)
            .unwrap();

        let clients = module.clients();
        assert_eq!(filter_clients(clients, "ANA").len(), 1);
        assert_eq!(filter_clients(clients, "9876")[0].name, "Bruno");
        assert_eq!(filter_clients(clients, "example.com")[0].name, "Ana Gómez");
        assert_eq!(filter_clients(clients, "  ").len(), 2);
        assert!(filter_clients(clients, "zeta").is_empty());
    }

    #[test]
    fn test_edit_then_submit_updates_in_place() {
        let (_ns, kv) = namespace();
        let mut module = ClientsModule::new(kv.clone());
        let mut container = Container::new();
        let mut toasts = Toasts::new();
        module.render(&mut container);

        let client = module
            .add_client(fields("Ana", "555", ""), &mut toasts)
            .unwrap();
        module.handle(
            Interaction::Row {
                id: client.id,
                command: RowCommand::Edit,
            },
            &mut container,
            &mut toasts,
        );

        let form = container.form_mut().unwrap();
        assert!(form.is_editing());
        form.fill("phone", "777");
        let data = form.data();

        module.handle(Interaction::Submit(data), &mut container, &mut toasts);

        assert_eq!(module.clients().len(), 1);
        assert_eq!(module.clients()[0].phone, "777");
        assert_eq!(module.clients()[0].created, client.created);
        assert!(!container.form().unwrap().is_editing());

        let mut reloaded = ClientsModule::new(kv);
        reloaded.load();
        assert_eq!(reloaded.clients()[0].phone, "777");
    }

    #[test]
    fn test_update_unknown_client() {
        let (ns, kv) = namespace();
        let mut module = ClientsModule::new(kv);
        let mut toasts = Toasts::new();

        let updated = module
            .update_client(Uuid::new_v4(), fields("Ana", "", ""), &mut toasts)
            .unwrap();
        assert!(!updated);
        assert_eq!(ns.write_count(), 0);
    }

    #[test]
    fn test_blank_name_rejected_on_update() {
        let (_ns, kv) = namespace();
        let mut module = ClientsModule::new(kv);
        let mut toasts = Toasts::new();
        let client = module.add_client(fields("Ana", "", ""), &mut toasts).unwrap();

        let err = module
            .update_client(client.id, fields(" ", "", ""), &mut toasts)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("client name"));
        assert_eq!(module.clients()[0].name, "Ana");
        assert_eq!(toasts.items().last().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (ns, kv) = namespace();
        let mut module = ClientsModule::new(kv);
        let mut toasts = Toasts::new();
        let client = module.add_client(fields("Ana", "", ""), &mut toasts).unwrap();
        let writes = ns.write_count();

        assert!(module.delete_client(client.id, &mut toasts));
        assert_eq!(ns.write_count(), writes + 1);

        assert!(!module.delete_client(client.id, &mut toasts));
        assert_eq!(ns.write_count(), writes + 1);
    }
}
