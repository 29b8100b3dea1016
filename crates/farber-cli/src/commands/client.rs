//! Client command handlers

use std::rc::Rc;

use anyhow::{anyhow, bail, Result};

use farber_core::modules::clients::filter_clients;
use farber_core::modules::ClientsModule;
use farber_core::{Client, ClientFields, KeyValueStore};

use super::{confirm_delete, resolve_id};
use crate::output::Output;

/// Field changes for `client update`; `None` keeps the current value
#[derive(Debug, Default)]
pub struct ClientChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ClientChanges {
    fn apply_to(self, client: &Client) -> ClientFields {
        ClientFields {
            name: self.name.unwrap_or_else(|| client.name.clone()),
            phone: self.phone.unwrap_or_else(|| client.phone.clone()),
            email: self.email.unwrap_or_else(|| client.email.clone()),
            address: self.address.unwrap_or_else(|| client.address.clone()),
            notes: self.notes.unwrap_or_else(|| client.notes.clone()),
        }
    }
}

fn find(module: &ClientsModule, id: &str) -> Result<Client> {
    let uuid = resolve_id(id, module.clients(), "client", |c| c.name.clone())?;
    module
        .clients()
        .iter()
        .find(|c| c.id == uuid)
        .cloned()
        .ok_or_else(|| anyhow!("Client not found: {}", id))
}

pub fn add(namespace: Rc<dyn KeyValueStore>, fields: ClientFields, output: &mut Output) -> Result<()> {
    let mut module = ClientsModule::new(namespace);
    module.load();

    let client = module.add_client(fields, output)?;
    output.finish()?;
    output.print_client(&client);

    Ok(())
}

pub fn update(
    namespace: Rc<dyn KeyValueStore>,
    id: String,
    changes: ClientChanges,
    output: &mut Output,
) -> Result<()> {
    let mut module = ClientsModule::new(namespace);
    module.load();

    let client = find(&module, &id)?;
    if !module.update_client(client.id, changes.apply_to(&client), output)? {
        bail!("Client not found: {}", id);
    }
    output.finish()?;

    if let Some(updated) = module.clients().iter().find(|c| c.id == client.id) {
        output.print_client(updated);
    }
    Ok(())
}

/// List clients matching a name, phone or email search
pub fn list(namespace: Rc<dyn KeyValueStore>, search: Option<String>, output: &Output) -> Result<()> {
    let mut module = ClientsModule::new(namespace);
    module.load();

    let clients = filter_clients(module.clients(), search.as_deref().unwrap_or(""));
    output.print_clients(&clients);
    Ok(())
}

pub fn delete(namespace: Rc<dyn KeyValueStore>, id: String, output: &mut Output) -> Result<()> {
    let mut module = ClientsModule::new(namespace);
    module.load();

    let client = find(&module, &id)?;
    if !confirm_delete(output, &format!("client: {}", client.name))? {
        return Ok(());
    }

    module.delete_client(client.id, output);
    output.finish()
}
