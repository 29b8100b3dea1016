//! Business settings command handlers

use std::rc::Rc;

use anyhow::{bail, Context, Result};

use farber_core::modules::SettingsModule;
use farber_core::{KeyValueStore, Settings};

use crate::output::Output;
use crate::prompt::confirm;

pub fn show(namespace: Rc<dyn KeyValueStore>, output: &Output) -> Result<()> {
    let module = SettingsModule::new(namespace);
    output.print_settings(module.settings());
    Ok(())
}

/// Set one business setting
pub fn set(
    namespace: Rc<dyn KeyValueStore>,
    key: String,
    value: String,
    output: &mut Output,
) -> Result<()> {
    let mut module = SettingsModule::new(namespace);
    let settings = apply(module.settings().clone(), &key, &value)?;

    module.save_settings(settings, output);
    output.finish()?;
    output.print_settings(module.settings());

    Ok(())
}

/// Restore the default settings
pub fn reset(namespace: Rc<dyn KeyValueStore>, output: &mut Output) -> Result<()> {
    if output.should_prompt() && !confirm("Restore default settings?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut module = SettingsModule::new(namespace);
    module.reset_settings(output);
    output.finish()
}

fn apply(mut settings: Settings, key: &str, value: &str) -> Result<Settings> {
    let text = value.trim();
    match key {
        "company_name" => settings.company_name = text.to_string(),
        "branch_name" => settings.branch_name = text.to_string(),
        "currency_symbol" => settings.currency_symbol = text.to_string(),
        "currency_code" => settings.currency_code = text.to_string(),
        "default_vat" => {
            let vat: f64 = text
                .parse()
                .context("Invalid value for default_vat. Use a number such as 21 or 10.5.")?;
            if !vat.is_finite() {
                bail!("Invalid value for default_vat: {}", value);
            }
            settings.default_vat = vat;
        }
        "show_cents" => {
            settings.show_cents = text
                .parse()
                .context("Invalid value for show_cents. Use 'true' or 'false'.")?;
        }
        "auto_numbering" => {
            settings.auto_numbering = text
                .parse()
                .context("Invalid value for auto_numbering. Use 'true' or 'false'.")?;
        }
        _ => {
            bail!(
                "Unknown setting: '{}'\n\
                 Valid keys: company_name, branch_name, currency_symbol, currency_code, \
                 default_vat, show_cents, auto_numbering",
                key
            );
        }
    }
    Ok(settings)
}
