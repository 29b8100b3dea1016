//! Business settings editor

use std::rc::Rc;

use tracing::{debug, info};

use crate::models::{Settings, DEFAULT_VAT, SETTINGS_KEY};
use crate::module::{report_write, Effect, Interaction, Module};
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, SingletonStore};
use crate::view::{Container, Field, FieldKind, Form, FormData};

pub const SECTION: &str = "config";

pub struct SettingsModule {
    store: SingletonStore<Settings>,
}

impl SettingsModule {
    pub fn new(namespace: Rc<dyn KeyValueStore>) -> Self {
        Self {
            store: SingletonStore::open(namespace, SETTINGS_KEY),
        }
    }

    pub fn load(&mut self) {
        self.store.load();
    }

    pub fn settings(&self) -> &Settings {
        self.store.get()
    }

    /// Replace and persist the settings
    pub fn save_settings(&mut self, settings: Settings, notifier: &mut dyn Notifier) -> bool {
        self.store.set(settings);
        let saved = report_write(self.store.save(), notifier, "Error saving settings").is_some();
        if saved {
            info!("Settings saved");
            notifier.success("Settings saved");
        }
        saved
    }

    /// Restore and persist the defaults
    pub fn reset_settings(&mut self, notifier: &mut dyn Notifier) -> bool {
        let reset = report_write(self.store.reset(), notifier, "Error saving settings").is_some();
        if reset {
            info!("Settings restored to defaults");
            notifier.success("Default settings restored");
        }
        reset
    }

    /// Settings described by a submitted form
    ///
    /// Text fields are stored as submitted, blank included; an unusable VAT
    /// falls back to the default rate.
    pub fn settings_from(data: &FormData) -> Settings {
        let vat = data
            .get("ivaPorDefecto")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_VAT);

        Settings {
            company_name: data.text("empresaNombre"),
            branch_name: data.text("sucursalNombre"),
            currency_symbol: data.text("monedaSimbolo"),
            currency_code: data.text("monedaCodigo"),
            default_vat: vat,
            show_cents: data.checked("mostrarCentavos"),
            auto_numbering: data.checked("numeracionAutomatica"),
        }
    }

    fn form(settings: &Settings) -> Form {
        Form::new("Business settings", "Save settings")
            .field(
                Field::new("empresaNombre", "Company name", FieldKind::Text)
                    .with_value(settings.company_name.as_str()),
            )
            .field(
                Field::new("sucursalNombre", "Branch", FieldKind::Text)
                    .with_value(settings.branch_name.as_str()),
            )
            .field(
                Field::new("monedaSimbolo", "Currency symbol", FieldKind::Text)
                    .with_value(settings.currency_symbol.as_str()),
            )
            .field(
                Field::new("monedaCodigo", "Currency code", FieldKind::Text)
                    .with_value(settings.currency_code.as_str()),
            )
            .field(
                Field::new("ivaPorDefecto", "Default VAT %", FieldKind::Number)
                    .with_value(settings.default_vat.to_string()),
            )
            .field(
                Field::new("mostrarCentavos", "Show cents", FieldKind::Checkbox)
                    .with_value(checkbox(settings.show_cents)),
            )
            .field(
                Field::new("numeracionAutomatica", "Automatic numbering", FieldKind::Checkbox)
                    .with_value(checkbox(settings.auto_numbering)),
            )
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "true"
    } else {
        ""
    }
}

impl Module for SettingsModule {
    fn section(&self) -> &'static str {
        SECTION
    }

    fn label(&self) -> &'static str {
        "Settings"
    }

    fn render(&mut self, container: &mut Container) {
        self.load();
        container.set_title("Settings");
        container.set_form(Self::form(self.store.get()));
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
                self.save_settings(Self::settings_from(&data), notifier);
            }
            Interaction::ResetForm => {
                if !confirmed {
                    return Effect::confirm("Restore default settings?", Interaction::ResetForm);
                }
                self.reset_settings(notifier);
            }
            other => {
                debug!(?other, "Interaction not handled by settings");
                return Effect::None;
            }
        }

        container.set_form(Self::form(self.store.get()));
        Effect::None
    }
}
