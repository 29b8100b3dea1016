//! Product catalog

use std::rc::Rc;

use tracing::{debug, info};
use uuid::Uuid;

use super::{money_format, options_with_all, reset_form, sync_control};
use crate::filter::{distinct, matches_search, Selection};
use crate::format::MoneyFormat;
use crate::models::{Product, ProductFields, PRODUCTS_KEY};
use crate::module::{report_write, require, Effect, Interaction, Module, ValidationError};
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, RecordStore};
use crate::view::{
    Container, Control, Field, FieldKind, Form, FormData, Row, RowAction, RowCommand, SelectOption,
    Table,
};

pub const SECTION: &str = "products";

const SEARCH: &str = "search";
const CATEGORY: &str = "category";
const ID_FIELD: &str = "productId";

/// Products matching the search text (name or category) and category filter
pub fn filter_products<'a>(
    products: &'a [Product],
    search: &str,
    category: &Selection<String>,
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| category.matches(&p.category))
        .filter(|p| matches_search(search, &[p.name.as_str(), p.category.as_str()]))
        .collect()
}

/// Distinct categories in catalog order
pub fn categories(products: &[Product]) -> Vec<String> {
    distinct(products.iter().map(|p| p.category.as_str()))
}

pub struct ProductsModule {
    namespace: Rc<dyn KeyValueStore>,
    store: RecordStore<Product>,
    search: String,
    category: Selection<String>,
    money: MoneyFormat,
}

impl ProductsModule {
    pub fn new(namespace: Rc<dyn KeyValueStore>) -> Self {
        Self {
            store: RecordStore::new(namespace.clone(), PRODUCTS_KEY),
            namespace,
            search: String::new(),
            category: Selection::All,
            money: MoneyFormat::default(),
        }
    }

    pub fn load(&mut self) {
        self.store.load();
        self.money = money_format(&self.namespace);
    }

    pub fn products(&self) -> &[Product] {
        self.store.items()
    }

    pub fn money(&self) -> &MoneyFormat {
        &self.money
    }

    pub fn add_product(
        &mut self,
        fields: ProductFields,
        notifier: &mut dyn Notifier,
    ) -> Result<Product, ValidationError> {
        validate(&fields, notifier)?;

        let product = Product::new(fields);
        report_write(self.store.add(product.clone()), notifier, "Error saving product");
        info!(id = %product.id, name = %product.name, "Product created");
        notifier.success("Product saved");
        Ok(product)
    }

    pub fn update_product(
        &mut self,
        id: Uuid,
        fields: ProductFields,
        notifier: &mut dyn Notifier,
    ) -> Result<bool, ValidationError> {
        validate(&fields, notifier)?;

        let updated = report_write(
            self.store.update(id, |p| p.apply(fields)),
            notifier,
            "Error saving product",
        )
        .unwrap_or(true);

        if updated {
            info!(%id, "Product updated");
            notifier.success("Product updated");
        } else {
            debug!(%id, "Product not found");
        }
        Ok(updated)
    }

    pub fn delete_product(&mut self, id: Uuid, notifier: &mut dyn Notifier) -> bool {
        let removed = report_write(self.store.remove(id), notifier, "Error saving product")
            .unwrap_or(true);
        if removed {
            info!(%id, "Product deleted");
            notifier.success("Product deleted");
        }
        removed
    }

    fn fields_from(data: &FormData) -> ProductFields {
        ProductFields {
            name: data.text("name"),
            price: data.number("price"),
            category: data.text("category"),
            description: data.text("description"),
        }
    }

    fn form() -> Form {
        Form::new("Product", "Save product")
            .with_update_label("Update product")
            .field(Field::new(ID_FIELD, "", FieldKind::Hidden))
            .field(Field::new("name", "Name", FieldKind::Text).required())
            .field(Field::new("price", "Price", FieldKind::Number))
            .field(Field::new("category", "Category", FieldKind::Text))
            .field(Field::new("description", "Description", FieldKind::TextArea))
    }

    fn category_options(&self) -> Vec<SelectOption> {
        options_with_all(
            "All categories",
            categories(self.store.items())
                .into_iter()
                .map(|c| (c.clone(), c)),
        )
    }

    fn edit(&self, id: Uuid, container: &mut Container) {
        let (Some(product), Some(form)) = (self.store.get(id), container.form_mut()) else {
            return;
        };
        form.fill(ID_FIELD, product.id.to_string());
        form.fill("name", product.name.as_str());
        form.fill("price", product.price.to_string());
        form.fill("category", product.category.as_str());
        form.fill("description", product.description.as_str());
    }

    fn submit(&mut self, data: &FormData, notifier: &mut dyn Notifier) -> bool {
        let fields = Self::fields_from(data);
        let result = match data.id(ID_FIELD) {
            Some(id) => self.update_product(id, fields, notifier).map(|_| ()),
            None => self.add_product(fields, notifier).map(|_| ()),
        };
        result.is_ok()
    }

    fn rows(&self) -> Vec<Row> {
        filter_products(self.store.items(), &self.search, &self.category)
            .into_iter()
            .map(|p| Row {
                id: p.id,
                cells: vec![
                    p.name.clone(),
                    p.category.clone(),
                    self.money.format(p.price),
                    p.description.clone(),
                ],
                actions: vec![
                    RowAction::new('e', "Edit", RowCommand::Edit),
                    RowAction::new('d', "Delete", RowCommand::Delete),
                ],
            })
            .collect()
    }

    /// Recompute category options and the table
    fn refresh(&mut self, container: &mut Container) {
        let stale = match &self.category {
            Selection::Only(category) => !self.store.items().iter().any(|p| &p.category == category),
            Selection::All => false,
        };
        if stale {
            self.category = Selection::All;
        }
        if let Some(control) = container.control_mut(CATEGORY) {
            control.set_options(self.category_options());
        }
        if let Some(table) = container.table_mut() {
            table.replace_rows(self.rows());
        }
    }
}

fn validate(fields: &ProductFields, notifier: &mut dyn Notifier) -> Result<(), ValidationError> {
    require(&fields.name, "product name").map_err(|e| {
        notifier.error(&e.to_string());
        e
    })
}

impl Module for ProductsModule {
    fn section(&self) -> &'static str {
        SECTION
    }

    fn label(&self) -> &'static str {
        "Products"
    }

    fn render(&mut self, container: &mut Container) {
        self.load();
        self.search.clear();
        self.category = Selection::All;

        container.set_title("Products");
        container.set_form(Self::form());
        container.push_control(Control::search(SEARCH, "Search by name or category"));
        container.push_control(Control::select(
            CATEGORY,
            "Category",
            self.category_options(),
        ));

        let mut table = Table::new(
            &["Name", "Category", "Price", "Description"],
            "No products yet",
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
            Interaction::Select { control, value } if control == CATEGORY => {
                sync_control(container, CATEGORY, &value);
                self.category = Selection::from_value(&value);
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
                        "Delete this product?",
                        Interaction::Row {
                            id,
                            command: RowCommand::Delete,
                        },
                    );
                }
                self.delete_product(id, notifier);
            }
            other => {
                debug!(?other, "Interaction not handled by products");
                return Effect::None;
            }
        }

        self.refresh(container);
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_CATEGORY;
    use crate::modules::test_support::namespace;
    use crate::notify::Toasts;

    fn fields(name: &str, category: &str, price: f64) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            price,
            category: category.to_string(),
            description: String::new(),
        }
    }

    fn catalog() -> (ProductsModule, Container, Toasts) {
        let (_ns, kv) = namespace();
        let mut module = ProductsModule::new(kv);
        let mut container = Container::new();
        let mut toasts = Toasts::new();
        module.render(&mut container);
        let items = [
            ("Silla Eames", "Sillas"),
            ("Mesa Ratona", "Mesas"),
            ("Banqueta", "Sillas"),
        ];
        for (name, category) in items {
            module
                .add_product(fields(name, category, 1000.0), &mut toasts)
                .unwrap();
        }
        module.handle(Interaction::Search(String::new()), &mut container, &mut toasts);
        (module, container, toasts)
    }

    #[test]
    fn test_category_options_follow_catalog() {
        let (_module, container, _toasts) = catalog();
        let Some(Control::Select { options, .. }) =
            container.controls().iter().find(|c| c.id() == CATEGORY)
        else {
            panic!("category select missing");
        };
        let values: Vec<_> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["all", "Sillas", "Mesas"]);
    }

    #[test]
    fn test_category_filter_and_search() {
        let (mut module, mut container, mut toasts) = catalog();

        module.handle(
            Interaction::select(CATEGORY, "Sillas"),
            &mut container,
            &mut toasts,
        );
        assert_eq!(container.table().unwrap().rows.len(), 2);

        module.handle(
            Interaction::Search("banq".to_string()),
            &mut container,
            &mut toasts,
        );
        let rows = &container.table().unwrap().rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells[0], "Banqueta");

        // Search also looks at the category
        module.handle(
            Interaction::select(CATEGORY, "all"),
            &mut container,
            &mut toasts,
        );
        module.handle(
            Interaction::Search("mesas".to_string()),
            &mut container,
            &mut toasts,
        );
        assert_eq!(container.table().unwrap().rows.len(), 1);
    }

    #[test]
    fn test_deleting_last_of_category_resets_filter() {
        let (mut module, mut container, mut toasts) = catalog();
        let mesa = module.products()[1].id;

        module.handle(
            Interaction::select(CATEGORY, "Mesas"),
            &mut container,
            &mut toasts,
        );
        module.handle(
            Interaction::Row {
                id: mesa,
                command: RowCommand::Delete,
            }
            .confirmed(),
            &mut container,
            &mut toasts,
        );

        let control = container.controls().iter().find(|c| c.id() == CATEGORY);
        assert_eq!(control.map(Control::value), Some("all"));
        assert_eq!(container.table().unwrap().rows.len(), 2);
    }

    #[test]
    fn test_update_product_via_form() {
        let (mut module, mut container, mut toasts) = catalog();
        let id = module.products()[0].id;

        module.handle(
            Interaction::Row {
                id,
                command: RowCommand::Edit,
            },
            &mut container,
            &mut toasts,
        );
        let form = container.form_mut().unwrap();
        form.fill("price", "2500.5");
        form.fill("category", "");
        let data = form.data();
        module.handle(Interaction::Submit(data), &mut container, &mut toasts);

        let product = &module.products()[0];
        assert_eq!(product.price, 2500.5);
        assert_eq!(product.category, DEFAULT_CATEGORY);
        assert_eq!(module.products().len(), 3);
    }

    #[test]
    fn test_blank_name_rejected() {
        let (mut module, mut container, mut toasts) = catalog();
        let data = FormData::new().with("name", "").with("price", "10");
        module.handle(Interaction::Submit(data), &mut container, &mut toasts);
        assert_eq!(module.products().len(), 3);
        assert_eq!(toasts.items().last().unwrap().message, "Enter the product name");
    }
}
