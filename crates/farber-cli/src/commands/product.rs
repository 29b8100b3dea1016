//! Product command handlers

use std::rc::Rc;

use anyhow::{anyhow, bail, Result};

use farber_core::filter::Selection;
use farber_core::modules::products::filter_products;
use farber_core::modules::ProductsModule;
use farber_core::{KeyValueStore, Product, ProductFields};

use super::{confirm_delete, resolve_id};
use crate::output::Output;

/// Field changes for `product update`; `None` keeps the current value
#[derive(Debug, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl ProductChanges {
    fn apply_to(self, product: &Product) -> ProductFields {
        ProductFields {
            name: self.name.unwrap_or_else(|| product.name.clone()),
            price: self.price.unwrap_or(product.price),
            category: self.category.unwrap_or_else(|| product.category.clone()),
            description: self
                .description
                .unwrap_or_else(|| product.description.clone()),
        }
    }
}

fn find(module: &ProductsModule, id: &str) -> Result<Product> {
    let uuid = resolve_id(id, module.products(), "product", |p| p.name.clone())?;
    module
        .products()
        .iter()
        .find(|p| p.id == uuid)
        .cloned()
        .ok_or_else(|| anyhow!("Product not found: {}", id))
}

pub fn add(namespace: Rc<dyn KeyValueStore>, fields: ProductFields, output: &mut Output) -> Result<()> {
    let mut module = ProductsModule::new(namespace);
    module.load();

    let product = module.add_product(fields, output)?;
    output.finish()?;
    output.print_product(&product, module.money());

    Ok(())
}

pub fn update(
    namespace: Rc<dyn KeyValueStore>,
    id: String,
    changes: ProductChanges,
    output: &mut Output,
) -> Result<()> {
    let mut module = ProductsModule::new(namespace);
    module.load();

    let product = find(&module, &id)?;
    if !module.update_product(product.id, changes.apply_to(&product), output)? {
        bail!("Product not found: {}", id);
    }
    output.finish()?;

    if let Some(updated) = module.products().iter().find(|p| p.id == product.id) {
        output.print_product(updated, module.money());
    }
    Ok(())
}

/// List products matching a name search and category
pub fn list(
    namespace: Rc<dyn KeyValueStore>,
    search: Option<String>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut module = ProductsModule::new(namespace);
    module.load();

    let category = category.map_or(Selection::All, Selection::Only);
    let products = filter_products(module.products(), search.as_deref().unwrap_or(""), &category);
    output.print_products(&products, module.money());

    Ok(())
}

pub fn delete(namespace: Rc<dyn KeyValueStore>, id: String, output: &mut Output) -> Result<()> {
    let mut module = ProductsModule::new(namespace);
    module.load();

    let product = find(&module, &id)?;
    if !confirm_delete(output, &format!("product: {}", product.name))? {
        return Ok(());
    }

    module.delete_product(product.id, output);
    output.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use farber_core::models::{DEFAULT_CATEGORY, PRODUCTS_KEY};
    use farber_core::storage::RecordStore;
    use farber_core::FileNamespace;
    use tempfile::TempDir;

    fn namespace(dir: &TempDir) -> Rc<dyn KeyValueStore> {
        Rc::new(FileNamespace::new(dir.path()))
    }

    fn stored(dir: &TempDir) -> Vec<Product> {
        RecordStore::<Product>::open(namespace(dir), PRODUCTS_KEY)
            .items()
            .to_vec()
    }

    #[test]
    fn test_add_update_delete() {
        let temp_dir = TempDir::new().unwrap();
        let mut output = Output::new(OutputFormat::Quiet);
        let fields = ProductFields {
            name: "Mesa ratona".to_string(),
            price: 85000.0,
            ..Default::default()
        };
        add(namespace(&temp_dir), fields, &mut output).unwrap();

        let product = stored(&temp_dir)[0].clone();
        assert_eq!(product.category, DEFAULT_CATEGORY);

        let changes = ProductChanges {
            price: Some(90000.0),
            category: Some("Living".to_string()),
            ..Default::default()
        };
        update(namespace(&temp_dir), product.id.to_string(), changes, &mut output).unwrap();
        let updated = stored(&temp_dir)[0].clone();
        assert_eq!(updated.name, "Mesa ratona");
        assert_eq!(updated.price, 90000.0);
        assert_eq!(updated.category, "Living");

        delete(namespace(&temp_dir), product.id.to_string(), &mut output).unwrap();
        assert!(stored(&temp_dir).is_empty());
    }
}
