//! In-memory catalog.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ProductId;
use domain::collaborators::{Catalog, Result};
use domain::Product;

/// In-memory product catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product record.
    pub async fn put_product(&self, product: Product) {
        self.products
            .write()
            .unwrap()
            .insert(product.id.clone(), product);
    }

    /// Removes a product record. Historical order lines keep their
    /// frozen snapshot and render a placeholder name.
    pub async fn remove_product(&self, product_id: &ProductId) -> bool {
        self.products.write().unwrap().remove(product_id).is_some()
    }

    /// Returns the number of registered products.
    pub fn product_count(&self) -> usize {
        self.products.read().unwrap().len()
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn get_product(&self, product_id: &ProductId) -> Result<Option<Product>> {
        Ok(self.products.read().unwrap().get(product_id).cloned())
    }

    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>> {
        Ok(self
            .products
            .read()
            .unwrap()
            .values()
            .find(|p| p.name == name)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;

    #[tokio::test]
    async fn test_put_and_get_product() {
        let catalog = InMemoryCatalog::new();
        let product = Product::new("SKU-001", "Widget", Money::from_cents(1_000), 5);
        catalog.put_product(product.clone()).await;

        let found = catalog.get_product(&"SKU-001".into()).await.unwrap();
        assert_eq!(found, Some(product));
        assert_eq!(catalog.product_count(), 1);
    }

    #[tokio::test]
    async fn test_find_by_name_matches_exactly() {
        let catalog = InMemoryCatalog::new();
        catalog
            .put_product(Product::new("SKU-001", "Widget", Money::from_cents(100), 0))
            .await;

        assert!(catalog
            .find_product_by_name("Widget")
            .await
            .unwrap()
            .is_some());
        assert!(catalog
            .find_product_by_name("widget")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_remove_product_deletes_record() {
        let catalog = InMemoryCatalog::new();
        catalog
            .put_product(Product::new("SKU-001", "Widget", Money::from_cents(100), 0))
            .await;

        assert!(catalog.remove_product(&"SKU-001".into()).await);
        assert!(catalog.get_product(&"SKU-001".into()).await.unwrap().is_none());
    }
}
