//! In-memory cart store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{CustomerEmail, ProductId};
use domain::Cart;
use domain::collaborators::{CartStore, Result, StoreError};

#[derive(Debug, Default)]
struct CartStoreState {
    carts: HashMap<CustomerEmail, Cart>,
    fail_on_save: bool,
    conflict_next_save: bool,
}

/// In-memory cart store keyed by customer.
///
/// Saves are conditional on the cart's version: a write whose version
/// is not exactly one ahead of the stored revision fails with a
/// version conflict, so two writers racing on the same cart cannot
/// overwrite each other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartStore {
    state: Arc<RwLock<CartStoreState>>,
}

impl InMemoryCartStore {
    /// Creates an empty cart store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `save` calls fail. Reads are unaffected.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.state.write().unwrap().fail_on_save = fail;
    }

    /// Makes the next `save` call fail with a version conflict, as if
    /// a concurrent writer had just landed. One-shot.
    pub fn set_conflict_on_next_save(&self) {
        self.state.write().unwrap().conflict_next_save = true;
    }

    /// Returns the number of stored carts.
    pub fn cart_count(&self) -> usize {
        self.state.read().unwrap().carts.len()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find_by_customer(&self, customer: &CustomerEmail) -> Result<Option<Cart>> {
        Ok(self.state.read().unwrap().carts.get(customer).cloned())
    }

    async fn carts_with_product(&self, product_id: &ProductId) -> Result<Vec<Cart>> {
        Ok(self
            .state
            .read()
            .unwrap()
            .carts
            .values()
            .filter(|cart| cart.contains(product_id))
            .cloned()
            .collect())
    }

    async fn save(&self, cart: &Cart) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_save {
            return Err(StoreError::Unavailable {
                operation: "cart save",
                reason: "injected failure".to_string(),
            });
        }

        if state.conflict_next_save {
            state.conflict_next_save = false;
            return Err(StoreError::VersionConflict {
                customer: cart.customer().clone(),
                expected: cart.version(),
                actual: cart.version(),
            });
        }

        let stored_version = state
            .carts
            .get(cart.customer())
            .map(Cart::version)
            .unwrap_or(0);
        if cart.version() != stored_version + 1 {
            return Err(StoreError::VersionConflict {
                customer: cart.customer().clone(),
                expected: cart.version(),
                actual: stored_version,
            });
        }

        state.carts.insert(cart.customer().clone(), cart.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use domain::{CartLineItem, Product};

    fn cart_with_widget(email: &str) -> Cart {
        let mut cart = Cart::new(CustomerEmail::new(email));
        let widget = Product::new("SKU-001", "Widget", Money::from_cents(1_000), 0);
        cart.add_line(CartLineItem::priced(&widget, 1)).unwrap();
        cart.bump_version();
        cart
    }

    #[tokio::test]
    async fn test_save_and_find_by_customer() {
        let store = InMemoryCartStore::new();
        let cart = cart_with_widget("alice@example.com");
        store.save(&cart).await.unwrap();

        let found = store
            .find_by_customer(&CustomerEmail::new("alice@example.com"))
            .await
            .unwrap();
        assert_eq!(found, Some(cart));
    }

    #[tokio::test]
    async fn test_save_replaces_previous_version() {
        let store = InMemoryCartStore::new();
        let mut cart = cart_with_widget("alice@example.com");
        store.save(&cart).await.unwrap();

        cart.clear();
        cart.bump_version();
        store.save(&cart).await.unwrap();

        let found = store
            .find_by_customer(&CustomerEmail::new("alice@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(found.version(), 2);
        assert_eq!(store.cart_count(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_stale_version() {
        let store = InMemoryCartStore::new();
        let cart = cart_with_widget("alice@example.com");
        store.save(&cart).await.unwrap();

        // A second writer holding the same revision loses the race.
        let err = store.save(&cart).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionConflict {
                expected: 1,
                actual: 1,
                ..
            }
        ));

        // The stored cart is the first writer's, untouched.
        let found = store
            .find_by_customer(&CustomerEmail::new("alice@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.version(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_skipped_version() {
        let store = InMemoryCartStore::new();
        let mut cart = cart_with_widget("alice@example.com");
        cart.bump_version();

        let err = store.save(&cart).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { .. }));
        assert_eq!(store.cart_count(), 0);
    }

    #[tokio::test]
    async fn test_carts_with_product_filters() {
        let store = InMemoryCartStore::new();
        store.save(&cart_with_widget("alice@example.com")).await.unwrap();
        store.save(&cart_with_widget("bob@example.com")).await.unwrap();

        let mut empty = Cart::new(CustomerEmail::new("carol@example.com"));
        empty.bump_version();
        store.save(&empty).await.unwrap();

        let holders = store.carts_with_product(&"SKU-001".into()).await.unwrap();
        assert_eq!(holders.len(), 2);
    }

    #[tokio::test]
    async fn test_fail_on_save_rejects_writes_only() {
        let store = InMemoryCartStore::new();
        let cart = cart_with_widget("alice@example.com");
        store.save(&cart).await.unwrap();

        store.set_fail_on_save(true);
        assert!(store.save(&cart).await.is_err());
        assert!(store
            .find_by_customer(&CustomerEmail::new("alice@example.com"))
            .await
            .unwrap()
            .is_some());
    }
}
