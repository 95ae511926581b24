//! In-memory order store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::collaborators::{OrderStore, Result, StoreError};
use domain::Order;

#[derive(Debug, Default)]
struct OrderStoreState {
    orders: HashMap<OrderId, Order>,
    fail_on_insert: bool,
    fail_on_delete: bool,
}

/// In-memory order store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<OrderStoreState>>,
}

impl InMemoryOrderStore {
    /// Creates an empty order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `insert` calls fail.
    pub fn set_fail_on_insert(&self, fail: bool) {
        self.state.write().unwrap().fail_on_insert = fail;
    }

    /// Makes subsequent `delete` calls fail. Checkout rollback tests
    /// use this to exercise the compensation-failure path.
    pub fn set_fail_on_delete(&self, fail: bool) {
        self.state.write().unwrap().fail_on_delete = fail;
    }

    /// Returns the number of persisted orders.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_insert {
            return Err(StoreError::Unavailable {
                operation: "order insert",
                reason: "injected failure".to_string(),
            });
        }

        state.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.read().unwrap().orders.get(&order_id).cloned())
    }

    async fn delete(&self, order_id: OrderId) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_delete {
            return Err(StoreError::Unavailable {
                operation: "order delete",
                reason: "injected failure".to_string(),
            });
        }

        state.orders.remove(&order_id);
        Ok(())
    }
}
