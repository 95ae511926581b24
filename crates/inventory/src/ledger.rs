//! Inventory ledger trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{InventoryError, Result};

/// One line of a multi-product reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReservation {
    /// The product to reserve.
    pub product_id: ProductId,
    /// Units to reserve.
    pub quantity: u32,
}

impl StockReservation {
    /// Creates a reservation line.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Per-product available-quantity ledger.
///
/// Implementations must serialize concurrent check-and-decrement calls
/// for the same product: a `reserve` that observed sufficient stock must
/// decrement before any competing reserve observes the counter.
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Returns the available quantity for a product.
    async fn available(&self, product_id: &ProductId) -> Result<u32>;

    /// Decrements available quantity, returning the new availability.
    ///
    /// Fails with [`InventoryError::InsufficientStock`] when available
    /// stock cannot cover `quantity`; the counter is left unchanged.
    async fn reserve(&self, product_id: &ProductId, quantity: u32) -> Result<u32>;

    /// Increments available quantity, returning the new availability.
    ///
    /// Used by order cancellation and checkout rollback.
    async fn release(&self, product_id: &ProductId, quantity: u32) -> Result<u32>;

    /// Reserves every line or none of them.
    ///
    /// If any single product cannot cover its requested quantity, no
    /// counter is decremented and the failing line's error is returned.
    async fn reserve_all(&self, lines: &[StockReservation]) -> Result<()>;

    /// Releases every line. Compensates a prior `reserve_all`.
    async fn release_all(&self, lines: &[StockReservation]) -> Result<()>;
}

/// In-memory ledger.
///
/// All counters live behind a single `RwLock`, so `reserve_all` can
/// validate and apply a whole order's decrements under one write-lock
/// acquisition. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryInventoryLedger {
    stock: Arc<RwLock<HashMap<ProductId, u32>>>,
}

impl InMemoryInventoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the available quantity for a product, creating the record
    /// if it does not exist.
    pub async fn set_stock(&self, product_id: impl Into<ProductId>, quantity: u32) {
        self.stock.write().await.insert(product_id.into(), quantity);
    }

    /// Returns the number of tracked products.
    pub async fn tracked_products(&self) -> usize {
        self.stock.read().await.len()
    }
}

#[async_trait]
impl InventoryLedger for InMemoryInventoryLedger {
    async fn available(&self, product_id: &ProductId) -> Result<u32> {
        self.stock
            .read()
            .await
            .get(product_id)
            .copied()
            .ok_or_else(|| InventoryError::ProductNotTracked(product_id.clone()))
    }

    async fn reserve(&self, product_id: &ProductId, quantity: u32) -> Result<u32> {
        let mut stock = self.stock.write().await;
        let available = stock
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::ProductNotTracked(product_id.clone()))?;

        if *available < quantity {
            return Err(InventoryError::InsufficientStock {
                product_id: product_id.clone(),
                requested: quantity,
                available: *available,
            });
        }

        *available -= quantity;
        Ok(*available)
    }

    async fn release(&self, product_id: &ProductId, quantity: u32) -> Result<u32> {
        let mut stock = self.stock.write().await;
        let available = stock
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::ProductNotTracked(product_id.clone()))?;

        *available += quantity;
        Ok(*available)
    }

    async fn reserve_all(&self, lines: &[StockReservation]) -> Result<()> {
        let mut stock = self.stock.write().await;

        // Validate every line before touching any counter.
        for line in lines {
            let available = stock
                .get(&line.product_id)
                .copied()
                .ok_or_else(|| InventoryError::ProductNotTracked(line.product_id.clone()))?;

            if available < line.quantity {
                return Err(InventoryError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    requested: line.quantity,
                    available,
                });
            }
        }

        for line in lines {
            if let Some(available) = stock.get_mut(&line.product_id) {
                *available -= line.quantity;
            }
        }

        tracing::debug!(lines = lines.len(), "inventory reserved");
        Ok(())
    }

    async fn release_all(&self, lines: &[StockReservation]) -> Result<()> {
        let mut stock = self.stock.write().await;

        for line in lines {
            let available = stock
                .get_mut(&line.product_id)
                .ok_or_else(|| InventoryError::ProductNotTracked(line.product_id.clone()))?;
            *available += line.quantity;
        }

        tracing::debug!(lines = lines.len(), "inventory released");
        Ok(())
    }
}
