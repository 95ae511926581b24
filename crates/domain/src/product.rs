//! Product catalog record.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::pricing;

/// Display name substituted when a line item's product reference no
/// longer resolves in the catalog.
pub const DELETED_PRODUCT_PLACEHOLDER: &str = "[deleted product]";

/// A catalog product.
///
/// Available quantity is owned by the inventory ledger, not the catalog
/// record; this type carries pricing metadata only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier (SKU).
    pub id: ProductId,

    /// Human-readable product name.
    pub name: String,

    /// Undiscounted list price.
    pub list_price: Money,

    /// Discount percent applied to the list price (0–100).
    pub discount_percent: u32,
}

impl Product {
    /// Creates a product record.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        list_price: Money,
        discount_percent: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            list_price,
            discount_percent,
        }
    }

    /// The price customers actually pay: list price after discount.
    pub fn special_price(&self) -> Money {
        pricing::special_price(self.list_price, self.discount_percent)
    }
}
