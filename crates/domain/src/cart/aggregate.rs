//! Cart aggregate.

use std::collections::HashMap;

use common::{CartId, CustomerEmail, Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::product::Product;

use super::CartError;

/// A line item inside a cart.
///
/// Price and discount are frozen at add time and refreshed only by
/// quantity updates and explicit price sync. Owned exclusively by its
/// cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Weak product reference; lookup only, no ownership.
    pub product_id: ProductId,

    /// Product name at add time.
    pub product_name: String,

    /// Units in the cart (always ≥ 1; a line at 0 is removed instead).
    pub quantity: u32,

    /// Special price per unit at add time.
    pub unit_price: Money,

    /// Discount percent at add time.
    pub discount_percent: u32,
}

impl CartLineItem {
    /// Creates a line item priced from the product's current state.
    pub fn priced(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.special_price(),
            discount_percent: product.discount_percent,
        }
    }

    /// Total contribution of this line (`unit_price × quantity`).
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// Mutable pre-order basket for one customer.
///
/// Holds at most one line item per product. The cached total equals
/// `Σ(line.unit_price × line.quantity)` after every mutation; each
/// mutation either fully applies or leaves the cart unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    customer: CustomerEmail,
    items: HashMap<ProductId, CartLineItem>,
    total: Money,
    version: u64,
}

impl Cart {
    /// Creates an empty cart for a customer.
    pub fn new(customer: CustomerEmail) -> Self {
        Self {
            id: CartId::new(),
            customer,
            items: HashMap::new(),
            total: Money::zero(),
            version: 0,
        }
    }

    /// Returns the cart identifier.
    pub fn id(&self) -> CartId {
        self.id
    }

    /// Returns the persisted revision this cart was loaded at.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Marks a new revision before saving.
    ///
    /// The cart store only accepts a save whose version is exactly one
    /// ahead of the stored revision, so a writer holding a stale copy
    /// gets a version conflict instead of overwriting a concurrent
    /// update. Callers bump once per load-mutate-save cycle.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Returns the owning customer.
    pub fn customer(&self) -> &CustomerEmail {
        &self.customer
    }

    /// Returns the cached total price.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Returns all line items.
    pub fn lines(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.values()
    }

    /// Returns the line item for a product.
    pub fn get_line(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.get(product_id)
    }

    /// Returns true if the cart holds a line item for the product.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.contains_key(product_id)
    }

    /// Returns the number of line items.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a line item and increments the total by its contribution.
    pub fn add_line(&mut self, line: CartLineItem) -> Result<(), CartError> {
        if line.quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity: 0 });
        }

        if self.items.contains_key(&line.product_id) {
            return Err(CartError::DuplicateItem {
                product_id: line.product_id,
            });
        }

        self.total += line.line_total();
        self.items.insert(line.product_id.clone(), line);
        Ok(())
    }

    /// Sets a line to a new absolute quantity, refreshing its price and
    /// discount, and recomputes the total as `total − old + new`.
    ///
    /// A new quantity of 0 removes the line instead of leaving a
    /// zero-quantity row.
    pub fn set_line_quantity(
        &mut self,
        product_id: &ProductId,
        new_quantity: u32,
        unit_price: Money,
        discount_percent: u32,
    ) -> Result<(), CartError> {
        if new_quantity == 0 {
            return self.remove_line(product_id).map(|_| ());
        }

        let line = self
            .items
            .get_mut(product_id)
            .ok_or_else(|| CartError::ItemNotFound {
                product_id: product_id.clone(),
            })?;

        let old_contribution = line.line_total();
        line.quantity = new_quantity;
        line.unit_price = unit_price;
        line.discount_percent = discount_percent;

        self.total = self.total - old_contribution + line.line_total();
        Ok(())
    }

    /// Removes a line item and decrements the total by its contribution.
    pub fn remove_line(&mut self, product_id: &ProductId) -> Result<CartLineItem, CartError> {
        let line = self
            .items
            .remove(product_id)
            .ok_or_else(|| CartError::ItemNotFound {
                product_id: product_id.clone(),
            })?;

        self.total -= line.line_total();
        Ok(line)
    }

    /// Refreshes one line's price and discount without touching its
    /// quantity, recomputing the total.
    pub fn sync_price(
        &mut self,
        product_id: &ProductId,
        unit_price: Money,
        discount_percent: u32,
        product_name: &str,
    ) -> Result<(), CartError> {
        let line = self
            .items
            .get_mut(product_id)
            .ok_or_else(|| CartError::ItemNotFound {
                product_id: product_id.clone(),
            })?;

        let old_contribution = line.line_total();
        line.unit_price = unit_price;
        line.discount_percent = discount_percent;
        line.product_name = product_name.to_string();

        self.total = self.total - old_contribution + line.line_total();
        Ok(())
    }

    /// Removes all line items and zeroes the total. The cart survives
    /// checkout cleared, not deleted.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Money::zero();
    }

    #[cfg(test)]
    fn recomputed_total(&self) -> Money {
        self.items.values().map(CartLineItem::line_total).sum()
    }
}
