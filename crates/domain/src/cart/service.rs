//! Cart orchestration service.

use common::{CustomerEmail, ProductId};
use inventory::InventoryLedger;

use crate::collaborators::{Catalog, CartStore, StoreError};
use crate::error::DomainError;
use crate::product::Product;

use super::{Cart, CartError, CartLineItem};

/// Request-scoped orchestration of cart mutations.
///
/// Every mutation consults the catalog for current pricing and the
/// ledger for availability, applies the change to the aggregate, and
/// persists through the cart store. Mutations run a load-mutate-save
/// cycle against the store's conditional save: a version conflict means
/// another writer landed first, so the cycle retries from a fresh load
/// and no update is lost. A non-conflict failure leaves the stored cart
/// unchanged.
pub struct CartService<C, S, L> {
    catalog: C,
    carts: S,
    ledger: L,
}

impl<C, S, L> CartService<C, S, L>
where
    C: Catalog,
    S: CartStore,
    L: InventoryLedger,
{
    /// Creates a cart service over the given collaborators.
    pub fn new(catalog: C, carts: S, ledger: L) -> Self {
        Self {
            catalog,
            carts,
            ledger,
        }
    }

    /// Adds a product to the customer's cart, creating the cart lazily
    /// on first use.
    ///
    /// Fails with `DuplicateItem` if the product already has a line
    /// item, `OutOfStock` if availability is zero, and
    /// `InsufficientStock` if availability cannot cover `quantity`.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        customer: &CustomerEmail,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, DomainError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity: 0 }.into());
        }

        let product = self.require_product(product_id).await?;

        loop {
            let mut cart = match self.carts.find_by_customer(customer).await? {
                Some(cart) => cart,
                None => Cart::new(customer.clone()),
            };

            if cart.contains(product_id) {
                return Err(CartError::DuplicateItem {
                    product_id: product_id.clone(),
                }
                .into());
            }

            self.check_stock(product_id, quantity).await?;

            cart.add_line(CartLineItem::priced(&product, quantity))?;
            cart.bump_version();
            match self.carts.save(&cart).await {
                Ok(()) => {
                    metrics::counter!("cart_items_added_total").increment(1);
                    tracing::info!(%customer, %product_id, quantity, "item added to cart");
                    return Ok(cart);
                }
                Err(StoreError::VersionConflict { .. }) => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Adjusts a line item's quantity by `delta` units.
    ///
    /// The stock check runs against the resulting absolute quantity. A
    /// result of 0 removes the line; a result outside `0..=u32::MAX`
    /// (negative, overflowing, or past the line-quantity range) is
    /// rejected as invalid. Price and discount refresh from the current
    /// product state.
    #[tracing::instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        customer: &CustomerEmail,
        product_id: &ProductId,
        delta: i64,
    ) -> Result<Cart, DomainError> {
        let product = self.require_product(product_id).await?;

        loop {
            let mut cart = self.require_cart(customer).await?;

            let line = cart
                .get_line(product_id)
                .ok_or_else(|| CartError::ItemNotFound {
                    product_id: product_id.clone(),
                })?;

            let new_quantity = i64::from(line.quantity)
                .checked_add(delta)
                .ok_or(CartError::InvalidQuantity { quantity: delta })?;
            let new_quantity = u32::try_from(new_quantity)
                .map_err(|_| CartError::InvalidQuantity {
                    quantity: new_quantity,
                })?;

            if new_quantity > 0 {
                self.check_stock(product_id, new_quantity).await?;
            }

            cart.set_line_quantity(
                product_id,
                new_quantity,
                product.special_price(),
                product.discount_percent,
            )?;
            cart.bump_version();
            match self.carts.save(&cart).await {
                Ok(()) => {
                    tracing::info!(%customer, %product_id, new_quantity, "cart quantity updated");
                    return Ok(cart);
                }
                Err(StoreError::VersionConflict { .. }) => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Removes a line item from the customer's cart.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(
        &self,
        customer: &CustomerEmail,
        product_id: &ProductId,
    ) -> Result<Cart, DomainError> {
        loop {
            let mut cart = self.require_cart(customer).await?;

            cart.remove_line(product_id)?;
            cart.bump_version();
            match self.carts.save(&cart).await {
                Ok(()) => {
                    metrics::counter!("cart_items_removed_total").increment(1);
                    tracing::info!(%customer, %product_id, "item removed from cart");
                    return Ok(cart);
                }
                Err(StoreError::VersionConflict { .. }) => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Returns the customer's cart.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart(&self, customer: &CustomerEmail) -> Result<Cart, DomainError> {
        self.require_cart(customer).await
    }

    /// Propagates a product price/discount change to every open cart
    /// holding a line item for it. Quantities are untouched. Returns
    /// the number of carts actually refreshed.
    ///
    /// The sweep is not transactional: a store failure aborts it, and
    /// carts saved before the failure keep the new price. Each line is
    /// refreshed from the current product state, so calling again after
    /// a failure finishes the remaining carts without double-applying.
    #[tracing::instrument(skip(self))]
    pub async fn sync_price_on_product_change(
        &self,
        product_id: &ProductId,
    ) -> Result<usize, DomainError> {
        let product = self.require_product(product_id).await?;
        let mut refreshed = 0;

        for mut cart in self.carts.carts_with_product(product_id).await? {
            loop {
                cart.sync_price(
                    product_id,
                    product.special_price(),
                    product.discount_percent,
                    &product.name,
                )?;
                cart.bump_version();
                match self.carts.save(&cart).await {
                    Ok(()) => {
                        refreshed += 1;
                        break;
                    }
                    Err(StoreError::VersionConflict { .. }) => {
                        // A concurrent mutation landed; the line may be gone.
                        match self.carts.find_by_customer(cart.customer()).await? {
                            Some(fresh) if fresh.contains(product_id) => cart = fresh,
                            _ => break,
                        }
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }

        tracing::info!(%product_id, refreshed, "cart prices synced");
        Ok(refreshed)
    }

    async fn require_cart(&self, customer: &CustomerEmail) -> Result<Cart, DomainError> {
        self.carts
            .find_by_customer(customer)
            .await?
            .ok_or_else(|| DomainError::CartNotFound {
                customer: customer.clone(),
            })
    }

    async fn require_product(&self, product_id: &ProductId) -> Result<Product, DomainError> {
        self.catalog
            .get_product(product_id)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound {
                product_id: product_id.clone(),
            })
    }

    /// Zero availability reads as out-of-stock; a shortfall against the
    /// requested quantity reads as insufficient stock.
    async fn check_stock(&self, product_id: &ProductId, needed: u32) -> Result<(), DomainError> {
        let available = self.ledger.available(product_id).await?;

        if available == 0 {
            return Err(DomainError::OutOfStock {
                product_id: product_id.clone(),
            });
        }

        if available < needed {
            return Err(DomainError::InsufficientStock {
                product_id: product_id.clone(),
                requested: needed,
                available,
            });
        }

        Ok(())
    }
}
