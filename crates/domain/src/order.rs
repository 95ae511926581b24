//! Immutable order snapshot types.
//!
//! An [`Order`] is created only by the checkout engine and never
//! mutated afterwards apart from status transitions. Line items own a
//! frozen copy of the product's price data rather than a live catalog
//! reference, so a product may be deleted without destroying order
//! history.

use chrono::NaiveDate;
use common::{AddressId, CustomerEmail, Money, OrderId, ProductId};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::cart::Cart;
use crate::product::DELETED_PRODUCT_PLACEHOLDER;

/// Lifecycle status of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed and inventory reserved.
    #[default]
    Accepted,

    /// Order cancelled; its reservation has been released.
    Cancelled,
}

impl OrderStatus {
    /// Returns the customer-facing status string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Accepted => "Order Accepted",
            OrderStatus::Cancelled => "Order Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line item frozen into an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Weak product reference; lookup only, no ownership.
    pub product_id: ProductId,

    /// Product name at order time.
    pub product_name: String,

    /// Units ordered.
    pub quantity: u32,

    /// Discount percent at order time.
    pub discount_percent: u32,

    /// Unit price at order time, decoupled from later product changes.
    pub ordered_price: Money,
}

impl OrderLineItem {
    /// Total contribution of this line (`ordered_price × quantity`).
    pub fn line_total(&self) -> Money {
        self.ordered_price * self.quantity
    }

    /// Name for display, falling back to a placeholder when the frozen
    /// name is empty (a dangling product reference).
    pub fn display_name(&self) -> &str {
        if self.product_name.is_empty() {
            DELETED_PRODUCT_PLACEHOLDER
        } else {
            &self.product_name
        }
    }
}

/// Payment record for an order.
///
/// The gateway has already been called by the time this exists; the
/// core only records the gateway's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub method: String,
    pub gateway_payment_id: String,
    pub gateway_status: String,
    pub gateway_message: String,
    pub gateway_name: String,
}

impl Payment {
    /// Creates a payment record from gateway results.
    pub fn new(
        method: impl Into<String>,
        gateway_payment_id: impl Into<String>,
        gateway_status: impl Into<String>,
        gateway_message: impl Into<String>,
        gateway_name: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            gateway_payment_id: gateway_payment_id.into(),
            gateway_status: gateway_status.into(),
            gateway_message: gateway_message.into(),
            gateway_name: gateway_name.into(),
        }
    }
}

/// Immutable snapshot of a checked-out cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,

    /// Customer who placed the order.
    pub customer: CustomerEmail,

    /// Date the order was placed.
    pub order_date: NaiveDate,

    /// Total price frozen from the cart.
    pub total: Money,

    /// Lifecycle status.
    pub status: OrderStatus,

    /// The shipping address chosen at checkout.
    pub address_id: AddressId,

    /// Owned copy of the shipping address at checkout time.
    pub shipping_address: Address,

    /// Frozen line items.
    pub items: Vec<OrderLineItem>,

    /// The payment recorded with this order.
    pub payment: Payment,
}

impl Order {
    /// Freezes a cart into an order snapshot.
    ///
    /// Line prices and discounts are copied from the cart's line items,
    /// not re-read from the catalog.
    pub fn from_cart(cart: &Cart, shipping_address: Address, payment: Payment) -> Self {
        let items = cart
            .lines()
            .map(|line| OrderLineItem {
                product_id: line.product_id.clone(),
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                discount_percent: line.discount_percent,
                ordered_price: line.unit_price,
            })
            .collect();

        Self {
            id: OrderId::new(),
            customer: cart.customer().clone(),
            order_date: chrono::Utc::now().date_naive(),
            total: cart.total(),
            status: OrderStatus::Accepted,
            address_id: shipping_address.id,
            shipping_address,
            items,
            payment,
        }
    }
}
