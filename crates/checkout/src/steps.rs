//! Step names for the checkout unit of work.

/// Persist the order snapshot (with payment and line items).
pub const PERSIST_ORDER: &str = "persist_order";

/// Reserve inventory for every line item.
pub const RESERVE_INVENTORY: &str = "reserve_inventory";

/// Clear and save the customer's cart.
pub const CLEAR_CART: &str = "clear_cart";
