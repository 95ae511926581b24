//! Pricing policy.

use common::Money;

/// Computes the special price from a list price and a discount percent.
///
/// `special = list − (discount/100) × list`, in integer cents with
/// truncating division. Discounts above 100% are capped at 100%.
/// Pure function; recomputed whenever a product's price or discount
/// changes and propagated to open cart line items.
pub fn special_price(list_price: Money, discount_percent: u32) -> Money {
    let percent = i64::from(discount_percent.min(100));
    let discount = Money::from_cents(list_price.cents() * percent / 100);
    list_price - discount
}
