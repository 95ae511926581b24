//! End-to-end checkout flows driving the cart service and the checkout
//! engine over shared in-memory stores.

use checkout::{CheckoutEngine, CheckoutError, CheckoutState, PlaceOrder};
use common::{AddressId, CustomerEmail, Money};
use domain::collaborators::OrderStore;
use domain::{Address, CartService, OrderStatus, Product};
use inventory::{InMemoryInventoryLedger, InventoryLedger};
use store::{InMemoryAddressBook, InMemoryCartStore, InMemoryCatalog, InMemoryOrderStore};

struct Shop {
    catalog: InMemoryCatalog,
    carts: InMemoryCartStore,
    orders: InMemoryOrderStore,
    addresses: InMemoryAddressBook,
    ledger: InMemoryInventoryLedger,
    cart_service: CartService<InMemoryCatalog, InMemoryCartStore, InMemoryInventoryLedger>,
    engine: CheckoutEngine<
        InMemoryAddressBook,
        InMemoryCartStore,
        InMemoryOrderStore,
        InMemoryInventoryLedger,
    >,
}

async fn shop() -> Shop {
    let catalog = InMemoryCatalog::new();
    let carts = InMemoryCartStore::new();
    let orders = InMemoryOrderStore::new();
    let addresses = InMemoryAddressBook::new();
    let ledger = InMemoryInventoryLedger::new();

    catalog
        .put_product(Product::new(
            "SKU-001",
            "Widget",
            Money::from_cents(1_000),
            0,
        ))
        .await;
    catalog
        .put_product(Product::new(
            "SKU-002",
            "Gadget",
            Money::from_cents(2_500),
            20,
        ))
        .await;
    ledger.set_stock("SKU-001", 5).await;
    ledger.set_stock("SKU-002", 1).await;

    let cart_service = CartService::new(catalog.clone(), carts.clone(), ledger.clone());
    let engine = CheckoutEngine::new(
        addresses.clone(),
        carts.clone(),
        orders.clone(),
        ledger.clone(),
    );

    Shop {
        catalog,
        carts,
        orders,
        addresses,
        ledger,
        cart_service,
        engine,
    }
}

async fn shipping_address(shop: &Shop) -> AddressId {
    shop.addresses
        .put_address(Address::new(
            "1 Main St", "Unit 4", "Springfield", "IL", "USA", "627010",
        ))
        .await
}

fn place_order_cmd(customer: CustomerEmail, address_id: AddressId) -> PlaceOrder {
    PlaceOrder {
        customer,
        address_id,
        payment_method: "card".to_string(),
        gateway_payment_id: "pg-1".to_string(),
        gateway_status: "approved".to_string(),
        gateway_message: "ok".to_string(),
        gateway_name: "stripe".to_string(),
    }
}

#[tokio::test]
async fn test_cart_to_order_happy_path() {
    let shop = shop().await;
    let alice = CustomerEmail::new("alice@example.com");
    let address_id = shipping_address(&shop).await;

    shop.cart_service
        .add_item(&alice, &"SKU-001".into(), 3)
        .await
        .unwrap();
    shop.cart_service
        .add_item(&alice, &"SKU-002".into(), 1)
        .await
        .unwrap();

    let placed = shop
        .engine
        .place_order(place_order_cmd(alice.clone(), address_id))
        .await
        .unwrap();

    assert_eq!(placed.attempt.state(), CheckoutState::Complete);
    assert_eq!(placed.order.status, OrderStatus::Accepted);
    assert_eq!(placed.order.items.len(), 2);
    // 3 × $10.00 + 1 × $20.00 (20% off $25.00).
    assert_eq!(placed.order.total, Money::from_cents(5_000));

    // Stock decremented, cart emptied but still retrievable.
    assert_eq!(shop.ledger.available(&"SKU-001".into()).await.unwrap(), 2);
    assert_eq!(shop.ledger.available(&"SKU-002".into()).await.unwrap(), 0);
    let cart = shop.cart_service.get_cart(&alice).await.unwrap();
    assert!(cart.is_empty());

    let stored = shop.orders.get(placed.order.id).await.unwrap().unwrap();
    assert_eq!(stored, placed.order);
}

#[tokio::test]
async fn test_order_prices_are_frozen_against_later_changes() {
    let shop = shop().await;
    let alice = CustomerEmail::new("alice@example.com");
    let address_id = shipping_address(&shop).await;

    shop.cart_service
        .add_item(&alice, &"SKU-001".into(), 2)
        .await
        .unwrap();

    let placed = shop
        .engine
        .place_order(place_order_cmd(alice, address_id))
        .await
        .unwrap();

    // The product gets repriced after checkout.
    shop.catalog
        .put_product(Product::new(
            "SKU-001",
            "Widget",
            Money::from_cents(9_900),
            0,
        ))
        .await;

    let stored = shop.orders.get(placed.order.id).await.unwrap().unwrap();
    assert_eq!(stored.items[0].ordered_price, Money::from_cents(1_000));
    assert_eq!(stored.total, Money::from_cents(2_000));
}

#[tokio::test]
async fn test_price_sync_before_checkout_is_reflected_in_the_order() {
    let shop = shop().await;
    let alice = CustomerEmail::new("alice@example.com");
    let address_id = shipping_address(&shop).await;

    shop.cart_service
        .add_item(&alice, &"SKU-001".into(), 2)
        .await
        .unwrap();

    // Reprice while the item sits in the cart, then propagate.
    shop.catalog
        .put_product(Product::new(
            "SKU-001",
            "Widget",
            Money::from_cents(1_000),
            25,
        ))
        .await;
    let refreshed = shop
        .cart_service
        .sync_price_on_product_change(&"SKU-001".into())
        .await
        .unwrap();
    assert_eq!(refreshed, 1);

    let placed = shop
        .engine
        .place_order(place_order_cmd(alice, address_id))
        .await
        .unwrap();

    assert_eq!(placed.order.items[0].ordered_price, Money::from_cents(750));
    assert_eq!(placed.order.items[0].discount_percent, 25);
    assert_eq!(placed.order.total, Money::from_cents(1_500));
}

#[tokio::test]
async fn test_drained_stock_rolls_back_and_keeps_the_cart() {
    let shop = shop().await;
    let alice = CustomerEmail::new("alice@example.com");
    let address_id = shipping_address(&shop).await;

    shop.cart_service
        .add_item(&alice, &"SKU-001".into(), 4)
        .await
        .unwrap();

    // Stock drains between carting and checkout.
    shop.ledger.set_stock("SKU-001", 1).await;

    let err = shop
        .engine
        .place_order(place_order_cmd(alice.clone(), address_id))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));
    assert!(!err.is_fatal());
    assert_eq!(shop.orders.order_count(), 0);
    assert_eq!(shop.ledger.available(&"SKU-001".into()).await.unwrap(), 1);

    // The customer can fix the cart and retry.
    let cart = shop.cart_service.get_cart(&alice).await.unwrap();
    assert_eq!(cart.line_count(), 1);
    shop.cart_service
        .update_item_quantity(&alice, &"SKU-001".into(), -3)
        .await
        .unwrap();
    let placed = shop
        .engine
        .place_order(place_order_cmd(alice, address_id))
        .await
        .unwrap();
    assert_eq!(placed.order.total, Money::from_cents(1_000));
    assert_eq!(shop.ledger.available(&"SKU-001".into()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_cart_save_failure_releases_stock_and_deletes_the_order() {
    let shop = shop().await;
    let alice = CustomerEmail::new("alice@example.com");
    let address_id = shipping_address(&shop).await;

    shop.cart_service
        .add_item(&alice, &"SKU-001".into(), 2)
        .await
        .unwrap();

    shop.carts.set_fail_on_save(true);
    let err = shop
        .engine
        .place_order(place_order_cmd(alice.clone(), address_id))
        .await
        .unwrap_err();
    shop.carts.set_fail_on_save(false);

    assert!(matches!(err, CheckoutError::Store(_)));
    assert_eq!(shop.orders.order_count(), 0);
    assert_eq!(shop.ledger.available(&"SKU-001".into()).await.unwrap(), 5);
    let cart = shop.cart_service.get_cart(&alice).await.unwrap();
    assert_eq!(cart.line_count(), 1);
}

#[tokio::test]
async fn test_concurrent_checkouts_for_last_unit_have_one_winner() {
    let shop = shop().await;
    let address_id = shipping_address(&shop).await;
    let alice = CustomerEmail::new("alice@example.com");
    let bob = CustomerEmail::new("bob@example.com");

    // Both customers carted the last gadget before either checks out.
    shop.cart_service
        .add_item(&alice, &"SKU-002".into(), 1)
        .await
        .unwrap();
    shop.cart_service
        .add_item(&bob, &"SKU-002".into(), 1)
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        shop.engine
            .place_order(place_order_cmd(alice.clone(), address_id)),
        shop.engine
            .place_order(place_order_cmd(bob.clone(), address_id)),
    );

    assert!(a.is_ok() ^ b.is_ok(), "exactly one checkout must win");
    let winner_won = a.is_ok();
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(
        loser.unwrap_err(),
        CheckoutError::InsufficientStock {
            requested: 1,
            available: 0,
            ..
        }
    ));

    assert_eq!(shop.ledger.available(&"SKU-002".into()).await.unwrap(), 0);
    assert_eq!(shop.orders.order_count(), 1);

    // The loser's cart survived intact for a later retry.
    let loser_email = if winner_won { bob } else { alice };
    let loser_cart = shop.cart_service.get_cart(&loser_email).await.unwrap();
    assert_eq!(loser_cart.line_count(), 1);
}

#[tokio::test]
async fn test_second_checkout_of_an_empty_cart_is_rejected() {
    let shop = shop().await;
    let alice = CustomerEmail::new("alice@example.com");
    let address_id = shipping_address(&shop).await;

    shop.cart_service
        .add_item(&alice, &"SKU-001".into(), 1)
        .await
        .unwrap();
    shop.engine
        .place_order(place_order_cmd(alice.clone(), address_id))
        .await
        .unwrap();

    let err = shop
        .engine
        .place_order(place_order_cmd(alice, address_id))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart { .. }));
    assert_eq!(shop.orders.order_count(), 1);
}
