//! Checkout engine.

use common::{AddressId, CustomerEmail, OrderId};
use domain::collaborators::{AddressBook, CartStore, OrderStore, StoreError};
use domain::{Order, Payment};
use inventory::{InventoryLedger, StockReservation};

use crate::attempt::CheckoutAttempt;
use crate::error::{CheckoutError, Result};
use crate::state::CheckoutState;
use crate::steps;

/// Command to place an order from the customer's cart.
///
/// Gateway fields record the result of a payment-gateway call that has
/// already happened; the engine never calls a gateway itself.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub customer: CustomerEmail,
    pub address_id: AddressId,
    pub payment_method: String,
    pub gateway_payment_id: String,
    pub gateway_status: String,
    pub gateway_message: String,
    pub gateway_name: String,
}

/// A successfully placed order together with the attempt record.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    /// The persisted order snapshot.
    pub order: Order,
    /// The attempt that produced it, in the `Complete` state.
    pub attempt: CheckoutAttempt,
}

/// Orchestrates the atomic transition of one cart into one order.
///
/// Validation (cart, address, emptiness) is free of side effects and
/// safe to retry. The unit of work — persist order, reserve inventory,
/// clear cart — compensates completed steps in reverse order when a
/// later step fails. The cart clear is a conditional save: a cart
/// mutated after the checkout loaded it raises a version conflict, the
/// attempt compensates fully, and the whole checkout re-runs against
/// the fresh cart.
pub struct CheckoutEngine<A, CS, OS, L> {
    addresses: A,
    carts: CS,
    orders: OS,
    ledger: L,
}

impl<A, CS, OS, L> CheckoutEngine<A, CS, OS, L>
where
    A: AddressBook,
    CS: CartStore,
    OS: OrderStore,
    L: InventoryLedger,
{
    /// Creates a checkout engine over the given collaborators.
    pub fn new(addresses: A, carts: CS, orders: OS, ledger: L) -> Self {
        Self {
            addresses,
            carts,
            orders,
            ledger,
        }
    }

    /// Places an order from the customer's cart.
    #[tracing::instrument(skip(self, cmd), fields(customer = %cmd.customer))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<PlacedOrder> {
        loop {
            match self.place_order_once(&cmd).await {
                Err(CheckoutError::Store(StoreError::VersionConflict { .. })) => {
                    tracing::debug!(
                        customer = %cmd.customer,
                        "cart changed during checkout, retrying"
                    );
                }
                outcome => return outcome,
            }
        }
    }

    /// One checkout attempt. A version conflict on the cart clear
    /// surfaces to the caller after full compensation.
    async fn place_order_once(&self, cmd: &PlaceOrder) -> Result<PlacedOrder> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let start = std::time::Instant::now();
        let mut attempt = CheckoutAttempt::new();

        // Validation phase: no side effects yet.
        let mut cart = self
            .carts
            .find_by_customer(&cmd.customer)
            .await?
            .ok_or_else(|| CheckoutError::CartNotFound {
                customer: cmd.customer.clone(),
            })?;

        let address = self
            .addresses
            .get_address(cmd.address_id)
            .await?
            .ok_or(CheckoutError::AddressNotFound {
                address_id: cmd.address_id,
            })?;
        attempt.advance(CheckoutState::AddressResolved);

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart {
                customer: cmd.customer.clone(),
            });
        }

        // Freeze the cart into an order snapshot. Line prices come from
        // the cart, not the catalog.
        let payment = Payment::new(
            cmd.payment_method.clone(),
            cmd.gateway_payment_id.clone(),
            cmd.gateway_status.clone(),
            cmd.gateway_message.clone(),
            cmd.gateway_name.clone(),
        );
        let order = Order::from_cart(&cart, address, payment);
        attempt.advance(CheckoutState::OrderCreated);

        let reservations: Vec<StockReservation> = order
            .items
            .iter()
            .map(|line| StockReservation::new(line.product_id.clone(), line.quantity))
            .collect();

        // Unit of work, step 1: persist the order with payment and
        // lines. A failure here has persisted nothing.
        if let Err(e) = self.orders.insert(&order).await {
            attempt.fail(e.to_string());
            self.record_failure(&attempt, start);
            return Err(e.into());
        }
        attempt.advance(CheckoutState::PaymentRecorded);
        attempt.record_step(steps::PERSIST_ORDER);

        // Step 2: reserve every line or none.
        if let Err(e) = self.ledger.reserve_all(&reservations).await {
            attempt.fail(e.to_string());
            self.compensate(&attempt, order.id, &reservations).await?;
            self.record_failure(&attempt, start);
            return Err(e.into());
        }
        attempt.advance(CheckoutState::InventoryReserved);
        attempt.record_step(steps::RESERVE_INVENTORY);

        // Step 3: clear the cart only after the order exists and
        // inventory is held. The conditional save rejects the clear if
        // the cart changed since it was loaded above.
        cart.clear();
        cart.bump_version();
        if let Err(e) = self.carts.save(&cart).await {
            attempt.fail(e.to_string());
            self.compensate(&attempt, order.id, &reservations).await?;
            self.record_failure(&attempt, start);
            return Err(e.into());
        }
        attempt.advance(CheckoutState::CartCleared);
        attempt.record_step(steps::CLEAR_CART);

        attempt.advance(CheckoutState::Complete);
        metrics::counter!("checkout_completed_total").increment(1);
        metrics::histogram!("checkout_duration_seconds").record(start.elapsed().as_secs_f64());
        tracing::info!(order_id = %order.id, total = %order.total, "checkout complete");

        Ok(PlacedOrder { order, attempt })
    }

    /// Undoes completed steps in reverse order. A compensation failure
    /// is fatal: the caller must not retry blindly.
    async fn compensate(
        &self,
        attempt: &CheckoutAttempt,
        order_id: OrderId,
        reservations: &[StockReservation],
    ) -> Result<()> {
        for step in attempt.completed_steps().iter().rev() {
            match step.as_str() {
                steps::RESERVE_INVENTORY => {
                    self.ledger.release_all(reservations).await.map_err(|e| {
                        CheckoutError::RollbackFailed {
                            step: steps::RESERVE_INVENTORY.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                }
                steps::PERSIST_ORDER => {
                    self.orders.delete(order_id).await.map_err(|e| {
                        CheckoutError::RollbackFailed {
                            step: steps::PERSIST_ORDER.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                }
                _ => {}
            }
        }

        tracing::warn!(
            %order_id,
            reason = attempt.failure_reason().unwrap_or("unknown"),
            "checkout rolled back"
        );
        Ok(())
    }

    fn record_failure(&self, attempt: &CheckoutAttempt, start: std::time::Instant) {
        metrics::counter!("checkout_failed_total").increment(1);
        metrics::histogram!("checkout_duration_seconds").record(start.elapsed().as_secs_f64());
        debug_assert_eq!(attempt.state(), CheckoutState::Failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use domain::{Address, Cart, CartLineItem, OrderStatus, Product};
    use inventory::InMemoryInventoryLedger;
    use store::{InMemoryAddressBook, InMemoryCartStore, InMemoryOrderStore};

    type Engine = CheckoutEngine<
        InMemoryAddressBook,
        InMemoryCartStore,
        InMemoryOrderStore,
        InMemoryInventoryLedger,
    >;

    struct Fixture {
        engine: Engine,
        addresses: InMemoryAddressBook,
        carts: InMemoryCartStore,
        orders: InMemoryOrderStore,
        ledger: InMemoryInventoryLedger,
    }

    async fn setup() -> Fixture {
        let addresses = InMemoryAddressBook::new();
        let carts = InMemoryCartStore::new();
        let orders = InMemoryOrderStore::new();
        let ledger = InMemoryInventoryLedger::new();
        ledger.set_stock("SKU-001", 5).await;

        let engine = CheckoutEngine::new(
            addresses.clone(),
            carts.clone(),
            orders.clone(),
            ledger.clone(),
        );

        Fixture {
            engine,
            addresses,
            carts,
            orders,
            ledger,
        }
    }

    fn widget() -> Product {
        Product::new("SKU-001", "Widget", Money::from_cents(1_000), 0)
    }

    async fn seed_cart(fixture: &Fixture, email: &str, quantity: u32) -> CustomerEmail {
        let customer = CustomerEmail::new(email);
        let mut cart = Cart::new(customer.clone());
        cart.add_line(CartLineItem::priced(&widget(), quantity)).unwrap();
        cart.bump_version();
        fixture.carts.save(&cart).await.unwrap();
        customer
    }

    async fn seed_address(fixture: &Fixture) -> AddressId {
        fixture
            .addresses
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
    async fn test_happy_path_reserves_stock_and_clears_cart() {
        let fixture = setup().await;
        let customer = seed_cart(&fixture, "alice@example.com", 3).await;
        let address_id = seed_address(&fixture).await;

        let placed = fixture
            .engine
            .place_order(place_order_cmd(customer.clone(), address_id))
            .await
            .unwrap();

        assert_eq!(placed.attempt.state(), CheckoutState::Complete);
        assert_eq!(
            placed.attempt.completed_steps(),
            [steps::PERSIST_ORDER, steps::RESERVE_INVENTORY, steps::CLEAR_CART]
        );

        // Order snapshot with one frozen line.
        let order = &placed.order;
        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.items[0].ordered_price, Money::from_cents(1_000));
        assert_eq!(order.total, Money::from_cents(3_000));
        assert_eq!(order.address_id, address_id);

        // Persisted, stock 5 − 3 = 2, cart cleared but not deleted.
        assert_eq!(fixture.orders.order_count(), 1);
        assert_eq!(fixture.ledger.available(&"SKU-001".into()).await.unwrap(), 2);
        let cart = fixture.carts.find_by_customer(&customer).await.unwrap().unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }

    #[tokio::test]
    async fn test_missing_cart_fails_validation() {
        let fixture = setup().await;
        let address_id = seed_address(&fixture).await;

        let err = fixture
            .engine
            .place_order(place_order_cmd(
                CustomerEmail::new("ghost@example.com"),
                address_id,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::CartNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_address_fails_validation() {
        let fixture = setup().await;
        let customer = seed_cart(&fixture, "alice@example.com", 1).await;

        let err = fixture
            .engine
            .place_order(place_order_cmd(customer, AddressId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::AddressNotFound { .. }));
        assert_eq!(fixture.orders.order_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_cart_creates_no_side_effects() {
        let fixture = setup().await;
        let customer = CustomerEmail::new("alice@example.com");
        let mut cart = Cart::new(customer.clone());
        cart.bump_version();
        fixture.carts.save(&cart).await.unwrap();
        let address_id = seed_address(&fixture).await;

        let err = fixture
            .engine
            .place_order(place_order_cmd(customer, address_id))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart { .. }));
        assert_eq!(fixture.orders.order_count(), 0);
        assert_eq!(fixture.ledger.available(&"SKU-001".into()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_stock_race_rolls_back_the_order() {
        let fixture = setup().await;
        let customer = seed_cart(&fixture, "alice@example.com", 3).await;
        let address_id = seed_address(&fixture).await;

        // A competing checkout drained the stock after the cart was
        // filled.
        fixture.ledger.set_stock("SKU-001", 2).await;

        let err = fixture
            .engine
            .place_order(place_order_cmd(customer.clone(), address_id))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::InsufficientStock {
                requested: 3,
                available: 2,
                ..
            }
        ));
        assert!(!err.is_fatal());

        // The persisted order was compensated; stock and cart intact.
        assert_eq!(fixture.orders.order_count(), 0);
        assert_eq!(fixture.ledger.available(&"SKU-001".into()).await.unwrap(), 2);
        let cart = fixture.carts.find_by_customer(&customer).await.unwrap().unwrap();
        assert_eq!(cart.line_count(), 1);
    }

    #[tokio::test]
    async fn test_order_persist_failure_leaves_no_trace() {
        let fixture = setup().await;
        let customer = seed_cart(&fixture, "alice@example.com", 3).await;
        let address_id = seed_address(&fixture).await;

        fixture.orders.set_fail_on_insert(true);

        let err = fixture
            .engine
            .place_order(place_order_cmd(customer.clone(), address_id))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Store(_)));
        assert_eq!(fixture.orders.order_count(), 0);
        assert_eq!(fixture.ledger.available(&"SKU-001".into()).await.unwrap(), 5);
        let cart = fixture.carts.find_by_customer(&customer).await.unwrap().unwrap();
        assert_eq!(cart.line_count(), 1);
    }

    #[tokio::test]
    async fn test_cart_clear_failure_compensates_order_and_stock() {
        let fixture = setup().await;
        let customer = seed_cart(&fixture, "alice@example.com", 3).await;
        let address_id = seed_address(&fixture).await;

        fixture.carts.set_fail_on_save(true);

        let err = fixture
            .engine
            .place_order(place_order_cmd(customer.clone(), address_id))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Store(_)));
        assert!(!err.is_fatal());

        // Reservation released, order deleted, cart still holds the line.
        assert_eq!(fixture.orders.order_count(), 0);
        assert_eq!(fixture.ledger.available(&"SKU-001".into()).await.unwrap(), 5);

        fixture.carts.set_fail_on_save(false);
        let cart = fixture.carts.find_by_customer(&customer).await.unwrap().unwrap();
        assert_eq!(cart.line_count(), 1);
    }

    #[tokio::test]
    async fn test_cart_changed_mid_checkout_compensates_and_retries() {
        let fixture = setup().await;
        let customer = seed_cart(&fixture, "alice@example.com", 3).await;
        let address_id = seed_address(&fixture).await;

        // The first clear loses the conditional save, as if the cart
        // was mutated between load and clear.
        fixture.carts.set_conflict_on_next_save();

        let placed = fixture
            .engine
            .place_order(place_order_cmd(customer.clone(), address_id))
            .await
            .unwrap();

        // The retry re-ran the whole unit of work: one order, stock
        // decremented exactly once, cart cleared.
        assert_eq!(placed.attempt.state(), CheckoutState::Complete);
        assert_eq!(fixture.orders.order_count(), 1);
        assert_eq!(fixture.ledger.available(&"SKU-001".into()).await.unwrap(), 2);
        let cart = fixture.carts.find_by_customer(&customer).await.unwrap().unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_failed_rollback_is_fatal() {
        let fixture = setup().await;
        let customer = seed_cart(&fixture, "alice@example.com", 3).await;
        let address_id = seed_address(&fixture).await;

        // Reservation will fail after the order is persisted, and the
        // compensating delete fails too.
        fixture.ledger.set_stock("SKU-001", 2).await;
        fixture.orders.set_fail_on_delete(true);

        let err = fixture
            .engine
            .place_order(place_order_cmd(customer, address_id))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::RollbackFailed { ref step, .. } if step == steps::PERSIST_ORDER
        ));
        assert!(err.is_fatal());

        // The orphaned order is still there for operators to reconcile.
        assert_eq!(fixture.orders.order_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_for_last_unit_have_one_winner() {
        let fixture = setup().await;
        fixture.ledger.set_stock("SKU-001", 1).await;
        let alice = seed_cart(&fixture, "alice@example.com", 1).await;
        let bob = seed_cart(&fixture, "bob@example.com", 1).await;
        let address_id = seed_address(&fixture).await;

        let (a, b) = tokio::join!(
            fixture.engine.place_order(place_order_cmd(alice, address_id)),
            fixture.engine.place_order(place_order_cmd(bob, address_id)),
        );

        assert!(
            a.is_ok() ^ b.is_ok(),
            "exactly one checkout must win the last unit"
        );
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(
            loser.unwrap_err(),
            CheckoutError::InsufficientStock { .. }
        ));

        assert_eq!(fixture.ledger.available(&"SKU-001".into()).await.unwrap(), 0);
        assert_eq!(fixture.orders.order_count(), 1);
    }

    #[tokio::test]
    async fn test_placed_order_is_retrievable() {
        let fixture = setup().await;
        let customer = seed_cart(&fixture, "alice@example.com", 2).await;
        let address_id = seed_address(&fixture).await;

        let placed = fixture
            .engine
            .place_order(place_order_cmd(customer, address_id))
            .await
            .unwrap();

        let stored = fixture.orders.get(placed.order.id).await.unwrap().unwrap();
        assert_eq!(stored, placed.order);
    }
}
