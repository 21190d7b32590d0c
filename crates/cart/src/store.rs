//! The cart store.
//!
//! `CartStore` is the only way to change a cart. Every mutating operation
//! follows the same order: change the in-memory cart, write the whole cart
//! to the persistence slot, then notify observers.

use core::fmt;

use logos_core::{LineItemId, LineItemIdGenerator, Price, Quantity};
use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use crate::cart::{Cart, LineItem};
use crate::checkout::{CheckoutReceipt, OrderSummary, PaymentGateway};
use crate::error::{CartError, Result};
use crate::events::{CartEvent, CartObserver};
use crate::storage::Persistence;
use crate::view::CartView;

/// Slot key used when none is configured.
pub const DEFAULT_CART_KEY: &str = "logos_cart";

/// Owns a cart and keeps its persistence slot in sync.
pub struct CartStore<P: Persistence> {
    cart: Cart,
    storage: P,
    key: String,
    ids: LineItemIdGenerator,
    observers: Vec<Box<dyn CartObserver>>,
}

impl<P: Persistence> CartStore<P> {
    /// Create an empty store without reading the slot.
    ///
    /// Nothing is written until the first mutation.
    #[must_use]
    pub fn empty(storage: P, key: impl Into<String>) -> Self {
        Self {
            cart: Cart::new(),
            storage,
            key: key.into(),
            ids: LineItemIdGenerator::new(),
            observers: Vec::new(),
        }
    }

    /// Load the cart from the slot under `key`.
    ///
    /// A missing, empty, or malformed slot yields an empty cart. Malformed
    /// data is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the slot cannot be read at all. The
    /// slot is never overwritten in that case.
    #[instrument(skip(storage, key))]
    pub fn restore(storage: P, key: impl Into<String>) -> Result<Self> {
        let mut store = Self::empty(storage, key);
        store.reload()?;
        Ok(store)
    }

    /// Load the cart from the slot under `key`, reporting malformed data.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MalformedPersistedState`] if the slot does not
    /// hold a valid cart, or [`CartError::Storage`] if it cannot be read.
    pub fn try_restore(storage: P, key: impl Into<String>) -> Result<Self> {
        let mut store = Self::empty(storage, key);
        let cart = store.read_slot()?;
        store.replace_cart(cart);
        Ok(store)
    }

    /// Re-read the slot, replacing the in-memory cart.
    ///
    /// Picks up changes another process wrote to the same slot. Falls back
    /// to an empty cart the same way [`Self::restore`] does.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the slot cannot be read. The
    /// in-memory cart is left as it was.
    pub fn reload(&mut self) -> Result<()> {
        let cart = match self.read_slot() {
            Ok(cart) => cart,
            Err(CartError::MalformedPersistedState(reason)) => {
                warn!(key = %self.key, %reason, "Discarding malformed cart");
                Cart::new()
            }
            Err(e) => return Err(e),
        };
        self.replace_cart(cart);
        Ok(())
    }

    /// Register an observer for cart changes.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Add one unit of `name` at `price`.
    ///
    /// If a line with this name exists its quantity goes up by one and its
    /// unit price is left as it was. Otherwise a new line is appended.
    /// Returns the ID of the affected line.
    #[instrument(skip(self, price), fields(price = %price))]
    pub fn add(&mut self, name: &str, price: Price) -> LineItemId {
        let (id, quantity) = if let Some(item) = self.cart.find_by_name_mut(name) {
            item.quantity = item.quantity.incremented();
            (item.id, item.quantity)
        } else {
            let cart = &self.cart;
            let id = self.ids.next_id(|id| cart.get(id).is_some());
            self.cart.push(LineItem {
                id,
                name: name.to_owned(),
                price,
                quantity: Quantity::MIN,
            });
            (id, Quantity::MIN)
        };

        debug!(%id, %quantity, "Item added");
        self.persist();
        self.emit(&CartEvent::ItemAdded {
            id,
            name: name.to_owned(),
            quantity,
        });
        id
    }

    /// Remove the line with `id`. Returns `false` if there was none.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: LineItemId) -> bool {
        let removed = self.cart.remove(id);
        self.persist();

        let Some(item) = removed else {
            debug!("Item not in cart");
            return false;
        };
        self.emit(&CartEvent::ItemRemoved { id, name: item.name });
        true
    }

    /// Set the quantity of the line with `id`. Returns `false` if there was
    /// no such line.
    #[instrument(skip(self))]
    pub fn set_quantity(&mut self, id: LineItemId, quantity: Quantity) -> bool {
        let Some(item) = self.cart.get_mut(id) else {
            debug!("Item not in cart");
            return false;
        };
        item.quantity = quantity;

        self.persist();
        self.emit(&CartEvent::QuantityChanged { id, quantity });
        true
    }

    /// Set the quantity from raw user input.
    ///
    /// Input that is not a number becomes 1 and anything below 1 is clamped
    /// to 1, see [`Quantity::parse_lenient`].
    pub fn set_quantity_input(&mut self, id: LineItemId, input: &str) -> bool {
        self.set_quantity(id, Quantity::parse_lenient(input))
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.cart.total_count()
    }

    /// Cart total rounded to cents.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    /// Pay for the cart and empty it.
    ///
    /// The cart is cleared and persisted only after `gateway` confirms the
    /// payment. If the gateway fails, cart and slot are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] if there is nothing to check out, or
    /// [`CartError::Payment`] if the gateway did not confirm.
    #[instrument(skip(self, gateway), fields(provider = %gateway.provider()))]
    pub fn checkout<G: PaymentGateway + ?Sized>(
        &mut self,
        gateway: &mut G,
    ) -> Result<CheckoutReceipt> {
        let order = OrderSummary::from_cart(&self.cart).ok_or(CartError::EmptyCart)?;

        let confirmation = gateway.collect(&order).inspect_err(|e| {
            warn!(error = %e, "Payment not confirmed, keeping cart");
        })?;

        info!(
            reference = %confirmation.reference,
            total = %order.total,
            "Order placed"
        );

        self.cart.clear();
        self.persist();
        self.emit(&CartEvent::Cleared);

        Ok(CheckoutReceipt {
            order,
            confirmation,
        })
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Display model of the current cart.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::from(&self.cart)
    }

    /// The persistence slot.
    #[must_use]
    pub const fn storage(&self) -> &P {
        &self.storage
    }

    /// The slot key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Give back the persistence slot.
    #[must_use]
    pub fn into_storage(self) -> P {
        self.storage
    }

    fn read_slot(&self) -> Result<Cart> {
        let Some(data) = self.storage.load(&self.key)? else {
            return Ok(Cart::new());
        };
        if data.trim().is_empty() {
            return Ok(Cart::new());
        }
        serde_json::from_str(&data).map_err(|e| CartError::MalformedPersistedState(e.to_string()))
    }

    fn replace_cart(&mut self, cart: Cart) {
        for item in &cart {
            self.ids.observe(item.id);
        }
        self.cart = cart;
        debug!(key = %self.key, items = self.cart.len(), "Cart restored");
        self.emit(&CartEvent::Restored {
            items: self.cart.len(),
        });
    }

    /// Write the whole cart to the slot. Failures are logged, not returned.
    fn persist(&mut self) {
        let data = match serde_json::to_string(&self.cart) {
            Ok(data) => data,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.storage.save(&self.key, &data) {
            error!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }

    fn emit(&mut self, event: &CartEvent) {
        for observer in &mut self.observers {
            observer.on_change(event, &self.cart);
        }
    }
}

impl<P: Persistence + fmt::Debug> fmt::Debug for CartStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("storage", &self.storage)
            .field("key", &self.key)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::checkout::{PaymentConfirmation, PaymentError, PaymentProvider, StubGateway};
    use crate::storage::{MemoryStorage, StorageError};

    fn price(s: &str) -> Price {
        Price::parse(s).unwrap()
    }

    fn store() -> CartStore<MemoryStorage> {
        CartStore::restore(MemoryStorage::new(), DEFAULT_CART_KEY).unwrap()
    }

    fn persisted(store: &CartStore<MemoryStorage>) -> Cart {
        serde_json::from_str(store.storage().get(DEFAULT_CART_KEY).unwrap()).unwrap()
    }

    struct DecliningGateway;

    impl PaymentGateway for DecliningGateway {
        fn provider(&self) -> PaymentProvider {
            PaymentProvider::Stripe
        }

        fn collect(&mut self, _order: &OrderSummary) -> std::result::Result<PaymentConfirmation, PaymentError> {
            Err(PaymentError::Declined {
                provider: PaymentProvider::Stripe,
                reason: "card declined".to_string(),
            })
        }
    }

    struct BrokenStorage;

    impl Persistence for BrokenStorage {
        fn load(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn save(&mut self, key: &str, _data: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    #[test]
    fn test_example_cart() {
        let mut store = store();
        store.add("Logo Design", price("150.00"));
        store.add("Logo Design", price("150.00"));
        store.add("Business Cards", price("25.50"));

        let items = store.cart().items();
        assert_eq!(items.len(), 2);
        assert_eq!(items.first().unwrap().name, "Logo Design");
        assert_eq!(items.first().unwrap().quantity.get(), 2);
        assert_eq!(items.last().unwrap().name, "Business Cards");
        assert_eq!(items.last().unwrap().quantity.get(), 1);
        assert_eq!(store.total_count(), 3);
        assert_eq!(store.total_price(), Decimal::new(32550, 2));
    }

    #[test]
    fn test_add_same_name_merges() {
        let mut store = store();
        let first = store.add("Logo Design", price("150"));
        let second = store.add("Logo Design", price("99"));

        assert_eq!(first, second);
        assert_eq!(store.cart().len(), 1);
        // The original unit price wins.
        assert_eq!(store.cart().get(first).unwrap().price, price("150"));
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut store = store();
        let a = store.add("A", price("1"));
        let b = store.add("B", price("1"));
        let c = store.add("C", price("1"));
        assert!(a < b && b < c);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut store = store();
        let id = store.add("Logo Design", price("150"));
        assert_eq!(&persisted(&store), store.cart());

        store.set_quantity(id, Quantity::new(4).unwrap());
        assert_eq!(&persisted(&store), store.cart());

        store.remove(id);
        assert_eq!(&persisted(&store), store.cart());
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = store();
        let id = store.add("Logo Design", price("150"));
        store.add("Business Cards", price("25.50"));

        assert!(store.remove(id));
        let after_first = store.cart().clone();
        assert!(!store.remove(id));
        assert_eq!(store.cart(), &after_first);
    }

    #[test]
    fn test_set_quantity_input_clamps_and_coerces() {
        let mut store = store();
        let id = store.add("Logo Design", price("150"));

        assert!(store.set_quantity_input(id, "5"));
        assert_eq!(store.cart().get(id).unwrap().quantity.get(), 5);

        assert!(store.set_quantity_input(id, "0"));
        assert_eq!(store.cart().get(id).unwrap().quantity.get(), 1);

        store.set_quantity_input(id, "5");
        assert!(store.set_quantity_input(id, "abc"));
        assert_eq!(store.cart().get(id).unwrap().quantity.get(), 1);

        assert!(store.set_quantity_input(id, "-3"));
        assert_eq!(store.cart().get(id).unwrap().quantity.get(), 1);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut store = store();
        store.add("Logo Design", price("150"));
        let before = store.cart().clone();

        assert!(!store.set_quantity(LineItemId::new(-1), Quantity::new(9).unwrap()));
        assert_eq!(store.cart(), &before);
    }

    #[test]
    fn test_restore_missing_slot() {
        let store = store();
        assert!(store.cart().is_empty());
        assert!(store.storage().get(DEFAULT_CART_KEY).is_none());
    }

    #[test]
    fn test_restore_malformed_slot_is_empty() {
        for data in ["", "   ", "not json", "{\"a\":1}", "[{\"id\":1}]"] {
            let storage = MemoryStorage::with_slot(DEFAULT_CART_KEY, data);
            let store = CartStore::restore(storage, DEFAULT_CART_KEY).unwrap();
            assert!(store.cart().is_empty(), "slot {data:?} should restore empty");
        }
    }

    #[test]
    fn test_try_restore_reports_malformed_slot() {
        let storage = MemoryStorage::with_slot(DEFAULT_CART_KEY, "not json");
        let result = CartStore::try_restore(storage, DEFAULT_CART_KEY);
        assert!(matches!(result, Err(CartError::MalformedPersistedState(_))));
    }

    #[test]
    fn test_try_restore_reports_storage_error() {
        let result = CartStore::try_restore(BrokenStorage, DEFAULT_CART_KEY);
        assert!(matches!(result, Err(CartError::Storage(_))));
    }

    #[test]
    fn test_restore_reports_unreadable_slot() {
        let result = CartStore::restore(BrokenStorage, DEFAULT_CART_KEY);
        assert!(matches!(result, Err(CartError::Storage(_))));
    }

    #[test]
    fn test_storage_write_failure_keeps_memory_state() {
        let mut store = CartStore::empty(BrokenStorage, DEFAULT_CART_KEY);
        store.add("Logo Design", price("150"));
        assert_eq!(store.total_count(), 1);
    }

    #[test]
    fn test_reload_failure_keeps_memory_state() {
        let mut store = CartStore::empty(BrokenStorage, DEFAULT_CART_KEY);
        store.add("Logo Design", price("150"));

        assert!(matches!(store.reload(), Err(CartError::Storage(_))));
        assert_eq!(store.total_count(), 1);
    }

    #[test]
    fn test_restore_round_trip() {
        let mut store = store();
        let id = store.add("Logo Design", price("150"));
        store.add("Business Cards", price("25.50"));
        store.set_quantity(id, Quantity::new(3).unwrap());

        let expected = store.cart().clone();
        let restored = CartStore::restore(store.into_storage(), DEFAULT_CART_KEY).unwrap();
        assert_eq!(restored.cart(), &expected);
    }

    #[test]
    fn test_ids_after_restore_are_fresh() {
        let data = r#"[{"id":9000000000000,"name":"Logo Design","price":150,"quantity":1}]"#;
        let storage = MemoryStorage::with_slot(DEFAULT_CART_KEY, data);
        let mut store = CartStore::restore(storage, DEFAULT_CART_KEY).unwrap();

        let id = store.add("Business Cards", price("25.50"));
        assert!(id > LineItemId::new(9_000_000_000_000));
    }

    #[test]
    fn test_add_after_largest_restored_id_stays_unique() {
        let data = format!(r#"[{{"id":{},"name":"Logo Design","price":150,"quantity":1}}]"#, i64::MAX);
        let storage = MemoryStorage::with_slot(DEFAULT_CART_KEY, &data);
        let mut store = CartStore::restore(storage, DEFAULT_CART_KEY).unwrap();

        let id = store.add("Business Cards", price("25.50"));
        assert_ne!(id, LineItemId::new(i64::MAX));

        let restored = CartStore::restore(store.into_storage(), DEFAULT_CART_KEY).unwrap();
        assert_eq!(restored.cart().len(), 2);
    }

    #[test]
    fn test_reload_picks_up_other_writer() {
        let mut first = store();
        first.add("Logo Design", price("150"));

        let mut second = CartStore::restore(first.storage().clone(), DEFAULT_CART_KEY).unwrap();
        second.add("Business Cards", price("25.50"));

        // Last write wins: `second` wrote the slot, so reloading it sees both.
        let mut reloaded = CartStore::restore(second.into_storage(), DEFAULT_CART_KEY).unwrap();
        reloaded.reload().unwrap();
        assert_eq!(reloaded.total_count(), 2);
        assert_eq!(first.total_count(), 1);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut store = store();
        let result = store.checkout(&mut StubGateway::new(PaymentProvider::Stripe));
        assert!(matches!(result, Err(CartError::EmptyCart)));
        assert!(store.storage().get(DEFAULT_CART_KEY).is_none());
    }

    #[test]
    fn test_checkout_clears_cart_and_slot() {
        let mut store = store();
        store.add("Logo Design", price("150"));
        store.add("Business Cards", price("25.50"));

        let receipt = store
            .checkout(&mut StubGateway::new(PaymentProvider::Stripe))
            .unwrap();

        assert_eq!(receipt.order.total, Decimal::new(17550, 2));
        assert_eq!(receipt.confirmation.amount, receipt.order.total);
        assert!(store.cart().is_empty());
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_checkout_declined_keeps_cart() {
        let mut store = store();
        store.add("Logo Design", price("150"));
        let before = store.cart().clone();

        let result = store.checkout(&mut DecliningGateway);

        assert!(matches!(result, Err(CartError::Payment(_))));
        assert_eq!(store.cart(), &before);
        assert_eq!(persisted(&store), before);
    }

    #[test]
    fn test_observers_see_events_after_persist() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let mut store = store();
        store.subscribe(move |event: &CartEvent, cart: &Cart| {
            sink.borrow_mut().push((event.clone(), cart.total_count()));
        });

        let id = store.add("Logo Design", price("150"));
        store.set_quantity(id, Quantity::new(2).unwrap());
        store.remove(id);
        store.remove(id);

        let events = events.borrow();
        assert_eq!(events.len(), 3);
        assert!(matches!(events.first().unwrap(), (CartEvent::ItemAdded { .. }, 1)));
        assert!(matches!(events.get(1).unwrap(), (CartEvent::QuantityChanged { .. }, 2)));
        assert!(matches!(events.get(2).unwrap(), (CartEvent::ItemRemoved { .. }, 0)));
    }

    #[test]
    fn test_checkout_emits_cleared() {
        let cleared = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&cleared);

        let mut store = store();
        store.subscribe(move |event: &CartEvent, _cart: &Cart| {
            if *event == CartEvent::Cleared {
                *flag.borrow_mut() = true;
            }
        });
        store.add("Logo Design", price("150"));
        store
            .checkout(&mut StubGateway::new(PaymentProvider::PayPal))
            .unwrap();

        assert!(*cleared.borrow());
    }
}
