//! Cart store against a file-backed slot.
//!
//! Each test gets its own temporary directory, so they can run in parallel.

#![allow(clippy::unwrap_used)]

use std::fs;

use logos_cart::{
    CartError, CartStore, DEFAULT_CART_KEY, OrderSummary, PaymentConfirmation, PaymentError,
    PaymentGateway, PaymentProvider, Persistence, StubGateway,
};
use logos_core::{LineItemId, Quantity};
use logos_integration_tests::{TestContext, price};
use rust_decimal::Decimal;

struct OfflineGateway;

impl PaymentGateway for OfflineGateway {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::PayPal
    }

    fn collect(&mut self, _order: &OrderSummary) -> Result<PaymentConfirmation, PaymentError> {
        Err(PaymentError::Unavailable {
            provider: PaymentProvider::PayPal,
            reason: "connection refused".to_string(),
        })
    }
}

#[test]
fn test_cart_survives_page_load() {
    let ctx = TestContext::new();

    let mut store = ctx.restore();
    let logo = store.add("Logo Design", price("150.00"));
    store.add("Logo Design", price("150.00"));
    store.add("Business Cards", price("25.50"));
    let expected = store.cart().clone();
    drop(store);

    let reloaded = ctx.restore();
    assert_eq!(reloaded.cart(), &expected);
    assert_eq!(reloaded.total_count(), 3);
    assert_eq!(reloaded.total_price(), Decimal::new(32550, 2));
    assert_eq!(reloaded.cart().get(logo).unwrap().quantity.get(), 2);
}

#[test]
fn test_slot_written_by_browser_restores() {
    let ctx = TestContext::new();
    let browser_json = r#"[
        {"id":1718000000000,"name":"Logo Design","price":150,"quantity":2},
        {"id":1718000000001,"name":"Business Cards","price":25.5,"quantity":1}
    ]"#;
    fs::write(ctx.dir.path().join("logos_cart.json"), browser_json).unwrap();

    let store = ctx.restore();
    assert_eq!(store.cart().len(), 2);
    assert_eq!(store.total_price(), Decimal::new(32550, 2));
}

#[test]
fn test_corrupt_slot_restores_empty() {
    let ctx = TestContext::new();
    fs::write(ctx.dir.path().join("logos_cart.json"), "{not json").unwrap();

    let store = ctx.restore();
    assert!(store.cart().is_empty());

    let strict = CartStore::try_restore(ctx.storage(), DEFAULT_CART_KEY);
    assert!(matches!(strict, Err(CartError::MalformedPersistedState(_))));
}

#[test]
fn test_unreadable_slot_is_an_error_and_left_alone() {
    let ctx = TestContext::new();
    let slot = ctx.dir.path().join("logos_cart.json");
    fs::create_dir(&slot).unwrap();

    let result = CartStore::restore(ctx.storage(), DEFAULT_CART_KEY);
    assert!(matches!(result, Err(CartError::Storage(_))));
    assert!(slot.is_dir());
}

#[test]
fn test_largest_id_in_slot_does_not_lose_cart() {
    let ctx = TestContext::new();
    let json = format!(r#"[{{"id":{},"name":"Logo Design","price":"150","quantity":1}}]"#, i64::MAX);
    fs::write(ctx.dir.path().join("logos_cart.json"), json).unwrap();

    let mut store = ctx.restore();
    store.add("Business Cards", price("25.50"));

    let reloaded = ctx.restore();
    assert_eq!(reloaded.cart().len(), 2);
    assert_eq!(reloaded.total_price(), Decimal::new(17550, 2));
}

#[test]
fn test_duplicate_names_in_slot_restore_empty() {
    let ctx = TestContext::new();
    let json = r#"[
        {"id":1,"name":"Logo Design","price":"150","quantity":1},
        {"id":2,"name":"Logo Design","price":"150","quantity":1}
    ]"#;
    fs::write(ctx.dir.path().join("logos_cart.json"), json).unwrap();

    assert!(ctx.restore().cart().is_empty());
}

#[test]
fn test_corrupt_slot_is_overwritten_by_next_change() {
    let ctx = TestContext::new();
    fs::write(ctx.dir.path().join("logos_cart.json"), "garbage").unwrap();

    let mut store = ctx.restore();
    store.add("Logo Design", price("150"));

    let raw = ctx.storage().load(DEFAULT_CART_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
}

#[test]
fn test_quantity_edits_persist() {
    let ctx = TestContext::new();
    let mut store = ctx.restore();
    let id = store.add("Logo Design", price("150"));

    store.set_quantity_input(id, "abc");
    assert_eq!(ctx.restore().cart().get(id).unwrap().quantity, Quantity::MIN);

    store.set_quantity_input(id, "7");
    assert_eq!(ctx.restore().cart().get(id).unwrap().quantity.get(), 7);

    store.set_quantity_input(id, "0");
    assert_eq!(ctx.restore().cart().get(id).unwrap().quantity, Quantity::MIN);
}

#[test]
fn test_unknown_id_does_not_touch_slot() {
    let ctx = TestContext::new();
    let mut store = ctx.restore();

    assert!(!store.set_quantity_input(LineItemId::new(42), "3"));
    assert!(ctx.storage().load(DEFAULT_CART_KEY).unwrap().is_none());
}

#[test]
fn test_last_writer_wins() {
    let ctx = TestContext::new();

    let mut first_tab = ctx.restore();
    let mut second_tab = ctx.restore();

    first_tab.add("Logo Design", price("150"));
    second_tab.add("Business Cards", price("25.50"));

    // The second tab never saw the first tab's write and overwrote it.
    let fresh = ctx.restore();
    assert_eq!(fresh.cart().len(), 1);
    assert!(fresh.cart().find_by_name("Business Cards").is_some());

    // Until it reloads, the first tab still shows its own view.
    assert!(first_tab.cart().find_by_name("Logo Design").is_some());
    first_tab.reload().unwrap();
    assert!(first_tab.cart().find_by_name("Logo Design").is_none());
}

#[test]
fn test_checkout_empties_slot() {
    let ctx = TestContext::new();
    let mut store = ctx.restore();
    store.add("Website Design", price("500"));

    let receipt = store
        .checkout(&mut StubGateway::new(PaymentProvider::Stripe))
        .unwrap();
    assert_eq!(receipt.order.total, Decimal::new(500, 0));

    assert!(store.cart().is_empty());
    assert!(ctx.restore().cart().is_empty());
    let raw = ctx.storage().load(DEFAULT_CART_KEY).unwrap().unwrap();
    assert_eq!(raw, "[]");
}

#[test]
fn test_failed_payment_keeps_slot() {
    let ctx = TestContext::new();
    let mut store = ctx.restore();
    store.add("Website Design", price("500"));
    let before = ctx.storage().load(DEFAULT_CART_KEY).unwrap();

    let result = store.checkout(&mut OfflineGateway);
    assert!(matches!(result, Err(CartError::Payment(_))));

    assert_eq!(store.total_count(), 1);
    assert_eq!(ctx.storage().load(DEFAULT_CART_KEY).unwrap(), before);
}

#[test]
fn test_empty_checkout_writes_nothing() {
    let ctx = TestContext::new();
    let mut store = ctx.restore();

    let result = store.checkout(&mut StubGateway::new(PaymentProvider::Stripe));
    assert!(matches!(result, Err(CartError::EmptyCart)));
    assert!(ctx.storage().load(DEFAULT_CART_KEY).unwrap().is_none());
}
