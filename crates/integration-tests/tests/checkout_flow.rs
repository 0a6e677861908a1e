//! Integration tests for the simulated checkout.
//!
//! Run with: cargo test -p woodcraft-integration-tests

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use woodcraft_core::{CheckoutStep, OrderStatus, ProductId};
use woodcraft_integration_tests::{checkout_date, payment_form, session, session_with, shipping_form};
use woodcraft_storefront::checkout::CheckoutError;
use woodcraft_storefront::{StorefrontConfig, StorefrontError};

#[test]
fn test_full_checkout_produces_order_and_empties_cart() {
    let mut session = session().unwrap();
    session.add_to_cart_by_id(ProductId::new(2), 1).unwrap();
    session.add_to_cart_by_id(ProductId::new(6), 4).unwrap();
    session.add_to_wishlist(ProductId::new(3));

    let mut flow = session.checkout();
    assert_eq!(flow.step(), CheckoutStep::Shipping);
    flow.submit_shipping(&shipping_form()).unwrap();
    flow.submit_payment_on(&payment_form(), checkout_date()).unwrap();
    assert_eq!(flow.step(), CheckoutStep::Review);

    let expected = session.order_totals();
    let order = session.place_order(&mut flow).unwrap();

    assert_eq!(order.status, OrderStatus::Processing);
    assert!((10_000..=99_999).contains(&order.id.as_i32()));
    assert_eq!(order.totals, expected);
    assert_eq!(order.totals.subtotal, Decimal::from(1299 + 4 * 399));
    assert_eq!(order.totals.tax, Decimal::new(23_160, 2));
    assert_eq!(order.totals.total, Decimal::new(312_660, 2));
    assert_eq!(order.card_last_four, "4444");
    assert_eq!(order.email.as_str(), "marcus@example.com");
    assert_eq!(order.shipping_address.city, "Asheville");

    let names: Vec<&str> = order.lines.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Serenity Bookshelf", "Homestead Dining Chair"]);

    assert!(session.cart().is_empty());
    assert_eq!(session.cart_total(), Decimal::ZERO);
    // The wishlist survives checkout.
    assert!(session.is_in_wishlist(ProductId::new(3)));
}

#[test]
fn test_checkout_clears_cart_exactly_once() {
    let mut session = session().unwrap();
    session.add_to_cart_by_id(ProductId::new(1), 1).unwrap();
    let mut rx = session.subscribe_cart();

    let mut flow = session.checkout();
    flow.submit_shipping(&shipping_form()).unwrap();
    flow.submit_payment_on(&payment_form(), checkout_date()).unwrap();
    session.place_order(&mut flow).unwrap();

    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_empty());

    session.add_to_cart_by_id(ProductId::new(5), 1).unwrap();
    let _ = rx.borrow_and_update();

    let err = session.place_order(&mut flow).unwrap_err();
    assert!(matches!(
        err,
        StorefrontError::Checkout(CheckoutError::AlreadyCompleted)
    ));
    assert!(!rx.has_changed().unwrap());
    assert_eq!(session.cart_count(), 1);
}

#[test]
fn test_checkout_with_empty_cart_is_rejected() {
    let mut session = session().unwrap();
    let mut flow = session.checkout();
    flow.submit_shipping(&shipping_form()).unwrap();
    flow.submit_payment_on(&payment_form(), checkout_date()).unwrap();

    let err = session.place_order(&mut flow).unwrap_err();
    assert!(matches!(err, StorefrontError::Checkout(CheckoutError::EmptyCart)));
    assert!(err.is_user_error());
    assert!(!flow.is_complete());
}

#[test]
fn test_going_back_keeps_entered_details() {
    let mut session = session().unwrap();
    session.add_to_cart_by_id(ProductId::new(3), 1).unwrap();

    let mut flow = session.checkout();
    flow.submit_shipping(&shipping_form()).unwrap();
    flow.submit_payment_on(&payment_form(), checkout_date()).unwrap();

    assert_eq!(flow.previous_step(), CheckoutStep::Payment);
    assert_eq!(flow.previous_step(), CheckoutStep::Shipping);
    assert_eq!(flow.previous_step(), CheckoutStep::Shipping);
    assert!(flow.shipping().is_some());

    assert_eq!(flow.next_step().unwrap(), CheckoutStep::Payment);
    assert_eq!(flow.next_step().unwrap(), CheckoutStep::Review);
    session.place_order(&mut flow).unwrap();
}

#[test]
fn test_custom_tax_rate_flows_into_order() {
    let config = StorefrontConfig::from_lookup(|key| match key {
        "WOODCRAFT_TAX_RATE" => Some("0.1".to_string()),
        _ => None,
    })
    .unwrap();
    let mut session = session_with(config).unwrap();
    session.add_to_cart_by_id(ProductId::new(6), 1).unwrap();

    let mut flow = session.checkout();
    flow.submit_shipping(&shipping_form()).unwrap();
    flow.submit_payment_on(&payment_form(), checkout_date()).unwrap();
    let order = session.place_order(&mut flow).unwrap();

    assert_eq!(order.totals.tax, Decimal::new(3990, 2));
    assert_eq!(order.totals.total, Decimal::new(43_890, 2));
}

#[test]
fn test_order_serializes_without_card_number() {
    let mut session = session().unwrap();
    session.add_to_cart_by_id(ProductId::new(1), 1).unwrap();

    let mut flow = session.checkout();
    flow.submit_shipping(&shipping_form()).unwrap();
    flow.submit_payment_on(&payment_form(), checkout_date()).unwrap();
    let order = session.place_order(&mut flow).unwrap();

    let json = serde_json::to_string(&order).unwrap();
    assert!(json.contains("\"card_last_four\":\"4444\""));
    assert!(!json.contains("5555555555554444"));
    assert!(!json.contains("5555 5555"));
    assert!(json.contains("\"status\":\"Processing\""));
}
