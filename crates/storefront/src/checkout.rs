//! Simulated checkout.
//!
//! The checkout reads the cart, walks the shopper through the shipping,
//! payment and review steps, and on confirmation turns the cart into an
//! [`Order`] and clears it. No payment is actually taken.
//!
//! Tax and shipping are layered on top of the cart subtotal here; the cart
//! engine itself only knows the subtotal.

use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use woodcraft_core::{
    CheckoutStep, CurrencyCode, Email, EmailError, OrderId, OrderStatus, Price, ProductId,
    round_currency,
};

use crate::cart::{CartEngine, CartLine};

/// Range order numbers are drawn from.
const ORDER_NUMBER_RANGE: std::ops::RangeInclusive<i32> = 10_000..=99_999;

/// Delivery estimate, in days after the order is placed.
const DELIVERY_DAYS_MIN: u64 = 21;
const DELIVERY_DAYS_MAX: u64 = 28;

/// Errors raised while checking out.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Card number is invalid")]
    InvalidCardNumber,

    #[error("Expiry date is invalid: {0}")]
    InvalidExpiry(String),

    #[error("Security code must be 3 or 4 digits")]
    InvalidCvv,

    #[error("Checkout is on the {actual} step, expected {expected}")]
    WrongStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },

    #[error("Shipping details have not been provided")]
    MissingShipping,

    #[error("Payment details have not been provided")]
    MissingPayment,

    #[error("Order has already been placed")]
    AlreadyCompleted,
}

// =============================================================================
// Totals
// =============================================================================

/// Money breakdown shown in the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Apply a tax rate to a subtotal. Shipping is always free.
    ///
    /// Tax is rounded to whole cents. Amounts beyond `Decimal::MAX` saturate.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal, tax_rate: Decimal) -> Self {
        let shipping = Decimal::ZERO;
        let tax = round_currency(subtotal.saturating_mul(tax_rate));
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal.saturating_add(shipping).saturating_add(tax),
        }
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// Raw shipping form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Postal address an order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Validated shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: Address,
}

impl ShippingDetails {
    /// Validate a shipping form.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` for blank fields or
    /// `CheckoutError::InvalidEmail` for a malformed email.
    pub fn parse(form: &ShippingForm) -> Result<Self, CheckoutError> {
        Ok(Self {
            first_name: required(&form.first_name, "First name")?,
            last_name: required(&form.last_name, "Last name")?,
            email: Email::parse(&required(&form.email, "Email")?)?,
            address: Address {
                street: required(&form.address, "Address")?,
                city: required(&form.city, "City")?,
                state: required(&form.state, "State")?,
                zip_code: required(&form.zip_code, "ZIP code")?,
                country: required(&form.country, "Country")?,
            },
        })
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Raw payment form input.
#[derive(Clone, Default, Deserialize)]
pub struct PaymentForm {
    pub card_name: String,
    pub card_number: String,
    pub exp_date: String,
    pub cvv: String,
}

impl fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentForm")
            .field("card_name", &self.card_name)
            .field("card_number", &"[REDACTED]")
            .field("exp_date", &self.exp_date)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// Card expiry month and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardExpiry {
    pub year: i32,
    pub month: u32,
}

impl CardExpiry {
    /// Parse `MM/YY` (or `MM/YYYY`).
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidExpiry` for malformed input or a month
    /// outside 1-12.
    pub fn parse(input: &str) -> Result<Self, CheckoutError> {
        let invalid = || CheckoutError::InvalidExpiry(format!("expected MM/YY, got '{input}'"));

        let (month_text, year_text) = input.trim().split_once('/').ok_or_else(invalid)?;
        let (month_text, year_text) = (month_text.trim(), year_text.trim());
        let all_digits = |text: &str| !text.is_empty() && text.chars().all(|c| c.is_ascii_digit());
        if !all_digits(month_text) || !all_digits(year_text) {
            return Err(invalid());
        }

        let month: u32 = month_text.parse().map_err(|_| invalid())?;
        let year: i32 = year_text.parse().map_err(|_| invalid())?;
        let year = match year_text.len() {
            2 => 2000 + year,
            4 => year,
            _ => return Err(invalid()),
        };
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }

    /// Whether the card is still valid during the month containing `today`.
    #[must_use]
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        (self.year, self.month) >= (today.year(), today.month())
    }
}

impl fmt::Display for CardExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

/// Validated card details. The number and security code are never logged.
#[derive(Clone)]
pub struct PaymentDetails {
    pub card_name: String,
    card_number: SecretString,
    pub expiry: CardExpiry,
    cvv: SecretString,
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_name", &self.card_name)
            .field("card_number", &format!("•••• {}", self.last_four()))
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

impl PaymentDetails {
    /// Validate a payment form against today's date.
    ///
    /// # Errors
    ///
    /// See [`Self::parse_on`].
    pub fn parse(form: &PaymentForm) -> Result<Self, CheckoutError> {
        Self::parse_on(form, Utc::now().date_naive())
    }

    /// Validate a payment form as of `today`.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::MissingField` for a blank cardholder name
    /// - `CheckoutError::InvalidCardNumber` unless the number has 13-19 digits
    ///   (spaces and dashes allowed) and passes the Luhn check
    /// - `CheckoutError::InvalidExpiry` for malformed or past expiry dates
    /// - `CheckoutError::InvalidCvv` unless the code is 3 or 4 digits
    pub fn parse_on(form: &PaymentForm, today: NaiveDate) -> Result<Self, CheckoutError> {
        let card_name = required(&form.card_name, "Name on card")?;

        let digits: String = form
            .card_number
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();
        if !(13..=19).contains(&digits.len())
            || !digits.chars().all(|c| c.is_ascii_digit())
            || !luhn_valid(&digits)
        {
            return Err(CheckoutError::InvalidCardNumber);
        }

        let expiry = CardExpiry::parse(&form.exp_date)?;
        if !expiry.is_valid_on(today) {
            return Err(CheckoutError::InvalidExpiry(format!("card expired {expiry}")));
        }

        let cvv = form.cvv.trim();
        if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::InvalidCvv);
        }

        Ok(Self {
            card_name,
            card_number: SecretString::from(digits),
            expiry,
            cvv: SecretString::from(cvv.to_owned()),
        })
    }

    /// Last four digits of the card number.
    #[must_use]
    pub fn last_four(&self) -> String {
        let number = self.card_number.expose_secret();
        number
            .get(number.len().saturating_sub(4)..)
            .unwrap_or_default()
            .to_owned()
    }
}

/// Luhn checksum over an all-digit string.
fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn required(value: &str, field: &'static str) -> Result<String, CheckoutError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CheckoutError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

// =============================================================================
// Orders
// =============================================================================

/// A purchased line, frozen at the moment the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            name: line.product.name.clone(),
            unit_price: line.product.price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// Earliest and latest expected delivery dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

/// A completed order. Display-only; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub estimated_delivery: DeliveryWindow,
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
    pub currency: CurrencyCode,
    pub email: Email,
    pub ship_to: String,
    pub shipping_address: Address,
    pub card_last_four: String,
}

impl Order {
    /// Order number as shown to the shopper, e.g. `#38291`.
    #[must_use]
    pub fn number_label(&self) -> String {
        format!("#{}", self.id)
    }

    /// Format an amount in the order's currency.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        Price::new(amount, self.currency).display()
    }
}

// =============================================================================
// Flow
// =============================================================================

/// The three-step checkout form.
#[derive(Debug)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    tax_rate: Decimal,
    currency: CurrencyCode,
    shipping: Option<ShippingDetails>,
    payment: Option<PaymentDetails>,
    completed: Option<Order>,
}

impl CheckoutFlow {
    /// Start a checkout on the shipping step.
    #[must_use]
    pub const fn new(tax_rate: Decimal, currency: CurrencyCode) -> Self {
        Self {
            step: CheckoutStep::Shipping,
            tax_rate,
            currency,
            shipping: None,
            payment: None,
            completed: None,
        }
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn shipping(&self) -> Option<&ShippingDetails> {
        self.shipping.as_ref()
    }

    #[must_use]
    pub const fn payment(&self) -> Option<&PaymentDetails> {
        self.payment.as_ref()
    }

    /// The placed order, once the flow has completed.
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        self.completed.as_ref()
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed.is_some()
    }

    /// Totals for the cart as it stands now.
    #[must_use]
    pub fn summary(&self, cart: &CartEngine) -> OrderTotals {
        OrderTotals::from_subtotal(cart.cart_total(), self.tax_rate)
    }

    /// Validate shipping details and move to the payment step.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::WrongStep` unless on the shipping step, or a
    /// validation error from [`ShippingDetails::parse`].
    pub fn submit_shipping(&mut self, form: &ShippingForm) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Shipping)?;
        self.shipping = Some(ShippingDetails::parse(form)?);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Validate payment details and move to the review step.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::WrongStep` unless on the payment step, or a
    /// validation error from [`PaymentDetails::parse`].
    pub fn submit_payment(&mut self, form: &PaymentForm) -> Result<(), CheckoutError> {
        self.submit_payment_details(PaymentDetails::parse(form))
    }

    /// As [`Self::submit_payment`], validating expiry as of `today`.
    ///
    /// # Errors
    ///
    /// See [`Self::submit_payment`].
    pub fn submit_payment_on(
        &mut self,
        form: &PaymentForm,
        today: NaiveDate,
    ) -> Result<(), CheckoutError> {
        self.submit_payment_details(PaymentDetails::parse_on(form, today))
    }

    fn submit_payment_details(
        &mut self,
        details: Result<PaymentDetails, CheckoutError>,
    ) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Payment)?;
        self.payment = Some(details?);
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Advance to the next step if the current step's details are present.
    ///
    /// Stays on the review step when already there.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingShipping` / `MissingPayment` when the
    /// current step has not been filled in, or `AlreadyCompleted`.
    pub fn next_step(&mut self) -> Result<CheckoutStep, CheckoutError> {
        if self.is_complete() {
            return Err(CheckoutError::AlreadyCompleted);
        }
        match self.step {
            CheckoutStep::Shipping if self.shipping.is_none() => {
                return Err(CheckoutError::MissingShipping);
            }
            CheckoutStep::Payment if self.payment.is_none() => {
                return Err(CheckoutError::MissingPayment);
            }
            _ => {}
        }
        self.step = self.step.next().unwrap_or(self.step);
        Ok(self.step)
    }

    /// Go back one step, keeping entered details. Stays on the first step.
    pub fn previous_step(&mut self) -> CheckoutStep {
        if !self.is_complete() {
            self.step = self.step.previous().unwrap_or(self.step);
        }
        self.step
    }

    /// Place the order and clear the cart.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::AlreadyCompleted` if an order was already placed
    /// - `CheckoutError::WrongStep` unless on the review step
    /// - `CheckoutError::EmptyCart` if the cart has no lines
    /// - `CheckoutError::MissingShipping` / `MissingPayment` if details are absent
    pub fn place_order(&mut self, cart: &mut CartEngine) -> Result<Order, CheckoutError> {
        self.place_order_with_rng(cart, &mut rand::rng())
    }

    /// As [`Self::place_order`], drawing the order number from `rng`.
    ///
    /// # Errors
    ///
    /// See [`Self::place_order`].
    #[instrument(skip_all, fields(lines = cart.line_count()))]
    pub fn place_order_with_rng<R>(
        &mut self,
        cart: &mut CartEngine,
        rng: &mut R,
    ) -> Result<Order, CheckoutError>
    where
        R: Rng + ?Sized,
    {
        if self.is_complete() {
            return Err(CheckoutError::AlreadyCompleted);
        }
        self.expect_step(CheckoutStep::Review)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let shipping = self.shipping.as_ref().ok_or(CheckoutError::MissingShipping)?;
        let payment = self.payment.as_ref().ok_or(CheckoutError::MissingPayment)?;

        let placed_at = Utc::now();
        let today = placed_at.date_naive();
        let order = Order {
            id: OrderId::new(rng.random_range(ORDER_NUMBER_RANGE)),
            status: OrderStatus::Processing,
            placed_at,
            estimated_delivery: DeliveryWindow {
                earliest: today
                    .checked_add_days(Days::new(DELIVERY_DAYS_MIN))
                    .unwrap_or(today),
                latest: today
                    .checked_add_days(Days::new(DELIVERY_DAYS_MAX))
                    .unwrap_or(today),
            },
            lines: cart.cart_lines().map(OrderLine::from).collect(),
            totals: self.summary(cart),
            currency: self.currency,
            email: shipping.email.clone(),
            ship_to: shipping.full_name(),
            shipping_address: shipping.address.clone(),
            card_last_four: payment.last_four(),
        };

        cart.clear_cart();
        tracing::info!(
            order_id = %order.id,
            total = %order.totals.total,
            "Order placed"
        );

        self.completed = Some(order.clone());
        Ok(order)
    }

    fn expect_step(&self, expected: CheckoutStep) -> Result<(), CheckoutError> {
        if self.is_complete() {
            return Err(CheckoutError::AlreadyCompleted);
        }
        if self.step != expected {
            return Err(CheckoutError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::testing::priced;

    fn shipping_form() -> ShippingForm {
        ShippingForm {
            first_name: "Emily".to_string(),
            last_name: "Chen".to_string(),
            email: "emily@example.com".to_string(),
            address: "12 Grain Street".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip_code: "97201".to_string(),
            country: "United States".to_string(),
        }
    }

    fn payment_form() -> PaymentForm {
        PaymentForm {
            card_name: "Emily Chen".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            exp_date: "12/30".to_string(),
            cvv: "123".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn flow_at_review() -> CheckoutFlow {
        let mut flow = CheckoutFlow::new(Decimal::new(8, 2), CurrencyCode::USD);
        flow.submit_shipping(&shipping_form()).unwrap();
        flow.submit_payment_on(&payment_form(), today()).unwrap();
        flow
    }

    #[test]
    fn test_totals_flat_tax_free_shipping() {
        let totals = OrderTotals::from_subtotal(Decimal::from(1899), Decimal::new(8, 2));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::new(15_192, 2));
        assert_eq!(totals.total, Decimal::new(205_092, 2));
    }

    #[test]
    fn test_totals_tax_rounded_to_cents() {
        let totals = OrderTotals::from_subtotal(Decimal::new(1999, 2), Decimal::new(8, 2));
        // 19.99 * 0.08 = 1.5992
        assert_eq!(totals.tax, Decimal::new(160, 2));
        assert_eq!(totals.total, Decimal::new(2159, 2));
    }

    #[test]
    fn test_totals_empty_cart() {
        let totals = OrderTotals::from_subtotal(Decimal::ZERO, Decimal::new(8, 2));
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_shipping_requires_fields() {
        let mut form = shipping_form();
        form.city = "   ".to_string();
        assert!(matches!(
            ShippingDetails::parse(&form),
            Err(CheckoutError::MissingField("City"))
        ));
    }

    #[test]
    fn test_shipping_rejects_bad_email() {
        let mut form = shipping_form();
        form.email = "emily-at-example".to_string();
        assert!(matches!(
            ShippingDetails::parse(&form),
            Err(CheckoutError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_payment_validation() {
        let mut form = payment_form();
        form.card_number = "4242 4242 4242 4241".to_string();
        assert!(matches!(
            PaymentDetails::parse_on(&form, today()),
            Err(CheckoutError::InvalidCardNumber)
        ));

        let mut form = payment_form();
        form.exp_date = "13/30".to_string();
        assert!(matches!(
            PaymentDetails::parse_on(&form, today()),
            Err(CheckoutError::InvalidExpiry(_))
        ));

        let mut form = payment_form();
        form.exp_date = "09/26".to_string();
        assert!(matches!(
            PaymentDetails::parse_on(&form, today()),
            Err(CheckoutError::InvalidExpiry(_))
        ));

        let mut form = payment_form();
        form.cvv = "12a".to_string();
        assert!(matches!(
            PaymentDetails::parse_on(&form, today()),
            Err(CheckoutError::InvalidCvv)
        ));
    }

    #[test]
    fn test_expiry_rejects_signed_components() {
        for input in ["12/-1", "12/+5", "+1/30", "-1/2030", "1 2/30", "/30"] {
            assert!(
                matches!(CardExpiry::parse(input), Err(CheckoutError::InvalidExpiry(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let totals = OrderTotals::from_subtotal(Decimal::MAX, Decimal::new(8, 2));
        assert_eq!(totals.total, Decimal::MAX);
        assert!(totals.tax > Decimal::ZERO);
    }

    #[test]
    fn test_expiry_current_month_still_valid() {
        let expiry = CardExpiry::parse("10/26").unwrap();
        assert!(expiry.is_valid_on(today()));
        assert_eq!(expiry.to_string(), "10/26");
        assert_eq!(CardExpiry::parse("01/2031").unwrap().year, 2031);
    }

    #[test]
    fn test_payment_debug_redacts_secrets() {
        let details = PaymentDetails::parse_on(&payment_form(), today()).unwrap();
        let debug = format!("{details:?}");
        assert!(!debug.contains("4242 4242"));
        assert!(!debug.contains("4242424242424242"));
        assert!(!debug.contains("123"));
        assert_eq!(details.last_four(), "4242");

        let form_debug = format!("{:?}", payment_form());
        assert!(!form_debug.contains("4242"));
    }

    #[test]
    fn test_step_navigation() {
        let mut flow = CheckoutFlow::new(Decimal::new(8, 2), CurrencyCode::USD);
        assert_eq!(flow.step(), CheckoutStep::Shipping);
        assert!(matches!(flow.next_step(), Err(CheckoutError::MissingShipping)));
        assert_eq!(flow.previous_step(), CheckoutStep::Shipping);

        flow.submit_shipping(&shipping_form()).unwrap();
        assert_eq!(flow.step(), CheckoutStep::Payment);
        assert_eq!(flow.previous_step(), CheckoutStep::Shipping);
        assert_eq!(flow.next_step().unwrap(), CheckoutStep::Payment);
        assert!(matches!(flow.next_step(), Err(CheckoutError::MissingPayment)));

        flow.submit_payment_on(&payment_form(), today()).unwrap();
        assert_eq!(flow.step(), CheckoutStep::Review);
        assert_eq!(flow.next_step().unwrap(), CheckoutStep::Review);
    }

    #[test]
    fn test_submit_on_wrong_step() {
        let mut flow = CheckoutFlow::new(Decimal::new(8, 2), CurrencyCode::USD);
        assert!(matches!(
            flow.submit_payment_on(&payment_form(), today()),
            Err(CheckoutError::WrongStep {
                expected: CheckoutStep::Payment,
                actual: CheckoutStep::Shipping
            })
        ));
    }

    #[test]
    fn test_place_order_snapshots_and_clears_cart() {
        let mut cart = CartEngine::new();
        cart.add_to_cart(priced(1, 1899), 1).unwrap();
        cart.add_to_cart(priced(6, 399), 4).unwrap();
        let rx = cart.subscribe();

        let mut flow = flow_at_review();
        let mut rng = StdRng::seed_from_u64(7);
        let order = flow.place_order_with_rng(&mut cart, &mut rng).unwrap();

        assert!(ORDER_NUMBER_RANGE.contains(&order.id.as_i32()));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[1].quantity, 4);
        assert_eq!(order.lines[1].line_total, Decimal::from(1596));
        assert_eq!(order.totals.subtotal, Decimal::from(3495));
        assert_eq!(order.totals.tax, Decimal::new(27_960, 2));
        assert_eq!(order.format(order.totals.total), "$3774.60");
        assert_eq!(order.ship_to, "Emily Chen");
        assert_eq!(order.card_last_four, "4242");
        assert_eq!(
            (order.estimated_delivery.latest - order.estimated_delivery.earliest).num_days(),
            7
        );

        assert!(cart.is_empty());
        assert!(rx.has_changed().unwrap());
        assert!(flow.is_complete());
        assert_eq!(flow.order(), Some(&order));
    }

    #[test]
    fn test_place_order_only_once() {
        let mut cart = CartEngine::new();
        cart.add_to_cart(priced(1, 100), 1).unwrap();
        let mut flow = flow_at_review();
        flow.place_order(&mut cart).unwrap();

        cart.add_to_cart(priced(2, 100), 1).unwrap();
        assert!(matches!(
            flow.place_order(&mut cart),
            Err(CheckoutError::AlreadyCompleted)
        ));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_place_order_requires_items_and_review() {
        let mut cart = CartEngine::new();
        let mut flow = flow_at_review();
        assert!(matches!(flow.place_order(&mut cart), Err(CheckoutError::EmptyCart)));

        cart.add_to_cart(priced(1, 100), 1).unwrap();
        let mut early = CheckoutFlow::new(Decimal::new(8, 2), CurrencyCode::USD);
        assert!(matches!(
            early.place_order(&mut cart),
            Err(CheckoutError::WrongStep { .. })
        ));
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_order_number_label() {
        let mut cart = CartEngine::new();
        cart.add_to_cart(priced(1, 100), 1).unwrap();
        let order = flow_at_review().place_order(&mut cart).unwrap();
        assert_eq!(order.number_label(), format!("#{}", order.id.as_i32()));
    }

    #[test]
    fn test_luhn() {
        assert!(luhn_valid("4242424242424242"));
        assert!(luhn_valid("5555555555554444"));
        assert!(!luhn_valid("4242424242424241"));
    }
}
