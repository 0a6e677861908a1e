//! Simulated checkout command.
//!
//! Fills a cart from `--item` arguments, walks the shipping, payment and
//! review steps, and prints the resulting order. No payment is taken.
//!
//! # Usage
//!
//! ```bash
//! woodcraft checkout --item 1 --item 6:4 --email emily@example.com \
//!     --first-name Emily --last-name Chen --address "12 Grain Street" \
//!     --city Portland --state OR --zip 97201
//! ```

use clap::Args;
use woodcraft_core::ProductId;
use woodcraft_storefront::checkout::{PaymentForm, ShippingForm};
use woodcraft_storefront::{StorefrontError, StorefrontSession};

use super::{CliError, Output};

/// Arguments for `woodcraft checkout`.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Product to buy as ID or ID:QTY (repeatable)
    #[arg(long = "item", required = true, value_parser = parse_item)]
    items: Vec<(ProductId, u32)>,

    /// Contact email
    #[arg(long)]
    email: String,

    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    /// Street address
    #[arg(long)]
    address: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: String,

    #[arg(long = "zip")]
    zip_code: String,

    #[arg(long, default_value = "United States")]
    country: String,

    /// Name on card (defaults to the shipping name)
    #[arg(long)]
    card_name: Option<String>,

    /// Card number
    #[arg(long = "card", default_value = "4242 4242 4242 4242")]
    card_number: String,

    /// Card expiry as MM/YY
    #[arg(long, default_value = "12/30")]
    expiry: String,

    /// Card security code
    #[arg(long, default_value = "123")]
    cvv: String,
}

/// Parse `ID` or `ID:QTY`.
fn parse_item(input: &str) -> Result<(ProductId, u32), String> {
    let (id, quantity) = input.split_once(':').unwrap_or((input, "1"));
    let id = id
        .parse::<ProductId>()
        .map_err(|e| format!("invalid product id '{id}': {e}"))?;
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
    Ok((id, quantity))
}

/// Run the checkout and print the order.
///
/// # Errors
///
/// Returns an error if an item cannot be added, the details fail
/// validation, or output cannot be written.
pub async fn run(
    mut session: StorefrontSession,
    output: &Output,
    args: CheckoutArgs,
) -> Result<(), CliError> {
    let mut cart_updates = session.subscribe_cart();
    let watcher = tokio::spawn(async move {
        while cart_updates.changed().await.is_ok() {
            let snapshot = cart_updates.borrow_and_update().clone();
            tracing::info!(
                items = snapshot.count(),
                subtotal = %snapshot.total(),
                "Cart updated"
            );
        }
    });

    for &(id, quantity) in &args.items {
        session.add_to_cart_by_id(id, quantity)?;
        tokio::task::yield_now().await;
    }

    let shipping = ShippingForm {
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        email: args.email,
        address: args.address,
        city: args.city,
        state: args.state,
        zip_code: args.zip_code,
        country: args.country,
    };
    let payment = PaymentForm {
        card_name: args
            .card_name
            .unwrap_or_else(|| format!("{} {}", args.first_name, args.last_name)),
        card_number: args.card_number,
        exp_date: args.expiry,
        cvv: args.cvv,
    };

    let mut flow = session.checkout();
    flow.submit_shipping(&shipping).map_err(StorefrontError::from)?;
    flow.submit_payment(&payment).map_err(StorefrontError::from)?;
    let order = session.place_order(&mut flow)?;

    // Closing the session ends the watcher.
    drop(session);
    watcher.await?;

    if output.is_json() {
        return output.json(&order);
    }

    let mut lines = vec![
        format!("Order {} placed ({})", order.number_label(), order.status),
        format!(
            "Ships to {}, {}, {} {} {}",
            order.ship_to,
            order.shipping_address.street,
            order.shipping_address.city,
            order.shipping_address.state,
            order.shipping_address.zip_code
        ),
        format!("Confirmation sent to {}", order.email),
        String::new(),
    ];
    lines.extend(order.lines.iter().map(|line| {
        format!(
            "{:>3} × {:<28} {:>10}",
            line.quantity,
            line.name,
            order.format(line.line_total)
        )
    }));
    lines.extend([
        String::new(),
        format!("Subtotal  {:>12}", order.format(order.totals.subtotal)),
        format!("Shipping  {:>12}", "Free"),
        format!("Tax       {:>12}", order.format(order.totals.tax)),
        format!("Total     {:>12}", order.format(order.totals.total)),
        String::new(),
        format!("Paid with card ending {}", order.card_last_four),
        format!(
            "Estimated delivery {} to {}",
            order.estimated_delivery.earliest, order.estimated_delivery.latest
        ),
    ]);
    output.lines(lines)
}
