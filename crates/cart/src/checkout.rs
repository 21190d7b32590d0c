//! Order summaries and the payment gateway seam.
//!
//! Checkout builds an [`OrderSummary`] from the cart and hands it to a
//! [`PaymentGateway`]. The cart is only cleared once the gateway returns a
//! [`PaymentConfirmation`].

use core::fmt;
use std::str::FromStr;

use askama::Template;
use chrono::{DateTime, Utc};
use logos_core::{Quantity, format_amount};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::cart::Cart;

/// Errors reported by a payment gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The provider refused the payment.
    #[error("{provider} declined the payment: {reason}")]
    Declined {
        provider: PaymentProvider,
        reason: String,
    },

    /// The provider could not be reached or is not configured.
    #[error("{provider} is unavailable: {reason}")]
    Unavailable {
        provider: PaymentProvider,
        reason: String,
    },
}

/// Supported payment providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    #[default]
    Stripe,
    PayPal,
}

impl PaymentProvider {
    /// Lowercase identifier used in config and references.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::PayPal => "paypal",
        }
    }
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stripe => f.write_str("Stripe"),
            Self::PayPal => f.write_str("PayPal"),
        }
    }
}

impl FromStr for PaymentProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stripe" => Ok(Self::Stripe),
            "paypal" => Ok(Self::PayPal),
            other => Err(format!("unknown payment provider: {other}")),
        }
    }
}

/// One line of an order summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: Quantity,
    pub subtotal: Decimal,
}

/// What the customer is about to pay for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub lines: Vec<OrderLine>,
    /// Grand total rounded to cents.
    pub total: Decimal,
}

impl OrderSummary {
    /// Summarize a cart. Returns `None` for an empty cart.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }
        let lines = cart
            .iter()
            .map(|item| OrderLine {
                name: item.name.clone(),
                quantity: item.quantity,
                subtotal: item.subtotal(),
            })
            .collect();
        Some(Self {
            lines,
            total: cart.total_price(),
        })
    }

    /// Render the summary shown to the customer before payment.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Render`](crate::CartError::Render) if the
    /// template fails to render.
    pub fn render(&self) -> crate::Result<String> {
        Ok(OrderSummaryTemplate::from(self).render()?)
    }
}

/// A payment the provider accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentConfirmation {
    pub provider: PaymentProvider,
    /// Provider-side reference for the payment.
    pub reference: String,
    pub amount: Decimal,
    pub confirmed_at: DateTime<Utc>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutReceipt {
    pub order: OrderSummary,
    pub confirmation: PaymentConfirmation,
}

/// Collects payment for an order.
pub trait PaymentGateway {
    fn provider(&self) -> PaymentProvider;

    /// Take payment for `order`. Returning `Ok` means the money is secured
    /// and the cart may be cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment was not confirmed.
    fn collect(&mut self, order: &OrderSummary) -> Result<PaymentConfirmation, PaymentError>;
}

/// Placeholder gateway that confirms every order without contacting the
/// provider.
///
/// Implements `Debug` manually to redact the API key.
pub struct StubGateway {
    provider: PaymentProvider,
    api_key: Option<SecretString>,
}

impl StubGateway {
    #[must_use]
    pub const fn new(provider: PaymentProvider) -> Self {
        Self {
            provider,
            api_key: None,
        }
    }

    /// Attach the provider API key a real integration would use.
    #[must_use]
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }
}

impl fmt::Debug for StubGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubGateway")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl PaymentGateway for StubGateway {
    fn provider(&self) -> PaymentProvider {
        self.provider
    }

    #[instrument(skip(self, order), fields(provider = %self.provider, total = %order.total))]
    fn collect(&mut self, order: &OrderSummary) -> Result<PaymentConfirmation, PaymentError> {
        info!(
            lines = order.lines.len(),
            has_api_key = self.api_key.is_some(),
            "Initiating {} payment",
            self.provider
        );

        let confirmed_at = Utc::now();
        Ok(PaymentConfirmation {
            provider: self.provider,
            reference: format!(
                "{}-{}",
                self.provider.code(),
                confirmed_at.timestamp_millis()
            ),
            amount: order.total,
            confirmed_at,
        })
    }
}

// =============================================================================
// Templates
// =============================================================================

struct OrderLineView {
    name: String,
    quantity: u32,
    subtotal: String,
}

#[derive(Template)]
#[template(path = "order_summary.txt")]
struct OrderSummaryTemplate {
    lines: Vec<OrderLineView>,
    total: String,
}

impl From<&OrderSummary> for OrderSummaryTemplate {
    fn from(order: &OrderSummary) -> Self {
        Self {
            lines: order
                .lines
                .iter()
                .map(|line| OrderLineView {
                    name: line.name.clone(),
                    quantity: line.quantity.get(),
                    subtotal: format_amount(line.subtotal),
                })
                .collect(),
            total: format_amount(order.total),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::LineItem;
    use logos_core::{LineItemId, Price};

    fn sample_cart() -> Cart {
        Cart::from_items(vec![
            LineItem {
                id: LineItemId::new(1),
                name: "Logo Design".to_string(),
                price: Price::parse("150.00").unwrap(),
                quantity: Quantity::new(2).unwrap(),
            },
            LineItem {
                id: LineItemId::new(2),
                name: "Business Cards".to_string(),
                price: Price::parse("25.50").unwrap(),
                quantity: Quantity::MIN,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_summary_from_empty_cart() {
        assert!(OrderSummary::from_cart(&Cart::new()).is_none());
    }

    #[test]
    fn test_summary_lines_and_total() {
        let summary = OrderSummary::from_cart(&sample_cart()).unwrap();
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines.first().unwrap().subtotal, Decimal::new(300, 0));
        assert_eq!(summary.total, Decimal::new(32550, 2));
    }

    #[test]
    fn test_render_summary() {
        let text = OrderSummary::from_cart(&sample_cart())
            .unwrap()
            .render()
            .unwrap();
        assert!(text.starts_with("Order Summary:"));
        assert!(text.contains("Logo Design (x2): $300.00"));
        assert!(text.contains("Business Cards (x1): $25.50"));
        assert!(text.contains("Total: $325.50"));
    }

    #[test]
    fn test_stub_gateway_confirms() {
        let summary = OrderSummary::from_cart(&sample_cart()).unwrap();
        let mut gateway = StubGateway::new(PaymentProvider::PayPal);
        let confirmation = gateway.collect(&summary).unwrap();
        assert_eq!(confirmation.provider, PaymentProvider::PayPal);
        assert_eq!(confirmation.amount, summary.total);
        assert!(confirmation.reference.starts_with("paypal-"));
    }

    #[test]
    fn test_stub_gateway_debug_redacts_key() {
        let gateway = StubGateway::new(PaymentProvider::Stripe)
            .with_api_key(SecretString::from("sk_live_super_secret_value"));
        let debug_output = format!("{gateway:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_live_super_secret_value"));
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("Stripe".parse::<PaymentProvider>(), Ok(PaymentProvider::Stripe));
        assert_eq!("paypal".parse::<PaymentProvider>(), Ok(PaymentProvider::PayPal));
        assert!("venmo".parse::<PaymentProvider>().is_err());
    }
}
