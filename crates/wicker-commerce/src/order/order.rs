//! Order types.

use crate::checkout::Address;
use crate::error::StorefrontError;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Order status.
///
/// Fulfillment walks Pending, Processing, Shipped, Delivered; cancellation
/// is reachable from the first two only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order confirmed and being prepared.
    Processing,
    /// Order handed to the carrier.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Check if `next` is a legal transition from this status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Processing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Processing, OrderStatus::Shipped)
                | (OrderStatus::Processing, OrderStatus::Cancelled)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
        )
    }
}

/// One line of a placed order.
///
/// A snapshot, deliberately decoupled from the live product: later price or
/// catalog edits never alter what the shopper was charged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Product that was bought.
    pub product_id: ProductId,
    /// Product title at purchase time.
    pub title: String,
    /// Thumbnail URL at purchase time.
    pub thumbnail: Option<String>,
    /// Quantity bought.
    pub quantity: i64,
    /// Unit price actually charged.
    pub price_at_purchase: Money,
    /// `price_at_purchase * quantity`.
    pub line_total: Money,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order number.
    pub number: String,
    /// Customer email.
    pub email: String,
    /// Current status.
    pub status: OrderStatus,
    /// Snapshotted line items.
    pub lines: Vec<OrderLine>,
    /// Subtotal before discount.
    pub subtotal: Money,
    /// Coupon discount.
    pub discount: Money,
    /// Shipping charged.
    pub shipping: Money,
    /// Tax charged.
    pub tax: Money,
    /// Total charged.
    pub total: Money,
    /// Shipping destination.
    pub shipping_address: Address,
    /// Billing address.
    pub billing_address: Address,
    /// Payment method token used.
    pub payment_method: String,
    /// Unix timestamp of placement.
    pub placed_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Order {
    /// Generate a human-readable order number.
    pub fn generate_number() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        format!("WCK-{}", ts)
    }

    /// Total item count.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Transition to a new status, rejecting illegal edges.
    pub fn set_status(&mut self, status: OrderStatus) -> Result<(), StorefrontError> {
        if !self.status.can_transition_to(status) {
            return Err(StorefrontError::InvalidStatusTransition {
                from: self.status.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }
        self.status = status;
        self.updated_at = current_timestamp();
        Ok(())
    }
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
