//! Storefront error types.

use crate::catalog::Shortfall;
use thiserror::Error;
use wicker_payments::PaymentError;

/// Errors that can occur in the storefront engine.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Quantity must be at least 1.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds the per-line maximum.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityLimit(i64, i64),

    /// Required fields are empty or absent.
    #[error("Missing required fields: {0}")]
    MissingFields(String),

    /// Product is not in the catalog.
    #[error("Product unavailable: {0}")]
    ProductUnavailable(String),

    /// Requested quantity exceeds available stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// One or more lines failed stock re-validation at commit time.
    #[error("Stock conflict on {} line(s)", .shortfalls.len())]
    StockConflict { shortfalls: Vec<Shortfall> },

    /// Coupon code did not resolve.
    #[error("Unknown coupon code: {0}")]
    UnknownCoupon(String),

    /// Requested checkout edge is not a defined transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A payment-intent call for this session is already in flight.
    #[error("Payment intent request already in flight")]
    IntentPending,

    /// An order placement for this session is already outstanding.
    #[error("Order placement already in progress")]
    PlacementPending,

    /// Cannot place an order from an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Order status change is not a legal transition.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Payment gateway failure, surfaced verbatim.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Backend collaborator failure.
    #[error("Backend error: {0}")]
    Backend(String),
}
