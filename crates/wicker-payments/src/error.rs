//! Payment error types.

use thiserror::Error;

/// Errors surfaced by a payment gateway.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// No intent exists under the given identifier.
    #[error("Payment intent not found: {0}")]
    IntentNotFound(String),

    /// The processor rejected the request.
    #[error("Payment rejected: {0}")]
    Rejected(String),

    /// The processor could not be reached or errored internally.
    #[error("Payment processor unavailable: {0}")]
    Unavailable(String),
}
