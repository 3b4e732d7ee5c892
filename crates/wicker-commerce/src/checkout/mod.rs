//! Checkout module.
//!
//! The checkout session is an explicit finite-state machine over
//! shipping, payment, and review, ending in a terminal placed state that
//! carries the order id.

mod address;
mod session;

pub use address::Address;
pub use session::{CheckoutSession, CheckoutStep};
