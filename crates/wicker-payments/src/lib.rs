//! Payment processor collaborator for Wicker.
//!
//! Models the external payment processor as an async [`PaymentGateway`] that
//! creates and amends payment intents. An intent is the processor's handle
//! for an in-progress charge attempt at a given amount; checkout holds at
//! most one intent per session and reconciles its amount instead of creating
//! a second one.
//!
//! A [`MockGateway`] ships for demos and tests. It records every intent,
//! counts create/update calls, and can inject failures.

mod error;
mod gateway;
mod intent;

pub use error::PaymentError;
pub use gateway::{MockGateway, PaymentGateway};
pub use intent::{IntentId, PaymentIntent};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{IntentId, MockGateway, PaymentError, PaymentGateway, PaymentIntent};
}
