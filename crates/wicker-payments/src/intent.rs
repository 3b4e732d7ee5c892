//! Payment intent types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique payment intent identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentId(String);

impl IntentId {
    /// Create an intent ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random intent ID.
    pub fn generate() -> Self {
        Self(format!("pi_{}", random_token(16)))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IntentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An in-progress charge attempt held by the processor.
///
/// The `client_secret` is handed to the client-side payment widget; the
/// engine only stores it, never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Processor-assigned identifier.
    pub id: IntentId,
    /// Client-side confirmation secret.
    pub client_secret: String,
    /// Amount in the currency's minor unit (e.g., cents).
    pub amount_minor: i64,
    /// ISO currency code (e.g., "USD").
    pub currency: String,
}

impl PaymentIntent {
    /// Create a new intent at the given amount.
    pub fn new(amount_minor: i64, currency: impl Into<String>) -> Self {
        let id = IntentId::generate();
        let client_secret = format!("{}_secret_{}", id, random_token(12));
        Self {
            id,
            client_secret,
            amount_minor,
            currency: currency.into(),
        }
    }
}

/// Generate a URL-safe random token of `bytes` random bytes.
fn random_token(bytes: usize) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;

    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill(buf.as_mut_slice());
    URL_SAFE_NO_PAD.encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_ids_are_unique() {
        let a = IntentId::generate();
        let b = IntentId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("pi_"));
    }

    #[test]
    fn test_intent_creation() {
        let intent = PaymentIntent::new(4388, "USD");
        assert_eq!(intent.amount_minor, 4388);
        assert_eq!(intent.currency, "USD");
        assert!(intent.client_secret.contains("_secret_"));
    }
}
