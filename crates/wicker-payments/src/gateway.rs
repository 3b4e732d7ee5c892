//! Payment gateway trait and mock implementation.

use crate::{IntentId, PaymentError, PaymentIntent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// An external payment processor.
///
/// Implementations must treat intent handling as idempotent per checkout
/// session: callers hold on to the intent from `create_intent` and reconcile
/// amount changes through `update_intent` rather than creating a second
/// intent for the same session.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a new intent for the given amount in minor units.
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Change an existing intent's amount.
    async fn update_intent(&self, id: &IntentId, amount_minor: i64) -> Result<(), PaymentError>;
}

#[derive(Default)]
struct MockState {
    intents: HashMap<IntentId, PaymentIntent>,
    create_calls: u64,
    update_calls: u64,
    fail_next: bool,
}

/// In-process gateway for demos and tests.
///
/// Records every intent and counts calls so tests can assert on the
/// create-once/update-thereafter contract. `fail_next` makes the next call
/// (create or update) fail with [`PaymentError::Unavailable`].
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    /// Create an empty mock gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next gateway call fail.
    pub fn fail_next(&self) {
        self.state.lock().expect("gateway lock poisoned").fail_next = true;
    }

    /// Number of `create_intent` calls seen.
    pub fn create_calls(&self) -> u64 {
        self.state.lock().expect("gateway lock poisoned").create_calls
    }

    /// Number of `update_intent` calls seen.
    pub fn update_calls(&self) -> u64 {
        self.state.lock().expect("gateway lock poisoned").update_calls
    }

    /// Look up a recorded intent.
    pub fn intent(&self, id: &IntentId) -> Option<PaymentIntent> {
        self.state
            .lock()
            .expect("gateway lock poisoned")
            .intents
            .get(id)
            .cloned()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let mut state = self.state.lock().expect("gateway lock poisoned");
        state.create_calls += 1;
        if state.fail_next {
            state.fail_next = false;
            return Err(PaymentError::Unavailable("injected failure".to_string()));
        }
        let intent = PaymentIntent::new(amount_minor, currency);
        state.intents.insert(intent.id.clone(), intent.clone());
        Ok(intent)
    }

    async fn update_intent(&self, id: &IntentId, amount_minor: i64) -> Result<(), PaymentError> {
        let mut state = self.state.lock().expect("gateway lock poisoned");
        state.update_calls += 1;
        if state.fail_next {
            state.fail_next = false;
            return Err(PaymentError::Unavailable("injected failure".to_string()));
        }
        match state.intents.get_mut(id) {
            Some(intent) => {
                intent.amount_minor = amount_minor;
                Ok(())
            }
            None => Err(PaymentError::IntentNotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_update_intent() {
        let gateway = MockGateway::new();
        let intent = gateway.create_intent(1000, "USD").await.unwrap();
        assert_eq!(gateway.create_calls(), 1);

        gateway.update_intent(&intent.id, 1500).await.unwrap();
        assert_eq!(gateway.update_calls(), 1);
        assert_eq!(gateway.intent(&intent.id).unwrap().amount_minor, 1500);
    }

    #[tokio::test]
    async fn test_update_unknown_intent_fails() {
        let gateway = MockGateway::new();
        let result = gateway.update_intent(&IntentId::from("pi_missing"), 100).await;
        assert!(matches!(result, Err(PaymentError::IntentNotFound(_))));
    }

    #[tokio::test]
    async fn test_failure_injection_is_one_shot() {
        let gateway = MockGateway::new();
        gateway.fail_next();
        assert!(gateway.create_intent(1000, "USD").await.is_err());
        assert!(gateway.create_intent(1000, "USD").await.is_ok());
    }
}
