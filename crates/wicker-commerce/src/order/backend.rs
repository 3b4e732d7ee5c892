//! Order persistence collaborator.

use crate::error::StorefrontError;
use crate::ids::OrderId;
use crate::order::{Order, OrderStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// The external system of record for placed orders.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Persist a new order, returning its id.
    async fn create_order(&self, order: Order) -> Result<OrderId, StorefrontError>;

    /// Look up one order.
    async fn order(&self, id: &OrderId) -> Result<Option<Order>, StorefrontError>;

    /// Order history for a customer, newest first.
    async fn orders_for_email(&self, email: &str) -> Result<Vec<Order>, StorefrontError>;

    /// Apply a status transition (fulfillment/admin surface).
    async fn update_status(&self, id: &OrderId, status: OrderStatus)
        -> Result<(), StorefrontError>;
}

/// In-memory order backend for demos and tests.
#[derive(Default)]
pub struct MemoryOrders {
    orders: Mutex<HashMap<OrderId, Order>>,
    fail_creates: AtomicBool,
}

impl MemoryOrders {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create_order` fail.
    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Number of persisted orders.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no orders are persisted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<OrderId, Order>> {
        self.orders.lock().expect("orders lock poisoned")
    }
}

#[async_trait]
impl OrderBackend for MemoryOrders {
    async fn create_order(&self, order: Order) -> Result<OrderId, StorefrontError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(StorefrontError::Backend(
                "create failure injected".to_string(),
            ));
        }
        let id = order.id.clone();
        self.lock().insert(id.clone(), order);
        Ok(id)
    }

    async fn order(&self, id: &OrderId) -> Result<Option<Order>, StorefrontError> {
        Ok(self.lock().get(id).cloned())
    }

    async fn orders_for_email(&self, email: &str) -> Result<Vec<Order>, StorefrontError> {
        let mut orders: Vec<Order> = self
            .lock()
            .values()
            .filter(|o| o.email == email)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        Ok(orders)
    }

    async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), StorefrontError> {
        let mut orders = self.lock();
        let order = orders
            .get_mut(id)
            .ok_or_else(|| StorefrontError::Backend(format!("order not found: {}", id)))?;
        order.set_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::Address;
    use crate::money::{Currency, Money};
    use crate::order::order::current_timestamp;

    fn order(email: &str, placed_at: i64) -> Order {
        let zero = Money::zero(Currency::USD);
        Order {
            id: OrderId::generate(),
            number: Order::generate_number(),
            email: email.to_string(),
            status: OrderStatus::Pending,
            lines: vec![],
            subtotal: zero,
            discount: zero,
            shipping: zero,
            tax: zero,
            total: zero,
            shipping_address: Address::default(),
            billing_address: Address::default(),
            payment_method: "tok_visa".to_string(),
            placed_at,
            updated_at: placed_at,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let backend = MemoryOrders::new();
        let id = backend
            .create_order(order("ada@example.com", current_timestamp()))
            .await
            .unwrap();
        assert!(backend.order(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let backend = MemoryOrders::new();
        backend.create_order(order("ada@example.com", 100)).await.unwrap();
        backend.create_order(order("ada@example.com", 200)).await.unwrap();
        backend.create_order(order("other@example.com", 300)).await.unwrap();

        let history = backend.orders_for_email("ada@example.com").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].placed_at, 200);
    }

    #[tokio::test]
    async fn test_status_update_enforces_transitions() {
        let backend = MemoryOrders::new();
        let id = backend
            .create_order(order("ada@example.com", 100))
            .await
            .unwrap();

        backend.update_status(&id, OrderStatus::Processing).await.unwrap();
        let result = backend.update_status(&id, OrderStatus::Delivered).await;
        assert!(result.is_err());
    }
}
