//! In-memory catalog for demos and tests.

use crate::error::StorefrontError;
use crate::ids::ProductId;
use crate::money::Money;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{Catalog, DecrementOutcome, ProductRecord, StockAuthority};

/// In-memory catalog implementing both the read view and the stock authority.
///
/// A single mutex over the product map makes check-and-decrement atomic per
/// call, which is the serialization the authority contract requires.
#[derive(Default)]
pub struct MemoryCatalog {
    products: Mutex<HashMap<ProductId, ProductRecord>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product record.
    pub fn insert(&self, record: ProductRecord) {
        self.lock().insert(record.id.clone(), record);
    }

    /// Change a product's selling price.
    pub fn set_price(&self, id: &ProductId, price: Money) {
        if let Some(record) = self.lock().get_mut(id) {
            record.price = price;
        }
    }

    /// Set a product's on-hand stock count.
    pub fn set_stock(&self, id: &ProductId, stock: i64) {
        if let Some(record) = self.lock().get_mut(id) {
            record.stock = stock;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ProductId, ProductRecord>> {
        self.products.lock().expect("catalog lock poisoned")
    }
}

impl Catalog for MemoryCatalog {
    fn product(&self, id: &ProductId) -> Option<ProductRecord> {
        self.lock().get(id).cloned()
    }
}

#[async_trait]
impl StockAuthority for MemoryCatalog {
    async fn stock_on_hand(&self, id: &ProductId) -> Result<i64, StorefrontError> {
        self.lock()
            .get(id)
            .map(|p| p.stock)
            .ok_or_else(|| StorefrontError::ProductUnavailable(id.to_string()))
    }

    async fn decrement(
        &self,
        id: &ProductId,
        quantity: i64,
    ) -> Result<DecrementOutcome, StorefrontError> {
        let mut products = self.lock();
        let record = products
            .get_mut(id)
            .ok_or_else(|| StorefrontError::ProductUnavailable(id.to_string()))?;

        if record.stock < quantity {
            return Ok(DecrementOutcome::Insufficient {
                available: record.stock,
            });
        }
        record.stock -= quantity;
        Ok(DecrementOutcome::Applied)
    }

    async fn restock(&self, id: &ProductId, quantity: i64) -> Result<(), StorefrontError> {
        let mut products = self.lock();
        let record = products
            .get_mut(id)
            .ok_or_else(|| StorefrontError::ProductUnavailable(id.to_string()))?;
        record.stock += quantity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn basket() -> ProductRecord {
        ProductRecord::new("prod-1", "Wicker Basket", Money::new(2000, Currency::USD), 3)
    }

    #[tokio::test]
    async fn test_decrement_within_stock() {
        let catalog = MemoryCatalog::new();
        catalog.insert(basket());

        let outcome = catalog.decrement(&"prod-1".into(), 2).await.unwrap();
        assert_eq!(outcome, DecrementOutcome::Applied);
        assert_eq!(catalog.stock_on_hand(&"prod-1".into()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_decrement_beyond_stock_leaves_count() {
        let catalog = MemoryCatalog::new();
        catalog.insert(basket());

        let outcome = catalog.decrement(&"prod-1".into(), 4).await.unwrap();
        assert_eq!(outcome, DecrementOutcome::Insufficient { available: 3 });
        assert_eq!(catalog.stock_on_hand(&"prod-1".into()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_restock() {
        let catalog = MemoryCatalog::new();
        catalog.insert(basket());

        catalog.decrement(&"prod-1".into(), 3).await.unwrap();
        catalog.restock(&"prod-1".into(), 3).await.unwrap();
        assert_eq!(catalog.stock_on_hand(&"prod-1".into()).await.unwrap(), 3);
    }
}
