//! Stock validation.
//!
//! Two layers, deliberately distinct: a cheap advisory check run at
//! add-to-cart time for UI responsiveness, and the authoritative
//! [`StockAuthority`] seam used inside the order placement transaction.
//! The advisory check can be skipped or mocked without touching
//! transactional correctness.

use crate::error::StorefrontError;
use crate::ids::ProductId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Catalog;

/// Result of an advisory availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockCheck {
    /// The requested quantity can be added.
    Ok,
    /// Not enough stock; `available` is what the shopper could still add.
    Insufficient { available: i64 },
}

impl StockCheck {
    /// Check if the request passed.
    pub fn is_ok(&self) -> bool {
        matches!(self, StockCheck::Ok)
    }
}

/// One line's shortfall discovered during commit-time re-validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shortfall {
    /// Product that fell short.
    pub product_id: ProductId,
    /// Quantity the order asked for.
    pub requested: i64,
    /// Quantity actually available.
    pub available: i64,
}

/// Outcome of a conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// Stock was decremented.
    Applied,
    /// Stock was not touched; `available` is the current count.
    Insufficient { available: i64 },
}

/// Advisory check that a quantity can be added to the cart.
///
/// `requested + already_in_cart` must not exceed current stock. This guards
/// the common-case oversell at add time; the authoritative re-check still
/// runs inside placement because stock can change in between.
pub fn check_availability(
    catalog: &dyn Catalog,
    product_id: &ProductId,
    requested: i64,
    already_in_cart: i64,
) -> Result<StockCheck, StorefrontError> {
    if requested < 1 {
        return Err(StorefrontError::InvalidQuantity(requested));
    }
    let stock = catalog
        .stock_of(product_id)
        .ok_or_else(|| StorefrontError::ProductUnavailable(product_id.to_string()))?;

    match requested.checked_add(already_in_cart) {
        Some(wanted) if wanted <= stock => Ok(StockCheck::Ok),
        // Overflow can only mean the request exceeds any real stock count.
        _ => Ok(StockCheck::Insufficient {
            available: stock.saturating_sub(already_in_cart).max(0),
        }),
    }
}

/// Authoritative stock mutation seam.
///
/// Implementations must make `decrement` an atomic check-and-subtract per
/// product: given concurrent decrements for the last unit, at most one may
/// return [`DecrementOutcome::Applied`].
#[async_trait]
pub trait StockAuthority: Send + Sync {
    /// Current authoritative on-hand count.
    async fn stock_on_hand(&self, id: &ProductId) -> Result<i64, StorefrontError>;

    /// Conditionally subtract `quantity` from stock.
    async fn decrement(
        &self,
        id: &ProductId,
        quantity: i64,
    ) -> Result<DecrementOutcome, StorefrontError>;

    /// Add `quantity` back to stock (placement rollback).
    async fn restock(&self, id: &ProductId, quantity: i64) -> Result<(), StorefrontError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemoryCatalog, ProductRecord};
    use crate::money::{Currency, Money};

    fn catalog() -> MemoryCatalog {
        let catalog = MemoryCatalog::new();
        catalog.insert(ProductRecord::new(
            "prod-1",
            "Wicker Basket",
            Money::new(2000, Currency::USD),
            5,
        ));
        catalog
    }

    #[test]
    fn test_within_stock_is_ok() {
        let catalog = catalog();
        let check = check_availability(&catalog, &"prod-1".into(), 3, 2).unwrap();
        assert!(check.is_ok());
    }

    #[test]
    fn test_exceeding_stock_reports_remaining() {
        let catalog = catalog();
        let check = check_availability(&catalog, &"prod-1".into(), 4, 2).unwrap();
        assert_eq!(check, StockCheck::Insufficient { available: 3 });
    }

    #[test]
    fn test_remaining_floors_at_zero() {
        let catalog = catalog();
        let check = check_availability(&catalog, &"prod-1".into(), 1, 9).unwrap();
        assert_eq!(check, StockCheck::Insufficient { available: 0 });
    }

    #[test]
    fn test_huge_request_does_not_overflow() {
        let catalog = catalog();
        let check = check_availability(&catalog, &"prod-1".into(), i64::MAX, 2).unwrap();
        assert_eq!(check, StockCheck::Insufficient { available: 3 });
    }

    #[test]
    fn test_unknown_product_is_error() {
        let catalog = catalog();
        let result = check_availability(&catalog, &"prod-missing".into(), 1, 0);
        assert!(matches!(result, Err(StorefrontError::ProductUnavailable(_))));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let catalog = catalog();
        let result = check_availability(&catalog, &"prod-1".into(), 0, 0);
        assert!(matches!(result, Err(StorefrontError::InvalidQuantity(0))));
    }
}
