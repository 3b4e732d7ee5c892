//! Coupon types and the promotions seam.

use crate::error::StorefrontError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a coupon takes off the subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CouponKind {
    /// Percentage off the subtotal (0.0 - 100.0).
    Percentage(f64),
    /// Fixed amount off, capped at the subtotal.
    Fixed(Money),
}

/// A resolved coupon.
///
/// Read-only from the engine's perspective; the promotions collaborator is
/// the source of truth for what a code means.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// The code the shopper entered, normalized to uppercase.
    pub code: String,
    /// Discount this coupon grants.
    pub kind: CouponKind,
}

impl Coupon {
    /// Create a percentage-off coupon.
    pub fn percentage(code: impl Into<String>, percent: f64) -> Self {
        Self {
            code: code.into().to_uppercase(),
            kind: CouponKind::Percentage(percent),
        }
    }

    /// Create a fixed-amount-off coupon.
    pub fn fixed(code: impl Into<String>, amount: Money) -> Self {
        Self {
            code: code.into().to_uppercase(),
            kind: CouponKind::Fixed(amount),
        }
    }

    /// Discount amount for a given subtotal.
    ///
    /// Fixed discounts never exceed the subtotal, so a discounted subtotal
    /// cannot go negative.
    pub fn discount_for(&self, subtotal: &Money) -> Money {
        match &self.kind {
            CouponKind::Percentage(percent) => subtotal.percentage(*percent),
            CouponKind::Fixed(amount) => amount.min(subtotal),
        }
    }
}

/// The external promotions collaborator.
pub trait Promotions: Send + Sync {
    /// Resolve a code to a coupon, or `UnknownCoupon`.
    fn resolve(&self, code: &str) -> Result<Coupon, StorefrontError>;
}

/// Fixed coupon table standing in for the promotions collaborator.
#[derive(Default)]
pub struct StaticPromotions {
    coupons: HashMap<String, Coupon>,
}

impl StaticPromotions {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coupon to the table.
    pub fn with_coupon(mut self, coupon: Coupon) -> Self {
        self.coupons.insert(coupon.code.clone(), coupon);
        self
    }

    /// The demo store's codes: `SAVE10` (10% off) and `FLAT15` ($15 off).
    pub fn demo() -> Self {
        Self::new()
            .with_coupon(Coupon::percentage("SAVE10", 10.0))
            .with_coupon(Coupon::fixed("FLAT15", Money::new(1500, Currency::USD)))
    }
}

impl Promotions for StaticPromotions {
    fn resolve(&self, code: &str) -> Result<Coupon, StorefrontError> {
        self.coupons
            .get(&code.to_uppercase())
            .cloned()
            .ok_or_else(|| StorefrontError::UnknownCoupon(code.to_string()))
    }
}
