//! Pricing calculator.
//!
//! `price_cart` is a pure derivation: cart lines + coupon + shipping method
//! in, a complete [`PricedBreakdown`] out. The breakdown is always rebuilt
//! wholesale on any input change and never patched field-by-field, which
//! rules out transient inconsistent totals.

use crate::cart::{CartLine, Coupon};
use crate::catalog::Catalog;
use crate::config::PricingConfig;
use crate::error::StorefrontError;
use crate::ids::{CartLineId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Available shipping methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShippingMethod {
    /// Flat rate, free above the configured threshold.
    #[default]
    Standard,
    /// Flat rate regardless of subtotal.
    Express,
}

impl ShippingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "standard",
            ShippingMethod::Express => "express",
        }
    }

    /// Shipping cost for a given discounted subtotal.
    pub fn rate(&self, discounted_subtotal: &Money, config: &PricingConfig) -> Money {
        match self {
            ShippingMethod::Express => config.express_shipping_rate,
            ShippingMethod::Standard => {
                if discounted_subtotal.cents >= config.free_shipping_threshold.cents {
                    Money::zero(config.currency)
                } else {
                    config.standard_shipping_rate
                }
            }
        }
    }
}

/// Per-line pricing, used for order line snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricedLine {
    /// Cart line this prices.
    pub line_id: CartLineId,
    /// Product on the line.
    pub product_id: ProductId,
    /// Catalog price at calculation time.
    pub unit_price: Money,
    /// Quantity priced.
    pub quantity: i64,
    /// `unit_price * quantity`.
    pub line_total: Money,
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricedBreakdown {
    /// Sum of line totals before discounts.
    pub subtotal: Money,
    /// Coupon discount, zero without a coupon.
    pub discount: Money,
    /// Shipping cost for the selected method.
    pub shipping: Money,
    /// Tax on the discounted subtotal.
    pub tax: Money,
    /// Final chargeable amount.
    pub total: Money,
    /// Per-line breakdown.
    pub lines: Vec<PricedLine>,
}

impl PricedBreakdown {
    /// Check if a coupon reduced the subtotal.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Per-line price lookup by line id.
    pub fn line(&self, line_id: &CartLineId) -> Option<&PricedLine> {
        self.lines.iter().find(|l| &l.line_id == line_id)
    }
}

/// Price a cart.
///
/// Unit prices come from the catalog at call time, not from the lines'
/// snapshots; a product missing from the catalog is an error. `discount` is
/// the coupon's cut of the subtotal (fixed coupons capped at the subtotal),
/// shipping follows the method's rate rules against the discounted subtotal,
/// and tax is the configured flat rate on the discounted subtotal.
pub fn price_cart(
    lines: &[CartLine],
    catalog: &dyn Catalog,
    coupon: Option<&Coupon>,
    shipping_method: ShippingMethod,
    config: &PricingConfig,
) -> Result<PricedBreakdown, StorefrontError> {
    let currency = config.currency;

    let mut priced_lines = Vec::with_capacity(lines.len());
    for line in lines {
        let unit_price = catalog
            .price_of(&line.product_id)
            .ok_or_else(|| StorefrontError::ProductUnavailable(line.product_id.to_string()))?;
        if unit_price.currency != currency {
            return Err(StorefrontError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: unit_price.currency.code().to_string(),
            });
        }
        let line_total = unit_price
            .try_mul(line.quantity)
            .ok_or(StorefrontError::Overflow)?;
        priced_lines.push(PricedLine {
            line_id: line.id.clone(),
            product_id: line.product_id.clone(),
            unit_price,
            quantity: line.quantity,
            line_total,
        });
    }

    let subtotal = Money::try_sum(priced_lines.iter().map(|l| &l.line_total), currency)
        .ok_or(StorefrontError::Overflow)?;

    let discount = match coupon {
        Some(coupon) => coupon.discount_for(&subtotal),
        None => Money::zero(currency),
    };

    let discounted_subtotal = subtotal
        .try_sub(&discount)
        .ok_or(StorefrontError::Overflow)?;

    let shipping = shipping_method.rate(&discounted_subtotal, config);
    let tax = discounted_subtotal.percentage(config.tax_rate_percent);

    let total = discounted_subtotal
        .try_add(&shipping)
        .and_then(|t| t.try_add(&tax))
        .ok_or(StorefrontError::Overflow)?;

    Ok(PricedBreakdown {
        subtotal,
        discount,
        shipping,
        tax,
        total,
        lines: priced_lines,
    })
}
