//! Pricing configuration.

use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Pricing constants for the storefront.
///
/// Every pricing entry point takes a reference to this struct; the defaults
/// carry the demo store's rates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    /// Store currency. All catalog prices must match.
    pub currency: Currency,
    /// Discounted subtotal at or above which standard shipping is free.
    pub free_shipping_threshold: Money,
    /// Flat rate for standard shipping below the threshold.
    pub standard_shipping_rate: Money,
    /// Flat rate for express shipping, regardless of subtotal.
    pub express_shipping_rate: Money,
    /// Flat tax rate applied to the discounted subtotal, in percent.
    pub tax_rate_percent: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            free_shipping_threshold: Money::new(5000, Currency::USD),
            standard_shipping_rate: Money::new(500, Currency::USD),
            express_shipping_rate: Money::new(1500, Currency::USD),
            tax_rate_percent: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        let config = PricingConfig::default();
        assert_eq!(config.free_shipping_threshold.cents, 5000);
        assert_eq!(config.standard_shipping_rate.cents, 500);
        assert_eq!(config.express_shipping_rate.cents, 1500);
        assert!((config.tax_rate_percent - 8.0).abs() < f64::EPSILON);
    }
}
