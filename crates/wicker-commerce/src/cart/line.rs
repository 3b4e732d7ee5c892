//! Cart line type and line identity.

use crate::ids::{CartLineId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// Derive the line identifier for a product configuration.
///
/// The id is the product id plus the canonicalized option pairs, so two adds
/// of the same configuration collapse into one line regardless of the order
/// the options were supplied in. `BTreeMap` iteration gives the canonical
/// (sorted-by-key) ordering.
pub fn derive_line_id(product_id: &ProductId, options: &BTreeMap<String, String>) -> CartLineId {
    if options.is_empty() {
        return CartLineId::new(product_id.as_str());
    }
    let pairs: Vec<String> = options.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    CartLineId::new(format!("{}?{}", product_id, pairs.join("&")))
}

/// One entry in the active cart or the saved-for-later list.
///
/// A line lives in exactly one of the two lists at a time; the cart store's
/// move operations enforce that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Derived line identifier.
    pub id: CartLineId,
    /// Product being purchased.
    pub product_id: ProductId,
    /// Selected options (e.g., size, color), canonically ordered.
    pub options: BTreeMap<String, String>,
    /// Quantity, always >= 1.
    pub quantity: i64,
    /// Price seen when the line was added. Display-only; pricing always
    /// resolves the current catalog price until the order is placed.
    pub unit_price_snapshot: Option<Money>,
}

impl CartLine {
    /// Create a line for a product configuration.
    pub fn new(
        product_id: ProductId,
        options: BTreeMap<String, String>,
        quantity: i64,
        unit_price_snapshot: Option<Money>,
    ) -> Self {
        let id = derive_line_id(&product_id, &options);
        Self {
            id,
            product_id,
            options,
            quantity,
            unit_price_snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_line_id_without_options() {
        let id = derive_line_id(&"prod-1".into(), &BTreeMap::new());
        assert_eq!(id.as_str(), "prod-1");
    }

    #[test]
    fn test_line_id_canonicalizes_option_order() {
        let a = derive_line_id(&"prod-1".into(), &options(&[("size", "m"), ("color", "red")]));
        let b = derive_line_id(&"prod-1".into(), &options(&[("color", "red"), ("size", "m")]));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "prod-1?color=red&size=m");
    }

    #[test]
    fn test_different_options_get_different_ids() {
        let a = derive_line_id(&"prod-1".into(), &options(&[("color", "red")]));
        let b = derive_line_id(&"prod-1".into(), &options(&[("color", "blue")]));
        assert_ne!(a, b);
    }
}
