//! Catalog read view.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The engine's read view of one catalog product.
///
/// `price` is the current selling price, `stock` the current persisted
/// on-hand count. Both can change between reads; orders snapshot what they
/// need at commit time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    /// Product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Thumbnail URL, if any.
    pub thumbnail: Option<String>,
    /// Current selling price.
    pub price: Money,
    /// Current on-hand stock count.
    pub stock: i64,
}

impl ProductRecord {
    /// Create a record with no thumbnail.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: Money, stock: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            thumbnail: None,
            price,
            stock,
        }
    }

    /// Attach a thumbnail URL.
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }
}

/// Read access to the external catalog collaborator.
pub trait Catalog: Send + Sync {
    /// Look up one product, `None` if absent.
    fn product(&self, id: &ProductId) -> Option<ProductRecord>;

    /// Current selling price of a product.
    fn price_of(&self, id: &ProductId) -> Option<Money> {
        self.product(id).map(|p| p.price)
    }

    /// Current on-hand stock of a product.
    fn stock_of(&self, id: &ProductId) -> Option<i64> {
        self.product(id).map(|p| p.stock)
    }
}
