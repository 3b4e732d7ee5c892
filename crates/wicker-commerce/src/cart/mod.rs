//! Shopping cart module.
//!
//! Contains the cart line type, the cart store (active and saved-for-later
//! lists), the pricing calculator, and the promotions seam.

mod line;
mod pricing;
mod promotions;
mod store;

pub use line::{derive_line_id, CartLine, MAX_QUANTITY_PER_LINE};
pub use pricing::{price_cart, PricedBreakdown, PricedLine, ShippingMethod};
pub use promotions::{Coupon, CouponKind, Promotions, StaticPromotions};
pub use store::{CartPersistence, CartStore};
