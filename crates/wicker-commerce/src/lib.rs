//! Cart, pricing, and order-placement engine for Wicker.
//!
//! The storefront's one subsystem with real invariants: no overselling,
//! idempotent payment-intent handling, deterministic pricing. Everything
//! else (rendering, search, auth, admin CRUD) is an external collaborator
//! reached through the traits in [`catalog`], [`cart`], and [`order`].
//!
//! - **Cart**: active and saved-for-later lists, pricing, coupons
//! - **Catalog**: product read view, advisory and authoritative stock checks
//! - **Checkout**: shipping/payment/review state machine over a payment
//!   gateway
//! - **Order**: snapshot records and the all-or-nothing placement
//!   transaction
//!
//! # Example
//!
//! ```rust,ignore
//! use wicker_commerce::prelude::*;
//!
//! let mut cart = CartStore::new();
//! cart.add(product_id, options, 2, None)?;
//!
//! let breakdown = price_cart(
//!     cart.items(),
//!     &catalog,
//!     cart.coupon(),
//!     ShippingMethod::Standard,
//!     &PricingConfig::default(),
//! )?;
//!
//! let mut session = CheckoutSession::new();
//! session.set_email("ada@example.com");
//! session.set_shipping_address(address);
//! session.proceed_to_payment(breakdown.total, &gateway).await?;
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;
pub mod order;

pub use config::PricingConfig;
pub use error::StorefrontError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::PricingConfig;
    pub use crate::error::StorefrontError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{
        price_cart, CartLine, CartPersistence, CartStore, Coupon, CouponKind, PricedBreakdown,
        PricedLine, Promotions, ShippingMethod, StaticPromotions,
    };

    // Catalog
    pub use crate::catalog::{
        check_availability, Catalog, MemoryCatalog, ProductRecord, Shortfall, StockAuthority,
        StockCheck,
    };

    // Checkout
    pub use crate::checkout::{Address, CheckoutSession, CheckoutStep};

    // Order
    pub use crate::order::{
        place_order, MemoryOrders, Order, OrderBackend, OrderLine, OrderStatus, PlacementRequest,
    };
}
