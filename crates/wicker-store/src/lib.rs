//! Typed key-value persistence layer for Wicker.
//!
//! Provides a small, ergonomic API for persisting client-side state (carts,
//! saved-for-later lists) as JSON under string keys. The byte-level backend is
//! pluggable; an in-memory backend ships for demos and tests.
//!
//! Reads are deliberately forgiving: a missing or corrupted value degrades to
//! the type's default rather than surfacing an error, because losing a cached
//! cart is an accepted degradation while crashing on one is not.
//!
//! # Example
//!
//! ```rust,ignore
//! use wicker_store::{MemoryBackend, Store};
//!
//! let store = Store::new(Box::new(MemoryBackend::new()));
//! store.set("cart:sess-1", &lines)?;
//! let lines: Vec<CartLine> = store.get_or_default("cart:sess-1");
//! ```

mod backend;
mod error;
mod store;

pub use backend::{MemoryBackend, StorageBackend};
pub use error::StoreError;
pub use store::Store;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{MemoryBackend, StorageBackend, Store, StoreError};
}
