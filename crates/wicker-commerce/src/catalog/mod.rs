//! Catalog collaborator interfaces.
//!
//! The engine never owns the catalog; it reads prices and stock through the
//! [`Catalog`] trait and mutates stock only through the [`StockAuthority`]
//! decrement call inside order placement.

mod memory;
mod product;
mod stock;

pub use memory::MemoryCatalog;
pub use product::{Catalog, ProductRecord};
pub use stock::{check_availability, DecrementOutcome, Shortfall, StockAuthority, StockCheck};
