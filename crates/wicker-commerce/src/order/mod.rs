//! Order module.
//!
//! The order record, the persistence collaborator seam, and the
//! all-or-nothing placement transaction.

mod backend;
mod order;
mod placement;

pub use backend::{MemoryOrders, OrderBackend};
pub use order::{Order, OrderLine, OrderStatus};
pub use placement::{place_order, PlacementRequest};
