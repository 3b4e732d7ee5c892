//! Order placement transaction.
//!
//! The commit point of the engine. All-or-nothing: stock is re-validated
//! against the authority, decremented per line, and any later failure puts
//! every decrement back before the error surfaces. No order exists without
//! its decrements and no decrement survives without its order.

use crate::cart::{CartStore, PricedBreakdown};
use crate::catalog::{Catalog, DecrementOutcome, Shortfall, StockAuthority};
use crate::checkout::Address;
use crate::error::StorefrontError;
use crate::ids::OrderId;
use crate::order::order::current_timestamp;
use crate::order::{Order, OrderBackend, OrderLine, OrderStatus};
use tracing::{info, warn};

/// Customer details for the order being placed.
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    /// Customer email.
    pub email: String,
    /// Shipping destination.
    pub shipping_address: Address,
    /// Billing address.
    pub billing_address: Address,
    /// Payment method token.
    pub payment_method: String,
}

/// Place an order for the current cart.
///
/// Steps:
/// 1. re-validate every line against authoritative stock, collecting all
///    shortfalls; any shortfall aborts with no side effects;
/// 2. conditionally decrement stock per line; a decrement that reports
///    insufficient (a race since step 1) restores the already-applied
///    decrements and aborts;
/// 3. persist the order with line items snapshotting `price_at_purchase`
///    from the breakdown passed at commit time; a persist failure also
///    restores the decrements;
/// 4. clear the cart (saved list intact) and return the order id.
///
/// On any error the cart is left intact so the shopper can adjust and
/// retry.
pub async fn place_order(
    cart: &mut CartStore,
    breakdown: &PricedBreakdown,
    request: PlacementRequest,
    catalog: &dyn Catalog,
    authority: &dyn StockAuthority,
    orders: &dyn OrderBackend,
) -> Result<OrderId, StorefrontError> {
    if cart.is_empty() {
        return Err(StorefrontError::EmptyCart);
    }

    // Step 1: authoritative re-validation, all shortfalls collected so the
    // shopper sees every problem line at once.
    let mut lines = Vec::with_capacity(cart.items().len());
    let mut shortfalls = Vec::new();
    for item in cart.items() {
        let record = catalog
            .product(&item.product_id)
            .ok_or_else(|| StorefrontError::ProductUnavailable(item.product_id.to_string()))?;
        let on_hand = authority.stock_on_hand(&item.product_id).await?;
        if on_hand < item.quantity {
            shortfalls.push(Shortfall {
                product_id: item.product_id.clone(),
                requested: item.quantity,
                available: on_hand,
            });
            continue;
        }

        let priced = breakdown.line(&item.id).ok_or_else(|| {
            StorefrontError::Backend(format!("no priced line for {}", item.id))
        })?;
        lines.push(OrderLine {
            product_id: item.product_id.clone(),
            title: record.title,
            thumbnail: record.thumbnail,
            quantity: item.quantity,
            price_at_purchase: priced.unit_price,
            line_total: priced.line_total,
        });
    }
    if !shortfalls.is_empty() {
        warn!(count = shortfalls.len(), "placement aborted on stock conflict");
        return Err(StorefrontError::StockConflict { shortfalls });
    }

    // Step 2: conditional decrements. The authority serializes per product,
    // so of two racing checkouts for the last unit exactly one lands here
    // with Applied.
    let mut decremented: Vec<(crate::ids::ProductId, i64)> = Vec::new();
    for line in &lines {
        match authority.decrement(&line.product_id, line.quantity).await {
            Ok(DecrementOutcome::Applied) => {
                decremented.push((line.product_id.clone(), line.quantity));
            }
            Ok(DecrementOutcome::Insufficient { available }) => {
                restock(authority, &decremented).await;
                warn!(product = %line.product_id, "stock raced away during placement");
                return Err(StorefrontError::StockConflict {
                    shortfalls: vec![Shortfall {
                        product_id: line.product_id.clone(),
                        requested: line.quantity,
                        available,
                    }],
                });
            }
            Err(e) => {
                restock(authority, &decremented).await;
                return Err(e);
            }
        }
    }

    // Step 3: persist the order. A failed persist must not strand the
    // decrements.
    let now = current_timestamp();
    let order = Order {
        id: OrderId::generate(),
        number: Order::generate_number(),
        email: request.email,
        status: OrderStatus::Pending,
        lines,
        subtotal: breakdown.subtotal,
        discount: breakdown.discount,
        shipping: breakdown.shipping,
        tax: breakdown.tax,
        total: breakdown.total,
        shipping_address: request.shipping_address,
        billing_address: request.billing_address,
        payment_method: request.payment_method,
        placed_at: now,
        updated_at: now,
    };
    let order_id = match orders.create_order(order).await {
        Ok(id) => id,
        Err(e) => {
            restock(authority, &decremented).await;
            return Err(e);
        }
    };

    // Step 4: only now does the cart change.
    cart.clear();
    info!(order = %order_id, total = breakdown.total.cents, "order placed");
    Ok(order_id)
}

async fn restock(authority: &dyn StockAuthority, decremented: &[(crate::ids::ProductId, i64)]) {
    for (product_id, quantity) in decremented {
        if let Err(e) = authority.restock(product_id, *quantity).await {
            warn!(product = %product_id, error = %e, "restock after aborted placement failed");
        }
    }
}
