//! Cart store: the only mutation surface for cart and saved-for-later state.
//!
//! The store is an explicit, injectable container owned by the application
//! shell; nothing here is a process-wide singleton. Every mutation is a
//! synchronous state replacement followed by a best-effort write to the
//! configured persistence; a failed write is logged and never fails the
//! mutation, since in-memory state stays the source of truth for the
//! session.

use crate::cart::{derive_line_id, CartLine, Coupon, MAX_QUANTITY_PER_LINE};
use crate::error::StorefrontError;
use crate::ids::{CartLineId, ProductId, SessionId};
use crate::money::Money;
use std::collections::BTreeMap;
use tracing::warn;
use wicker_store::Store;

/// Durable client storage for the cart's two lists.
///
/// Stores each list as a JSON array under a per-session key. Reads degrade
/// to an empty list on missing or corrupted data.
pub struct CartPersistence {
    store: Store,
    cart_key: String,
    saved_key: String,
}

impl CartPersistence {
    /// Create persistence keyed by session.
    pub fn new(store: Store, session: &SessionId) -> Self {
        Self {
            store,
            cart_key: format!("cart:{}", session),
            saved_key: format!("saved:{}", session),
        }
    }

    fn load_cart(&self) -> Vec<CartLine> {
        self.store.get_or_default(&self.cart_key)
    }

    fn load_saved(&self) -> Vec<CartLine> {
        self.store.get_or_default(&self.saved_key)
    }

    fn save_cart(&self, lines: &[CartLine]) {
        if let Err(e) = self.store.set(&self.cart_key, &lines) {
            warn!(key = %self.cart_key, error = %e, "cart persistence write failed");
        }
    }

    fn save_saved(&self, lines: &[CartLine]) {
        if let Err(e) = self.store.set(&self.saved_key, &lines) {
            warn!(key = %self.saved_key, error = %e, "saved-list persistence write failed");
        }
    }
}

/// The active cart and the saved-for-later list.
///
/// Lines are keyed by their derived id, so adding the same product
/// configuration twice collapses into one line. A line id never appears in
/// both lists at once; the move operations are atomic removal-plus-insert.
#[derive(Default)]
pub struct CartStore {
    items: Vec<CartLine>,
    saved: Vec<CartLine>,
    coupon: Option<Coupon>,
    persistence: Option<CartPersistence>,
}

impl CartStore {
    /// Create an ephemeral store with no persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store backed by durable client storage.
    ///
    /// Both lists are loaded immediately; missing or corrupted stored data
    /// yields empty lists rather than an error.
    pub fn with_persistence(persistence: CartPersistence) -> Self {
        let items = persistence.load_cart();
        let saved = persistence.load_saved();
        Self {
            items,
            saved,
            coupon: None,
            persistence: Some(persistence),
        }
    }

    /// Lines in the active cart.
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Lines saved for later.
    pub fn saved(&self) -> &[CartLine] {
        &self.saved
    }

    /// The applied coupon, if any.
    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Look up an active-cart line by id.
    pub fn line(&self, id: &CartLineId) -> Option<&CartLine> {
        self.items.iter().find(|l| &l.id == id)
    }

    /// Total quantity across active-cart lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Quantity of a product already in the active cart, across all of its
    /// option configurations. Feed this to the advisory stock check.
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.items
            .iter()
            .filter(|l| &l.product_id == product_id)
            .map(|l| l.quantity)
            .sum()
    }

    /// Check if the active cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product configuration to the cart.
    ///
    /// An existing line with the same derived id has its quantity
    /// incremented; otherwise a new line is appended. Stock is not checked
    /// here; callers run the advisory validator first.
    pub fn add(
        &mut self,
        product_id: ProductId,
        options: BTreeMap<String, String>,
        quantity: i64,
        price_hint: Option<Money>,
    ) -> Result<CartLineId, StorefrontError> {
        if quantity < 1 {
            return Err(StorefrontError::InvalidQuantity(quantity));
        }

        let line_id = derive_line_id(&product_id, &options);
        if let Some(existing) = self.items.iter_mut().find(|l| l.id == line_id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(StorefrontError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_LINE {
                return Err(StorefrontError::QuantityLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_LINE,
                ));
            }
            existing.quantity = new_quantity;
        } else {
            if quantity > MAX_QUANTITY_PER_LINE {
                return Err(StorefrontError::QuantityLimit(
                    quantity,
                    MAX_QUANTITY_PER_LINE,
                ));
            }
            self.items
                .push(CartLine::new(product_id, options, quantity, price_hint));
        }

        self.persist_cart();
        Ok(line_id)
    }

    /// Set a line's quantity; zero or below removes the line.
    ///
    /// Returns `true` if the cart changed. An absent id is a no-op, not an
    /// error.
    pub fn update_quantity(
        &mut self,
        line_id: &CartLineId,
        quantity: i64,
    ) -> Result<bool, StorefrontError> {
        if quantity <= 0 {
            return Ok(self.remove(line_id));
        }
        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(StorefrontError::QuantityLimit(
                quantity,
                MAX_QUANTITY_PER_LINE,
            ));
        }

        match self.items.iter_mut().find(|l| &l.id == line_id) {
            Some(line) => {
                line.quantity = quantity;
                self.persist_cart();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a line from the active cart. Idempotent.
    pub fn remove(&mut self, line_id: &CartLineId) -> bool {
        let before = self.items.len();
        self.items.retain(|l| &l.id != line_id);
        let removed = self.items.len() < before;
        if removed {
            self.persist_cart();
        }
        removed
    }

    /// Remove a line from the saved-for-later list. Idempotent.
    pub fn remove_saved(&mut self, line_id: &CartLineId) -> bool {
        let before = self.saved.len();
        self.saved.retain(|l| &l.id != line_id);
        let removed = self.saved.len() < before;
        if removed {
            self.persist_saved();
        }
        removed
    }

    /// Relocate a line from the cart to the saved list.
    ///
    /// Removal and insertion happen in one mutation, so the line never
    /// exists in both lists. An equivalent saved line absorbs the quantity.
    /// Absent ids are a no-op.
    pub fn save_for_later(&mut self, line_id: &CartLineId) -> bool {
        let Some(index) = self.items.iter().position(|l| &l.id == line_id) else {
            return false;
        };
        let line = self.items.remove(index);
        Self::merge_into(&mut self.saved, line);
        self.persist_cart();
        self.persist_saved();
        true
    }

    /// Relocate a line from the saved list back to the cart.
    ///
    /// If an equivalent line already exists in the cart, quantities are
    /// summed rather than duplicated. Absent ids are a no-op.
    pub fn move_to_cart(&mut self, line_id: &CartLineId) -> bool {
        let Some(index) = self.saved.iter().position(|l| &l.id == line_id) else {
            return false;
        };
        let line = self.saved.remove(index);
        Self::merge_into(&mut self.items, line);
        self.persist_cart();
        self.persist_saved();
        true
    }

    /// Empty the active cart and drop the coupon. The saved list is
    /// untouched.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
        self.persist_cart();
    }

    /// Hold a resolved coupon on the cart.
    pub fn apply_coupon(&mut self, coupon: Coupon) {
        self.coupon = Some(coupon);
    }

    /// Drop the applied coupon.
    pub fn remove_coupon(&mut self) {
        self.coupon = None;
    }

    fn merge_into(list: &mut Vec<CartLine>, line: CartLine) {
        if let Some(existing) = list.iter_mut().find(|l| l.id == line.id) {
            existing.quantity = existing
                .quantity
                .saturating_add(line.quantity)
                .min(MAX_QUANTITY_PER_LINE);
        } else {
            list.push(line);
        }
    }

    fn persist_cart(&self) {
        if let Some(p) = &self.persistence {
            p.save_cart(&self.items);
        }
    }

    fn persist_saved(&self) {
        if let Some(p) = &self.persistence {
            p.save_saved(&self.saved);
        }
    }
}
