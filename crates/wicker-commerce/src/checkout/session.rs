//! Checkout session state machine.
//!
//! Steps run shipping, payment, review, then the terminal placed state.
//! Forward transitions are guarded; backward transitions are always allowed
//! and never invalidate the payment intent. The two async suspension points
//! (intent create/update and order placement) each carry a re-entrancy
//! guard so a session never runs two gateway calls or two placements at
//! once.

use crate::cart::{CartStore, PricedBreakdown, ShippingMethod};
use crate::catalog::{Catalog, StockAuthority};
use crate::checkout::Address;
use crate::error::StorefrontError;
use crate::ids::{CheckoutId, OrderId};
use crate::money::Money;
use crate::order::{place_order, OrderBackend, PlacementRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wicker_payments::{PaymentGateway, PaymentIntent};

/// Steps in the checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Collecting contact and shipping details.
    Shipping,
    /// Collecting payment details against the created intent.
    Payment,
    /// Final review before placing the order.
    Review,
    /// Terminal: the order exists. Carrying the id here makes "placed
    /// without an order" unrepresentable.
    Placed { order_id: OrderId },
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
            CheckoutStep::Placed { .. } => "placed",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Shipping => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Review => 3,
            CheckoutStep::Placed { .. } => 4,
        }
    }
}

/// An in-flight checkout.
///
/// Created when checkout starts and discarded on completion or abandonment.
/// Abandonment just drops the session; an already-created payment intent is
/// left to the processor's own expiry policy.
pub struct CheckoutSession {
    /// Session identifier.
    pub id: CheckoutId,
    step: CheckoutStep,
    /// Contact email.
    pub email: Option<String>,
    /// Shipping destination.
    pub shipping_address: Option<Address>,
    /// Billing address, when different from shipping.
    pub billing_address: Option<Address>,
    /// Use the shipping address for billing.
    pub billing_same_as_shipping: bool,
    /// Selected shipping method.
    pub shipping_method: ShippingMethod,
    payment_token: Option<String>,
    intent: Option<PaymentIntent>,
    intent_pending: bool,
    placing: bool,
}

impl CheckoutSession {
    /// Start a checkout at the shipping step.
    pub fn new() -> Self {
        Self {
            id: CheckoutId::generate(),
            step: CheckoutStep::Shipping,
            email: None,
            shipping_address: None,
            billing_address: None,
            billing_same_as_shipping: true,
            shipping_method: ShippingMethod::Standard,
            payment_token: None,
            intent: None,
            intent_pending: false,
            placing: false,
        }
    }

    /// Current step.
    pub fn step(&self) -> &CheckoutStep {
        &self.step
    }

    /// The held payment intent, if one has been created.
    pub fn intent(&self) -> Option<&PaymentIntent> {
        self.intent.as_ref()
    }

    /// Set the contact email.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = Some(email.into());
    }

    /// Set the shipping address.
    pub fn set_shipping_address(&mut self, address: Address) {
        self.shipping_address = Some(address);
    }

    /// Set a billing address distinct from shipping.
    pub fn set_billing_address(&mut self, address: Address) {
        self.billing_address = Some(address);
        self.billing_same_as_shipping = false;
    }

    /// Set the shipping method.
    pub fn set_shipping_method(&mut self, method: ShippingMethod) {
        self.shipping_method = method;
    }

    /// The billing address that would go on the order.
    pub fn effective_billing_address(&self) -> Option<&Address> {
        if self.billing_same_as_shipping {
            self.shipping_address.as_ref()
        } else {
            self.billing_address.as_ref()
        }
    }

    /// Advance from shipping to payment.
    ///
    /// Guarded by shipping-form completeness. On first pass this creates a
    /// payment intent for `total`; on later passes it updates the existing
    /// intent's amount if the total changed, and never creates a second
    /// intent for the session. A gateway failure leaves the session at
    /// shipping with the error surfaced verbatim.
    pub async fn proceed_to_payment(
        &mut self,
        total: Money,
        gateway: &dyn PaymentGateway,
    ) -> Result<(), StorefrontError> {
        if self.step != CheckoutStep::Shipping {
            return Err(self.invalid_transition("payment"));
        }
        if self.intent_pending {
            return Err(StorefrontError::IntentPending);
        }
        let missing = self.missing_shipping_fields();
        if !missing.is_empty() {
            return Err(StorefrontError::MissingFields(missing.join(", ")));
        }

        self.intent_pending = true;
        let outcome = self.reconcile_intent(total, gateway).await;
        self.intent_pending = false;
        outcome?;

        debug!(session = %self.id, "checkout advanced to payment");
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Record the payment token produced by the payment form.
    pub fn confirm_payment(&mut self, token: impl Into<String>) -> Result<(), StorefrontError> {
        if self.step != CheckoutStep::Payment {
            return Err(self.invalid_transition("payment confirmation"));
        }
        self.payment_token = Some(token.into());
        Ok(())
    }

    /// Advance from payment to review. Requires a confirmed payment token.
    pub fn proceed_to_review(&mut self) -> Result<(), StorefrontError> {
        if self.step != CheckoutStep::Payment {
            return Err(self.invalid_transition("review"));
        }
        if self.payment_token.is_none() {
            return Err(StorefrontError::MissingFields("payment method".to_string()));
        }
        debug!(session = %self.id, "checkout advanced to review");
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Step back from review to payment. The intent is untouched.
    pub fn back_to_payment(&mut self) -> Result<(), StorefrontError> {
        if self.step != CheckoutStep::Review {
            return Err(self.invalid_transition("payment"));
        }
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Step back from payment to shipping. The intent is untouched; the
    /// amount is reconciled if the shopper moves forward again.
    pub fn back_to_shipping(&mut self) -> Result<(), StorefrontError> {
        if self.step != CheckoutStep::Payment {
            return Err(self.invalid_transition("shipping"));
        }
        self.step = CheckoutStep::Shipping;
        Ok(())
    }

    /// Place the order.
    ///
    /// Delegates to the order placement transaction. On success the session
    /// becomes terminal and the cart has been cleared; on failure the
    /// session stays at review with the cart intact. A session that already
    /// placed returns the existing order id without placing again.
    pub async fn place(
        &mut self,
        cart: &mut CartStore,
        breakdown: &PricedBreakdown,
        catalog: &dyn Catalog,
        authority: &dyn StockAuthority,
        orders: &dyn OrderBackend,
    ) -> Result<OrderId, StorefrontError> {
        if let CheckoutStep::Placed { order_id } = &self.step {
            return Ok(order_id.clone());
        }
        if self.step != CheckoutStep::Review {
            return Err(self.invalid_transition("placed"));
        }
        if self.placing {
            return Err(StorefrontError::PlacementPending);
        }
        let request = self.placement_request()?;

        self.placing = true;
        let result = place_order(cart, breakdown, request, catalog, authority, orders).await;
        self.placing = false;

        let order_id = result?;
        self.step = CheckoutStep::Placed {
            order_id: order_id.clone(),
        };
        Ok(order_id)
    }

    async fn reconcile_intent(
        &mut self,
        total: Money,
        gateway: &dyn PaymentGateway,
    ) -> Result<(), StorefrontError> {
        match &self.intent {
            None => {
                let intent = gateway
                    .create_intent(total.cents, total.currency.code())
                    .await?;
                self.intent = Some(intent);
            }
            Some(intent) if intent.amount_minor != total.cents => {
                gateway.update_intent(&intent.id, total.cents).await?;
                if let Some(held) = self.intent.as_mut() {
                    held.amount_minor = total.cents;
                }
            }
            Some(_) => {}
        }
        Ok(())
    }

    fn missing_shipping_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.as_deref().unwrap_or("").is_empty() {
            missing.push("email");
        }
        match &self.shipping_address {
            Some(address) if address.is_complete() => {}
            _ => missing.push("shipping address"),
        }
        missing
    }

    fn placement_request(&self) -> Result<PlacementRequest, StorefrontError> {
        let email = self
            .email
            .clone()
            .ok_or_else(|| StorefrontError::MissingFields("email".to_string()))?;
        let shipping_address = self
            .shipping_address
            .clone()
            .ok_or_else(|| StorefrontError::MissingFields("shipping address".to_string()))?;
        let billing_address = self
            .effective_billing_address()
            .cloned()
            .ok_or_else(|| StorefrontError::MissingFields("billing address".to_string()))?;
        let payment_method = self
            .payment_token
            .clone()
            .ok_or_else(|| StorefrontError::MissingFields("payment method".to_string()))?;
        Ok(PlacementRequest {
            email,
            shipping_address,
            billing_address,
            payment_method,
        })
    }

    fn invalid_transition(&self, to: &str) -> StorefrontError {
        StorefrontError::InvalidTransition {
            from: self.step.as_str().to_string(),
            to: to.to_string(),
        }
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use wicker_payments::MockGateway;

    fn total(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn address() -> Address {
        Address::new("Ada Lovelace", "12 Analytical Way", "London", "N1 9GU", "GB")
    }

    fn filled_session() -> CheckoutSession {
        let mut session = CheckoutSession::new();
        session.set_email("ada@example.com");
        session.set_shipping_address(address());
        session
    }

    #[tokio::test]
    async fn test_incomplete_shipping_form_blocks_payment() {
        let gateway = MockGateway::new();
        let mut session = CheckoutSession::new();

        let result = session.proceed_to_payment(total(4388), &gateway).await;
        assert!(matches!(result, Err(StorefrontError::MissingFields(_))));
        assert_eq!(session.step(), &CheckoutStep::Shipping);
        assert_eq!(gateway.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_proceeding_creates_one_intent() {
        let gateway = MockGateway::new();
        let mut session = filled_session();

        session.proceed_to_payment(total(4388), &gateway).await.unwrap();
        assert_eq!(session.step(), &CheckoutStep::Payment);
        assert_eq!(gateway.create_calls(), 1);
        assert_eq!(session.intent().unwrap().amount_minor, 4388);
    }

    #[tokio::test]
    async fn test_reforward_with_same_total_makes_no_gateway_call() {
        let gateway = MockGateway::new();
        let mut session = filled_session();

        session.proceed_to_payment(total(4388), &gateway).await.unwrap();
        session.back_to_shipping().unwrap();
        session.proceed_to_payment(total(4388), &gateway).await.unwrap();

        assert_eq!(gateway.create_calls(), 1);
        assert_eq!(gateway.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_reforward_with_changed_total_updates_not_recreates() {
        let gateway = MockGateway::new();
        let mut session = filled_session();

        session.proceed_to_payment(total(4388), &gateway).await.unwrap();
        let intent_id = session.intent().unwrap().id.clone();

        session.back_to_shipping().unwrap();
        session.proceed_to_payment(total(5912), &gateway).await.unwrap();

        assert_eq!(gateway.create_calls(), 1);
        assert_eq!(gateway.update_calls(), 1);
        assert_eq!(session.intent().unwrap().id, intent_id);
        assert_eq!(session.intent().unwrap().amount_minor, 5912);
    }

    #[tokio::test]
    async fn test_gateway_failure_stays_at_shipping() {
        let gateway = MockGateway::new();
        gateway.fail_next();
        let mut session = filled_session();

        let result = session.proceed_to_payment(total(4388), &gateway).await;
        assert!(matches!(result, Err(StorefrontError::Payment(_))));
        assert_eq!(session.step(), &CheckoutStep::Shipping);

        // No automatic retry; the shopper re-triggers the transition.
        session.proceed_to_payment(total(4388), &gateway).await.unwrap();
        assert_eq!(session.step(), &CheckoutStep::Payment);
    }

    #[tokio::test]
    async fn test_review_requires_payment_token() {
        let gateway = MockGateway::new();
        let mut session = filled_session();
        session.proceed_to_payment(total(4388), &gateway).await.unwrap();

        assert!(matches!(
            session.proceed_to_review(),
            Err(StorefrontError::MissingFields(_))
        ));

        session.confirm_payment("tok_visa").unwrap();
        session.proceed_to_review().unwrap();
        assert_eq!(session.step(), &CheckoutStep::Review);
    }

    #[tokio::test]
    async fn test_backward_transitions_keep_the_intent() {
        let gateway = MockGateway::new();
        let mut session = filled_session();
        session.proceed_to_payment(total(4388), &gateway).await.unwrap();
        session.confirm_payment("tok_visa").unwrap();
        session.proceed_to_review().unwrap();

        session.back_to_payment().unwrap();
        session.back_to_shipping().unwrap();
        assert!(session.intent().is_some());
    }

    #[test]
    fn test_undefined_edges_are_rejected() {
        let mut session = CheckoutSession::new();

        // Skipping shipping entirely.
        assert!(matches!(
            session.proceed_to_review(),
            Err(StorefrontError::InvalidTransition { .. })
        ));
        // Backward from the first step.
        assert!(matches!(
            session.back_to_shipping(),
            Err(StorefrontError::InvalidTransition { .. })
        ));
        assert_eq!(session.step(), &CheckoutStep::Shipping);
    }

    async fn session_at_review(
        gateway: &MockGateway,
        total_cents: i64,
    ) -> CheckoutSession {
        let mut session = filled_session();
        session
            .proceed_to_payment(total(total_cents), gateway)
            .await
            .unwrap();
        session.confirm_payment("tok_visa").unwrap();
        session.proceed_to_review().unwrap();
        session
    }

    fn stocked_catalog(stock: i64) -> crate::catalog::MemoryCatalog {
        let catalog = crate::catalog::MemoryCatalog::new();
        catalog.insert(crate::catalog::ProductRecord::new(
            "prod-1",
            "Wicker Basket",
            total(2000),
            stock,
        ));
        catalog
    }

    #[tokio::test]
    async fn test_place_reaches_terminal_state() {
        use crate::cart::{price_cart, CartStore};
        use crate::config::PricingConfig;
        use crate::order::MemoryOrders;
        use std::collections::BTreeMap;

        let gateway = MockGateway::new();
        let catalog = stocked_catalog(5);
        let orders = MemoryOrders::new();
        let mut cart = CartStore::new();
        cart.add("prod-1".into(), BTreeMap::new(), 2, None).unwrap();
        let breakdown = price_cart(
            cart.items(),
            &catalog,
            None,
            crate::cart::ShippingMethod::Standard,
            &PricingConfig::default(),
        )
        .unwrap();

        let mut session = session_at_review(&gateway, breakdown.total.cents).await;
        let order_id = session
            .place(&mut cart, &breakdown, &catalog, &catalog, &orders)
            .await
            .unwrap();

        assert_eq!(
            session.step(),
            &CheckoutStep::Placed {
                order_id: order_id.clone()
            }
        );

        // Retrying a placed session returns the same order, never a second.
        let again = session
            .place(&mut cart, &breakdown, &catalog, &catalog, &orders)
            .await
            .unwrap();
        assert_eq!(again, order_id);
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_placement_stays_at_review() {
        use crate::cart::{price_cart, CartStore};
        use crate::config::PricingConfig;
        use crate::order::MemoryOrders;
        use std::collections::BTreeMap;

        let gateway = MockGateway::new();
        let catalog = stocked_catalog(1);
        let orders = MemoryOrders::new();
        let mut cart = CartStore::new();
        cart.add("prod-1".into(), BTreeMap::new(), 2, None).unwrap();
        let breakdown = price_cart(
            cart.items(),
            &catalog,
            None,
            crate::cart::ShippingMethod::Standard,
            &PricingConfig::default(),
        )
        .unwrap();

        let mut session = session_at_review(&gateway, breakdown.total.cents).await;
        let result = session
            .place(&mut cart, &breakdown, &catalog, &catalog, &orders)
            .await;

        assert!(matches!(result, Err(StorefrontError::StockConflict { .. })));
        assert_eq!(session.step(), &CheckoutStep::Review);
        assert_eq!(cart.item_count(), 2);
        assert!(orders.is_empty());
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(CheckoutStep::Shipping.number(), 1);
        assert_eq!(CheckoutStep::Payment.number(), 2);
        assert_eq!(CheckoutStep::Review.number(), 3);
    }
}
