use crate::config::Config;
use crate::domain::order::Order;
use crate::domain::ports::{ListingStoreRef, OrderStoreRef, ProcessorRef, UserStoreRef};
use crate::domain::processor::{CheckoutRequest, LineItem, PaymentStatus};
use crate::domain::user::{AttemptState, CheckoutAttempt};
use crate::error::{PaymentError, Result};
use std::sync::Arc;

/// Platform cut of every transaction, in percent.
pub const PLATFORM_FEE_PERCENT: i64 = 20;

/// Platform fee for a listing price, floored, in the same (major) unit as
/// the price.
pub fn platform_fee(price: i64) -> i64 {
    price * PLATFORM_FEE_PERCENT / 100
}

/// Result of a reconciliation pass. The benign no-op cases are ordinary
/// outcomes here, not errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettlementOutcome {
    /// Buyer had no pending checkout; nothing to reconcile.
    NoPendingSession,
    /// Transaction exists but has not been paid; the pending attempt is kept
    /// so a later pass can pick up a late-settling payment.
    Unpaid,
    /// Order created by this pass.
    Settled,
    /// Order already existed for this transaction; no duplicate created.
    AlreadySettled,
}

impl SettlementOutcome {
    /// The `{success: bool}` wire contract: success means "an order now
    /// exists for this transaction".
    pub fn success(&self) -> bool {
        matches!(self, Self::Settled | Self::AlreadySettled)
    }
}

/// Opens split-payment checkouts and reconciles their results into durable
/// orders.
pub struct CheckoutService {
    users: UserStoreRef,
    listings: ListingStoreRef,
    orders: OrderStoreRef,
    processor: ProcessorRef,
    config: Arc<Config>,
}

impl CheckoutService {
    pub fn new(
        users: UserStoreRef,
        listings: ListingStoreRef,
        orders: OrderStoreRef,
        processor: ProcessorRef,
        config: Arc<Config>,
    ) -> Self {
        Self {
            users,
            listings,
            orders,
            processor,
            config,
        }
    }

    /// Opens a one-time card checkout for a listing and records it as the
    /// buyer's newest pending attempt. Returns the transaction's external id
    /// for the caller to redirect the buyer with.
    ///
    /// The gross charge, the retained fee and the destination transfer are
    /// declared in a single request, so there is no window where the buyer
    /// has been charged without the split being committed.
    pub async fn start_checkout(&self, buyer_id: u32, listing_id: u32) -> Result<String> {
        let listing = self
            .listings
            .get(listing_id)
            .await?
            .ok_or(PaymentError::ListingNotFound(listing_id))?;
        let seller = self
            .users
            .get(listing.owner_id)
            .await?
            .ok_or(PaymentError::UserNotFound(listing.owner_id))?;
        let destination = seller.payout_account_id.ok_or_else(|| {
            PaymentError::PreconditionFailed(format!(
                "seller {} has not completed payout onboarding",
                listing.owner_id
            ))
        })?;
        let mut buyer = self
            .users
            .get(buyer_id)
            .await?
            .ok_or(PaymentError::UserNotFound(buyer_id))?;

        let fee = platform_fee(listing.price);
        let request = CheckoutRequest {
            line_item: LineItem {
                name: listing.title.clone(),
                unit_amount: listing.price * 100,
                currency: self.config.currency.clone(),
                quantity: 1,
            },
            application_fee_amount: fee * 100,
            destination,
            client_reference: listing.id.to_string(),
            success_url: format!("{}/{}", self.config.checkout_success_url, listing.id),
            cancel_url: self.config.checkout_cancel_url.clone(),
        };

        let transaction = self.processor.create_checkout(request).await?;
        tracing::info!(
            buyer_id,
            listing_id,
            transaction_id = %transaction.id,
            amount_total = transaction.amount_total,
            "opened checkout transaction"
        );

        buyer.checkout_attempts.push(CheckoutAttempt {
            listing_id,
            transaction: transaction.clone(),
            state: AttemptState::Pending,
        });
        self.users.put(buyer).await?;

        Ok(transaction.id)
    }

    /// Reconciles the buyer's most recent pending checkout after they return
    /// from the payment page.
    ///
    /// The payment status is always re-fetched from the processor; nothing
    /// client-supplied is trusted. Calling this any number of times for the
    /// same settled transaction yields exactly one order.
    pub async fn complete_checkout(
        &self,
        buyer_id: u32,
        listing_id: u32,
    ) -> Result<SettlementOutcome> {
        let mut buyer = self
            .users
            .get(buyer_id)
            .await?
            .ok_or(PaymentError::UserNotFound(buyer_id))?;

        let Some(attempt) = buyer.latest_pending() else {
            tracing::debug!(buyer_id, "no pending checkout to reconcile");
            return Ok(SettlementOutcome::NoPendingSession);
        };
        let stored_listing_id = attempt.listing_id;
        let transaction_id = attempt.transaction.id.clone();

        // The stored attempt is the source of truth; the caller's listing id
        // is client-controlled and only checked for diagnostics.
        if stored_listing_id != listing_id {
            tracing::warn!(
                buyer_id,
                listing_id,
                stored_listing_id,
                "listing id mismatch on reconciliation, trusting stored attempt"
            );
        }

        let transaction = self.processor.retrieve_checkout(&transaction_id).await?;
        if transaction.payment_status != PaymentStatus::Paid {
            tracing::debug!(
                buyer_id,
                %transaction_id,
                status = ?transaction.payment_status,
                "transaction not paid, leaving attempt pending"
            );
            return Ok(SettlementOutcome::Unpaid);
        }

        let outcome = if self.orders.find_by_transaction(&transaction.id).await?.is_some() {
            SettlementOutcome::AlreadySettled
        } else {
            let order = Order {
                listing_id: stored_listing_id,
                buyer_id,
                transaction: transaction.clone(),
            };
            match self.orders.create(order).await {
                Ok(()) => SettlementOutcome::Settled,
                // Lost a race with a concurrent reconciliation; the store's
                // uniqueness constraint already guarantees a single order.
                Err(PaymentError::DuplicateSettlement(_)) => SettlementOutcome::AlreadySettled,
                Err(e) => return Err(e),
            }
        };

        // Settle the attempt in both success paths. If this write fails
        // after the order was created, the residual pending attempt is
        // harmless: the next pass lands in AlreadySettled.
        buyer.settle_attempt(&transaction.id);
        self.users.put(buyer).await?;

        tracing::info!(buyer_id, %transaction_id, ?outcome, "reconciled checkout");
        Ok(outcome)
    }
}
