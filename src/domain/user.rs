use super::processor::{CheckoutTransaction, PayoutAccount};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptState {
    #[default]
    Pending,
    Settled,
}

/// One entry in a user's append-only checkout log.
///
/// Attempts are keyed by the transaction's external id and are never removed;
/// settlement flips the state instead of deleting the entry, so an abandoned
/// first checkout stays visible in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutAttempt {
    pub listing_id: u32,
    pub transaction: CheckoutTransaction,
    #[serde(default)]
    pub state: AttemptState,
}

/// A marketplace user, buyer or seller.
///
/// The payout-account identifier appears lazily on first onboarding and is
/// immutable afterwards; `payout_account` is a display-only cached snapshot
/// refreshed from the processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(default)]
    pub payout_account_id: Option<String>,
    #[serde(default)]
    pub payout_account: Option<PayoutAccount>,
    #[serde(default)]
    pub checkout_attempts: Vec<CheckoutAttempt>,
}

impl User {
    pub fn new(id: u32, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            payout_account_id: None,
            payout_account: None,
            checkout_attempts: Vec::new(),
        }
    }

    /// Derived view over the attempt log: the most recently started checkout
    /// that has not settled yet.
    pub fn latest_pending(&self) -> Option<&CheckoutAttempt> {
        self.checkout_attempts
            .iter()
            .rev()
            .find(|attempt| attempt.state == AttemptState::Pending)
    }

    /// Marks every attempt for the given transaction as settled.
    pub fn settle_attempt(&mut self, transaction_id: &str) {
        for attempt in &mut self.checkout_attempts {
            if attempt.transaction.id == transaction_id {
                attempt.state = AttemptState::Settled;
            }
        }
    }

    /// Secret-free view handed back to callers.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            payout_account_id: self.payout_account_id.clone(),
            payout_account: self.payout_account.clone(),
        }
    }
}

/// What `refresh_account_status` returns: the user minus credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u32,
    pub email: String,
    pub payout_account_id: Option<String>,
    pub payout_account: Option<PayoutAccount>,
}
