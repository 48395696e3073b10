use super::processor::CheckoutTransaction;
use serde::{Deserialize, Serialize};

/// A settled booking. Created exactly once per completed external
/// transaction and never mutated afterwards; the embedded transaction's id
/// doubles as the idempotency key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub listing_id: u32,
    pub buyer_id: u32,
    pub transaction: CheckoutTransaction,
}

impl Order {
    pub fn transaction_id(&self) -> &str {
        &self.transaction.id
    }
}
