use serde::{Deserialize, Serialize};

/// A seller's connected payout account as the processor reports it.
///
/// The identifier is immutable once issued; the capability flags and payout
/// settings change over time and are refreshed, never recreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutAccount {
    pub id: String,
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub details_submitted: bool,
    #[serde(default)]
    pub payouts_enabled: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub settings: Option<AccountSettings>,
}

impl PayoutAccount {
    pub fn payout_delay_days(&self) -> Option<u32> {
        self.settings
            .as_ref()
            .and_then(|s| s.payouts.as_ref())
            .and_then(|p| p.schedule.as_ref())
            .and_then(|s| s.delay_days)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountSettings {
    #[serde(default)]
    pub payouts: Option<PayoutSettings>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayoutSettings {
    #[serde(default)]
    pub schedule: Option<PayoutSchedule>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayoutSchedule {
    #[serde(default)]
    pub delay_days: Option<u32>,
    #[serde(default)]
    pub interval: Option<String>,
}

/// One-time, time-limited link a seller follows to complete onboarding.
/// The processor owns its lifetime; nothing is tracked locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingLink {
    pub url: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub expires_at: i64,
}

/// Single-use login link into the processor's hosted seller dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginLink {
    pub url: String,
    #[serde(default)]
    pub created: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[serde(other)]
    Unknown,
}

/// A buyer-facing payment attempt at the processor.
///
/// This full object is what gets snapshotted onto users and orders; its `id`
/// is the settlement idempotency key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutTransaction {
    pub id: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub amount_total: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub application_fee_amount: Option<i64>,
    #[serde(default)]
    pub transfer_destination: Option<String>,
    /// Listing reference recorded at creation time (`client_reference_id`).
    #[serde(default, rename = "client_reference_id")]
    pub client_reference: Option<String>,
    /// Hosted payment page the buyer is redirected to.
    #[serde(default)]
    pub url: Option<String>,
}

/// Parameters for opening a one-time card checkout. The gross charge, the
/// retained fee and the destination transfer are declared in one request so
/// the processor commits the split atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub line_item: LineItem,
    /// Platform cut, in minor currency units.
    pub application_fee_amount: i64,
    /// Payout account receiving the non-fee remainder.
    pub destination: String,
    pub client_reference: String,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    /// Minor currency units per unit.
    pub unit_amount: i64,
    pub currency: String,
    pub quantity: u32,
}

/// Funds available to and pending for a connected account.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Balance {
    #[serde(default)]
    pub available: Vec<BalanceFunds>,
    #[serde(default)]
    pub pending: Vec<BalanceFunds>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceFunds {
    pub amount: i64,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_deserialization() {
        let status: PaymentStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(status, PaymentStatus::Paid);

        let status: PaymentStatus = serde_json::from_str("\"no_payment_required\"").unwrap();
        assert_eq!(status, PaymentStatus::NoPaymentRequired);

        // Forward compatibility with statuses this core does not know about.
        let status: PaymentStatus = serde_json::from_str("\"requires_action\"").unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
    }

    #[test]
    fn test_transaction_deserialization_tolerates_missing_fields() {
        let json = r#"{"id": "cs_1", "payment_status": "unpaid"}"#;
        let tx: CheckoutTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, "cs_1");
        assert_eq!(tx.payment_status, PaymentStatus::Unpaid);
        assert_eq!(tx.amount_total, 0);
        assert_eq!(tx.client_reference, None);
    }

    #[test]
    fn test_account_payout_delay_traversal() {
        let json = r#"{
            "id": "acct_1",
            "charges_enabled": true,
            "settings": {"payouts": {"schedule": {"delay_days": 7, "interval": "daily"}}}
        }"#;
        let account: PayoutAccount = serde_json::from_str(json).unwrap();
        assert_eq!(account.payout_delay_days(), Some(7));

        let bare: PayoutAccount = serde_json::from_str(r#"{"id": "acct_2"}"#).unwrap();
        assert_eq!(bare.payout_delay_days(), None);
    }
}
