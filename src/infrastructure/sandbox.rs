use crate::domain::ports::PaymentProcessor;
use crate::domain::processor::{
    AccountSettings, Balance, BalanceFunds, CheckoutRequest, CheckoutTransaction, LoginLink,
    OnboardingLink, PayoutAccount, PayoutSchedule, PayoutSettings, PaymentStatus,
};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const LINK_TTL_SECS: i64 = 300;

#[derive(Default)]
struct SandboxState {
    accounts: HashMap<String, PayoutAccount>,
    transactions: HashMap<String, CheckoutTransaction>,
    next_account: u64,
    next_transaction: u64,
    next_link: u64,
}

/// In-process simulation of the external processor, for local runs and
/// tests where no real venue is reachable.
///
/// Transactions start unpaid; `mark_paid` plays the role of the buyer
/// completing the hosted payment page.
#[derive(Default, Clone)]
pub struct SandboxProcessor {
    state: Arc<RwLock<SandboxState>>,
}

impl SandboxProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the buyer paying on the hosted page.
    pub async fn mark_paid(&self, transaction_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let tx = state
            .transactions
            .get_mut(transaction_id)
            .ok_or_else(|| PaymentError::Processor(format!("no such session: {transaction_id}")))?;
        tx.payment_status = PaymentStatus::Paid;
        Ok(())
    }

    pub async fn transaction_count(&self) -> usize {
        self.state.read().await.transactions.len()
    }

    fn now() -> i64 {
        std::time::UNIX_EPOCH
            .elapsed()
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

#[async_trait]
impl PaymentProcessor for SandboxProcessor {
    async fn create_account(&self) -> Result<PayoutAccount> {
        let mut state = self.state.write().await;
        state.next_account += 1;
        let account = PayoutAccount {
            id: format!("acct_sbx_{}", state.next_account),
            charges_enabled: false,
            details_submitted: false,
            payouts_enabled: false,
            email: None,
            settings: None,
        };
        state.accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn retrieve_account(&self, account_id: &str) -> Result<PayoutAccount> {
        let state = self.state.read().await;
        state
            .accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| PaymentError::Processor(format!("no such account: {account_id}")))
    }

    async fn create_onboarding_link(
        &self,
        account_id: &str,
        _refresh_url: &str,
        _return_url: &str,
    ) -> Result<OnboardingLink> {
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(account_id) {
            return Err(PaymentError::Processor(format!(
                "no such account: {account_id}"
            )));
        }
        // Onboarding visits flip the account chargeable in the sandbox.
        if let Some(account) = state.accounts.get_mut(account_id) {
            account.charges_enabled = true;
            account.details_submitted = true;
            account.payouts_enabled = true;
        }
        state.next_link += 1;
        let now = Self::now();
        Ok(OnboardingLink {
            url: format!(
                "https://connect.sandbox.local/setup/{account_id}/{}",
                state.next_link
            ),
            created: now,
            expires_at: now + LINK_TTL_SECS,
        })
    }

    async fn create_login_link(&self, account_id: &str, redirect_url: &str) -> Result<LoginLink> {
        let state = self.state.read().await;
        if !state.accounts.contains_key(account_id) {
            return Err(PaymentError::Processor(format!(
                "no such account: {account_id}"
            )));
        }
        Ok(LoginLink {
            url: format!(
                "https://connect.sandbox.local/dashboard/{account_id}?redirect={redirect_url}"
            ),
            created: Self::now(),
        })
    }

    async fn retrieve_balance(&self, account_id: &str) -> Result<Balance> {
        let state = self.state.read().await;
        if !state.accounts.contains_key(account_id) {
            return Err(PaymentError::Processor(format!(
                "no such account: {account_id}"
            )));
        }
        // Settled transfers for this account, minus nothing; the sandbox has
        // no payout clock, so everything sits in pending.
        let pending: i64 = state
            .transactions
            .values()
            .filter(|tx| {
                tx.payment_status == PaymentStatus::Paid
                    && tx.transfer_destination.as_deref() == Some(account_id)
            })
            .map(|tx| tx.amount_total - tx.application_fee_amount.unwrap_or(0))
            .sum();
        Ok(Balance {
            available: vec![BalanceFunds {
                amount: 0,
                currency: "eur".to_string(),
            }],
            pending: vec![BalanceFunds {
                amount: pending,
                currency: "eur".to_string(),
            }],
        })
    }

    async fn set_payout_delay(&self, account_id: &str, delay_days: u32) -> Result<PayoutAccount> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| PaymentError::Processor(format!("no such account: {account_id}")))?;
        account.settings = Some(AccountSettings {
            payouts: Some(PayoutSettings {
                schedule: Some(PayoutSchedule {
                    delay_days: Some(delay_days),
                    interval: Some("daily".to_string()),
                }),
            }),
        });
        Ok(account.clone())
    }

    async fn create_checkout(&self, request: CheckoutRequest) -> Result<CheckoutTransaction> {
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&request.destination) {
            return Err(PaymentError::Processor(format!(
                "no such destination account: {}",
                request.destination
            )));
        }
        state.next_transaction += 1;
        let id = format!("cs_sbx_{}", state.next_transaction);
        let transaction = CheckoutTransaction {
            id: id.clone(),
            payment_status: PaymentStatus::Unpaid,
            amount_total: request.line_item.unit_amount * i64::from(request.line_item.quantity),
            currency: request.line_item.currency.clone(),
            application_fee_amount: Some(request.application_fee_amount),
            transfer_destination: Some(request.destination.clone()),
            client_reference: Some(request.client_reference.clone()),
            url: Some(format!("https://pay.sandbox.local/c/{id}")),
        };
        state.transactions.insert(id, transaction.clone());
        Ok(transaction)
    }

    async fn retrieve_checkout(&self, transaction_id: &str) -> Result<CheckoutTransaction> {
        let state = self.state.read().await;
        state
            .transactions
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| PaymentError::Processor(format!("no such session: {transaction_id}")))
    }
}
