use super::listing::Listing;
use super::order::Order;
use super::processor::{
    Balance, CheckoutRequest, CheckoutTransaction, LoginLink, OnboardingLink, PayoutAccount,
};
use super::user::User;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, user_id: u32) -> Result<Option<User>>;
    async fn put(&self, user: User) -> Result<()>;
}

#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn get(&self, listing_id: u32) -> Result<Option<Listing>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order. Must fail with
    /// [`PaymentError::DuplicateSettlement`](crate::error::PaymentError) when
    /// an order for the same external transaction id already exists; that
    /// uniqueness constraint is what makes concurrent reconciliation safe.
    async fn create(&self, order: Order) -> Result<()>;
    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Order>>;
}

/// The external payment processor, as narrow as this core needs it.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Creates a standard marketplace ("express") payout account.
    async fn create_account(&self) -> Result<PayoutAccount>;
    async fn retrieve_account(&self, account_id: &str) -> Result<PayoutAccount>;
    async fn create_onboarding_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> Result<OnboardingLink>;
    async fn create_login_link(&self, account_id: &str, redirect_url: &str) -> Result<LoginLink>;
    async fn retrieve_balance(&self, account_id: &str) -> Result<Balance>;
    async fn set_payout_delay(&self, account_id: &str, delay_days: u32) -> Result<PayoutAccount>;
    async fn create_checkout(&self, request: CheckoutRequest) -> Result<CheckoutTransaction>;
    async fn retrieve_checkout(&self, transaction_id: &str) -> Result<CheckoutTransaction>;
}

pub type UserStoreRef = Arc<dyn UserStore>;
pub type ListingStoreRef = Arc<dyn ListingStore>;
pub type OrderStoreRef = Arc<dyn OrderStore>;
pub type ProcessorRef = Arc<dyn PaymentProcessor>;
