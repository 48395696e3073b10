use crate::domain::listing::Listing;
use crate::domain::order::Order;
use crate::domain::ports::{ListingStore, OrderStore, UserStore};
use crate::domain::user::User;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory user store.
///
/// Uses `Arc<RwLock<HashMap<u32, User>>>` to allow shared concurrent access.
/// Ideal for testing and the demo binary where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<u32, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, user_id: u32) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn put(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
        Ok(())
    }
}

/// Read-only in-memory listing store, seeded up front by the caller.
#[derive(Default, Clone)]
pub struct InMemoryListingStore {
    listings: Arc<RwLock<HashMap<u32, Listing>>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, listing: Listing) {
        let mut listings = self.listings.write().await;
        listings.insert(listing.id, listing);
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn get(&self, listing_id: u32) -> Result<Option<Listing>> {
        let listings = self.listings.read().await;
        Ok(listings.get(&listing_id).cloned())
    }
}

/// In-memory order store keyed by external transaction id.
///
/// The map key IS the uniqueness constraint: inserting a second order for
/// the same transaction id fails, which is what keeps concurrent
/// reconciliations from settling twice.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        let transaction_id = order.transaction_id().to_string();
        if orders.contains_key(&transaction_id) {
            return Err(PaymentError::DuplicateSettlement(transaction_id));
        }
        orders.insert(transaction_id, order);
        Ok(())
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(transaction_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::processor::{CheckoutTransaction, PaymentStatus};

    fn order(tx_id: &str) -> Order {
        Order {
            listing_id: 10,
            buyer_id: 1,
            transaction: CheckoutTransaction {
                id: tx_id.to_string(),
                payment_status: PaymentStatus::Paid,
                amount_total: 25_000,
                currency: "eur".to_string(),
                application_fee_amount: Some(5_000),
                transfer_destination: Some("acct_1".to_string()),
                client_reference: Some("10".to_string()),
                url: None,
            },
        }
    }

    #[tokio::test]
    async fn test_user_store_roundtrip() {
        let store = InMemoryUserStore::new();
        let user = User::new(1, "buyer@example.com", "hash");

        store.put(user.clone()).await.unwrap();
        assert_eq!(store.get(1).await.unwrap(), Some(user));
        assert!(store.get(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_order_store_rejects_duplicate_transaction() {
        let store = InMemoryOrderStore::new();

        store.create(order("cs_1")).await.unwrap();
        let result = store.create(order("cs_1")).await;
        assert!(matches!(
            result,
            Err(PaymentError::DuplicateSettlement(id)) if id == "cs_1"
        ));

        assert_eq!(store.count().await, 1);
        assert!(store.find_by_transaction("cs_1").await.unwrap().is_some());
        assert!(store.find_by_transaction("cs_2").await.unwrap().is_none());
    }
}
