use staypay::application::checkout::CheckoutService;
use staypay::application::onboarding::OnboardingService;
use staypay::config::Config;
use staypay::domain::listing::Listing;
use staypay::domain::ports::UserStore;
use staypay::domain::user::User;
use staypay::infrastructure::in_memory::{
    InMemoryListingStore, InMemoryOrderStore, InMemoryUserStore,
};
use staypay::infrastructure::sandbox::SandboxProcessor;
use std::sync::Arc;

/// Fully wired payment core over in-memory stores and the sandbox
/// processor, as the demo binary assembles it.
pub struct Harness {
    pub users: Arc<InMemoryUserStore>,
    pub listings: Arc<InMemoryListingStore>,
    pub orders: Arc<InMemoryOrderStore>,
    pub sandbox: Arc<SandboxProcessor>,
    pub onboarding: OnboardingService,
    pub checkout: CheckoutService,
}

impl Harness {
    pub fn new() -> Self {
        let config = Arc::new(Config::sandbox());
        let users = Arc::new(InMemoryUserStore::new());
        let listings = Arc::new(InMemoryListingStore::new());
        let orders = Arc::new(InMemoryOrderStore::new());
        let sandbox = Arc::new(SandboxProcessor::new());

        let onboarding =
            OnboardingService::new(users.clone(), sandbox.clone(), config.clone());
        let checkout = CheckoutService::new(
            users.clone(),
            listings.clone(),
            orders.clone(),
            sandbox.clone(),
            config,
        );

        Self {
            users,
            listings,
            orders,
            sandbox,
            onboarding,
            checkout,
        }
    }

    pub async fn seed_user(&self, id: u32, email: &str) {
        self.users.put(User::new(id, email, "hash")).await.unwrap();
    }

    pub async fn seed_listing(&self, id: u32, title: &str, price: i64, owner_id: u32) {
        self.listings
            .seed(Listing {
                id,
                title: title.to_string(),
                price,
                owner_id,
            })
            .await;
    }

    /// Seeds a seller and runs onboarding; returns the payout account id.
    pub async fn onboarded_seller(&self, id: u32, email: &str) -> String {
        self.seed_user(id, email).await;
        self.onboarding.begin_onboarding(id).await.unwrap();
        self.users
            .get(id)
            .await
            .unwrap()
            .unwrap()
            .payout_account_id
            .unwrap()
    }
}
