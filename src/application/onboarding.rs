use crate::config::Config;
use crate::domain::ports::{ProcessorRef, UserStoreRef};
use crate::domain::processor::{Balance, LoginLink, OnboardingLink, PayoutAccount};
use crate::domain::user::{User, UserProfile};
use crate::error::{PaymentError, Result};
use std::sync::Arc;

/// Brings sellers' payout accounts to a chargeable state and mirrors their
/// processor-side status for dashboard display.
///
/// The processor client is injected, built once from validated configuration;
/// nothing here reaches for ambient state.
pub struct OnboardingService {
    users: UserStoreRef,
    processor: ProcessorRef,
    config: Arc<Config>,
}

impl OnboardingService {
    pub fn new(users: UserStoreRef, processor: ProcessorRef, config: Arc<Config>) -> Self {
        Self {
            users,
            processor,
            config,
        }
    }

    /// Starts (or resumes) payout-account onboarding for a seller and
    /// returns the composed onboarding URL.
    ///
    /// The account identifier is created lazily on first call and persisted
    /// before any link is requested, since the link references it. Safe to
    /// call repeatedly: later calls reuse the stored identifier and mint a
    /// fresh single-use link.
    pub async fn begin_onboarding(&self, user_id: u32) -> Result<String> {
        let mut user = self.load_user(user_id).await?;

        let account_id = match &user.payout_account_id {
            Some(id) => id.clone(),
            None => {
                let account = self.processor.create_account().await?;
                tracing::info!(user_id, account_id = %account.id, "created payout account");
                user.payout_account_id = Some(account.id.clone());
                // Persist before the link request; a crash after this point
                // leaves a resumable account id, not an orphaned link.
                self.users.put(user.clone()).await?;
                account.id
            }
        };

        let link = self
            .processor
            .create_onboarding_link(
                &account_id,
                &self.config.onboarding_redirect_url,
                &self.config.onboarding_redirect_url,
            )
            .await?;

        let url = compose_onboarding_url(&link, &[("stripe_user[email]", user.email.as_str())]);
        tracing::debug!(user_id, %account_id, "issued onboarding link");
        Ok(url)
    }

    /// Pulls the payout account's current state into the user's cached
    /// snapshot and returns the secret-free user view. A pure refresh: no
    /// business logic branches on the retrieved fields.
    pub async fn refresh_account_status(&self, user_id: u32) -> Result<UserProfile> {
        let mut user = self.load_user(user_id).await?;
        let account_id = require_account(&user)?;

        let account = self.processor.retrieve_account(&account_id).await?;
        user.payout_account = Some(account);
        self.users.put(user.clone()).await?;

        Ok(user.profile())
    }

    /// Available/pending balance scoped to the user's connected account.
    pub async fn account_balance(&self, user_id: u32) -> Result<Balance> {
        let user = self.load_user(user_id).await?;
        let account_id = require_account(&user)?;
        self.processor.retrieve_balance(&account_id).await
    }

    /// Single-use login link into the processor's payout dashboard.
    pub async fn payout_login_link(&self, user_id: u32) -> Result<LoginLink> {
        let user = self.load_user(user_id).await?;
        let account_id = require_account(&user)?;
        self.processor
            .create_login_link(&account_id, &self.config.payout_settings_redirect_url)
            .await
    }

    /// Adjusts the payout schedule delay on an account. Standalone operation;
    /// settlement never triggers it.
    pub async fn set_payout_delay(&self, account_id: &str, delay_days: u32) -> Result<PayoutAccount> {
        let account = self.processor.set_payout_delay(account_id, delay_days).await?;
        tracing::info!(%account_id, delay_days, "updated payout schedule");
        Ok(account)
    }

    async fn load_user(&self, user_id: u32) -> Result<User> {
        self.users
            .get(user_id)
            .await?
            .ok_or(PaymentError::UserNotFound(user_id))
    }
}

fn require_account(user: &User) -> Result<String> {
    user.payout_account_id
        .clone()
        .ok_or_else(|| PaymentError::PreconditionFailed(format!("user {} has no payout account", user.id)))
}

/// Merges prefill pairs into the link object and serializes the whole merged
/// object as a query string appended to the link URL, mirroring how the
/// hosted onboarding page expects prefill data.
fn compose_onboarding_url(link: &OnboardingLink, prefill: &[(&str, &str)]) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("object", "account_link");
    query.append_pair("created", &link.created.to_string());
    query.append_pair("expires_at", &link.expires_at.to_string());
    query.append_pair("url", &link.url);
    for (key, value) in prefill {
        query.append_pair(key, value);
    }
    format!("{}?{}", link.url, query.finish())
}
