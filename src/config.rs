use crate::error::{PaymentError, Result};
use std::env;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Process-wide configuration for the payment core.
///
/// Built once at startup from the environment and passed explicitly into the
/// services; a missing processor secret is a startup failure, never a
/// per-request one.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret API key for the payment processor.
    pub processor_secret: String,
    /// Where the processor sends sellers who abandon or finish onboarding.
    pub onboarding_redirect_url: String,
    /// Redirect target for the payout-settings dashboard login link.
    pub payout_settings_redirect_url: String,
    /// Checkout success URL; the listing id is appended as a path segment.
    pub checkout_success_url: String,
    pub checkout_cancel_url: String,
    /// ISO currency code used for checkout line items.
    pub currency: String,
    /// Processor API base URL, overridable for tests.
    pub api_base: String,
}

impl Config {
    /// Reads configuration from the environment, loading `.env` first if
    /// present. Fails fast when the processor secret is absent.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let processor_secret = env::var("STRIPE_SECRET")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET is not set".to_string()))?;
        if processor_secret.is_empty() {
            return Err(PaymentError::Config("STRIPE_SECRET is empty".to_string()));
        }

        Ok(Self {
            processor_secret,
            onboarding_redirect_url: env::var("STRIPE_REDIRECT_URL")
                .unwrap_or_else(|_| "http://localhost:3000/stripe/callback".to_string()),
            payout_settings_redirect_url: env::var("STRIPE_SETTING_REDIRECT_URL")
                .unwrap_or_else(|_| "http://localhost:3000/stripe/settings".to_string()),
            checkout_success_url: env::var("STRIPE_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:3000/stripe/success".to_string()),
            checkout_cancel_url: env::var("STRIPE_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:3000/stripe/cancel".to_string()),
            currency: env::var("CHECKOUT_CURRENCY").unwrap_or_else(|_| "eur".to_string()),
            api_base: env::var("STRIPE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }

    /// Configuration for the sandbox processor, where no secret exists.
    pub fn sandbox() -> Self {
        Self {
            processor_secret: "sk_sandbox".to_string(),
            onboarding_redirect_url: "http://localhost:3000/stripe/callback".to_string(),
            payout_settings_redirect_url: "http://localhost:3000/stripe/settings".to_string(),
            checkout_success_url: "http://localhost:3000/stripe/success".to_string(),
            checkout_cancel_url: "http://localhost:3000/stripe/cancel".to_string(),
            currency: "eur".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}
