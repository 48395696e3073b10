use crate::config::Config;
use crate::domain::ports::PaymentProcessor;
use crate::domain::processor::{
    Balance, CheckoutRequest, CheckoutTransaction, LoginLink, OnboardingLink, PayoutAccount,
};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Payment processor backed by Stripe's form-encoded REST API.
///
/// Built once from validated configuration and injected into the services;
/// the base URL is overridable so tests can point it at a local mock.
pub struct StripeClient {
    http: Client,
    secret: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            secret: config.processor_secret.clone(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Processor(format!("{status}: {body}")));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_account(&self) -> Result<PayoutAccount> {
        let response = self
            .http
            .post(self.url("/v1/accounts"))
            .bearer_auth(&self.secret)
            .form(&[("type", "express")])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn retrieve_account(&self, account_id: &str) -> Result<PayoutAccount> {
        let response = self
            .http
            .get(self.url(&format!("/v1/accounts/{account_id}")))
            .bearer_auth(&self.secret)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_onboarding_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> Result<OnboardingLink> {
        let response = self
            .http
            .post(self.url("/v1/account_links"))
            .bearer_auth(&self.secret)
            .form(&[
                ("account", account_id),
                ("refresh_url", refresh_url),
                ("return_url", return_url),
                ("type", "account_onboarding"),
            ])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_login_link(&self, account_id: &str, redirect_url: &str) -> Result<LoginLink> {
        let response = self
            .http
            .post(self.url(&format!("/v1/accounts/{account_id}/login_links")))
            .bearer_auth(&self.secret)
            .form(&[("redirect_url", redirect_url)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn retrieve_balance(&self, account_id: &str) -> Result<Balance> {
        let response = self
            .http
            .get(self.url("/v1/balance"))
            .bearer_auth(&self.secret)
            // Scopes the call to the connected account.
            .header("Stripe-Account", account_id)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn set_payout_delay(&self, account_id: &str, delay_days: u32) -> Result<PayoutAccount> {
        let response = self
            .http
            .post(self.url(&format!("/v1/accounts/{account_id}")))
            .bearer_auth(&self.secret)
            .form(&[(
                "settings[payouts][schedule][delay_days]",
                delay_days.to_string(),
            )])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_checkout(&self, request: CheckoutRequest) -> Result<CheckoutTransaction> {
        let params: Vec<(&str, String)> = vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("line_items[0][quantity]", request.line_item.quantity.to_string()),
            (
                "line_items[0][price_data][currency]",
                request.line_item.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                request.line_item.unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                request.line_item.name.clone(),
            ),
            (
                "payment_intent_data[application_fee_amount]",
                request.application_fee_amount.to_string(),
            ),
            (
                "payment_intent_data[transfer_data][destination]",
                request.destination.clone(),
            ),
            ("client_reference_id", request.client_reference.clone()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
        ];

        // Retried network failures must not open a second transaction.
        let idempotency_key = format!("ik_{:032x}", rand::random::<u128>());

        let response = self
            .http
            .post(self.url("/v1/checkout/sessions"))
            .bearer_auth(&self.secret)
            .header("Idempotency-Key", idempotency_key)
            .form(&params)
            .send()
            .await?;
        let mut transaction: CheckoutTransaction = Self::decode(response).await?;

        // The session response does not echo the payment-intent split; carry
        // the declared values on the snapshot so callers can see them.
        if transaction.application_fee_amount.is_none() {
            transaction.application_fee_amount = Some(request.application_fee_amount);
        }
        if transaction.transfer_destination.is_none() {
            transaction.transfer_destination = Some(request.destination);
        }
        Ok(transaction)
    }

    async fn retrieve_checkout(&self, transaction_id: &str) -> Result<CheckoutTransaction> {
        let response = self
            .http
            .get(self.url(&format!("/v1/checkout/sessions/{transaction_id}")))
            .bearer_auth(&self.secret)
            .send()
            .await?;
        Self::decode(response).await
    }
}
