use httpmock::prelude::*;
use staypay::config::Config;
use staypay::domain::ports::PaymentProcessor;
use staypay::domain::processor::{CheckoutRequest, LineItem, PaymentStatus};
use staypay::error::PaymentError;
use staypay::infrastructure::stripe::StripeClient;

fn client_for(server: &MockServer) -> StripeClient {
    let mut config = Config::sandbox();
    config.processor_secret = "sk_test_123".to_string();
    config.api_base = server.base_url();
    StripeClient::new(&config).unwrap()
}

fn checkout_request() -> CheckoutRequest {
    CheckoutRequest {
        line_item: LineItem {
            name: "Sea View Room".to_string(),
            unit_amount: 10_000,
            currency: "eur".to_string(),
            quantity: 1,
        },
        application_fee_amount: 2_000,
        destination: "acct_1".to_string(),
        client_reference: "10".to_string(),
        success_url: "https://example.com/success/10".to_string(),
        cancel_url: "https://example.com/cancel".to_string(),
    }
}

#[tokio::test]
async fn test_create_account_sends_express_type_with_bearer_auth() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/accounts")
            .header("authorization", "Bearer sk_test_123")
            .body_contains("type=express");
        then.status(200).json_body(serde_json::json!({
            "id": "acct_42",
            "charges_enabled": false,
            "details_submitted": false
        }));
    });

    let account = client_for(&server).create_account().await.unwrap();
    mock.assert();
    assert_eq!(account.id, "acct_42");
    assert!(!account.charges_enabled);
}

#[tokio::test]
async fn test_create_onboarding_link_posts_redirect_urls() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/account_links")
            .body_contains("account=acct_42")
            .body_contains("type=account_onboarding");
        then.status(200).json_body(serde_json::json!({
            "object": "account_link",
            "created": 1700000000,
            "expires_at": 1700000300,
            "url": "https://connect.stripe.com/setup/s/abc"
        }));
    });

    let link = client_for(&server)
        .create_onboarding_link("acct_42", "https://example.com/cb", "https://example.com/cb")
        .await
        .unwrap();
    mock.assert();
    assert_eq!(link.url, "https://connect.stripe.com/setup/s/abc");
    assert_eq!(link.expires_at, 1_700_000_300);
}

#[tokio::test]
async fn test_create_checkout_declares_split_and_idempotency_key() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/checkout/sessions")
            .header_exists("idempotency-key")
            .body_contains("mode=payment")
            .body_contains("line_items%5B0%5D%5Bprice_data%5D%5Bunit_amount%5D=10000")
            .body_contains("payment_intent_data%5Bapplication_fee_amount%5D=2000")
            .body_contains("payment_intent_data%5Btransfer_data%5D%5Bdestination%5D=acct_1")
            .body_contains("client_reference_id=10");
        then.status(200).json_body(serde_json::json!({
            "id": "cs_test_1",
            "payment_status": "unpaid",
            "amount_total": 10000,
            "currency": "eur",
            "client_reference_id": "10",
            "url": "https://checkout.stripe.com/c/cs_test_1"
        }));
    });

    let transaction = client_for(&server)
        .create_checkout(checkout_request())
        .await
        .unwrap();
    mock.assert();
    assert_eq!(transaction.id, "cs_test_1");
    assert_eq!(transaction.payment_status, PaymentStatus::Unpaid);
    // The session response omits the split; the snapshot carries the
    // declared values anyway.
    assert_eq!(transaction.application_fee_amount, Some(2_000));
    assert_eq!(transaction.transfer_destination, Some("acct_1".to_string()));
}

#[tokio::test]
async fn test_retrieve_checkout_parses_paid_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/checkout/sessions/cs_test_1");
        then.status(200).json_body(serde_json::json!({
            "id": "cs_test_1",
            "payment_status": "paid",
            "amount_total": 25000,
            "currency": "eur"
        }));
    });

    let transaction = client_for(&server)
        .retrieve_checkout("cs_test_1")
        .await
        .unwrap();
    assert_eq!(transaction.payment_status, PaymentStatus::Paid);
    assert_eq!(transaction.amount_total, 25_000);
}

#[tokio::test]
async fn test_balance_is_scoped_to_connected_account() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/balance")
            .header("stripe-account", "acct_42");
        then.status(200).json_body(serde_json::json!({
            "available": [{"amount": 1200, "currency": "eur"}],
            "pending": [{"amount": 800, "currency": "eur"}]
        }));
    });

    let balance = client_for(&server).retrieve_balance("acct_42").await.unwrap();
    mock.assert();
    assert_eq!(balance.available[0].amount, 1_200);
    assert_eq!(balance.pending[0].amount, 800);
}

#[tokio::test]
async fn test_processor_4xx_surfaces_as_processor_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/accounts/acct_42");
        then.status(402).json_body(serde_json::json!({
            "error": {"message": "Your account cannot currently make charges."}
        }));
    });

    let result = client_for(&server).retrieve_account("acct_42").await;
    match result {
        Err(PaymentError::Processor(message)) => {
            assert!(message.contains("402"));
        }
        other => panic!("expected processor error, got {other:?}"),
    }
}
