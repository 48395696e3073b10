use clap::Parser;
use miette::{IntoDiagnostic, Result};
use staypay::application::checkout::CheckoutService;
use staypay::application::onboarding::OnboardingService;
use staypay::config::Config;
use staypay::domain::listing::Listing;
use staypay::domain::ports::{
    ListingStoreRef, OrderStore, OrderStoreRef, ProcessorRef, UserStore, UserStoreRef,
};
use staypay::domain::user::User;
use staypay::infrastructure::in_memory::{
    InMemoryListingStore, InMemoryOrderStore, InMemoryUserStore,
};
use staypay::infrastructure::sandbox::SandboxProcessor;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Walks the full marketplace payment flow against the sandbox processor:
/// seller onboarding, status refresh, split-payment checkout and settlement.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Listing price in major currency units
    #[arg(long, default_value_t = 100)]
    price: i64,

    /// Leave the sandbox payment unpaid to exercise the benign no-op path
    #[arg(long)]
    skip_payment: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("staypay=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("staypay=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = Arc::new(Config::sandbox());
    let sandbox = Arc::new(SandboxProcessor::new());
    let users = Arc::new(InMemoryUserStore::new());
    let listings = Arc::new(InMemoryListingStore::new());
    let orders = Arc::new(InMemoryOrderStore::new());

    let user_store: UserStoreRef = users.clone();
    let listing_store: ListingStoreRef = listings.clone();
    let order_store: OrderStoreRef = orders.clone();
    let processor: ProcessorRef = sandbox.clone();

    let onboarding = OnboardingService::new(user_store.clone(), processor.clone(), config.clone());
    let checkout = CheckoutService::new(
        user_store,
        listing_store,
        order_store,
        processor,
        config,
    );

    // Seed the entities the upstream services would normally hand us.
    let seller = User::new(1, "seller@example.com", "not-a-real-hash");
    let buyer = User::new(2, "buyer@example.com", "not-a-real-hash");
    users.put(seller).await.into_diagnostic()?;
    users.put(buyer).await.into_diagnostic()?;
    listings
        .seed(Listing {
            id: 10,
            title: "Sea View Room".to_string(),
            price: cli.price,
            owner_id: 1,
        })
        .await;

    let onboarding_url = onboarding.begin_onboarding(1).await.into_diagnostic()?;
    println!("onboarding URL: {onboarding_url}");

    let profile = onboarding.refresh_account_status(1).await.into_diagnostic()?;
    println!(
        "seller status: {}",
        serde_json::to_string_pretty(&profile).into_diagnostic()?
    );

    let transaction_id = checkout.start_checkout(2, 10).await.into_diagnostic()?;
    println!("checkout transaction: {transaction_id}");

    if !cli.skip_payment {
        sandbox.mark_paid(&transaction_id).await.into_diagnostic()?;
    }

    let outcome = checkout.complete_checkout(2, 10).await.into_diagnostic()?;
    println!("settlement outcome: {outcome:?} (success: {})", outcome.success());

    if let Some(order) = orders
        .find_by_transaction(&transaction_id)
        .await
        .into_diagnostic()?
    {
        println!(
            "order: {}",
            serde_json::to_string_pretty(&order).into_diagnostic()?
        );
    }

    let balance = onboarding.account_balance(1).await.into_diagnostic()?;
    println!(
        "seller balance: {}",
        serde_json::to_string_pretty(&balance).into_diagnostic()?
    );

    Ok(())
}
