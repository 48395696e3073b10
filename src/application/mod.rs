//! Application layer containing the core business logic orchestration.
//!
//! Two services cover the four flows: `OnboardingService` brings a seller's
//! payout account to a chargeable state and mirrors its status, while
//! `CheckoutService` opens split-payment checkouts and reconciles their
//! results into durable orders.

pub mod checkout;
pub mod onboarding;
