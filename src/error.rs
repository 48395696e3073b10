use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("user {0} not found")]
    UserNotFound(u32),
    #[error("listing {0} not found")]
    ListingNotFound(u32),
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),
    #[error("payment processor error: {0}")]
    Processor(String),
    #[error("an order for transaction {0} already exists")]
    DuplicateSettlement(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
