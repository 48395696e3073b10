use serde::{Deserialize, Serialize};

/// A bookable property listing. Owned and mutated by the catalog service
/// upstream; this core only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u32,
    pub title: String,
    /// Price in major currency units; converted to minor units (x100) when
    /// a checkout transaction is opened.
    pub price: i64,
    /// The seller who posted the listing.
    pub owner_id: u32,
}
