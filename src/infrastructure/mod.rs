pub mod in_memory;
pub mod sandbox;
pub mod stripe;
