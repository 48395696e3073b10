//! Domain layer: marketplace entities, processor wire objects and the ports
//! the application services are wired through.

pub mod listing;
pub mod order;
pub mod ports;
pub mod processor;
pub mod user;
