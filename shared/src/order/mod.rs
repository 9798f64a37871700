//! Order domain
//!
//! - Status machine and kitchen actions
//! - Money helpers for pricing carts and orders

pub mod money;
pub mod status;

// Re-exports
pub use status::{KitchenAction, OrderStatus, TransitionError};
