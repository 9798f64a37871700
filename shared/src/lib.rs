//! Shared types for the Bistro restaurant client
//!
//! Wire models of the restaurant backend, the order status machine and
//! money helpers used by every consumer.

pub mod client;
pub mod models;
pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{Category, DiningTable, MenuItem, Order, OrderItem, User, UserRole};
pub use order::{KitchenAction, OrderStatus};
