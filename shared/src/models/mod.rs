//! Data models
//!
//! Wire types of the restaurant backend. All IDs are `i64`.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod user;

// Re-exports
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use user::*;
