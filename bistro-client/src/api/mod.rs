//! Typed endpoint clients
//!
//! One thin client per backend resource. Each owns a clone of the
//! transport, so they can be moved into polling tasks freely.

pub mod auth;
pub mod catalog;
pub mod orders;
pub mod tables;

pub use auth::Auth;
pub use catalog::CatalogApi;
pub use orders::OrderApi;
pub use tables::TableApi;
