//! Bistro Client - restaurant ordering client
//!
//! Session handling, typed clients for the restaurant REST backend, the
//! cart builder, and the kitchen and table boards with their polling loops.

pub mod api;
pub mod cart;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod kitchen;
pub mod navigation;
pub mod poller;
pub mod session;
pub mod table_board;

pub use api::{Auth, CatalogApi, OrderApi, TableApi};
pub use cart::{Cart, CartLine, TableContext};
pub use client::BistroClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient, OneshotHttpClient};
pub use kitchen::{KitchenBoard, KitchenCounts, KitchenTab};
pub use navigation::{Screen, guard, screens_for};
pub use poller::{DEFAULT_POLL_INTERVAL, PollHandle, Poller};
pub use session::{CredentialStore, FileCredentialStore, MemoryCredentialStore, Session};
pub use table_board::{NewOrderIntake, TableBoard, TableSelection};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, RegisterRequest, TokenResponse};
pub use shared::models::{Category, DiningTable, MenuItem, Order, User, UserRole};
pub use shared::{KitchenAction, OrderStatus};
