//! Order Model

use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;

/// Persisted order line. `price` is the unit price captured when the order was created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    pub price: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub table_id: i64,
    pub status: OrderStatus,
    pub total_amount: f64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Order line payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemCreate {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub price: f64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderCreate {
    pub table_id: i64,
    pub items: Vec<OrderItemCreate>,
    pub status: OrderStatus,
    pub total_amount: f64,
}

impl OrderCreate {
    /// Pending order with no lines, used when a table is opened
    pub fn empty(table_id: i64) -> Self {
        Self {
            table_id,
            items: Vec::new(),
            status: OrderStatus::Pending,
            total_amount: 0.0,
        }
    }
}

/// Body of `PUT /orders/{id}/status`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
