//! Order client

use shared::OrderStatus;
use shared::models::{Order, OrderCreate, OrderStatusUpdate};

use crate::error::ClientResult;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct OrderApi<H: HttpClient> {
    http: H,
}

impl<H: HttpClient> OrderApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// List orders, optionally filtered by status
    pub async fn list(&self, status: Option<OrderStatus>) -> ClientResult<Vec<Order>> {
        let path = match status {
            Some(status) => format!("/orders?status={}", status.as_str()),
            None => "/orders".to_string(),
        };
        self.http.get(&path).await
    }

    /// Orders that are neither delivered nor cancelled
    pub async fn active(&self) -> ClientResult<Vec<Order>> {
        self.http.get("/orders/active").await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Order> {
        self.http.get(&format!("/orders/{}", id)).await
    }

    pub async fn create(&self, order: &OrderCreate) -> ClientResult<Order> {
        self.http.post("/orders", order).await
    }

    /// `PUT /orders/{id}/status`. Legality is checked by the callers, the
    /// backend is trusted with the rest.
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        let path = format!("/orders/{}/status", id);
        self.http.put(&path, &OrderStatusUpdate { status }).await
    }
}
