//! Dining table client

use serde::de::IgnoredAny;
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::error::ClientResult;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct TableApi<H: HttpClient> {
    http: H,
}

impl<H: HttpClient> TableApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> ClientResult<Vec<DiningTable>> {
        self.http.get("/tables").await
    }

    pub async fn get(&self, id: i64) -> ClientResult<DiningTable> {
        self.http.get(&format!("/tables/{}", id)).await
    }

    pub async fn create(&self, table: &DiningTableCreate) -> ClientResult<DiningTable> {
        self.http.post("/tables", table).await
    }

    pub async fn update(&self, id: i64, update: &DiningTableUpdate) -> ClientResult<DiningTable> {
        self.http.put(&format!("/tables/{}", id), update).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("/tables/{}", id)).await?;
        Ok(())
    }
}
