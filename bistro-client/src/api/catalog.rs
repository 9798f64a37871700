//! Menu catalog client

use serde::de::IgnoredAny;
use shared::models::{Category, MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::error::ClientResult;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct CatalogApi<H: HttpClient> {
    http: H,
}

impl<H: HttpClient> CatalogApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// List menu items, optionally filtered by category
    pub async fn list_items(&self, category: Option<Category>) -> ClientResult<Vec<MenuItem>> {
        let path = match category {
            Some(category) => format!("/menu/items?category={}", category.as_str()),
            None => "/menu/items".to_string(),
        };
        self.http.get(&path).await
    }

    pub async fn get_item(&self, id: i64) -> ClientResult<MenuItem> {
        self.http.get(&format!("/menu/items/{}", id)).await
    }

    pub async fn create_item(&self, item: &MenuItemCreate) -> ClientResult<MenuItem> {
        self.http.post("/menu/items", item).await
    }

    pub async fn update_item(&self, id: i64, update: &MenuItemUpdate) -> ClientResult<MenuItem> {
        self.http.put(&format!("/menu/items/{}", id), update).await
    }

    pub async fn delete_item(&self, id: i64) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("/menu/items/{}", id)).await?;
        Ok(())
    }
}
