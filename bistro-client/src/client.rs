//! Client facade

use std::sync::Arc;

use crate::api::{Auth, CatalogApi, OrderApi, TableApi};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::{HttpClient, NetworkHttpClient, OneshotHttpClient};
use crate::kitchen::KitchenBoard;
use crate::session::{CredentialStore, FileCredentialStore, MemoryCredentialStore, Session};
use crate::table_board::TableBoard;

/// Entry point owning one transport and its [`Session`]
#[derive(Clone)]
pub struct BistroClient<H: HttpClient> {
    http: H,
    store: Arc<dyn CredentialStore>,
}

impl BistroClient<NetworkHttpClient> {
    /// Network client with a file-backed credential store
    pub fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let http = NetworkHttpClient::new(config, Session::new())?;
        let store = FileCredentialStore::new(config.credential_dir.clone());
        tracing::debug!(
            base_url = %http.base_url(),
            credential = %store.path().display(),
            "Client configured"
        );
        Ok(Self::new(http, Arc::new(store)))
    }
}

impl BistroClient<OneshotHttpClient> {
    /// In-process client against `router`, with an in-memory credential store
    pub fn in_process(router: axum::Router) -> Self {
        let http = OneshotHttpClient::new(router, Session::new());
        Self::new(http, Arc::new(MemoryCredentialStore::new()))
    }
}

impl<H: HttpClient> BistroClient<H> {
    pub fn new(http: H, store: Arc<dyn CredentialStore>) -> Self {
        Self { http, store }
    }

    pub fn session(&self) -> &Session {
        self.http.session()
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn auth(&self) -> Auth<H> {
        Auth::new(self.http.clone(), self.store.clone())
    }

    pub fn catalog(&self) -> CatalogApi<H> {
        CatalogApi::new(self.http.clone())
    }

    pub fn orders(&self) -> OrderApi<H> {
        OrderApi::new(self.http.clone())
    }

    pub fn tables(&self) -> TableApi<H> {
        TableApi::new(self.http.clone())
    }

    /// A fresh, empty board. Call `refresh` or `start_polling` to load it.
    pub fn kitchen_board(&self) -> KitchenBoard<H> {
        KitchenBoard::new(self.orders())
    }

    /// A fresh, empty board. Call `refresh` or `start_polling` to load it.
    pub fn table_board(&self) -> TableBoard<H> {
        TableBoard::new(self.tables(), self.orders())
    }
}
