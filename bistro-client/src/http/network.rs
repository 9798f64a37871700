//! Network HTTP client (reqwest)

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{FORM_CONTENT_TYPE, HttpClient, decode_response, encode_form};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::session::Session;

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl NetworkHttpClient {
    /// Create a client from configuration. No timeout is set unless configured.
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(&self, mut request: RequestBuilder) -> ClientResult<T> {
        if let Some(auth) = self.session.bearer() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_response(status, &body)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    fn session(&self) -> &Session {
        &self.session
    }

    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(method = "GET", path, "request");
        self.execute(self.client.get(self.url(path))).await
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(method = "POST", path, "request");
        let request = self.client.post(self.url(path)).json(body);
        self.execute(request).await
    }

    async fn post_form<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> ClientResult<T> {
        tracing::debug!(method = "POST", path, "form request");
        let request = self
            .client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(encode_form(fields));
        self.execute(request).await
    }

    async fn put<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(method = "PUT", path, "request");
        let request = self.client.put(self.url(path)).json(body);
        self.execute(request).await
    }

    async fn delete<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(method = "DELETE", path, "request");
        self.execute(self.client.delete(self.url(path))).await
    }
}
