//! HTTP transports
//!
//! [`HttpClient`] is the seam every endpoint client is generic over:
//! - [`NetworkHttpClient`]: reqwest over the network
//! - [`OneshotHttpClient`]: in-process calls into an axum `Router`
//!
//! Both attach `Authorization: Bearer <token>` whenever the shared
//! [`Session`] holds a token.

mod network;
mod oneshot;

pub use network::NetworkHttpClient;
pub use oneshot::OneshotHttpClient;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult, error_from_status};
use crate::session::Session;

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Clone + Send + Sync + 'static {
    /// Session whose token is attached to every request
    fn session(&self) -> &Session;

    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T>;

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;

    /// POST `application/x-www-form-urlencoded`
    async fn post_form<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> ClientResult<T>;

    async fn put<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;

    async fn delete<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T>;
}

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

pub(crate) fn encode_form(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().copied())
        .finish()
}

/// Turn a status + body into the typed result. An empty success body decodes as `null`.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: http::StatusCode,
    body: &[u8],
) -> ClientResult<T> {
    if !status.is_success() {
        return Err(error_from_status(status, body));
    }

    let body: &[u8] = if body.iter().all(|b| b.is_ascii_whitespace()) {
        b"null"
    } else {
        body
    };

    serde_json::from_slice(body)
        .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))
}
