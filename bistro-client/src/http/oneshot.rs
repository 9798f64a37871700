//! Oneshot HTTP client - in-process calls
//!
//! Drives an axum `Router` through `tower::ServiceExt::oneshot`, so the
//! whole client stack can run against an in-process backend with no
//! network in between.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use super::{FORM_CONTENT_TYPE, HttpClient, JSON_CONTENT_TYPE, decode_response, encode_form};
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Oneshot HTTP client (in-memory calls)
///
/// ```ignore
/// let router: Router = backend_routes().with_state(state);
/// let client = OneshotHttpClient::new(router, Session::new());
/// let tables: Vec<DiningTable> = client.get("/tables").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
    session: Session,
}

impl OneshotHttpClient {
    /// `router` must already have its state applied
    pub fn new(router: Router, session: Session) -> Self {
        Self { router, session }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<(&'static str, Vec<u8>)>,
    ) -> ClientResult<T> {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(auth) = self.session.bearer() {
            builder = builder.header(header::AUTHORIZATION, auth);
        }

        let body = match body {
            Some((content_type, bytes)) => {
                builder = builder.header(header::CONTENT_TYPE, content_type);
                Body::from(bytes)
            }
            None => Body::empty(),
        };

        let request = builder
            .body(body)
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {}", e)))?;

        decode_response(status, &bytes)
    }

    fn json_body<B: Serialize>(body: &B) -> ClientResult<Option<(&'static str, Vec<u8>)>> {
        Ok(Some((JSON_CONTENT_TYPE, serde_json::to_vec(body)?)))
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    fn session(&self) -> &Session {
        &self.session
    }

    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = Self::json_body(body)?;
        self.execute(Method::POST, path, body).await
    }

    async fn post_form<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> ClientResult<T> {
        let body = Some((FORM_CONTENT_TYPE, encode_form(fields).into_bytes()));
        self.execute(Method::POST, path, body).await
    }

    async fn put<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = Self::json_body(body)?;
        self.execute(Method::PUT, path, body).await
    }

    async fn delete<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::DELETE, path, None).await
    }
}
