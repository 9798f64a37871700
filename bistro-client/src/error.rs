//! Client error types

use shared::OrderStatus;
use thiserror::Error;

/// Client error type
///
/// Transport failures, backend rejections and local precondition failures
/// all surface through this one type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential storage error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cart submitted without a table
    #[error("No table context; scan the table code again")]
    MissingTableContext,

    /// Cart submitted without lines
    #[error("Cart is empty")]
    EmptyCart,

    /// Quantity below 1
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Status change not offered for the order's current status
    #[error("Illegal order transition {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// First step of an open/close succeeded, the table update did not.
    /// The order is left detached from its table.
    #[error("Order {order_id} saved but table update failed: {source}")]
    TableSyncFailed {
        order_id: i64,
        #[source]
        source: Box<ClientError>,
    },
}

impl From<shared::order::TransitionError> for ClientError {
    fn from(e: shared::order::TransitionError) -> Self {
        ClientError::InvalidTransition {
            from: e.from,
            to: e.to,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// FastAPI error body: `{"detail": ...}`
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub detail: serde_json::Value,
}

impl ApiErrorResponse {
    pub(crate) fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Map a non-2xx status and its body to a [`ClientError`]
pub(crate) fn error_from_status(status: http::StatusCode, body: &[u8]) -> ClientError {
    let text = String::from_utf8_lossy(body).to_string();
    let message = serde_json::from_slice::<ApiErrorResponse>(body)
        .map(|e| e.message())
        .unwrap_or(text);

    match status {
        http::StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        http::StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        http::StatusCode::NOT_FOUND => ClientError::NotFound(message),
        http::StatusCode::BAD_REQUEST | http::StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(message)
        }
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
