//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::poller::DEFAULT_POLL_INTERVAL;

/// Client configuration for connecting to the restaurant backend
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BISTRO_API_URL | http://localhost:8000 | Backend base URL |
/// | BISTRO_REQUEST_TIMEOUT_SECS | unset | Per-request timeout, none when unset |
/// | BISTRO_POLL_INTERVAL_SECS | 30 | Board refresh interval |
/// | BISTRO_CREDENTIAL_DIR | .bistro | Directory holding the stored token |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,

    /// Kitchen/table board refresh interval
    pub poll_interval: Duration,

    /// Directory for the persisted bearer token
    pub credential_dir: PathBuf,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            credential_dir: PathBuf::from(".bistro"),
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("BISTRO_API_URL").unwrap_or_else(|_| "http://localhost:8000".into()),
        );
        config.timeout = std::env::var("BISTRO_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs);
        if let Some(secs) = std::env::var("BISTRO_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Ok(dir) = std::env::var("BISTRO_CREDENTIAL_DIR") {
            config.credential_dir = PathBuf::from(dir);
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the board refresh interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the credential directory
    pub fn with_credential_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.credential_dir = dir.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}
