//! Session and credential storage
//!
//! [`Session`] is the in-memory identity (bearer token + current user),
//! shared by cloning the handle into every transport and component.
//! [`CredentialStore`] persists only the token so a session can be restored
//! on the next start.

use serde::{Deserialize, Serialize};
use shared::User;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

/// File name of the stored credential
pub const CREDENTIAL_FILE: &str = "token.json";

/// Session data held in memory during the client's lifecycle.
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    /// Bearer token for HTTP API authentication.
    pub token: Option<String>,
    /// Current user after login or restore.
    pub user: Option<User>,
}

/// Shared session handle
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionData>>,
}

impl Session {
    /// Creates a new empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the token and user after a successful login.
    pub fn set(&self, token: impl Into<String>, user: User) {
        let mut data = self.write();
        data.token = Some(token.into());
        data.user = Some(user);
    }

    /// Sets only the token (before the user record is known).
    pub fn set_token(&self, token: impl Into<String>) {
        self.write().token = Some(token.into());
    }

    /// Clears the session on logout.
    pub fn clear(&self) {
        let mut data = self.write();
        data.token = None;
        data.user = None;
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        let data = self.read();
        data.token.is_some() && data.user.is_some()
    }

    /// `Authorization` header value, if a token is held
    pub fn bearer(&self) -> Option<String> {
        self.read().token.as_ref().map(|t| format!("Bearer {}", t))
    }

    // SessionData holds plain values, a poisoned guard is still usable.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionData> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionData> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Durable storage for the bearer token
pub trait CredentialStore: Send + Sync {
    /// Stored token, if any
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> std::io::Result<()>;
    fn clear(&self) -> std::io::Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    token: String,
}

/// JSON file credential store (`<dir>/token.json`)
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(CREDENTIAL_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        if !self.path.exists() {
            return None;
        }
        let json = fs::read_to_string(&self.path).ok()?;
        let stored: StoredCredential = serde_json::from_str(&json).ok()?;
        Some(stored.token)
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(&StoredCredential {
            token: token.to_string(),
        })?;
        fs::write(&self.path, json)
    }

    fn clear(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory credential store
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok()?.clone()
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
        Ok(())
    }
}
