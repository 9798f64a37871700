//! Login, registration, logout and session restore

use std::sync::Arc;

use shared::User;
use shared::client::{RegisterRequest, TokenResponse};

use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::session::{CredentialStore, Session};

/// Authentication flows over the shared [`Session`]
#[derive(Clone)]
pub struct Auth<H: HttpClient> {
    http: H,
    store: Arc<dyn CredentialStore>,
}

impl<H: HttpClient> Auth<H> {
    pub fn new(http: H, store: Arc<dyn CredentialStore>) -> Self {
        Self { http, store }
    }

    fn session(&self) -> &Session {
        self.http.session()
    }

    /// Exchange credentials for a bearer token, then load the user record.
    ///
    /// The session only ends up authenticated if both calls succeed.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let token: TokenResponse = self
            .http
            .post_form("/token", &[("username", email), ("password", password)])
            .await?;

        self.session().set_token(token.access_token.clone());
        let user = match self.current_user().await {
            Ok(user) => user,
            Err(e) => {
                self.session().clear();
                return Err(e);
            }
        };
        self.session().set(token.access_token.clone(), user.clone());

        if let Err(e) = self.store.save(&token.access_token) {
            tracing::warn!(error = %e, "Failed to persist credential");
        }

        tracing::info!(user_id = user.id, role = %user.role, "Logged in");
        Ok(user)
    }

    /// Create an account, then log in with the same credentials.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        let created: User = self.http.post("/users/", request).await?;
        tracing::info!(user_id = created.id, email = %created.email, "Registered");
        self.login(&request.email, &request.password).await
    }

    /// Drop the session and the stored credential. No backend call.
    pub fn logout(&self) -> ClientResult<()> {
        let user_id = self.session().user().map(|u| u.id);
        self.session().clear();
        self.store.clear()?;
        tracing::info!(user_id = ?user_id, "Logged out");
        Ok(())
    }

    /// Restore the session from the stored credential.
    ///
    /// A rejected or unreadable credential is discarded silently and the
    /// client continues logged out.
    pub async fn restore(&self) -> Option<User> {
        let token = self.store.load()?;
        self.session().set_token(token.clone());

        match self.current_user().await {
            Ok(user) => {
                self.session().set(token, user.clone());
                tracing::debug!(user_id = user.id, "Session restored");
                Some(user)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Stored credential rejected");
                self.session().clear();
                if let Err(e) = self.store.clear() {
                    tracing::debug!(error = %e, "Failed to remove stored credential");
                }
                None
            }
        }
    }

    /// `GET /users/me`
    pub async fn current_user(&self) -> ClientResult<User> {
        self.http.get("/users/me").await
    }
}
