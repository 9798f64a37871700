mod common;

use std::sync::Arc;

use bistro_client::{
    ClientError, CredentialStore, FileCredentialStore, HttpClient, MemoryCredentialStore,
    RegisterRequest, Screen, User, UserRole, guard,
};
use common::{FakeBackend, PASSWORD, WAITER_EMAIL};
use tempfile::TempDir;

#[tokio::test]
async fn test_login_sets_session_and_bearer() {
    let backend = FakeBackend::new();
    let store = MemoryCredentialStore::new();
    let client = backend.client_with_store(Arc::new(store.clone()));

    let user = client.auth().login(WAITER_EMAIL, PASSWORD).await.unwrap();
    assert_eq!(user.role, UserRole::Waiter);
    assert!(client.session().is_authenticated());
    assert_eq!(client.session().user(), Some(user));

    let token = client.session().token().unwrap();
    assert_eq!(store.load().as_deref(), Some(token.as_str()));

    backend.clear_requests();
    client.tables().list().await.unwrap();
    let state = backend.state();
    assert_eq!(state.requests.len(), 1);
    assert_eq!(state.requests[0].bearer, Some(format!("Bearer {}", token)));
}

#[tokio::test]
async fn test_login_posts_form_without_bearer() {
    let backend = FakeBackend::new();
    let client = backend.client();
    client.auth().login(WAITER_EMAIL, PASSWORD).await.unwrap();

    let state = backend.state();
    assert_eq!(state.requests[0].path, "/token");
    assert_eq!(state.requests[0].bearer, None);
    assert_eq!(state.requests[1].path, "/users/me");
    assert!(state.requests[1].bearer.is_some());
}

#[tokio::test]
async fn test_login_rejected() {
    let backend = FakeBackend::new();
    let store = MemoryCredentialStore::new();
    let client = backend.client_with_store(Arc::new(store.clone()));

    let err = client
        .auth()
        .login(WAITER_EMAIL, "wrong")
        .await
        .unwrap_err();
    match err {
        ClientError::Unauthorized(message) => assert_eq!(message, "Incorrect username or password"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!client.session().is_authenticated());
    assert!(client.session().token().is_none());
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let backend = FakeBackend::new();
    let store = MemoryCredentialStore::new();
    let client = backend.client_with_store(Arc::new(store.clone()));
    client.auth().login(WAITER_EMAIL, PASSWORD).await.unwrap();

    client.auth().logout().unwrap();
    assert!(!client.session().is_authenticated());
    assert!(store.load().is_none());

    backend.clear_requests();
    let err = client.tables().list().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(backend.state().requests[0].bearer, None);
    assert!(matches!(
        guard(client.session(), Screen::Tables),
        Err(ClientError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_register_then_logged_in() {
    let backend = FakeBackend::new();
    let client = backend.client();

    let request = RegisterRequest {
        email: "new@bistro.test".to_string(),
        password: "pw".to_string(),
        full_name: "New Cook".to_string(),
        role: UserRole::Kitchen,
    };
    let user = client.auth().register(&request).await.unwrap();
    assert_eq!(user.email, "new@bistro.test");
    assert_eq!(user.role, UserRole::Kitchen);
    assert!(client.session().is_authenticated());
    assert!(guard(client.session(), Screen::Kitchen).is_ok());
    assert!(matches!(
        guard(client.session(), Screen::Admin),
        Err(ClientError::Forbidden(_))
    ));

    let err = client.auth().register(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(ref m) if m == "Email already registered"));
}

#[tokio::test]
async fn test_restore_from_stored_token() {
    let backend = FakeBackend::new();
    let first = backend.client_with_store(Arc::new(MemoryCredentialStore::new()));
    first.auth().login(WAITER_EMAIL, PASSWORD).await.unwrap();
    let token = first.session().token().unwrap();

    let store = MemoryCredentialStore::with_token(token.clone());
    let client = backend.client_with_store(Arc::new(store));
    let user: Option<User> = client.auth().restore().await;
    assert_eq!(user.map(|u| u.email), Some(WAITER_EMAIL.to_string()));
    assert_eq!(client.session().token(), Some(token));
}

#[tokio::test]
async fn test_restore_with_stale_token_clears_silently() {
    let backend = FakeBackend::new();
    let store = MemoryCredentialStore::with_token("stale");
    let client = backend.client_with_store(Arc::new(store.clone()));

    assert!(client.auth().restore().await.is_none());
    assert!(store.load().is_none());
    assert!(client.session().token().is_none());
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_restore_without_token_makes_no_request() {
    let backend = FakeBackend::new();
    let client = backend.client();
    assert!(client.auth().restore().await.is_none());
    assert!(backend.state().requests.is_empty());
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let backend = FakeBackend::new();

    let client = backend.client_with_store(Arc::new(FileCredentialStore::new(dir.path())));
    client.auth().login(WAITER_EMAIL, PASSWORD).await.unwrap();
    assert!(FileCredentialStore::new(dir.path()).exists());

    let restarted = backend.client_with_store(Arc::new(FileCredentialStore::new(dir.path())));
    let user = restarted.auth().restore().await.unwrap();
    assert_eq!(user.email, WAITER_EMAIL);
    assert!(restarted.http().session().is_authenticated());

    restarted.auth().logout().unwrap();
    assert!(!FileCredentialStore::new(dir.path()).exists());
}
