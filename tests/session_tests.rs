//! Integration tests for the session gate
//!
//! Login, logout and restoring a persisted session, against both the
//! in-memory and the file-backed stores.

use phone_catalog::session::{AdminCredentials, AUTH_TOKEN_KEY, USER_DATA_KEY};
use phone_catalog::{FileSessionStore, InMemorySessionStore, SessionGate, SessionStore};
use std::sync::Arc;

fn gate_with_shared_store() -> (SessionGate, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let gate = SessionGate::new(
        AdminCredentials::default(),
        Box::new(store.clone()),
    );
    (gate, store)
}

#[tokio::test]
async fn test_login_with_valid_credentials() {
    let (gate, store) = gate_with_shared_store();

    let outcome = gate.login("admin", "admin123").await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "Login successful");
    assert!(gate.is_authenticated());

    let user = gate.current_user().unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.username, "admin");
    assert_eq!(user.role, "administrator");
    assert_eq!(user.name, "Administrator");

    let token = store.get(AUTH_TOKEN_KEY).unwrap().unwrap();
    assert!(!token.is_empty());
    let persisted: serde_json::Value =
        serde_json::from_str(&store.get(USER_DATA_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted["username"], "admin");
}

#[tokio::test]
async fn test_login_with_wrong_credentials() {
    let (gate, store) = gate_with_shared_store();

    for (username, password) in [("admin", "wrong"), ("root", "admin123"), ("", "")] {
        let outcome = gate.login(username, password).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Invalid credentials");
    }

    assert!(!gate.is_authenticated());
    assert!(gate.current_user().is_none());
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_custom_credentials() {
    let gate = SessionGate::new(
        AdminCredentials {
            username: "boss".to_string(),
            password: "s3cret".to_string(),
        },
        Box::new(InMemorySessionStore::new()),
    );

    assert!(!gate.login("admin", "admin123").await.success);
    assert!(gate.login("boss", "s3cret").await.success);
    assert_eq!(gate.current_user().unwrap().username, "boss");
}

#[tokio::test]
async fn test_each_login_issues_a_new_token() {
    let (gate, store) = gate_with_shared_store();

    gate.login("admin", "admin123").await;
    let first = store.get(AUTH_TOKEN_KEY).unwrap();
    gate.login("admin", "admin123").await;
    let second = store.get(AUTH_TOKEN_KEY).unwrap();

    assert_ne!(first, second);
}

#[tokio::test]
async fn test_logout_clears_state_and_store() {
    let (gate, store) = gate_with_shared_store();
    gate.login("admin", "admin123").await;

    gate.logout();

    assert!(!gate.is_authenticated());
    assert!(gate.current_user().is_none());
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get(USER_DATA_KEY).unwrap(), None);

    // Logging out twice is harmless
    gate.logout();
    assert!(!gate.is_authenticated());
}

#[test]
fn test_check_auth_status_without_persisted_session() {
    let (gate, _store) = gate_with_shared_store();
    assert!(!gate.check_auth_status());
    assert!(!gate.is_authenticated());
}

#[test]
fn test_check_auth_status_needs_both_entries() {
    let (gate, store) = gate_with_shared_store();
    store.set(AUTH_TOKEN_KEY, "token").unwrap();

    assert!(!gate.check_auth_status());
    assert!(!gate.is_authenticated());
}

#[test]
fn test_check_auth_status_treats_empty_token_as_missing() {
    let (gate, store) = gate_with_shared_store();
    store.set(AUTH_TOKEN_KEY, "").unwrap();
    store
        .set(
            USER_DATA_KEY,
            r#"{"id":1,"username":"admin","role":"administrator","name":"Administrator"}"#,
        )
        .unwrap();

    assert!(!gate.check_auth_status());
    assert!(!gate.is_authenticated());
    assert!(gate.current_user().is_none());
}

#[test]
fn test_check_auth_status_treats_empty_user_data_as_missing() {
    let (gate, store) = gate_with_shared_store();
    store.set(AUTH_TOKEN_KEY, "token").unwrap();
    store.set(USER_DATA_KEY, "").unwrap();

    assert!(!gate.check_auth_status());
    assert!(!gate.is_authenticated());
    // Nothing was malformed, so nothing is cleared
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("token"));
}

#[test]
fn test_check_auth_status_restores_user() {
    let (gate, store) = gate_with_shared_store();
    store.set(AUTH_TOKEN_KEY, "token").unwrap();
    store
        .set(
            USER_DATA_KEY,
            r#"{"id":1,"username":"admin","role":"administrator","name":"Administrator"}"#,
        )
        .unwrap();

    assert!(gate.check_auth_status());
    assert!(gate.is_authenticated());
    assert_eq!(gate.current_user().unwrap().username, "admin");
}

#[test]
fn test_malformed_user_data_forces_logout() {
    let (gate, store) = gate_with_shared_store();
    store.set(AUTH_TOKEN_KEY, "token").unwrap();
    store.set(USER_DATA_KEY, "{not json").unwrap();

    assert!(!gate.check_auth_status());
    assert!(!gate.is_authenticated());
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get(USER_DATA_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_session_survives_restart_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let gate = SessionGate::new(
            AdminCredentials::default(),
            Box::new(FileSessionStore::initialize(path.clone())),
        );
        assert!(gate.login("admin", "admin123").await.success);
    }

    let restarted = SessionGate::new(
        AdminCredentials::default(),
        Box::new(FileSessionStore::initialize(path.clone())),
    );
    assert!(!restarted.is_authenticated());
    assert!(restarted.check_auth_status());
    assert_eq!(restarted.current_user().unwrap().role, "administrator");

    restarted.logout();
    let after_logout = SessionGate::new(
        AdminCredentials::default(),
        Box::new(FileSessionStore::initialize(path)),
    );
    assert!(!after_logout.check_auth_status());
}

#[tokio::test(start_paused = true)]
async fn test_login_waits_for_configured_latency() {
    let gate = SessionGate::new(
        AdminCredentials::default(),
        Box::new(InMemorySessionStore::new()),
    )
    .with_latency(phone_catalog::Latency::Realistic);

    let started = tokio::time::Instant::now();
    assert!(gate.login("admin", "admin123").await.success);
    assert!(started.elapsed() >= std::time::Duration::from_millis(1000));
}
