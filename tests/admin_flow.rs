//! End-to-end flows: HTTP client, session manager and controllers against
//! the in-memory admin API on an ephemeral port.

#![cfg(feature = "server")]

use oscode_admin::api::{AdminApi, CallContext, HttpAdminApi};
use oscode_admin::config::{ConsoleConfig, MockServerConfig};
use oscode_admin::error::ConsoleError;
use oscode_admin::form::{FormMachine, FormState};
use oscode_admin::mock_server;
use oscode_admin::resource::{Mutation, ResourceController};
use oscode_admin::session::{AuthState, FileTokenStore, MemoryTokenStore, SessionManager, TokenStore};
use oscode_admin::upload::{ImageAsset, UploadAdapter};
use oscode_records::{ContactMessage, Event, TeamMember};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const PASSWORD: &str = "oscode2024";

fn ctx() -> CallContext {
    CallContext::new(Duration::from_secs(5))
}

async fn start(config: MockServerConfig) -> String {
    let (addr, _handle) = mock_server::spawn(SocketAddr::from(([127, 0, 0, 1], 0)), config)
        .await
        .unwrap();
    format!("http://{}", addr)
}

fn client(base_url: &str) -> Arc<dyn AdminApi> {
    let config = ConsoleConfig {
        api_base_url: base_url.to_string(),
        request_timeout_secs: 5,
        ..Default::default()
    };
    Arc::new(HttpAdminApi::new(&config).unwrap())
}

/// Base URL nothing is listening on
fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn new_member() -> TeamMember {
    TeamMember {
        name: "A".to_string(),
        role: "B".to_string(),
        year: "1st Year".to_string(),
        department: "D".to_string(),
        bio: "bio".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_wrong_password_stores_nothing() {
    let base = start(MockServerConfig::default()).await;
    let store = Arc::new(MemoryTokenStore::new());
    let sessions = SessionManager::new(client(&base), store.clone());

    let err = sessions.login("admin", "wrong", &ctx()).await.unwrap_err();

    assert_eq!(err, ConsoleError::Auth("Invalid credentials".to_string()));
    assert_eq!(store.load().unwrap(), None);
    assert!(!sessions.state().is_authenticated());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let base = start(MockServerConfig::default()).await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("admin_session.token");

    let first = SessionManager::new(client(&base), Arc::new(FileTokenStore::new(&path)));
    let session = first.login("admin", PASSWORD, &ctx()).await.unwrap();
    assert_eq!(session.username(), Some("admin"));

    // New process, same token file
    let second = SessionManager::new(client(&base), Arc::new(FileTokenStore::new(&path)));
    match second.restore(&ctx()).await {
        AuthState::Authenticated(restored) => {
            assert_eq!(restored.token(), session.token());
            assert_eq!(restored.username(), Some("admin"));
        }
        other => panic!("expected a restored session, got {:?}", other),
    }

    // After logout the token is gone on both ends
    second.logout(&ctx()).await;
    assert!(!path.exists());
    let third = SessionManager::new(client(&base), Arc::new(MemoryTokenStore::with_token(session.token())));
    assert_eq!(third.restore(&ctx()).await, AuthState::Unauthenticated);
}

#[tokio::test]
async fn test_member_lifecycle() {
    let base = start(MockServerConfig::default()).await;
    let api = client(&base);
    let sessions = SessionManager::new(api.clone(), Arc::new(MemoryTokenStore::new()));
    let session = sessions.login("president", PASSWORD, &ctx()).await.unwrap();
    let team = ResourceController::<TeamMember>::new(api.clone());

    // Create through the form
    let mut form = FormMachine::<TeamMember>::new();
    form.open_create();
    for (field, value) in [
        ("name", "A"),
        ("role", "B"),
        ("year", "1st Year"),
        ("department", "D"),
        ("bio", "bio"),
    ] {
        assert!(form.set_field(field, value));
    }
    let collection = form.submit(&team, &session, &ctx()).await.unwrap();
    assert_eq!(*form.state(), FormState::Closed);
    assert_eq!(collection.len(), 1);

    let created = collection.items[0].clone();
    let id = created.id.clone().expect("server assigns an id");
    assert_eq!(created.name, "A");
    assert!(created.created_at.is_some());

    // Edit it
    form.open_edit(&created).unwrap();
    form.set_field("role", "Treasurer");
    let collection = form.submit(&team, &session, &ctx()).await.unwrap();
    let updated = collection.find(&id).unwrap();
    assert_eq!(updated.role, "Treasurer");
    assert_eq!(updated.created_at, created.created_at);

    // Delete it
    let collection = team
        .commit(&session, Mutation::Delete { id: id.clone() }, &ctx())
        .await
        .unwrap();
    assert!(collection.find(&id).is_none());
    assert!(collection.is_empty());

    // Deleting again is a server failure, not an auth one
    let err = team.delete(&session, &id, &ctx()).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Network(_)));
}

#[tokio::test]
async fn test_upload_fills_image_field() {
    let base = start(MockServerConfig::default()).await;
    let api = client(&base);
    let sessions = SessionManager::new(api.clone(), Arc::new(MemoryTokenStore::new()));
    let session = sessions.login("admin", PASSWORD, &ctx()).await.unwrap();
    let uploads = UploadAdapter::new(api.clone());

    let mut form = FormMachine::<TeamMember>::new();
    form.open_edit(&TeamMember {
        id: Some("m-1".to_string()),
        ..new_member()
    })
    .unwrap();

    let ticket = form.begin_upload().unwrap();
    let asset = ImageAsset::new("avatar.png", "image/png", vec![0x89, b'P', b'N', b'G']);
    let result = uploads.upload(&asset, &session, &ctx()).await;
    assert!(form.apply_upload(ticket, result));

    let path = form.draft().unwrap().image_url.clone().unwrap();
    assert!(path.starts_with("/uploads/"));
    assert!(path.ends_with(".png"));
    assert_eq!(form.draft().unwrap().name, "A");

    // The stored file is served back
    let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        "image/png"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), &[0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_server_refuses_non_image_upload() {
    let base = start(MockServerConfig::default()).await;
    let api = client(&base);
    let session = SessionManager::new(api.clone(), Arc::new(MemoryTokenStore::new()))
        .login("admin", PASSWORD, &ctx())
        .await
        .unwrap();

    // Bypass the adapter's local check
    let asset = ImageAsset::new("notes.pdf", "application/pdf", b"%PDF-1.4".to_vec());
    let err = api
        .upload_image(session.token(), &asset, &ctx())
        .await
        .unwrap_err();
    let err = ConsoleError::from(err);
    assert!(matches!(err, ConsoleError::Network(_)));
    assert!(err.to_string().contains("400"));
}

#[tokio::test]
async fn test_expired_session_is_auth_failure() {
    let base = start(MockServerConfig {
        session_ttl_secs: 0,
        ..Default::default()
    })
    .await;
    let api = client(&base);
    let sessions = SessionManager::new(api.clone(), Arc::new(MemoryTokenStore::new()));
    let session = sessions.login("admin", PASSWORD, &ctx()).await.unwrap();

    let events = ResourceController::<Event>::new(api.clone());
    let err = events.list(&session, &ctx()).await.unwrap_err();
    assert!(err.is_auth());

    // And verification fails closed
    assert_eq!(
        sessions.verify(session.token(), &ctx()).await,
        AuthState::Unauthenticated
    );
}

#[tokio::test]
async fn test_logout_clears_even_when_server_is_down() {
    let base = start(MockServerConfig::default()).await;
    let store = Arc::new(MemoryTokenStore::new());
    SessionManager::new(client(&base), store.clone())
        .login("admin", PASSWORD, &ctx())
        .await
        .unwrap();
    assert!(store.load().unwrap().is_some());

    let offline = SessionManager::new(client(&unreachable_url()), store.clone());
    offline.logout(&ctx()).await;

    assert_eq!(store.load().unwrap(), None);
    assert_eq!(offline.state(), AuthState::Unauthenticated);
}

#[tokio::test]
async fn test_contacts_from_public_site() {
    let base = start(MockServerConfig::default()).await;
    let http = reqwest::Client::new();
    let response = http
        .post(format!("{}/api/contact", base))
        .json(&serde_json::json!({
            "name": "Grace",
            "email": "grace@example.org",
            "subject": "Sponsorship",
            "message": "Hello!"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let api = client(&base);
    let session = SessionManager::new(api.clone(), Arc::new(MemoryTokenStore::new()))
        .login("admin", PASSWORD, &ctx())
        .await
        .unwrap();
    let contacts = ResourceController::<ContactMessage>::new(api.clone());

    let collection = contacts.list(&session, &ctx()).await.unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.items[0].form_type, "general");

    let overview = api.dashboard(session.token(), &ctx()).await.unwrap();
    assert_eq!(overview.stats.total_contacts, 1);
    assert_eq!(overview.recent_contacts[0].subject, "Sponsorship");

    let id = collection.items[0].id.clone().unwrap();
    let collection = contacts
        .commit(&session, Mutation::Delete { id }, &ctx())
        .await
        .unwrap();
    assert!(collection.is_empty());
}

#[tokio::test]
async fn test_public_listing_hides_inactive_events() {
    let base = start(MockServerConfig::default()).await;
    let api = client(&base);
    let session = SessionManager::new(api.clone(), Arc::new(MemoryTokenStore::new()))
        .login("admin", PASSWORD, &ctx())
        .await
        .unwrap();
    let events = ResourceController::<Event>::new(api.clone());

    for (title, active) in [("Rust 101", true), ("Archived", false)] {
        let event = Event {
            title: title.to_string(),
            description: "Intro session".to_string(),
            date: "2024-03-01".to_string(),
            time: "17:00".to_string(),
            venue: "Lab 2".to_string(),
            is_active: active,
            ..Default::default()
        };
        events.create(&session, &event, &ctx()).await.unwrap();
    }

    let public: Vec<Event> = reqwest::get(format!("{}/api/events", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].title, "Rust 101");

    let overview = api.dashboard(session.token(), &ctx()).await.unwrap();
    assert_eq!(overview.stats.total_events, 2);
    assert_eq!(overview.stats.active_events, 1);
}
