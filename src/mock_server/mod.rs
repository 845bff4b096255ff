//! In-memory stand-in for the remote admin API.
//!
//! Speaks the same contract as the real service: token sessions with a fixed
//! lifetime, per-kind collections with server-assigned ids, multipart image
//! upload. Used for local development (`mock-admin-api`) and by the
//! integration tests, which bind it to an ephemeral port.

mod handlers;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::MockServerConfig;
use crate::resource::ResourceKind;

/// Largest accepted upload body
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Store {
    sessions: HashMap<String, Session>,
    collections: HashMap<ResourceKind, Vec<Value>>,
    /// stored file name -> bytes
    uploads: HashMap<String, Vec<u8>>,
}

/// Shared server state
#[derive(Clone)]
pub struct MockState {
    config: Arc<MockServerConfig>,
    store: Arc<RwLock<Store>>,
}

impl MockState {
    pub fn new(config: MockServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(Store::default())),
        }
    }

    fn check_password(&self, username: &str, password: &str) -> bool {
        self.config
            .credentials
            .get(username)
            .is_some_and(|expected| expected == password)
    }

    async fn open_session(&self, username: &str) -> String {
        let token = new_token();
        let session = Session {
            username: username.to_string(),
            expires_at: Utc::now() + Duration::seconds(self.config.session_ttl_secs as i64),
        };
        self.store
            .write()
            .await
            .sessions
            .insert(token.clone(), session);
        token
    }

    /// Username behind `token`, if the session exists and has not expired.
    /// Expired sessions are dropped on the way.
    async fn session_user(&self, token: &str) -> Option<String> {
        let mut store = self.store.write().await;
        let now = Utc::now();
        store.sessions.retain(|_, session| session.expires_at > now);
        store.sessions.get(token).map(|s| s.username.clone())
    }

    async fn close_session(&self, token: &str) -> bool {
        self.store.write().await.sessions.remove(token).is_some()
    }
}

/// 32 random bytes, URL-safe base64
fn new_token() -> String {
    URL_SAFE_NO_PAD.encode(rand::random::<[u8; 32]>())
}

/// 12 random bytes, hex; same width as a document-store object id
fn new_id() -> String {
    hex::encode(rand::random::<[u8; 12]>())
}

/// Build the router over `state`.
pub fn router(state: MockState) -> Router {
    Router::new()
        // Admin auth
        .route("/api/admin/login", post(handlers::login))
        .route("/api/admin/verify", get(handlers::verify))
        .route("/api/admin/logout", post(handlers::logout))
        // Admin resources
        .route(
            "/api/admin/upload-image",
            post(handlers::upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/admin/dashboard-stats", get(handlers::dashboard))
        .route(
            "/api/admin/{resource}",
            get(handlers::list).post(handlers::create),
        )
        .route(
            "/api/admin/{resource}/{id}",
            put(handlers::update).delete(handlers::delete),
        )
        // Public site
        .route("/api/team-members", get(handlers::public_team))
        .route("/api/events", get(handlers::public_events))
        .route("/api/contact", post(handlers::submit_contact))
        .route("/uploads/{name}", get(handlers::serve_upload))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and start serving in the background.
pub async fn spawn(
    addr: SocketAddr,
    config: MockServerConfig,
) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    let app = router(MockState::new(config));

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Mock admin API stopped: {}", e);
        }
    });
    info!("Mock admin API listening on {}", local);
    Ok((local, handle))
}

/// Serve on `0.0.0.0:{port}` until the process exits.
pub async fn serve(config: MockServerConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Mock admin API listening on {}", addr);
    axum::serve(listener, router(MockState::new(config))).await?;
    Ok(())
}
