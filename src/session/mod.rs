//! Session Manager
//!
//! Owns the session token: restores it from persistent storage at startup,
//! verifies it once against the server, issues it on login and destroys it on
//! logout. The authenticated [`SessionContext`] is handed explicitly to every
//! component that makes authenticated requests.
//!
//! Failure handling:
//! - `verify`: any failure (bad token, network, timeout) is final and
//!   fail-closed. The stored token is discarded, no retry.
//! - `login`: failures are returned for the login screen to show.
//! - `logout`: never fails. [`SessionManager::end_local`] clears the state
//!   and the stored token synchronously; the server is told afterwards.
//!
//! The UI mirrors [`SessionManager::state`] and never sets auth state of its
//! own.

pub mod store;

pub use store::{default_token_store, MemoryTokenStore, TokenStore, TokenStoreError};

#[cfg(feature = "server")]
pub use store::FileTokenStore;

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageTokenStore;

use oscode_records::LoginRequest;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

use crate::api::{AdminApi, ApiError, CallContext};
use crate::error::{ConsoleError, ConsoleResult};

/// Proof of a verified login, passed to every authenticated call.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    token: String,
    username: Option<String>,
}

impl SessionContext {
    pub fn new(token: impl Into<String>, username: Option<String>) -> Self {
        Self {
            token: token.into(),
            username,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

// Keep tokens out of logs.
impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

/// Where the console stands with respect to authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Startup: the stored token (if any) has not been checked yet
    Restoring,
    Unauthenticated,
    Authenticated(SessionContext),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&SessionContext> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

pub struct SessionManager {
    api: Arc<dyn AdminApi>,
    store: Arc<dyn TokenStore>,
    state: RwLock<AuthState>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn AdminApi>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(AuthState::Restoring),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The active session, if authenticated.
    pub fn current(&self) -> Option<SessionContext> {
        self.state().session().cloned()
    }

    fn set_state(&self, next: AuthState) -> AuthState {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        next
    }

    /// Startup: pick up a stored token and verify it. With nothing stored
    /// this makes no network call.
    pub async fn restore(&self, ctx: &CallContext) -> AuthState {
        let stored = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read stored session: {}", e);
                None
            }
        };

        match stored {
            Some(token) => self.verify(&token, ctx).await,
            None => {
                info!("No stored session");
                self.set_state(AuthState::Unauthenticated)
            }
        }
    }

    /// One round trip to check `token`. Anything but success discards the
    /// stored token and leaves the console unauthenticated.
    pub async fn verify(&self, token: &str, ctx: &CallContext) -> AuthState {
        match self.api.verify(token, ctx).await {
            Ok(username) => {
                info!(user = ?username, "Session verified");
                self.set_state(AuthState::Authenticated(SessionContext::new(token, username)))
            }
            Err(e) => {
                warn!("Session verification failed: {}", e);
                self.discard_stored_token();
                self.set_state(AuthState::Unauthenticated)
            }
        }
    }

    /// Check credentials; on success persist the token and become
    /// authenticated. On failure nothing is stored and the state is
    /// unchanged.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        ctx: &CallContext,
    ) -> ConsoleResult<SessionContext> {
        let credentials = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .api
            .login(&credentials, ctx)
            .await
            .map_err(|e| {
                warn!(user = username, "Login failed: {}", e);
                login_error(e)
            })?;

        if let Err(e) = self.store.save(&response.session_id) {
            // The session still works for this run; it just won't survive a reload.
            warn!("Could not persist session: {}", e);
        }

        let session = SessionContext::new(
            response.session_id,
            response.username.or_else(|| Some(username.to_string())),
        );
        info!(user = username, "Logged in");
        self.set_state(AuthState::Authenticated(session.clone()));
        Ok(session)
    }

    /// Clear the stored token and local state, then tell the server
    /// (best-effort, result ignored).
    pub async fn logout(&self, ctx: &CallContext) {
        if let Some(token) = self.end_local() {
            self.notify_logout(&token, ctx).await;
        }
    }

    /// Local half of logout. State and stored token are gone when this
    /// returns; the token that was in use is handed back for
    /// [`Self::notify_logout`].
    pub fn end_local(&self) -> Option<String> {
        let previous = std::mem::replace(
            &mut *self.state.write().unwrap_or_else(PoisonError::into_inner),
            AuthState::Unauthenticated,
        );
        let token = match previous {
            AuthState::Authenticated(session) => Some(session.token),
            _ => self.store.load().ok().flatten(),
        };
        self.discard_stored_token();
        info!("Logged out");
        token
    }

    /// Tell the server `token` is finished. Failures are logged and dropped.
    pub async fn notify_logout(&self, token: &str, ctx: &CallContext) {
        if let Err(e) = self.api.logout(token, ctx).await {
            warn!("Logout notification failed (ignored): {}", e);
        }
    }

    fn discard_stored_token(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Could not clear stored session: {}", e);
        }
    }
}

/// Rejections become the server's message ("Invalid credentials"), or
/// "Login failed" when it sent none.
fn login_error(err: ApiError) -> ConsoleError {
    match err {
        ApiError::Status(status, detail) if status.is_client_error() => {
            if detail.is_empty() {
                ConsoleError::Auth("Login failed".to_string())
            } else {
                ConsoleError::Auth(detail)
            }
        }
        other => other.into(),
    }
}
