//! Dioxus operator console.
//!
//! The root component builds the console services once, provides them as
//! context and gates everything on the session: a spinner while the stored
//! token is checked, the login screen when there is no session, the routed
//! console otherwise.

use dioxus::prelude::*;
use oscode_records::{ContactMessage, DashboardOverview, Event, TeamMember};
use std::sync::Arc;
use tracing::warn;

pub mod components;
pub mod pages;

use crate::api::{AdminApi, ApiResult, CallContext, HttpAdminApi};
use crate::config::ConsoleConfig;
use crate::error::ConsoleResult;
use crate::resource::ResourceController;
use crate::session::{default_token_store, AuthState, SessionContext, SessionManager, TokenStore};
use crate::upload::UploadAdapter;

use pages::{Contacts, Dashboard, Events, Login, Team};

/// Everything a screen needs to talk to the admin API.
#[derive(Clone)]
pub struct ConsoleServices {
    pub config: ConsoleConfig,
    pub sessions: Arc<SessionManager>,
    pub team: Arc<ResourceController<TeamMember>>,
    pub events: Arc<ResourceController<Event>>,
    pub contacts: Arc<ResourceController<ContactMessage>>,
    pub uploads: Arc<UploadAdapter>,
    api: Arc<dyn AdminApi>,
}

impl ConsoleServices {
    /// HTTP client and platform token storage for `config`.
    pub fn new(config: ConsoleConfig) -> ApiResult<Self> {
        let api: Arc<dyn AdminApi> = Arc::new(HttpAdminApi::new(&config)?);
        let store = default_token_store(&config);
        Ok(Self::with_api(config, api, store))
    }

    pub fn with_api(
        config: ConsoleConfig,
        api: Arc<dyn AdminApi>,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new(api.clone(), store)),
            team: Arc::new(ResourceController::new(api.clone())),
            events: Arc::new(ResourceController::new(api.clone())),
            contacts: Arc::new(ResourceController::new(api.clone())),
            uploads: Arc::new(UploadAdapter::new(api.clone())),
            config,
            api,
        }
    }

    /// Fresh context with the configured deadline.
    pub fn call_context(&self) -> CallContext {
        CallContext::new(self.config.request_timeout())
    }

    pub async fn dashboard(&self, session: &SessionContext) -> ConsoleResult<DashboardOverview> {
        let ctx = self.call_context();
        Ok(self.api.dashboard(session.token(), &ctx).await?)
    }
}

impl PartialEq for ConsoleServices {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.sessions, &other.sessions)
    }
}

/// End the session: state and stored token are cleared before this returns,
/// the server is told in the background. Used by the logout button and
/// whenever a call comes back with an auth failure.
pub fn end_session(services: ConsoleServices, mut auth: Signal<AuthState>) {
    let token = services.sessions.end_local();
    auth.set(services.sessions.state());

    let Some(token) = token else {
        return;
    };
    // Outlives the console screens that are about to unmount
    dioxus::core::spawn_forever(async move {
        let ctx = services.call_context();
        services.sessions.notify_logout(&token, &ctx).await;
    });
}

fn console_config() -> ConsoleConfig {
    #[cfg(all(feature = "server", not(target_arch = "wasm32")))]
    {
        match crate::config::load_config() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config, using defaults: {}", e);
                ConsoleConfig::default()
            }
        }
    }

    #[cfg(not(all(feature = "server", not(target_arch = "wasm32"))))]
    {
        ConsoleConfig::from_build_env()
    }
}

/// Root app component
#[component]
pub fn App() -> Element {
    let services = use_hook(|| ConsoleServices::new(console_config()).map_err(|e| e.to_string()));

    match services {
        Ok(services) => rsx! {
            Console { services }
        },
        Err(e) => {
            warn!("Console could not start: {}", e);
            rsx! {
                main { class: "container",
                    p { class: "status-err", "Console misconfigured: {e}" }
                }
            }
        }
    }
}

/// Session gate around the routed console
#[component]
fn Console(services: ConsoleServices) -> Element {
    let services = use_context_provider(|| services);
    let mut auth = use_signal(|| AuthState::Restoring);
    use_context_provider(|| auth);

    // Startup: one verify round trip, or none when nothing is stored. The
    // session belongs to the browser, so the server render stays on the
    // spinner and the client restores after hydration.
    use_hook(move || {
        if cfg!(feature = "server") {
            return;
        }
        spawn(async move {
            let ctx = services.call_context();
            let state = services.sessions.restore(&ctx).await;
            auth.set(state);
        });
    });

    let state = auth();
    match state {
        AuthState::Restoring => rsx! {
            main { class: "container",
                div { class: "card p-6", aria_busy: "true", "Checking session..." }
            }
        },
        AuthState::Unauthenticated => rsx! {
            Login {}
        },
        AuthState::Authenticated(_) => rsx! {
            Router::<Route> {}
        },
    }
}

/// Console routes
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Dashboard {},
    #[route("/team")]
    Team {},
    #[route("/events")]
    Events {},
    #[route("/contacts")]
    Contacts {},
}
