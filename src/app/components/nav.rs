//! Sidebar navigation with the signed-in user and logout.

use dioxus::prelude::*;

use crate::app::{end_session, ConsoleServices, Route};
use crate::session::AuthState;

#[derive(Props, Clone, PartialEq)]
pub struct NavProps {
    /// The currently active page ID (e.g., "dashboard", "team")
    pub active: String,
}

#[component]
pub fn Nav(props: NavProps) -> Element {
    let services = use_context::<ConsoleServices>();
    let auth = use_context::<Signal<AuthState>>();

    let username = auth
        .read()
        .session()
        .and_then(|s| s.username().map(str::to_string))
        .unwrap_or_else(|| "operator".to_string());

    let link_class = |page: &str| {
        if props.active == page {
            "active"
        } else {
            ""
        }
    };

    let logout = move |_| end_session(services.clone(), auth);

    rsx! {
        nav { class: "sidebar",
            h4 { "OSCode Admin" }
            Link { class: link_class("dashboard"), to: Route::Dashboard {}, "Dashboard" }
            Link { class: link_class("team"), to: Route::Team {}, "Team Members" }
            Link { class: link_class("events"), to: Route::Events {}, "Events" }
            Link { class: link_class("contacts"), to: Route::Contacts {}, "Contact Forms" }

            div { class: "session",
                small { "Signed in as {username}" }
                button {
                    class: "secondary outline",
                    style: "width:100%;margin-top:0.5rem;",
                    onclick: logout,
                    "Logout"
                }
            }
        }
    }
}
