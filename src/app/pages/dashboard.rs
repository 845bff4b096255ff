//! Dashboard page component.
//!
//! Collection counts and recent activity from `dashboard-stats`.

use dioxus::prelude::*;
use oscode_records::{ContactMessage, DashboardOverview, Event};

use crate::app::components::Layout;
use crate::app::{end_session, ConsoleServices};
use crate::session::AuthState;

#[component]
pub fn Dashboard() -> Element {
    let services = use_context::<ConsoleServices>();
    let auth = use_context::<Signal<AuthState>>();

    let overview = use_resource({
        let services = services.clone();
        move || {
            let services = services.clone();
            async move {
                let session = auth.peek().session().cloned()?;
                match services.dashboard(&session).await {
                    Ok(overview) => Some(Ok(overview)),
                    Err(e) if e.is_auth() => {
                        end_session(services.clone(), auth);
                        None
                    }
                    Err(e) => Some(Err(e)),
                }
            }
        }
    });

    let content = match overview.read().clone().flatten() {
        None => rsx! {
            div { class: "card p-6", aria_busy: "true", "Loading dashboard..." }
        },
        Some(Err(e)) => {
            let message = e.user_message();
            rsx! {
                p { class: "status-err", "{message}" }
            }
        }
        Some(Ok(overview)) => render_overview(overview),
    };

    rsx! {
        Layout {
            title: "Dashboard".to_string(),
            nav_active: "dashboard".to_string(),

            div { class: "page-header",
                h1 { "Dashboard" }
            }
            {content}
        }
    }
}

fn render_overview(overview: DashboardOverview) -> Element {
    let stats = overview.stats;

    rsx! {
        section { class: "stat-grid",
            StatCard { label: "Total Events", value: stats.total_events }
            StatCard { label: "Active Events", value: stats.active_events }
            StatCard { label: "Team Members", value: stats.total_team_members }
            StatCard { label: "Contact Forms", value: stats.total_contacts }
        }

        div { class: "grid",
            section {
                h3 { "Recent Contact Forms" }
                if overview.recent_contacts.is_empty() {
                    p { class: "status-disabled", "No contact forms yet." }
                }
                for contact in overview.recent_contacts {
                    RecentContact { contact }
                }
            }
            section {
                h3 { "Recent Events" }
                if overview.recent_events.is_empty() {
                    p { class: "status-disabled", "No events yet." }
                }
                for event in overview.recent_events {
                    RecentEvent { event }
                }
            }
        }
    }
}

#[component]
fn StatCard(label: &'static str, value: u64) -> Element {
    rsx! {
        article {
            strong { "{value}" }
            small { "{label}" }
        }
    }
}

#[component]
fn RecentContact(contact: ContactMessage) -> Element {
    rsx! {
        article {
            strong { "{contact.name}" }
            p { style: "margin:0;", "{contact.subject}" }
            small { "{contact.email}" }
        }
    }
}

#[component]
fn RecentEvent(event: Event) -> Element {
    rsx! {
        article {
            strong { "{event.title}" }
            p { style: "margin:0;", "{event.date} at {event.time}" }
            small { "{event.venue}" }
        }
    }
}
