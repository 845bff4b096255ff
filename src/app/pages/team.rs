//! Team roster management.

use dioxus::prelude::*;
use oscode_records::TeamMember;

use super::records::{use_records, RecordsScreen};
use crate::app::components::Layout;
use crate::app::ConsoleServices;

#[component]
pub fn Team() -> Element {
    let screen = use_records::<TeamMember>(|services| services.team.clone());
    let config = use_context::<ConsoleServices>().config;
    let rows: Vec<(String, Option<String>, TeamMember)> = screen
        .collection
        .read()
        .items
        .iter()
        .map(|member| {
            let key = member.id.clone().unwrap_or_default();
            let image = member.image_url.as_deref().map(|path| config.asset_url(path));
            (key, image, member.clone())
        })
        .collect();

    rsx! {
        Layout {
            title: "Team".to_string(),
            nav_active: "team".to_string(),

            div { class: "page-header",
                h1 { "Team Members" }
                button { onclick: move |_| screen.open_create(), "Add Member" }
            }

            if let Some(banner) = screen.status_banner("No team members yet.") {
                {banner}
            } else {
                table {
                    thead {
                        tr {
                            th {}
                            th { "Name" }
                            th { "Role" }
                            th { "Year" }
                            th { "Department" }
                            th { "Status" }
                            th {}
                        }
                    }
                    tbody {
                        for (key, image, member) in rows {
                            MemberRow { key: "{key}", member, image, screen }
                        }
                    }
                }
            }

            {screen.form_modal()}
            {screen.delete_modal()}
        }
    }
}

#[component]
fn MemberRow(
    member: TeamMember,
    image: Option<String>,
    screen: RecordsScreen<TeamMember>,
) -> Element {
    let id = member.id.clone().unwrap_or_default();
    let record = member.clone();

    rsx! {
        tr {
            td {
                if let Some(src) = image {
                    img { class: "avatar", src: "{src}", alt: "{member.name}" }
                }
            }
            td { "{member.name}" }
            td { "{member.role}" }
            td { "{member.year}" }
            td { "{member.department}" }
            td {
                if member.is_active {
                    span { class: "status-ok", "Active" }
                } else {
                    span { class: "status-disabled", "Hidden" }
                }
            }
            td {
                div { class: "row-actions",
                    button {
                        class: "secondary outline",
                        onclick: move |_| screen.open_edit(record.clone()),
                        "Edit"
                    }
                    button {
                        class: "contrast outline",
                        onclick: move |_| screen.ask_delete(id.clone()),
                        "Delete"
                    }
                }
            }
        }
    }
}
