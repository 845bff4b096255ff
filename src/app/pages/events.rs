//! Event management.

use dioxus::prelude::*;
use oscode_records::Event;

use super::records::{use_records, RecordsScreen};
use crate::app::components::Layout;

#[component]
pub fn Events() -> Element {
    let screen = use_records::<Event>(|services| services.events.clone());
    let rows: Vec<(String, Event)> = screen
        .collection
        .read()
        .items
        .iter()
        .map(|event| (event.id.clone().unwrap_or_default(), event.clone()))
        .collect();

    rsx! {
        Layout {
            title: "Events".to_string(),
            nav_active: "events".to_string(),

            div { class: "page-header",
                h1 { "Events" }
                button { onclick: move |_| screen.open_create(), "Add Event" }
            }

            if let Some(banner) = screen.status_banner("No events yet.") {
                {banner}
            } else {
                table {
                    thead {
                        tr {
                            th { "Title" }
                            th { "Date" }
                            th { "Time" }
                            th { "Venue" }
                            th { "Type" }
                            th { "Status" }
                            th {}
                        }
                    }
                    tbody {
                        for (key, event) in rows {
                            EventRow { key: "{key}", event, screen }
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
fn EventRow(event: Event, screen: RecordsScreen<Event>) -> Element {
    let id = event.id.clone().unwrap_or_default();
    let record = event.clone();
    let kind = event.event_type.label().to_string();

    rsx! {
        tr {
            td { "{event.title}" }
            td { "{event.date}" }
            td { "{event.time}" }
            td { "{event.venue}" }
            td { "{kind}" }
            td {
                if event.is_active {
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
