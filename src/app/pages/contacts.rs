//! Contact form inbox: read and delete only.

use dioxus::prelude::*;
use oscode_records::ContactMessage;

use super::records::{use_records, RecordsScreen};
use crate::app::components::{Layout, Modal};

#[component]
pub fn Contacts() -> Element {
    let screen = use_records::<ContactMessage>(|services| services.contacts.clone());
    let mut viewing = use_signal(|| None::<ContactMessage>);
    let rows: Vec<(String, ContactMessage)> = screen
        .collection
        .read()
        .items
        .iter()
        .map(|message| (message.id.clone().unwrap_or_default(), message.clone()))
        .collect();

    rsx! {
        Layout {
            title: "Contact Forms".to_string(),
            nav_active: "contacts".to_string(),

            div { class: "page-header",
                h1 { "Contact Forms" }
                button { class: "secondary outline", onclick: move |_| screen.refresh(), "Refresh" }
            }

            if let Some(banner) = screen.status_banner("No contact forms yet.") {
                {banner}
            } else {
                table {
                    thead {
                        tr {
                            th { "Name" }
                            th { "Email" }
                            th { "Subject" }
                            th { "Type" }
                            th { "Received" }
                            th {}
                        }
                    }
                    tbody {
                        for (key, message) in rows {
                            ContactRow {
                                key: "{key}",
                                message,
                                screen,
                                on_view: move |message| viewing.set(Some(message)),
                            }
                        }
                    }
                }
            }

            if let Some(message) = viewing() {
                Modal {
                    title: message.subject.clone(),
                    on_close: move |_| viewing.set(None),
                    p { strong { "{message.name}" } {format!(" <{}>", message.email)} }
                    p { style: "white-space:pre-wrap;", "{message.message}" }
                }
            }

            {screen.delete_modal()}
        }
    }
}

#[component]
fn ContactRow(
    message: ContactMessage,
    screen: RecordsScreen<ContactMessage>,
    on_view: EventHandler<ContactMessage>,
) -> Element {
    let id = message.id.clone().unwrap_or_default();
    let record = message.clone();
    let received = message
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    rsx! {
        tr {
            td { "{message.name}" }
            td { "{message.email}" }
            td { "{message.subject}" }
            td { "{message.form_type}" }
            td { "{received}" }
            td {
                div { class: "row-actions",
                    button {
                        class: "secondary outline",
                        onclick: move |_| on_view.call(record.clone()),
                        "View"
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
