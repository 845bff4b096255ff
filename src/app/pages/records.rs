//! Screen state shared by the record pages: the server snapshot, the
//! create/edit form and the delete confirmation, each bound to one
//! [`ResourceController`].

use dioxus::prelude::*;
use std::sync::Arc;
use tracing::debug;

use crate::app::components::{FieldEntry, Modal, ResourceForm};
use crate::app::{end_session, ConsoleServices};
use crate::error::ConsoleError;
use crate::form::{FormMachine, FormState};
use crate::resource::{Collection, FieldKind, FieldValue, Mutation, Resource, ResourceController};
use crate::session::{AuthState, SessionContext};
use crate::upload::ImageAsset;

/// Signals behind one record page. Copy, so event handlers can capture it.
pub struct RecordsScreen<R: Resource> {
    pub collection: Signal<Collection<R>>,
    pub loading: Signal<bool>,
    pub error: Signal<Option<String>>,
    pub form: Signal<FormMachine<R>>,
    /// Id awaiting delete confirmation
    pub pending_delete: Signal<Option<String>>,
    controller: Signal<Arc<ResourceController<R>>>,
    services: Signal<ConsoleServices>,
    auth: Signal<AuthState>,
}

impl<R: Resource> Clone for RecordsScreen<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Resource> Copy for RecordsScreen<R> {}

impl<R: Resource> PartialEq for RecordsScreen<R> {
    fn eq(&self, other: &Self) -> bool {
        self.collection == other.collection && self.form == other.form
    }
}

/// Bind a page to the controller `select` picks and load the collection
/// once on mount.
pub fn use_records<R: Resource>(
    select: fn(&ConsoleServices) -> Arc<ResourceController<R>>,
) -> RecordsScreen<R> {
    let services = use_context::<ConsoleServices>();
    let auth = use_context::<Signal<AuthState>>();
    let controller = use_signal(|| select(&services));
    let services = use_signal(move || services);

    let screen = RecordsScreen {
        collection: use_signal(Collection::default),
        loading: use_signal(|| false),
        error: use_signal(|| None),
        form: use_signal(FormMachine::new),
        pending_delete: use_signal(|| None),
        controller,
        services,
        auth,
    };

    use_hook(move || screen.refresh());
    screen
}

impl<R: Resource> RecordsScreen<R> {
    fn session(&self) -> Option<SessionContext> {
        self.auth.peek().session().cloned()
    }

    fn services(&self) -> ConsoleServices {
        self.services.peek().clone()
    }

    fn controller(&self) -> Arc<ResourceController<R>> {
        self.controller.peek().clone()
    }

    /// Auth failures end the session; anything else is shown inline.
    fn fail(mut self, err: ConsoleError) {
        match err {
            ConsoleError::Cancelled => {}
            err if err.is_auth() => end_session(self.services(), self.auth),
            err => self.error.set(Some(err.user_message())),
        }
    }

    /// Replace the displayed collection with a fresh server snapshot.
    pub fn refresh(self) {
        let Some(session) = self.session() else {
            return;
        };
        let mut this = self;

        spawn(async move {
            this.loading.set(true);
            let ctx = this.services().call_context();
            match this.controller().list(&session, &ctx).await {
                Ok(collection) => {
                    this.collection.set(collection);
                    this.error.set(None);
                }
                Err(e) => this.fail(e),
            }
            this.loading.set(false);
        });
    }

    pub fn open_create(mut self) {
        self.form.write().open_create();
    }

    pub fn open_edit(mut self, record: R) {
        if let Err(e) = self.form.write().open_edit(&record) {
            self.error.set(Some(e.to_string()));
        }
    }

    pub fn set_field(mut self, field: &str, value: FieldValue) {
        self.form.write().set_field(field, value);
    }

    /// Close button, overlay click or Cancel.
    pub fn cancel_form(mut self) {
        self.form.write().cancel();
    }

    /// Validate, send, then refetch on success. A stale completion (form
    /// cancelled meanwhile) changes nothing.
    pub fn submit(self) {
        let Some(session) = self.session() else {
            return;
        };
        let mut this = self;
        let ticket = match this.form.write().begin_submit() {
            Ok(ticket) => ticket,
            Err(e) => {
                debug!(kind = %R::KIND, "Submit not started: {}", e);
                return;
            }
        };

        spawn(async move {
            let deadline = this.services().config.request_timeout();
            let outcome = ticket.send(&this.controller(), &session, deadline).await;
            let current = this.form.write().finish_submit(ticket, outcome.clone());

            match outcome {
                Ok(()) => this.refresh(),
                Err(e) if current && e.is_auth() => this.fail(e),
                Err(_) => {}
            }
        });
    }

    /// Upload a picked image into the open draft. Failures only leave a
    /// notice on the form; a result for a draft closed meanwhile is dropped.
    pub fn upload(self, asset: ImageAsset) {
        let Some(session) = self.session() else {
            return;
        };
        let Some(ticket) = self.form.read().begin_upload() else {
            return;
        };
        let mut this = self;

        spawn(async move {
            let services = this.services();
            let ctx = services.call_context();
            let result = services.uploads.upload(&asset, &session, &ctx).await;
            this.form.write().apply_upload(ticket, result);
        });
    }

    pub fn ask_delete(mut self, id: String) {
        self.pending_delete.set(Some(id));
    }

    pub fn cancel_delete(mut self) {
        self.pending_delete.set(None);
    }

    /// Confirmed: delete, then show the refetched collection.
    pub fn confirm_delete(self) {
        let mut this = self;
        let Some(id) = this.pending_delete.write().take() else {
            return;
        };
        let Some(session) = self.session() else {
            return;
        };

        spawn(async move {
            let ctx = this.services().call_context();
            match this
                .controller()
                .commit(&session, Mutation::Delete { id }, &ctx)
                .await
            {
                Ok(collection) => {
                    this.collection.set(collection);
                    this.error.set(None);
                }
                Err(e) => this.fail(e),
            }
        });
    }

    /// The create/edit modal, when open.
    pub fn form_modal(self) -> Element {
        let form = self.form.read();
        let Some(draft) = form.draft() else {
            return rsx! {};
        };
        let config = self.services.read().config.clone();

        let title = match form.state() {
            FormState::OpenCreate
            | FormState::Submitting {
                target: crate::form::SubmitTarget::Create,
            } => format!("Add {}", R::KIND.label()),
            _ => format!("Edit {}", R::KIND.label()),
        };

        let fields: Vec<FieldEntry> = R::fields()
            .iter()
            .map(|spec| {
                let value = draft
                    .get(spec.name)
                    .unwrap_or_else(|| FieldValue::Text(String::new()));
                let preview = match (&spec.kind, &value) {
                    (FieldKind::Image, FieldValue::Text(path)) if !path.is_empty() => {
                        Some(config.asset_url(path))
                    }
                    _ => None,
                };
                FieldEntry {
                    spec: *spec,
                    value,
                    preview,
                }
            })
            .collect();

        let error = form.error().map(str::to_string);
        let upload_notice = form.upload_notice().map(str::to_string);
        let submitting = form.is_submitting();
        drop(form);

        rsx! {
            ResourceForm {
                title,
                fields,
                error,
                upload_notice,
                submitting,
                on_change: move |(field, value): (&'static str, FieldValue)| self.set_field(field, value),
                on_upload: move |asset| self.upload(asset),
                on_submit: move |_| self.submit(),
                on_close: move |_| self.cancel_form(),
            }
        }
    }

    /// The delete confirmation, when one is pending.
    pub fn delete_modal(self) -> Element {
        if self.pending_delete.read().is_none() {
            return rsx! {};
        }
        let label = R::KIND.label();

        rsx! {
            Modal {
                title: "Confirm delete".to_string(),
                on_close: move |_| self.cancel_delete(),
                p { "Are you sure you want to delete this {label}?" }
                div { class: "row-actions", style: "justify-content:flex-end;",
                    button {
                        class: "secondary outline",
                        onclick: move |_| self.cancel_delete(),
                        "Cancel"
                    }
                    button {
                        class: "contrast",
                        onclick: move |_| self.confirm_delete(),
                        "Delete"
                    }
                }
            }
        }
    }

    /// Error banner and loading/empty states above a table.
    pub fn status_banner(self, empty_text: &str) -> Option<Element> {
        let error = self.error.read().clone();
        let collection = self.collection.read();

        if let Some(err) = error {
            return Some(rsx! {
                p { class: "status-err", "{err}" }
            });
        }
        if collection.is_unloaded() {
            return Some(rsx! {
                div { aria_busy: "true", "Loading..." }
            });
        }
        if collection.is_empty() {
            return Some(rsx! {
                p { class: "status-disabled", "{empty_text}" }
            });
        }
        None
    }
}
