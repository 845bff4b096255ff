//! Form/Modal State Machine
//!
//! ```text
//! Closed ──open_create──▶ OpenCreate ─┐
//!   ▲    ──open_edit────▶ OpenEdit ───┼─begin_submit─▶ Submitting
//!   │                                 ▲                   │
//!   │                                 └──── failure ──────┤
//!   └──────── success / cancel ──────────────────────────┘
//! ```
//!
//! The draft lives here and nowhere else until a submit sends it whole.
//! Submit is split in two so the UI can drop its borrow of the machine while
//! the request is in flight: [`FormMachine::begin_submit`] validates and
//! hands out a [`SubmitTicket`], [`FormMachine::finish_submit`] applies the
//! outcome. Cancelling invalidates the ticket, so a late completion is
//! ignored instead of reopening a closed form.
//!
//! Image uploads work the same way: [`FormMachine::begin_upload`] ties an
//! [`UploadTicket`] to the open draft and [`FormMachine::apply_upload`] drops
//! the result once that draft is gone, even if another one was opened since.

use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::CallContext;
use crate::error::{ConsoleError, ConsoleResult};
use crate::resource::{Collection, FieldValue, Resource, ResourceController};
use crate::session::SessionContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitTarget {
    Create,
    Update { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Closed,
    OpenCreate,
    OpenEdit {
        id: String,
    },
    Submitting {
        target: SubmitTarget,
    },
}

impl FormState {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, FormState::Submitting { .. })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("No form is open")]
    NotOpen,

    #[error("A submit is already in flight")]
    AlreadySubmitting,

    #[error("Record has no id and cannot be edited")]
    MissingId,

    #[error(transparent)]
    Console(#[from] ConsoleError),
}

/// One submit attempt. Only the ticket from the latest `begin_submit` is
/// honoured by `finish_submit`.
#[derive(Debug, Clone)]
pub struct SubmitTicket<R> {
    generation: u64,
    target: SubmitTarget,
    draft: R,
    cancel: CancellationToken,
}

impl<R: Resource> SubmitTicket<R> {
    pub fn target(&self) -> &SubmitTarget {
        &self.target
    }

    /// Snapshot of the draft taken when the submit started
    pub fn draft(&self) -> &R {
        &self.draft
    }

    /// Call context for the request, cancelled when the form is.
    pub fn call_context(&self, deadline: Duration) -> CallContext {
        CallContext::with_cancel(self.cancel.clone(), deadline)
    }

    /// Send the snapshot as a create or update. The held collection is not
    /// refreshed here.
    pub async fn send(
        &self,
        controller: &ResourceController<R>,
        session: &SessionContext,
        deadline: Duration,
    ) -> ConsoleResult<()> {
        let ctx = self.call_context(deadline);
        match &self.target {
            SubmitTarget::Create => controller
                .create(session, &self.draft, &ctx)
                .await
                .map(|_| ()),
            SubmitTarget::Update { id } => {
                controller.update(session, id, &self.draft, &ctx).await
            }
        }
    }
}

/// One image upload, bound to the draft that was open when it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    draft_epoch: u64,
}

/// Modal create/edit form for one resource kind.
#[derive(Debug, Clone)]
pub struct FormMachine<R> {
    state: FormState,
    draft: Option<R>,
    error: Option<String>,
    upload_notice: Option<String>,
    generation: u64,
    /// Bumped whenever a draft is opened or dropped
    draft_epoch: u64,
    in_flight: Option<CancellationToken>,
}

impl<R> Default for FormMachine<R> {
    fn default() -> Self {
        Self {
            state: FormState::Closed,
            draft: None,
            error: None,
            upload_notice: None,
            generation: 0,
            draft_epoch: 0,
            in_flight: None,
        }
    }
}

impl<R: Resource> FormMachine<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn draft(&self) -> Option<&R> {
        self.draft.as_ref()
    }

    /// Inline submit error, shown while the form is open
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn upload_notice(&self) -> Option<&str> {
        self.upload_notice.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.is_submitting()
    }

    /// Start a new record from defaults.
    pub fn open_create(&mut self) {
        self.abandon_in_flight();
        self.reset_messages();
        self.draft_epoch += 1;
        self.draft = Some(R::default());
        self.state = FormState::OpenCreate;
        debug!(kind = %R::KIND, "Form opened for create");
    }

    /// Edit a copy of `record`, every field carried over as-is.
    pub fn open_edit(&mut self, record: &R) -> Result<(), FormError> {
        let id = record.id().ok_or(FormError::MissingId)?.to_string();
        self.abandon_in_flight();
        self.reset_messages();
        self.draft_epoch += 1;
        self.draft = Some(record.clone());
        debug!(kind = %R::KIND, id = %id, "Form opened for edit");
        self.state = FormState::OpenEdit { id };
        Ok(())
    }

    /// Change one draft field. Returns `false` when no draft is open or the
    /// field rejects the value.
    pub fn set_field(&mut self, field: &str, value: impl Into<FieldValue>) -> bool {
        match self.draft.as_mut() {
            Some(draft) => draft.set(field, value.into()),
            None => false,
        }
    }

    /// Validate and move to `Submitting`. Nothing changes when validation
    /// fails except the inline error.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket<R>, FormError> {
        let target = match &self.state {
            FormState::Closed => return Err(FormError::NotOpen),
            FormState::Submitting { .. } => return Err(FormError::AlreadySubmitting),
            FormState::OpenCreate => SubmitTarget::Create,
            FormState::OpenEdit { id } => SubmitTarget::Update { id: id.clone() },
        };
        let draft = self.draft.as_ref().ok_or(FormError::NotOpen)?;

        if let Some(spec) = draft.missing_required() {
            let err = ConsoleError::Validation { field: spec.label };
            self.error = Some(err.user_message());
            return Err(err.into());
        }

        let draft = draft.clone();
        let cancel = CancellationToken::new();
        self.generation += 1;
        self.in_flight = Some(cancel.clone());
        self.error = None;
        self.state = FormState::Submitting {
            target: target.clone(),
        };

        Ok(SubmitTicket {
            generation: self.generation,
            target,
            draft,
            cancel,
        })
    }

    /// Apply the outcome of `ticket`'s request. Returns `false` when the
    /// ticket is stale (the form was cancelled or reopened meanwhile) and
    /// nothing was changed.
    pub fn finish_submit(&mut self, ticket: SubmitTicket<R>, outcome: ConsoleResult<()>) -> bool {
        if ticket.generation != self.generation || !self.state.is_submitting() {
            debug!(kind = %R::KIND, "Ignoring stale submit result");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(()) => self.close(),
            Err(e) => {
                warn!(kind = %R::KIND, "Submit failed: {}", e);
                self.error = Some(e.user_message());
                self.state = match ticket.target {
                    SubmitTarget::Create => FormState::OpenCreate,
                    SubmitTarget::Update { id } => FormState::OpenEdit { id },
                };
            }
        }
        true
    }

    /// Close button or overlay click: drop the draft whatever the state,
    /// abandoning an in-flight submit.
    pub fn cancel(&mut self) {
        if self.abandon_in_flight() {
            debug!(kind = %R::KIND, "Submit abandoned");
        }
        self.close();
    }

    /// Ticket for an upload into the current draft, `None` when closed.
    pub fn begin_upload(&self) -> Option<UploadTicket> {
        self.draft.as_ref().map(|_| UploadTicket {
            draft_epoch: self.draft_epoch,
        })
    }

    /// Write a finished upload into the draft's image field. A failure
    /// leaves the field as it was and records a notice. Results for a draft
    /// that has since been closed or replaced are dropped.
    pub fn apply_upload(&mut self, ticket: UploadTicket, result: ConsoleResult<String>) -> bool {
        if ticket.draft_epoch != self.draft_epoch {
            debug!(kind = %R::KIND, "Ignoring stale upload result");
            return false;
        }
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        match result {
            Ok(path) => match R::image_field() {
                Some(field) => {
                    self.upload_notice = None;
                    draft.set(field, FieldValue::Text(path))
                }
                None => false,
            },
            Err(e) => {
                self.upload_notice = Some(format!("Image upload failed: {}", e.user_message()));
                false
            }
        }
    }

    /// Submit through `controller` and, on success, refetch.
    ///
    /// The form closes as soon as the write is accepted. A refetch failure
    /// after that is returned but does not reopen the form.
    pub async fn submit(
        &mut self,
        controller: &ResourceController<R>,
        session: &SessionContext,
        ctx: &CallContext,
    ) -> Result<Collection<R>, FormError> {
        let ticket = self.begin_submit()?;
        let outcome = ticket.send(controller, session, ctx.deadline).await;

        self.finish_submit(ticket, outcome.clone());
        outcome?;
        Ok(controller.list(session, ctx).await?)
    }

    fn close(&mut self) {
        self.draft_epoch += 1;
        self.state = FormState::Closed;
        self.draft = None;
        self.reset_messages();
    }

    fn reset_messages(&mut self) {
        self.error = None;
        self.upload_notice = None;
    }

    /// Cancel the pending request and make its ticket stale.
    fn abandon_in_flight(&mut self) -> bool {
        self.generation += 1;
        match self.in_flight.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}
