//! Admin API client.
//!
//! [`AdminApi`] is the seam between the console core and the remote admin
//! API. [`HttpAdminApi`] talks to the real service over HTTP; tests swap in an
//! in-memory fake.

mod http;

pub use http::HttpAdminApi;

use async_trait::async_trait;
use oscode_records::{Ack, DashboardOverview, LoginRequest, LoginResponse, UploadResponse};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::resource::ResourceKind;
use crate::upload::ImageAsset;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the connection broke
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// The server answered with a non-2xx status
    #[error("Status error: {1} (Status {0})")]
    Status(reqwest::StatusCode, String),
    /// The per-call deadline elapsed
    #[error("Request timed out")]
    Timeout,
    /// The call's cancellation token fired first
    #[error("Request cancelled")]
    Cancelled,
    /// The response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Cancellation and deadline threaded through every network call.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub cancel: CancellationToken,
    pub deadline: Duration,
}

impl CallContext {
    pub fn new(deadline: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline,
        }
    }

    pub fn with_cancel(cancel: CancellationToken, deadline: Duration) -> Self {
        Self { cancel, deadline }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Operations offered by the admin API.
///
/// Resource operations are keyed by [`ResourceKind`] and carry records as
/// JSON; typing happens in [`crate::resource::ResourceController`].
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AdminApi: Send + Sync {
    /// `POST /api/admin/login`
    async fn login(&self, credentials: &LoginRequest, ctx: &CallContext)
        -> ApiResult<LoginResponse>;

    /// `GET /api/admin/verify`; any 2xx means the token is valid. Returns the
    /// username when the server reports one.
    async fn verify(&self, token: &str, ctx: &CallContext) -> ApiResult<Option<String>>;

    /// `POST /api/admin/logout`
    async fn logout(&self, token: &str, ctx: &CallContext) -> ApiResult<()>;

    /// `GET /api/admin/{resource}`
    async fn list(&self, kind: ResourceKind, token: &str, ctx: &CallContext)
        -> ApiResult<Vec<Value>>;

    /// `POST /api/admin/{resource}`
    async fn create(
        &self,
        kind: ResourceKind,
        token: &str,
        record: &Value,
        ctx: &CallContext,
    ) -> ApiResult<Ack>;

    /// `PUT /api/admin/{resource}/{id}`
    async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        token: &str,
        record: &Value,
        ctx: &CallContext,
    ) -> ApiResult<Ack>;

    /// `DELETE /api/admin/{resource}/{id}`
    async fn delete(
        &self,
        kind: ResourceKind,
        id: &str,
        token: &str,
        ctx: &CallContext,
    ) -> ApiResult<Ack>;

    /// `POST /api/admin/upload-image` (multipart)
    async fn upload_image(
        &self,
        token: &str,
        asset: &ImageAsset,
        ctx: &CallContext,
    ) -> ApiResult<UploadResponse>;

    /// `GET /api/admin/dashboard-stats`
    async fn dashboard(&self, token: &str, ctx: &CallContext) -> ApiResult<DashboardOverview>;
}
