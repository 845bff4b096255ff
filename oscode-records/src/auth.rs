//! Authentication, upload and acknowledgement payloads.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/admin/login`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Successful verify response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyResponse {
    pub username: String,
    pub valid: bool,
}

/// Body of `POST /api/admin/logout`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogoutRequest {
    pub session_id: String,
}

/// Successful image upload response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    /// Server-relative path of the stored image
    pub image_url: String,
}

/// Generic acknowledgement for mutations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Identifier assigned on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Ack {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            id: None,
        }
    }
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
