//! Console error taxonomy.
//!
//! Every failure in the console core resolves to one of these and, from
//! there, to a re-enterable UI state. Nothing here is fatal to the process.

use thiserror::Error;

use crate::api::ApiError;

/// Generic text shown for anything that is not an auth or validation problem.
pub const GENERIC_FAILURE: &str = "Connection error. Please try again.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConsoleError {
    /// Bad credentials, or an expired/invalid session token
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request could not be completed, or the server reported a failure.
    /// Both are treated the same way.
    #[error("Request failed: {0}")]
    Network(String),

    /// A required field was empty; caught before any request is sent
    #[error("{field} is required")]
    Validation { field: &'static str },

    /// A picked file was refused before upload
    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    /// The caller abandoned the request (modal closed, view left)
    #[error("Request cancelled")]
    Cancelled,
}

impl ConsoleError {
    /// Inline text for the operator.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Auth(detail) => detail.clone(),
            ConsoleError::Network(_) => GENERIC_FAILURE.to_string(),
            ConsoleError::Validation { field } => format!("{} is required", field),
            ConsoleError::UnsupportedFile(_) => "Please choose an image file".to_string(),
            ConsoleError::Cancelled => "Cancelled".to_string(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ConsoleError::Auth(_))
    }
}

impl From<ApiError> for ConsoleError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status(status, detail)
                if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN =>
            {
                ConsoleError::Auth(detail)
            }
            ApiError::Cancelled => ConsoleError::Cancelled,
            other => ConsoleError::Network(other.to_string()),
        }
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
