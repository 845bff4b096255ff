//! Team member records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Allowed values for [`TeamMember::year`].
pub const YEARS: &[&str] = &["1st Year", "2nd Year", "3rd Year", "4th Year", "Alumni"];

/// A member of the community team roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    /// Server-assigned identifier (absent until created)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,
    pub role: String,

    /// One of [`YEARS`]; empty while drafting
    pub year: String,

    pub department: String,
    pub bio: String,

    /// Server-relative path returned by the upload endpoint (e.g. "/uploads/abc.png")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Empty when unset; a stored `null` reads as empty too
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub linkedin_url: String,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub github_url: String,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub email: String,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(
        default,
        deserialize_with = "crate::timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Default for TeamMember {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            role: String::new(),
            year: String::new(),
            department: String::new(),
            bio: String::new(),
            image_url: None,
            linkedin_url: String::new(),
            github_url: String::new(),
            email: String::new(),
            is_active: true,
            created_at: None,
        }
    }
}
