//! Inbound contact messages submitted through the public site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message left through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    /// Store identifier; older documents only carry `_id`
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,

    #[serde(default = "default_form_type")]
    pub form_type: String,

    #[serde(
        default,
        deserialize_with = "crate::timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_form_type() -> String {
    "general".to_string()
}

impl Default for ContactMessage {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            email: String::new(),
            subject: String::new(),
            message: String::new(),
            form_type: default_form_type(),
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_underscore_id() {
        let msg: ContactMessage = serde_json::from_value(serde_json::json!({
            "_id": "65f0c0ffee",
            "name": "Grace",
            "email": "grace@example.org",
            "subject": "Sponsorship",
            "message": "Hello!"
        }))
        .unwrap();

        assert_eq!(msg.id.as_deref(), Some("65f0c0ffee"));
        assert_eq!(msg.form_type, "general");
    }
}
