//! Resource kinds, their field schemas and the generic CRUD controller.
//!
//! One [`ResourceController`] per screen, parametrized by the record type.
//! The record types themselves live in `oscode-records`; this module only
//! describes how the console edits them.

mod controller;
mod schema;

pub use controller::{Collection, Mutation, ResourceController};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// The manageable record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    TeamMember,
    Event,
    ContactMessage,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::TeamMember,
        ResourceKind::Event,
        ResourceKind::ContactMessage,
    ];

    /// Path segment under `/api/admin/`
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::TeamMember => "team-members",
            ResourceKind::Event => "events",
            ResourceKind::ContactMessage => "contact-forms",
        }
    }

    /// Unauthenticated listing used by the public site, if any
    pub fn public_path(&self) -> Option<&'static str> {
        match self {
            ResourceKind::TeamMember => Some("/api/team-members"),
            ResourceKind::Event => Some("/api/events"),
            ResourceKind::ContactMessage => None,
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }

    /// Singular label for headings and confirmations
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::TeamMember => "team member",
            ResourceKind::Event => "event",
            ResourceKind::ContactMessage => "contact form",
        }
    }

    /// Whether the console offers create/edit for this kind. Contact messages
    /// arrive from the public site and can only be read and deleted.
    pub fn is_editable(&self) -> bool {
        !matches!(self, ResourceKind::ContactMessage)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    /// One of a fixed set of `(value, label)` pairs
    Choice(&'static [(&'static str, &'static str)]),
    Date,
    Time,
    Url,
    Email,
    Flag,
    /// Server-relative image path, filled by the upload adapter
    Image,
}

/// One editable field of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

/// A field value as the form sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    /// Presence check used by submit validation. Content is not inspected.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Flag(_) => false,
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Flag(true) => "true",
            FieldValue::Flag(false) => "false",
        }
    }

    pub fn as_flag(&self) -> bool {
        match self {
            FieldValue::Flag(b) => *b,
            FieldValue::Text(s) => s == "true",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

/// A record type the console manages.
pub trait Resource:
    Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: ResourceKind;

    /// Editable fields, in form order
    fn fields() -> &'static [FieldSpec];

    /// Server-assigned identifier, `None` for a fresh draft
    fn id(&self) -> Option<&str>;

    /// Current value of `field`, `None` if the name is not in the schema
    fn get(&self, field: &str) -> Option<FieldValue>;

    /// Write `value` into `field`. Returns `false` if the name is unknown or
    /// the value does not fit the field.
    fn set(&mut self, field: &str, value: FieldValue) -> bool;

    /// Name of the image reference field, for kinds that carry one
    fn image_field() -> Option<&'static str> {
        Self::fields()
            .iter()
            .find(|spec| spec.kind == FieldKind::Image)
            .map(|spec| spec.name)
    }

    /// First required field that is empty, if any.
    fn missing_required(&self) -> Option<&'static FieldSpec> {
        Self::fields().iter().find(|spec| {
            spec.required
                && self
                    .get(spec.name)
                    .map(|value| value.is_empty())
                    .unwrap_or(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_paths_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_path(kind.path()), Some(kind));
        }
        assert_eq!(ResourceKind::from_path("jobs"), None);
    }

    #[test]
    fn test_contact_messages_are_read_only() {
        assert!(ResourceKind::TeamMember.is_editable());
        assert!(ResourceKind::Event.is_editable());
        assert!(!ResourceKind::ContactMessage.is_editable());
        assert!(ResourceKind::ContactMessage.public_path().is_none());
    }

    #[test]
    fn test_presence_is_the_only_check() {
        assert!(FieldValue::from("").is_empty());
        assert!(!FieldValue::from(" ").is_empty());
        assert!(!FieldValue::Flag(false).is_empty());
    }
}
