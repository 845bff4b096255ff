//! Field schemas for the record types.

use oscode_records::{ContactMessage, Event, EventType, TeamMember};

use super::{FieldKind, FieldSpec, FieldValue, Resource, ResourceKind};

const YEAR_CHOICES: &[(&str, &str)] = &[
    ("1st Year", "1st Year"),
    ("2nd Year", "2nd Year"),
    ("3rd Year", "3rd Year"),
    ("4th Year", "4th Year"),
    ("Alumni", "Alumni"),
];

const EVENT_TYPE_CHOICES: &[(&str, &str)] = &[
    ("workshop", "Workshop"),
    ("hackathon", "Hackathon"),
    ("seminar", "Seminar"),
    ("meeting", "Meeting"),
];

const TEAM_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Name", FieldKind::Text),
    FieldSpec::required("role", "Role", FieldKind::Text),
    FieldSpec::required("year", "Year", FieldKind::Choice(YEAR_CHOICES)),
    FieldSpec::required("department", "Department", FieldKind::Text),
    FieldSpec::required("bio", "Bio", FieldKind::LongText),
    FieldSpec::optional("image_url", "Profile Image", FieldKind::Image),
    FieldSpec::optional("linkedin_url", "LinkedIn URL", FieldKind::Url),
    FieldSpec::optional("github_url", "GitHub URL", FieldKind::Url),
    FieldSpec::optional("email", "Email", FieldKind::Email),
    FieldSpec::optional("is_active", "Shown on site", FieldKind::Flag),
];

const EVENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", "Title", FieldKind::Text),
    FieldSpec::required("description", "Description", FieldKind::LongText),
    FieldSpec::required("date", "Date", FieldKind::Date),
    FieldSpec::required("time", "Time", FieldKind::Time),
    FieldSpec::required("venue", "Venue", FieldKind::Text),
    FieldSpec::required("event_type", "Event Type", FieldKind::Choice(EVENT_TYPE_CHOICES)),
    FieldSpec::optional("is_active", "Shown on site", FieldKind::Flag),
];

const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Name", FieldKind::Text),
    FieldSpec::required("email", "Email", FieldKind::Email),
    FieldSpec::required("subject", "Subject", FieldKind::Text),
    FieldSpec::required("message", "Message", FieldKind::LongText),
    FieldSpec::optional("form_type", "Form Type", FieldKind::Text),
];

fn text(value: &str) -> Option<FieldValue> {
    Some(FieldValue::Text(value.to_string()))
}

/// Empty text clears an optional string.
fn optional_text(value: FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) if s.is_empty() => None,
        other => Some(other.as_text().to_string()),
    }
}

impl Resource for TeamMember {
    const KIND: ResourceKind = ResourceKind::TeamMember;

    fn fields() -> &'static [FieldSpec] {
        TEAM_FIELDS
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => text(&self.name),
            "role" => text(&self.role),
            "year" => text(&self.year),
            "department" => text(&self.department),
            "bio" => text(&self.bio),
            "image_url" => text(self.image_url.as_deref().unwrap_or_default()),
            "linkedin_url" => text(&self.linkedin_url),
            "github_url" => text(&self.github_url),
            "email" => text(&self.email),
            "is_active" => Some(FieldValue::Flag(self.is_active)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "role" => &mut self.role,
            "year" => &mut self.year,
            "department" => &mut self.department,
            "bio" => &mut self.bio,
            "linkedin_url" => &mut self.linkedin_url,
            "github_url" => &mut self.github_url,
            "email" => &mut self.email,
            "image_url" => {
                self.image_url = optional_text(value);
                return true;
            }
            "is_active" => {
                self.is_active = value.as_flag();
                return true;
            }
            _ => return false,
        };
        *slot = value.as_text().to_string();
        true
    }
}

impl Resource for Event {
    const KIND: ResourceKind = ResourceKind::Event;

    fn fields() -> &'static [FieldSpec] {
        EVENT_FIELDS
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "title" => text(&self.title),
            "description" => text(&self.description),
            "date" => text(&self.date),
            "time" => text(&self.time),
            "venue" => text(&self.venue),
            "event_type" => text(self.event_type.as_str()),
            "is_active" => Some(FieldValue::Flag(self.is_active)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> bool {
        let slot = match field {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "date" => &mut self.date,
            "time" => &mut self.time,
            "venue" => &mut self.venue,
            "event_type" => {
                // new values must be offered categories; a stored one may be written back as is
                let raw = value.as_text();
                return match raw.parse::<EventType>() {
                    Ok(event_type) => {
                        self.event_type = event_type;
                        true
                    }
                    Err(_) => raw == self.event_type.as_str(),
                };
            }
            "is_active" => {
                self.is_active = value.as_flag();
                return true;
            }
            _ => return false,
        };
        *slot = value.as_text().to_string();
        true
    }
}

impl Resource for ContactMessage {
    const KIND: ResourceKind = ResourceKind::ContactMessage;

    fn fields() -> &'static [FieldSpec] {
        CONTACT_FIELDS
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => text(&self.name),
            "email" => text(&self.email),
            "subject" => text(&self.subject),
            "message" => text(&self.message),
            "form_type" => text(&self.form_type),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "subject" => &mut self.subject,
            "message" => &mut self.message,
            "form_type" => &mut self.form_type,
            _ => return false,
        };
        *slot = value.as_text().to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every schema field must be readable and writable by name.
    fn assert_schema_consistent<R: Resource>() {
        let mut record = R::default();
        for spec in R::fields() {
            assert!(record.get(spec.name).is_some(), "get({}) missing", spec.name);
            let value = match spec.kind {
                FieldKind::Flag => FieldValue::Flag(false),
                FieldKind::Choice(choices) => FieldValue::from(choices[0].0),
                _ => FieldValue::from("x"),
            };
            assert!(record.set(spec.name, value.clone()), "set({}) rejected", spec.name);
            assert_eq!(record.get(spec.name), Some(value), "{} did not stick", spec.name);
        }
    }

    #[test]
    fn test_schemas_are_consistent() {
        assert_schema_consistent::<TeamMember>();
        assert_schema_consistent::<Event>();
        assert_schema_consistent::<ContactMessage>();
    }

    #[test]
    fn test_new_team_member_is_missing_name_first() {
        let member = TeamMember::default();
        assert_eq!(member.missing_required().map(|s| s.name), Some("name"));
    }

    #[test]
    fn test_complete_team_member_passes() {
        let mut member = TeamMember::default();
        for (field, value) in [
            ("name", "A"),
            ("role", "B"),
            ("year", "1st Year"),
            ("department", "D"),
            ("bio", "bio"),
        ] {
            assert!(member.set(field, value.into()));
        }
        assert!(member.missing_required().is_none());
    }

    #[test]
    fn test_image_field_only_on_team_members() {
        assert_eq!(TeamMember::image_field(), Some("image_url"));
        assert_eq!(Event::image_field(), None);
        assert_eq!(ContactMessage::image_field(), None);
    }

    #[test]
    fn test_clearing_image_url() {
        let mut member = TeamMember {
            image_url: Some("/uploads/old.png".to_string()),
            ..Default::default()
        };
        assert!(member.set("image_url", "".into()));
        assert!(member.image_url.is_none());
    }

    #[test]
    fn test_event_type_rejects_unknown_value() {
        let mut event = Event::default();
        assert!(!event.set("event_type", "conference".into()));
        assert_eq!(event.event_type, EventType::Workshop);
        assert!(event.set("event_type", "seminar".into()));
        assert_eq!(event.event_type, EventType::Seminar);
    }

    #[test]
    fn test_stored_unknown_event_type_round_trips() {
        let mut event = Event {
            event_type: EventType::Other("conference".to_string()),
            ..Default::default()
        };
        let value = event.get("event_type").unwrap();
        assert_eq!(value.as_text(), "conference");

        assert!(event.set("event_type", value));
        assert_eq!(event.event_type, EventType::Other("conference".to_string()));
        assert!(!event.set("event_type", "summit".into()));

        let written = serde_json::to_value(&event).unwrap();
        assert_eq!(written["event_type"], "conference");

        assert!(event.set("event_type", "meeting".into()));
        assert_eq!(event.event_type, EventType::Meeting);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut event = Event::default();
        assert!(!event.set("organizer", "x".into()));
        assert!(event.get("organizer").is_none());
    }
}
