//! Community event records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Event category
///
/// Categories this build does not know are kept verbatim in `Other`, so an
/// edit made here writes back exactly what another client stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum EventType {
    #[default]
    Workshop,
    Hackathon,
    Seminar,
    Meeting,
    Other(String),
}

impl EventType {
    /// Categories offered when drafting an event
    pub const ALL: [EventType; 4] = [
        EventType::Workshop,
        EventType::Hackathon,
        EventType::Seminar,
        EventType::Meeting,
    ];

    /// Known category for `s`, or `Other` carrying it unchanged
    pub fn from_wire(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| EventType::Other(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventType::Workshop => "workshop",
            EventType::Hackathon => "hackathon",
            EventType::Seminar => "seminar",
            EventType::Meeting => "meeting",
            EventType::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EventType::Workshop => "Workshop",
            EventType::Hackathon => "Hackathon",
            EventType::Seminar => "Seminar",
            EventType::Meeting => "Meeting",
            EventType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict: only the categories in [`EventType::ALL`].
impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workshop" => Ok(EventType::Workshop),
            "hackathon" => Ok(EventType::Hackathon),
            "seminar" => Ok(EventType::Seminar),
            "meeting" => Ok(EventType::Meeting),
            other => Err(format!("unknown event type: {}", other)),
        }
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EventType::from_wire(&raw))
    }
}

/// A scheduled community event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub title: String,
    pub description: String,

    /// Calendar date as entered (YYYY-MM-DD)
    pub date: String,

    /// Local start time as entered (HH:MM)
    pub time: String,

    pub venue: String,

    #[serde(default)]
    pub event_type: EventType,

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

impl Default for Event {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            date: String::new(),
            time: String::new(),
            venue: String::new(),
            event_type: EventType::Workshop,
            is_active: true,
            created_at: None,
        }
    }
}
