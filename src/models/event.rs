use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Delivery format of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "event_mode", rename_all = "lowercase")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

impl EventMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventMode::Online => "online",
            EventMode::Offline => "offline",
            EventMode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for EventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(EventMode::Online),
            "offline" => Ok(EventMode::Offline),
            "hybrid" => Ok(EventMode::Hybrid),
            other => Err(format!("Unknown event mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub venue: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated event that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub venue: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

impl Event {
    pub fn from_new(new: NewEvent, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            slug: new.slug,
            title: new.title,
            description: new.description,
            overview: new.overview,
            image: new.image,
            date: new.date,
            time: new.time,
            location: new.location,
            venue: new.venue,
            mode: new.mode,
            audience: new.audience,
            agenda: new.agenda,
            organizer: new.organizer,
            tags: new.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the two events carry at least one tag in common.
    pub fn shares_tag_with(&self, other: &Event) -> bool {
        self.tags.iter().any(|tag| other.tags.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mode_parses_case_insensitively() {
        assert_eq!("Hybrid".parse::<EventMode>(), Ok(EventMode::Hybrid));
        assert_eq!(" online ".parse::<EventMode>(), Ok(EventMode::Online));
        assert!("in-person".parse::<EventMode>().is_err());
    }

    #[test]
    fn test_event_mode_serializes_lowercase() {
        let json = serde_json::to_string(&EventMode::Offline).unwrap();
        assert_eq!(json, "\"offline\"");
    }
}
