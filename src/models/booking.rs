use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A reservation of a spot at an event. `event_id` is not checked against
/// stored events and may dangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub slug: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub event_id: Uuid,
    pub slug: String,
    pub email: String,
}

impl Booking {
    pub fn from_new(new: NewBooking, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            event_id: new.event_id,
            slug: new.slug,
            email: new.email,
            created_at: now,
        }
    }
}
