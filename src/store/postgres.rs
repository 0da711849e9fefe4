use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::error;
use uuid::Uuid;

use crate::db::Database;
use crate::models::{Booking, Event, NewBooking, NewEvent};
use crate::store::{BookingStore, EventStore, StoreError};

const EVENT_COLUMNS: &str = "id, slug, title, description, overview, image, date, time, \
     location, venue, mode, audience, agenda, organizer, tags, created_at, updated_at";

/// Logs a driver error with its operation and wraps it for the caller.
fn storage_error(operation: &'static str, source: sqlx::Error) -> StoreError {
    error!(error = ?source, operation, "Database error");
    StoreError::Storage { operation, source }
}

pub struct PgEventStore {
    db: Arc<Database>,
}

impl PgEventStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn create(&self, new: NewEvent) -> Result<Event, StoreError> {
        let pool = self
            .db
            .ensure_ready()
            .await
            .map_err(|e| storage_error("create_event", e))?;

        let event = Event::from_new(new, Uuid::new_v4(), Utc::now());

        let result = sqlx::query(
            r#"
            INSERT INTO events (id, slug, title, description, overview, image, date, time,
                                location, venue, mode, audience, agenda, organizer, tags,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(event.id)
        .bind(&event.slug)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.overview)
        .bind(&event.image)
        .bind(event.date)
        .bind(event.time)
        .bind(&event.location)
        .bind(&event.venue)
        .bind(event.mode)
        .bind(&event.audience)
        .bind(&event.agenda)
        .bind(&event.organizer)
        .bind(&event.tags)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&pool)
        .await;

        match result {
            Ok(_) => Ok(event),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateSlug(event.slug))
            }
            Err(e) => Err(storage_error("create_event", e)),
        }
    }

    async fn list_all(&self) -> Result<Vec<Event>, StoreError> {
        let pool = self
            .db
            .ensure_ready()
            .await
            .map_err(|e| storage_error("list_events", e))?;

        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, created_at ASC");
        let events = sqlx::query_as::<_, Event>(&sql)
            .fetch_all(&pool)
            .await
            .map_err(|e| storage_error("list_events", e))?;

        Ok(events)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Event, StoreError> {
        let pool = self
            .db
            .ensure_ready()
            .await
            .map_err(|e| storage_error("find_event_by_slug", e))?;

        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(slug)
            .fetch_optional(&pool)
            .await
            .map_err(|e| storage_error("find_event_by_slug", e))?;

        event.ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    async fn find_similar_by_slug(&self, slug: &str) -> Result<Vec<Event>, StoreError> {
        let event = match self.find_by_slug(slug).await {
            Ok(event) => event,
            Err(StoreError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let pool = self
            .db
            .ensure_ready()
            .await
            .map_err(|e| storage_error("find_similar_events", e))?;

        // `&&` is array overlap
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id <> $1 AND tags && $2");
        let similar = sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(&event.tags)
            .fetch_all(&pool)
            .await
            .map_err(|e| storage_error("find_similar_events", e))?;

        Ok(similar)
    }
}

pub struct PgBookingStore {
    db: Arc<Database>,
}

impl PgBookingStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn create(&self, new: NewBooking) -> Result<Booking, StoreError> {
        let pool = self
            .db
            .ensure_ready()
            .await
            .map_err(|e| storage_error("create_booking", e))?;

        let booking = Booking::from_new(new, Uuid::new_v4(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO bookings (id, event_id, slug, email, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(booking.id)
        .bind(booking.event_id)
        .bind(&booking.slug)
        .bind(&booking.email)
        .bind(booking.created_at)
        .execute(&pool)
        .await
        .map_err(|e| storage_error("create_booking", e))?;

        Ok(booking)
    }

    async fn count_for_event(&self, event_id: Uuid) -> Result<u64, StoreError> {
        let pool = self
            .db
            .ensure_ready()
            .await
            .map_err(|e| storage_error("count_bookings", e))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&pool)
            .await
            .map_err(|e| storage_error("count_bookings", e))?;

        Ok(count.max(0) as u64)
    }
}
