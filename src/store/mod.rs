use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, Event, NewBooking, NewEvent};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryBookingStore, MemoryEventStore};
pub use postgres::{PgBookingStore, PgEventStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No event with slug '{0}'")]
    NotFound(String),

    #[error("An event with slug '{0}' already exists")]
    DuplicateSlug(String),

    /// Connection or query failure. Already logged by the store that raised it.
    #[error("Storage failure during {operation}")]
    Storage {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

/// Durable storage and retrieval of events.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create(&self, event: NewEvent) -> Result<Event, StoreError>;

    /// All events, ascending by date.
    async fn list_all(&self) -> Result<Vec<Event>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Event, StoreError>;

    /// Every other event sharing at least one tag with the event at `slug`.
    /// An unknown slug yields an empty list.
    async fn find_similar_by_slug(&self, slug: &str) -> Result<Vec<Event>, StoreError>;
}

/// Durable storage of bookings.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, booking: NewBooking) -> Result<Booking, StoreError>;

    async fn count_for_event(&self, event_id: Uuid) -> Result<u64, StoreError>;
}
