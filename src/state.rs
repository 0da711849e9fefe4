use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::db::Database;
use crate::store::{
    BookingStore, EventStore, MemoryBookingStore, MemoryEventStore, PgBookingStore, PgEventStore,
};

#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventStore>,
    pub bookings: Arc<dyn BookingStore>,
}

impl AppState {
    pub fn new(events: Arc<dyn EventStore>, bookings: Arc<dyn BookingStore>) -> Self {
        Self { events, bookings }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryEventStore::new()),
            Arc::new(MemoryBookingStore::new()),
        )
    }

    /// Both Postgres stores share the one database handle.
    pub fn postgres(db: Arc<Database>) -> Self {
        Self::new(
            Arc::new(PgEventStore::new(db.clone())),
            Arc::new(PgBookingStore::new(db)),
        )
    }

    /// Builds the stores selected by `config`. Returns the database handle
    /// when the Postgres backend is in use.
    pub fn from_config(config: &Config) -> (Self, Option<Arc<Database>>) {
        match config.storage {
            StorageBackend::Memory => (Self::in_memory(), None),
            StorageBackend::Postgres => {
                let db = Arc::new(Database::new(config.database.clone()));
                (Self::postgres(db.clone()), Some(db))
            }
        }
    }
}
