//! In-process stores for local development (`STORAGE_BACKEND=memory`) and tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Booking, Event, NewBooking, NewEvent};
use crate::store::{BookingStore, EventStore, StoreError};

/// Events kept in insertion order.
#[derive(Default)]
pub struct MemoryEventStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn create(&self, new: NewEvent) -> Result<Event, StoreError> {
        let mut events = self.events.write().await;

        if events.iter().any(|e| e.slug == new.slug) {
            return Err(StoreError::DuplicateSlug(new.slug));
        }

        let event = Event::from_new(new, Uuid::new_v4(), Utc::now());
        events.push(event.clone());
        Ok(event)
    }

    async fn list_all(&self) -> Result<Vec<Event>, StoreError> {
        let mut events = self.events.read().await.clone();
        // Stable sort keeps insertion order for equal dates
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Event, StoreError> {
        self.events
            .read()
            .await
            .iter()
            .find(|e| e.slug == slug)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    async fn find_similar_by_slug(&self, slug: &str) -> Result<Vec<Event>, StoreError> {
        let events = self.events.read().await;

        let Some(target) = events.iter().find(|e| e.slug == slug) else {
            return Ok(Vec::new());
        };

        Ok(events
            .iter()
            .filter(|e| e.id != target.id && e.shares_tag_with(target))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryBookingStore {
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn create(&self, new: NewBooking) -> Result<Booking, StoreError> {
        let booking = Booking::from_new(new, Uuid::new_v4(), Utc::now());
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn count_for_event(&self, event_id: Uuid) -> Result<u64, StoreError> {
        let count = self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.event_id == event_id)
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventMode;
    use chrono::{NaiveDate, NaiveTime};

    fn new_event(slug: &str, date: &str, tags: &[&str]) -> NewEvent {
        NewEvent {
            slug: slug.to_string(),
            title: format!("Title of {}", slug),
            description: "A gathering".to_string(),
            overview: "Talks and workshops".to_string(),
            image: "https://img.example.com/banner.png".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            location: "Lyon, France".to_string(),
            venue: "Centre des Congrès".to_string(),
            mode: EventMode::Hybrid,
            audience: "Developers".to_string(),
            agenda: vec!["Keynote".to_string(), "Lunch".to_string()],
            organizer: "Dev Hub".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn slugs(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_then_find_returns_same_fields() {
        let store = MemoryEventStore::new();
        let input = new_event("devcon-2025", "2025-11-05", &["react", "infra"]);

        let created = store.create(input.clone()).await.unwrap();
        let found = store.find_by_slug("devcon-2025").await.unwrap();

        assert_eq!(found, created);
        assert_eq!(found.title, input.title);
        assert_eq!(found.date, input.date);
        assert_eq!(found.time, input.time);
        assert_eq!(found.mode, input.mode);
        assert_eq!(found.agenda, input.agenda);
        assert_eq!(found.tags, input.tags);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let store = MemoryEventStore::new();
        store
            .create(new_event("devcon-2025", "2025-11-05", &["react"]))
            .await
            .unwrap();

        let err = store
            .create(new_event("devcon-2025", "2026-01-01", &["infra"]))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateSlug(slug) if slug == "devcon-2025"));
    }

    #[tokio::test]
    async fn test_list_all_sorts_by_date() {
        let store = MemoryEventStore::new();
        for (slug, date) in [("c", "2026-03-01"), ("a", "2025-01-15"), ("b", "2025-07-04")] {
            store.create(new_event(slug, date, &["x"])).await.unwrap();
        }

        let events = store.list_all().await.unwrap();
        assert_eq!(slugs(&events), vec!["a", "b", "c"]);
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[tokio::test]
    async fn test_list_all_empty() {
        let store = MemoryEventStore::new();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_slug_missing() {
        let store = MemoryEventStore::new();
        let err = store.find_by_slug("nonexistent").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_similar_events_share_a_tag_and_exclude_self() {
        let store = MemoryEventStore::new();
        store
            .create(new_event("devcon-2025", "2025-11-05", &["react", "infra"]))
            .await
            .unwrap();
        store
            .create(new_event("meetup-x", "2025-12-01", &["infra", "security"]))
            .await
            .unwrap();
        store
            .create(new_event("game-jam", "2025-10-10", &["gaming"]))
            .await
            .unwrap();

        let similar = store.find_similar_by_slug("devcon-2025").await.unwrap();
        assert_eq!(slugs(&similar), vec!["meetup-x"]);

        let similar = store.find_similar_by_slug("game-jam").await.unwrap();
        assert!(similar.is_empty());
    }

    #[tokio::test]
    async fn test_similar_events_for_unknown_slug_is_empty() {
        let store = MemoryEventStore::new();
        store
            .create(new_event("devcon-2025", "2025-11-05", &["react"]))
            .await
            .unwrap();

        let similar = store.find_similar_by_slug("nonexistent").await.unwrap();
        assert!(similar.is_empty());
    }

    #[tokio::test]
    async fn test_bookings_allow_duplicates_and_dangling_events() {
        let store = MemoryBookingStore::new();
        let event_id = Uuid::new_v4();
        let booking = NewBooking {
            event_id,
            slug: "ghost-event".to_string(),
            email: "ada@example.com".to_string(),
        };

        let first = store.create(booking.clone()).await.unwrap();
        let second = store.create(booking).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.count_for_event(event_id).await.unwrap(), 2);
        assert_eq!(store.count_for_event(Uuid::new_v4()).await.unwrap(), 0);
    }
}
