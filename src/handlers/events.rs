use axum::extract::{Multipart, Path, State};
use axum::response::Response;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::Event;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::validation::EventSubmission;

#[derive(Serialize)]
pub struct EventDetail {
    pub event: Event,
    /// Number of bookings already made for the event.
    pub bookings: u64,
}

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = state.events.list_all().await?;
    Ok(success(events, "Events fetched successfully"))
}

/// Accepts the multi-part create-event form. `tags` and `agenda` arrive as
/// encoded text and are decoded during validation.
pub async fn create_event(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut submission = EventSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            debug!(field = %name, "Ignoring file upload in event form");
            continue;
        }

        let value = field.text().await?;
        if !submission.set(&name, value) {
            debug!(field = %name, "Ignoring unknown event form field");
        }
    }

    let new_event = submission.validate()?;
    let event = state.events.create(new_event).await?;

    info!(event_id = %event.id, slug = %event.slug, "Event created");

    Ok(created(event, "Event created successfully"))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let event = state.events.find_by_slug(&slug).await?;

    let bookings = match state.bookings.count_for_event(event.id).await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, slug = %slug, "Could not count bookings, showing none");
            0
        }
    };

    Ok(success(
        EventDetail { event, bookings },
        "Event fetched successfully",
    ))
}

/// Never fails: lookup and storage errors degrade to an empty list so the
/// detail view still renders.
pub async fn similar_events(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let events = match state.events.find_similar_by_slug(&slug).await {
        Ok(events) => events,
        Err(e) => {
            warn!(error = %e, slug = %slug, "Similar events lookup failed");
            Vec::new()
        }
    };

    success(events, "Similar events fetched successfully")
}
