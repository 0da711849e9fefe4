use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::created;
use crate::validation::BookingSubmission;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub booking_id: Uuid,
    pub event_id: Uuid,
    pub slug: String,
}

/// Records a booking. The same email may book the same event more than once,
/// and the event id is not checked against stored events.
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<BookingSubmission>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(submission) = payload?;
    let new_booking = submission.validate()?;

    let booking = state.bookings.create(new_booking).await?;

    info!(
        booking_id = %booking.id,
        event_id = %booking.event_id,
        slug = %booking.slug,
        "Booking created"
    );

    Ok(created(
        BookingConfirmation {
            booking_id: booking.id,
            event_id: booking.event_id,
            slug: booking.slug,
        },
        "Booking created successfully",
    ))
}
