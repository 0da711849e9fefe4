use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod bookings;
pub mod events;

pub use bookings::create_booking;
pub use events::{create_event, get_event, list_events, similar_events};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "event-hub-api",
    };

    success(payload, "Health check successful")
}
