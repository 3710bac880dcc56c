use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveTime;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Booking store lock was poisoned")]
    LockPoisoned,

    #[error("Booking {0} does not exist in the store")]
    MissingBooking(Uuid),

    #[error("The store already holds a booking for {0}")]
    NameTaken(String),
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("No booking found for {0}")]
    NotFound(String),

    #[error("A booking already exists for {0}")]
    DuplicateName(String),

    #[error("No available slots for {}", .0.format("%H:%M"))]
    SlotFull(NaiveTime),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Opening time {opening} must be before closing time {closing}")]
    EmptySchedule { opening: NaiveTime, closing: NaiveTime },

    #[error("Slot capacity must be at least 1")]
    ZeroCapacity,

    #[error("Excluded hour {0} is not on the hour")]
    ExcludedHourOffTheHour(NaiveTime),
}

impl From<JsonRejection> for BookingError {
    fn from(rejection: JsonRejection) -> Self {
        BookingError::Validation(vec![rejection.body_text()])
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            BookingError::Validation(messages) => {
                (StatusCode::BAD_REQUEST, json!({ "errors": messages }))
            }
            BookingError::NotFound(_) => {
                (StatusCode::NOT_FOUND, json!({ "error": self.to_string() }))
            }
            BookingError::DuplicateName(_) | BookingError::SlotFull(_) => {
                (StatusCode::CONFLICT, json!({ "error": self.to_string() }))
            }
            BookingError::Store(err) => {
                error!(?err, "Booking store failure");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
                )
                    .into_response();
            }
        };

        warn!(%status, "Request rejected: {self}");
        (status, Json(body)).into_response()
    }
}
