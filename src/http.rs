use crate::backend::BookingBackend;
use crate::booking_service::BookingService;
use crate::configuration::Configuration;
use crate::error::{BookingError, ConfigError};
use crate::types::{Booking, BookingRequest, BookingResponse, TimeSlot};
use axum::extract::{rejection::JsonRejection, Path, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{extract::State, http::StatusCode, Json};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct AppState<B: BookingBackend> {
    pub booking_service: BookingService<B>,
}

pub fn create_app<B: BookingBackend, C: Configuration>(
    backend: B,
    configuration: C,
) -> Result<Router, ConfigError> {
    let policy = configuration.schedule_policy()?;
    let state = AppState {
        booking_service: BookingService::new(backend, policy),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let booking = Router::new()
        .route("/Booking", post(create_booking::<B>))
        .route("/Booking/available-slots", get(available_slots::<B>))
        .route(
            "/Booking/:name",
            get(booking_by_name::<B>)
                .put(amend_booking::<B>)
                .delete(delete_booking::<B>),
        )
        .route_layer(middleware::from_fn_with_state(
            configuration.api_key(),
            require_api_key,
        ));

    Ok(Router::new()
        .merge(booking)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

async fn require_api_key(
    State(api_key): State<Option<String>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let Some(api_key) = api_key else {
        return Ok(next.run(request).await);
    };

    match request.headers().get(API_KEY_HEADER) {
        Some(header) if header.to_str().unwrap_or("") == api_key => Ok(next.run(request).await),
        Some(_) => {
            warn!("Rejected request with wrong api key");
            Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
        }
        None => Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string())),
    }
}

async fn available_slots<B: BookingBackend>(
    State(state): State<AppState<B>>,
) -> Result<Json<Vec<TimeSlot>>, BookingError> {
    Ok(Json(state.booking_service.available_slots()?))
}

async fn booking_by_name<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Path(name): Path<String>,
) -> Result<Json<Booking>, BookingError> {
    Ok(Json(state.booking_service.booking_by_name(&name)?))
}

async fn create_booking<B: BookingBackend>(
    State(state): State<AppState<B>>,
    request: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, BookingError> {
    let Json(request) = request?;
    Ok(Json(state.booking_service.create_booking(&request)?))
}

async fn amend_booking<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Path(name): Path<String>,
    request: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, BookingError> {
    let Json(request) = request?;
    Ok(Json(
        state
            .booking_service
            .amend_booking(&name, &request.booking_time)?,
    ))
}

async fn delete_booking<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Path(name): Path<String>,
) -> Result<StatusCode, BookingError> {
    state.booking_service.delete_booking(&name)?;
    Ok(StatusCode::NO_CONTENT)
}
